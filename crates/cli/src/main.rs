#![deny(unsafe_code)]
//! CLI binary for the color-names dictionary.
//!
//! Subcommands:
//! - `name <color>`: print the closest color name
//! - `nearest <color>`: print the K closest named colors
//! - `list`: print every loaded entry
//!
//! Dictionaries come from `--dict` files, a `--config` JSON file, or, when
//! neither is given, the built-in dictionary in `--data-dir`.

mod error;

use clap::{Parser, Subcommand};
use color_names_core::source::BUILT_IN_DEFAULT;
use color_names_core::{DataDirResolver, Dictionary, DictionaryConfig, DictionarySource, Srgb};
use error::CliError;
use log::info;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "color-names", about = "Look up human-readable names for colors")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Dictionary file to load (repeatable, loaded in order).
    #[arg(short, long = "dict", global = true)]
    dicts: Vec<PathBuf>,

    /// JSON file listing dictionary sources.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the built-in dictionary.
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the name closest to a color.
    Name {
        /// Query color: "#rrggbb" or "R G B" (0-255).
        color: String,

        /// Append " ~" when the match is not exact.
        #[arg(short, long)]
        marker: bool,
    },
    /// Print the K named colors closest to a color.
    Nearest {
        /// Query color: "#rrggbb" or "R G B" (0-255).
        color: String,

        /// Number of names to return.
        #[arg(short, default_value_t = 5)]
        k: usize,
    },
    /// Print every loaded entry.
    List,
}

/// Sources in load order: config entries first, then `--dict` files. Falls
/// back to the built-in dictionary when nothing was specified.
fn sources(cli: &Cli) -> Result<Vec<DictionarySource>, CliError> {
    let mut sources = Vec::new();
    if let Some(path) = &cli.config {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
        let config = DictionaryConfig::from_json_str(&text)?;
        sources.extend(config.enabled().cloned());
    }
    sources.extend(
        cli.dicts
            .iter()
            .map(|p| DictionarySource::file(p.to_string_lossy())),
    );
    if cli.config.is_none() && sources.is_empty() {
        sources.push(DictionarySource::built_in(BUILT_IN_DEFAULT));
    }
    Ok(sources)
}

fn load(cli: &Cli) -> Result<Dictionary, CliError> {
    let sources = sources(cli)?;
    let resolver = DataDirResolver::new(&cli.data_dir);
    let mut dict = Dictionary::new();
    let mut report = dict.load(&sources, &resolver);
    info!(
        "loaded {} color names from {} of {} dictionaries",
        report.entries,
        report.sources,
        sources.len()
    );
    if report.sources == 0 && !report.failures.is_empty() {
        let first = report.failures.swap_remove(0);
        return Err(first.error.into());
    }
    Ok(dict)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let dict = load(&cli)?;

    match &cli.command {
        Command::Name { color, marker } => {
            let query = Srgb::parse(color)?;
            let name = dict.nearest_name(query, *marker);
            if cli.json {
                let found = dict.closest(query);
                let info = serde_json::json!({
                    "query": query,
                    "name": name,
                    "distance": found.map(|m| m.distance),
                    "color": found.map(|m| m.entry.original_color()),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{name}");
            }
        }
        Command::Nearest { color, k } => {
            let query = Srgb::parse(color)?;
            let found = dict.nearest_k(query, *k);
            if cli.json {
                let items: Vec<_> = found
                    .iter()
                    .map(|(name, color)| serde_json::json!({"name": name, "color": color}))
                    .collect();
                let info = serde_json::json!({"query": query, "nearest": items});
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for (name, color) in found {
                    println!("{}  {name}", color.to_hex());
                }
            }
        }
        Command::List => {
            if cli.json {
                let items: Vec<_> = dict
                    .iter()
                    .map(|e| serde_json::json!({"name": e.name(), "color": e.original_color()}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for entry in dict.iter() {
                    println!("{}  {}", entry.original_color().to_hex(), entry.name());
                }
                eprintln!("{} entries", dict.len());
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
