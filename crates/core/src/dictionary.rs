//! The named-color dictionary: an arena of entries bucketed by the color grid.
//!
//! Entries live in a single `Vec` owned by the [`Dictionary`]; grid buckets
//! store indices into it. Loading is additive and happens up front; after
//! that the dictionary is only read until it is cleared or reloaded.
//!
//! A reload parses every source into a fresh dictionary first and then
//! replaces `self` in one assignment, so a failed source never leaves a
//! half-built dictionary behind. To share one dictionary between threads, wrap
//! it in an `Arc` and swap the `Arc` after a reload.

use crate::color::{to_index_space, Lab, Srgb};
use crate::error::DictionaryError;
use crate::grid::{insertion_cell, Grid};
use crate::loader::{parse_file, parse_reader, DictionaryLine};
use crate::search::{closest, k_nearest, Indexed};
use crate::source::{DictionarySource, PathResolver};
use log::{debug, warn};
use std::io::BufRead;
use std::path::Path;

/// Distance above which a match counts as imprecise.
pub const IMPRECISION_THRESHOLD: f64 = 0.1;

/// Appended to a name when the match is imprecise and the caller asked for it.
pub const IMPRECISION_MARKER: &str = " ~";

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    name: String,
    indexed_color: Lab,
    original_color: Srgb,
}

impl NamedColor {
    /// Creates an entry, converting `color` into the index space.
    pub fn new(name: impl Into<String>, color: Srgb) -> Self {
        Self {
            name: name.into(),
            indexed_color: to_index_space(color),
            original_color: color,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The color as loaded, channels divided by 255.
    pub fn original_color(&self) -> Srgb {
        self.original_color
    }

    pub fn indexed_color(&self) -> Lab {
        self.indexed_color
    }
}

impl Indexed for NamedColor {
    fn indexed_color(&self) -> Lab {
        self.indexed_color
    }
}

/// Result of a closest-name lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub entry: &'a NamedColor,
    pub distance: f64,
}

impl Match<'_> {
    pub fn is_imprecise(&self) -> bool {
        self.distance > IMPRECISION_THRESHOLD
    }
}

/// A source that failed to load.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: DictionarySource,
    pub error: DictionaryError,
}

/// Outcome of loading a list of sources.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Entries added across all sources.
    pub entries: usize,
    /// Sources that loaded successfully.
    pub sources: usize,
    pub failures: Vec<SourceFailure>,
}

impl LoadReport {
    /// True when no source failed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Named colors indexed for nearest-name lookups.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<NamedColor>,
    grid: Grid<usize>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in load order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedColor> {
        self.entries.iter()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.grid.clear();
    }

    /// Adds a single entry.
    pub fn insert(&mut self, name: impl Into<String>, color: Srgb) {
        let entry = NamedColor::new(name, color);
        let index = self.entries.len();
        self.grid.push(insertion_cell(entry.indexed_color), index);
        self.entries.push(entry);
    }

    fn extend(&mut self, lines: Vec<DictionaryLine>) -> usize {
        let count = lines.len();
        self.entries.reserve(count);
        for line in lines {
            self.insert(line.name, line.color);
        }
        count
    }

    /// Adds every entry readable from `reader`. On a read error nothing is
    /// added.
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> std::io::Result<usize> {
        let lines = parse_reader(reader)?;
        Ok(self.extend(lines))
    }

    /// Adds every entry in the file at `path`. Returns the number added.
    ///
    /// Returns `DictionaryError::SourceUnavailable` without adding anything if
    /// the file cannot be opened or read.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, DictionaryError> {
        let lines = parse_file(path)?;
        Ok(self.extend(lines))
    }

    /// Adds entries from every enabled source, in order.
    ///
    /// A failing source is recorded in the report and the pass continues with
    /// the next one; entries already loaded are kept.
    pub fn load<'a, I>(&mut self, sources: I, resolver: &dyn PathResolver) -> LoadReport
    where
        I: IntoIterator<Item = &'a DictionarySource>,
    {
        let mut report = LoadReport::default();
        for source in sources.into_iter().filter(|s| s.enable) {
            let loaded = source
                .resolve(resolver)
                .and_then(|path| self.load_file(&path));
            match loaded {
                Ok(count) => {
                    debug!("loaded {count} color names from {:?}", source.path);
                    report.entries += count;
                    report.sources += 1;
                }
                Err(error) => {
                    warn!("skipping color dictionary {:?}: {error}", source.path);
                    report.failures.push(SourceFailure {
                        source: source.clone(),
                        error,
                    });
                }
            }
        }
        report
    }

    /// Replaces the contents with a fresh load of `sources`.
    pub fn reload<'a, I>(&mut self, sources: I, resolver: &dyn PathResolver) -> LoadReport
    where
        I: IntoIterator<Item = &'a DictionarySource>,
    {
        let mut fresh = Dictionary::new();
        let report = fresh.load(sources, resolver);
        *self = fresh;
        report
    }

    /// The closest entry to `color`, searching outward only until the first
    /// shell that holds any entry.
    pub fn closest(&self, color: Srgb) -> Option<Match<'_>> {
        let hit = closest(&self.grid, &self.entries, to_index_space(color))?;
        Some(Match {
            entry: &self.entries[hit.index],
            distance: hit.distance,
        })
    }

    /// The name closest to `color`, or an empty string if there is none.
    ///
    /// With `imprecision_marker` set, [`IMPRECISION_MARKER`] is appended when
    /// the match is farther than [`IMPRECISION_THRESHOLD`].
    pub fn nearest_name(&self, color: Srgb, imprecision_marker: bool) -> String {
        match self.closest(color) {
            Some(m) if imprecision_marker && m.is_imprecise() => {
                format!("{}{IMPRECISION_MARKER}", m.entry.name)
            }
            Some(m) => m.entry.name.clone(),
            None => String::new(),
        }
    }

    /// Up to `k` entries closest to `color` as `(name, original color)`
    /// pairs, closest first.
    pub fn nearest_k(&self, color: Srgb, k: usize) -> Vec<(&str, Srgb)> {
        k_nearest(&self.grid, &self.entries, to_index_space(color), k)
            .into_iter()
            .map(|c| {
                let entry = &self.entries[c.index];
                (entry.name.as_str(), entry.original_color)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::distance;
    use crate::source::{
        DataDirResolver, DictionaryConfig, BUILT_IN_DEFAULT, BUILT_IN_DEFAULT_FILE,
    };
    use std::io::Cursor;

    fn rgb(r: f64, g: f64, b: f64) -> Srgb {
        Srgb::from_rgb255(r, g, b)
    }

    fn sample() -> Dictionary {
        let mut dict = Dictionary::new();
        let text = "\
! primaries and friends
255 0 0 Red
0 255 0 Green
0 0 255 Blue
255 255 255 White
0 0 0 Black
128 128 128 Gray
250 128 114 Salmon
255 165 0 Orange
";
        dict.load_reader(Cursor::new(text)).unwrap();
        dict
    }

    fn write(dir: &Path, name: &str, text: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path.to_string_lossy().into_owned()
    }

    // -- Loading --

    #[test]
    fn loader_normalizes_and_skips_comment_lines() {
        let mut dict = Dictionary::new();
        let added = dict
            .load_reader(Cursor::new("255 0 0 Red\n0 255 0 ,, green  \n! comment\n\n"))
            .unwrap();
        assert_eq!(added, 2);
        let names: Vec<&str> = dict.iter().map(NamedColor::name).collect();
        assert_eq!(names, vec!["Red", "Green"]);
    }

    #[test]
    fn entries_keep_original_and_indexed_colors() {
        let dict = sample();
        let red = dict.iter().next().unwrap();
        assert_eq!(red.original_color(), rgb(255.0, 0.0, 0.0));
        assert_eq!(red.indexed_color(), to_index_space(rgb(255.0, 0.0, 0.0)));
    }

    #[test]
    fn loading_is_additive_until_cleared() {
        let mut dict = sample();
        let before = dict.len();
        dict.load_reader(Cursor::new("1 2 3 Extra\n")).unwrap();
        assert_eq!(dict.len(), before + 1);
        dict.clear();
        assert!(dict.is_empty());
        assert_eq!(dict.nearest_name(rgb(255.0, 0.0, 0.0), false), "");
    }

    #[test]
    fn missing_file_is_unavailable_and_keeps_existing_entries() {
        let mut dict = sample();
        let before = dict.len();
        let dir = tempfile::tempdir().unwrap();
        let err = dict.load_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, DictionaryError::SourceUnavailable { .. }));
        assert_eq!(dict.len(), before);
        assert_eq!(dict.nearest_name(rgb(255.0, 0.0, 0.0), false), "Red");
    }

    #[test]
    fn load_continues_past_failing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(dir.path(), "a.txt", "255 0 0 Red\n");
        let missing = dir.path().join("missing.txt").to_string_lossy().into_owned();
        let last = write(dir.path(), "c.txt", "0 0 255 Blue\n0 255 0 Green\n");
        let sources = vec![
            DictionarySource::file(first),
            DictionarySource::file(missing.clone()),
            DictionarySource::built_in("built_in_5"),
            DictionarySource::file(last),
        ];

        let mut dict = Dictionary::new();
        let report = dict.load(&sources, &DataDirResolver::new(dir.path()));

        assert!(!report.is_ok());
        assert_eq!(report.entries, 3);
        assert_eq!(report.sources, 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].source.path, missing);
        assert!(matches!(
            report.failures[0].error,
            DictionaryError::SourceUnavailable { .. }
        ));
        assert!(matches!(
            report.failures[1].error,
            DictionaryError::UnknownBuiltIn(_)
        ));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn load_skips_disabled_sources_and_resolves_built_ins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), BUILT_IN_DEFAULT_FILE, "255 255 255 White\n");
        let user = write(dir.path(), "user.txt", "0 0 0 Black\n");
        let config = DictionaryConfig::from_json_str(&format!(
            r#"{{"items": [
                {{"enable": true, "built_in": true, "path": "{BUILT_IN_DEFAULT}"}},
                {{"enable": false, "path": {user:?}}}
            ]}}"#
        ))
        .unwrap();

        let mut dict = Dictionary::new();
        let report = dict.load(&config.items, &DataDirResolver::new(dir.path()));
        assert!(report.is_ok());
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.iter().next().map(NamedColor::name), Some("White"));
    }

    #[test]
    fn reload_replaces_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "only.txt", "0 0 255 Blue\n");
        let mut dict = sample();
        let report = dict.reload(&[DictionarySource::file(path)], &DataDirResolver::new("."));
        assert!(report.is_ok());
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.nearest_name(rgb(255.0, 0.0, 0.0), false), "Blue");
    }

    // -- Lookups --

    #[test]
    fn exact_color_returns_bare_name_even_with_marker() {
        let dict = sample();
        assert_eq!(dict.nearest_name(rgb(250.0, 128.0, 114.0), true), "Salmon");
        let m = dict.closest(rgb(250.0, 128.0, 114.0)).unwrap();
        assert_eq!(m.distance, 0.0);
        assert!(!m.is_imprecise());
    }

    #[test]
    fn near_color_resolves_to_its_neighbor() {
        let dict = sample();
        assert_eq!(dict.nearest_name(rgb(250.0, 10.0, 5.0), false), "Red");
        assert_eq!(dict.nearest_name(rgb(20.0, 20.0, 25.0), false), "Black");
        assert_eq!(dict.nearest_name(rgb(250.0, 170.0, 10.0), false), "Orange");
    }

    #[test]
    fn imprecision_marker_follows_the_caller_flag() {
        let mut dict = Dictionary::new();
        dict.insert("Black", rgb(0.0, 0.0, 0.0));
        let query = rgb(200.0, 200.0, 200.0);
        assert_eq!(dict.nearest_name(query, true), "Black ~");
        assert_eq!(dict.nearest_name(query, false), "Black");
    }

    #[test]
    fn single_entry_is_found_from_the_opposite_corner() {
        let mut dict = Dictionary::new();
        dict.insert("Abyss", rgb(0.0, 0.0, 0.0));
        assert_eq!(dict.nearest_name(rgb(255.0, 255.0, 255.0), false), "Abyss");
        assert_eq!(dict.nearest_k(rgb(255.0, 255.0, 255.0), 4).len(), 1);
    }

    #[test]
    fn empty_dictionary_returns_empty_results() {
        let dict = Dictionary::new();
        assert!(dict.closest(rgb(10.0, 20.0, 30.0)).is_none());
        assert_eq!(dict.nearest_name(rgb(10.0, 20.0, 30.0), true), "");
        assert!(dict.nearest_k(rgb(10.0, 20.0, 30.0), 5).is_empty());
    }

    #[test]
    fn nearest_k_returns_sorted_pairs_with_original_colors() {
        let dict = sample();
        let query = rgb(255.0, 10.0, 10.0);
        let found = dict.nearest_k(query, 3);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0], ("Red", rgb(255.0, 0.0, 0.0)));
        let q = to_index_space(query);
        let distances: Vec<f64> = found
            .iter()
            .map(|(_, c)| distance(to_index_space(*c), q))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]), "{distances:?}");
    }

    #[test]
    fn nearest_k_never_exceeds_dictionary_size() {
        let dict = sample();
        let found = dict.nearest_k(rgb(128.0, 128.0, 128.0), 100);
        assert_eq!(found.len(), dict.len());
    }

    #[test]
    fn shipped_dictionary_loads_and_names_primaries() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../data")
            .join(BUILT_IN_DEFAULT_FILE);
        let mut dict = Dictionary::new();
        let added = dict.load_file(&path).unwrap();
        assert_eq!(added, 129);
        assert_eq!(dict.nearest_name(rgb(255.0, 0.0, 0.0), true), "Red");
        assert_eq!(dict.nearest_name(rgb(248.0, 248.0, 255.0), false), "Ghost white");
        assert_eq!(dict.nearest_k(rgb(250.0, 128.0, 114.0), 3)[0].0, "Salmon");
    }

    #[test]
    fn dictionary_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dictionary>();
    }
}
