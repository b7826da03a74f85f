//! Dictionary source configuration.
//!
//! A configuration lists dictionary sources in load order. Each source is
//! either a user file (`path` is a filesystem path) or a built-in dictionary
//! (`built_in` set, `path` is an id such as `built_in_0`) that a
//! [`PathResolver`] maps to a shipped file. Missing keys default to
//! `false`/empty, so a partially written config still loads.
//!
//! ```json
//! {
//!   "color_dictionaries": {
//!     "items": [
//!       { "enable": true, "built_in": true, "path": "built_in_0" },
//!       { "enable": false, "path": "/home/me/paints.txt" }
//!     ]
//!   }
//! }
//! ```

use crate::error::DictionaryError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Id of the dictionary shipped with the application.
pub const BUILT_IN_DEFAULT: &str = "built_in_0";

/// File name the default built-in dictionary resolves to.
pub const BUILT_IN_DEFAULT_FILE: &str = "color_dictionary_0.txt";

/// One configured dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DictionarySource {
    pub enable: bool,
    pub built_in: bool,
    pub path: String,
}

impl DictionarySource {
    /// An enabled user dictionary at `path`.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            enable: true,
            built_in: false,
            path: path.into(),
        }
    }

    /// An enabled built-in dictionary with the given id.
    pub fn built_in(id: impl Into<String>) -> Self {
        Self {
            enable: true,
            built_in: true,
            path: id.into(),
        }
    }

    /// The file this source reads from.
    pub fn resolve(&self, resolver: &dyn PathResolver) -> Result<PathBuf, DictionaryError> {
        if self.built_in {
            resolver.built_in(&self.path)
        } else {
            Ok(PathBuf::from(&self.path))
        }
    }
}

/// The ordered list of configured dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DictionaryConfig {
    pub items: Vec<DictionarySource>,
}

impl DictionaryConfig {
    /// Parses a configuration document.
    ///
    /// Accepts either `{"color_dictionaries": {"items": [...]}}` or the inner
    /// `{"items": [...]}` object on its own.
    pub fn from_json(value: &Value) -> Result<Self, DictionaryError> {
        let inner = value.get("color_dictionaries").unwrap_or(value);
        if !inner.is_object() {
            return Err(DictionaryError::InvalidConfig(
                "expected an object with an \"items\" array".to_string(),
            ));
        }
        serde_json::from_value(inner.clone())
            .map_err(|e| DictionaryError::InvalidConfig(e.to_string()))
    }

    /// Parses a configuration document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DictionaryError::InvalidConfig(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Sources with `enable` set, in configured order.
    pub fn enabled(&self) -> impl Iterator<Item = &DictionarySource> {
        self.items.iter().filter(|s| s.enable)
    }
}

/// Maps built-in dictionary ids to files.
pub trait PathResolver {
    fn built_in(&self, id: &str) -> Result<PathBuf, DictionaryError>;
}

/// Resolves built-in ids to files inside an application data directory.
#[derive(Debug, Clone)]
pub struct DataDirResolver {
    data_dir: PathBuf,
}

impl DataDirResolver {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl PathResolver for DataDirResolver {
    fn built_in(&self, id: &str) -> Result<PathBuf, DictionaryError> {
        match id {
            BUILT_IN_DEFAULT => Ok(self.data_dir.join(BUILT_IN_DEFAULT_FILE)),
            other => Err(DictionaryError::UnknownBuiltIn(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_reads_nested_items_with_defaults() {
        let value = json!({
            "color_dictionaries": {
                "items": [
                    {"enable": true, "built_in": true, "path": "built_in_0"},
                    {"path": "/tmp/paints.txt"},
                ]
            }
        });
        let config = DictionaryConfig::from_json(&value).unwrap();
        assert_eq!(config.items.len(), 2);
        assert_eq!(config.items[0], DictionarySource::built_in("built_in_0"));
        assert!(!config.items[1].enable);
        assert!(!config.items[1].built_in);
    }

    #[test]
    fn from_json_accepts_bare_items_object() {
        let config =
            DictionaryConfig::from_json_str(r#"{"items": [{"enable": true, "path": "a.txt"}]}"#)
                .unwrap();
        assert_eq!(config.items, vec![DictionarySource::file("a.txt")]);
    }

    #[test]
    fn from_json_with_no_items_is_empty() {
        let config = DictionaryConfig::from_json(&json!({})).unwrap();
        assert!(config.items.is_empty());
    }

    #[test]
    fn from_json_rejects_wrong_shapes() {
        assert!(matches!(
            DictionaryConfig::from_json(&json!([1, 2])),
            Err(DictionaryError::InvalidConfig(_))
        ));
        assert!(matches!(
            DictionaryConfig::from_json(&json!({"items": "nope"})),
            Err(DictionaryError::InvalidConfig(_))
        ));
        assert!(matches!(
            DictionaryConfig::from_json_str("{not json"),
            Err(DictionaryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn enabled_filters_and_keeps_order() {
        let config = DictionaryConfig {
            items: vec![
                DictionarySource::file("one"),
                DictionarySource {
                    enable: false,
                    ..DictionarySource::file("two")
                },
                DictionarySource::file("three"),
            ],
        };
        let paths: Vec<&str> = config.enabled().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["one", "three"]);
    }

    #[test]
    fn data_dir_resolver_maps_default_built_in() {
        let resolver = DataDirResolver::new("/usr/share/colors");
        let path = DictionarySource::built_in(BUILT_IN_DEFAULT)
            .resolve(&resolver)
            .unwrap();
        assert_eq!(path, Path::new("/usr/share/colors").join(BUILT_IN_DEFAULT_FILE));
    }

    #[test]
    fn data_dir_resolver_rejects_unknown_built_in() {
        let resolver = DataDirResolver::new(".");
        let err = DictionarySource::built_in("built_in_9")
            .resolve(&resolver)
            .unwrap_err();
        assert!(matches!(err, DictionaryError::UnknownBuiltIn(id) if id == "built_in_9"));
    }

    #[test]
    fn file_sources_resolve_to_their_path() {
        let resolver = DataDirResolver::new("/ignored");
        let path = DictionarySource::file("rel/colors.txt")
            .resolve(&resolver)
            .unwrap();
        assert_eq!(path, PathBuf::from("rel/colors.txt"));
    }
}
