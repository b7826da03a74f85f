#![deny(unsafe_code)]
//! Nearest-named-color lookup.
//!
//! Loads `R G B Name` dictionary files into a [`Dictionary`], which buckets
//! every entry into an 8x8x8 grid over CIE L\*a\*b\* (D50) and answers
//! "what is this color called" and "which named colors are closest" with an
//! expanding shell search scored by an LCh-based perceptual difference.
//!
//! Modules, leaf first: `color` (conversions and distance), `grid` (cell
//! placement and query boxes), `search` (shell expansion), `loader` (text
//! format), `source` (which files to load), `dictionary` (the public face).

pub mod color;
pub mod dictionary;
pub mod error;
pub mod grid;
pub mod loader;
pub mod search;
pub mod source;

pub use color::{Lab, Lch, Srgb};
pub use dictionary::{
    Dictionary, LoadReport, Match, NamedColor, SourceFailure, IMPRECISION_MARKER,
    IMPRECISION_THRESHOLD,
};
pub use error::DictionaryError;
pub use source::{DataDirResolver, DictionaryConfig, DictionarySource, PathResolver};
