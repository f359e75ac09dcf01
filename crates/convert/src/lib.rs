//! Translators from a parsed presentation tree to the editor slide model.
//!
//! Groups and diagrams are flattened recursively; every emitted element is
//! absolutely positioned and scaled exactly once.

pub mod chart;
pub mod converter;
pub mod library;
pub mod path;
pub mod shape;
pub mod table;

pub use converter::{ConvertContext, ConvertOptions, Converter};
pub use path::{resolve_path, ResolvedPath};
