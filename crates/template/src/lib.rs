//! Template import: turn converted slides into a five-role template deck.
//!
//! Slides are scored and assigned the roles cover, contents, transition,
//! content, and end. Text elements on each chosen slide are tagged with
//! semantic slots, and any required slot the slide lacks is synthesized
//! as a blank placeholder.

pub mod assembly;
pub mod classifier;
pub mod config;
pub mod features;
pub mod import;
pub mod lexicon;
pub mod synthesizer;
pub mod tagger;

pub use assembly::TemplateAssembler;
pub use config::TemplateConfig;
pub use import::{DocumentParser, EditorState, ImportMode, ImportOutcome, Importer, JsonDocumentParser, MemoryEditorState};
