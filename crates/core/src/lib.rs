//! Core slide models, geometry transforms, and rich-text helpers for
//! importing parsed presentations into an editor deck.

pub mod error;
pub mod geometry;
pub mod id;
pub mod markup;
pub mod model;
pub mod source;

pub use error::{Error, Result};
pub use id::new_id;
pub use model::{Deck, Slide, SlideElement, SlideRole, TextRole, Theme};
pub use source::{SourceDocument, SourceElement, SourceKind, SourceSlide};
