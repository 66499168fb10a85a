//! html2md-core - Markdown element model and rendering
//!
//! This crate provides the typed Markdown elements produced by the `html2md`
//! conversion engine, the [`Document`] that collects them, and the rendering
//! of both back to Markdown source text.
//!
//! # Architecture
//!
//! ```text
//! HTML Node tree ──rules──▶ ┌──────────────────┐
//!                           │ Element / Document│ ──render──▶ Markdown String
//!                           └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use html2md_core::{Document, Element};
//!
//! let mut document = Document::new();
//! document.push(Element::heading(1, "Hello World").unwrap());
//! document.push(Element::Paragraph(vec![
//!     Element::text("This is "),
//!     Element::Strong(vec![Element::text("bold")]),
//!     Element::text(" text."),
//! ]));
//!
//! assert_eq!(document.render(), "# Hello World\n\nThis is **bold** text.");
//! ```

mod document;
mod element;
mod escape;
mod options;
mod serialize;

pub use document::Document;
pub use element::{
    flatten_inlines, group_inlines, merge_text, trim_inlines, Element, HeadingLevel, ListItem,
};
pub use escape::{escape_delimiter_runs, escape_text};
pub use options::Options;
pub use serialize::{render, render_blocks};

/// Error raised when a Markdown element is constructed outside its domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
