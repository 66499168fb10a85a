//! # html2md
//!
//! Convert HTML node trees to Markdown.
//!
//! A [`Converter`] walks an already-parsed HTML tree depth first. For every
//! node it asks its registered [`ConvertRule`]s, in registration order, whether
//! they support the node; the first rule that does converts it into Markdown
//! [`Element`]s, calling back into the converter for the node's children.
//! The resulting elements are collected into a Markdown [`Document`].
//!
//! ## Design
//!
//! - **First match wins**: rules registered earlier take priority, so specific
//!   rules go before general ones and a catch-all fallback goes last.
//! - **Open extension**: new tag mappings are new rules, the dispatch never
//!   changes.
//! - **Parser agnostic**: any HTML parser can build the [`Node`] structure.
//!   HTML string parsing via `scraper` is available behind the `html` feature.
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use html2md::{Converter, Node};
//!
//! let converter = Converter::new();
//!
//! let h2 = Node::element("h2").with_child(Node::text("Welcome"));
//!
//! let markdown = converter.convert(&h2).unwrap();
//! assert_eq!(markdown, "## Welcome");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use html2md::Converter;
//!
//! let converter = Converter::new();
//! let markdown = converter
//!     .convert_html("<div><h3>Title</h3><span>hi</span></div>")
//!     .unwrap();
//! assert_eq!(markdown, "### Title\n\nhi");
//! ```

mod converter;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
pub mod rules;
mod utilities;

pub use converter::{ConvertOptions, Converter, RenderOptions};
#[cfg(feature = "html")]
pub use html::{parse_document, parse_html};
pub use html2md_core::{Document, Element, HeadingLevel, ListItem};
pub use node::{Node, NodeRef, NodeType};
pub use rules::{ConvertRule, Filter, Rule, Rules};
pub use utilities::{collapse_whitespace, is_block};

/// Broad category of a [`ConvertError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidArgument,
    MalformedInput,
    DepthLimitExceeded,
}

/// Error type for conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("no convert rule supports node `{path}`; a fallback rule must be registered")]
    Configuration { path: String },

    #[error(transparent)]
    InvalidArgument(#[from] html2md_core::Error),

    #[error("malformed input at `{path}`: {reason}")]
    MalformedInput { path: String, reason: String },

    #[error("nesting deeper than {limit} levels at `{path}`")]
    DepthLimitExceeded { limit: usize, path: String },

    #[error("rule `{rule}` failed at `{path}`: {source}")]
    Rule {
        rule: String,
        path: String,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub(crate) fn malformed(node: &NodeRef<'_>, reason: impl Into<String>) -> Self {
        ConvertError::MalformedInput {
            path: node.path(),
            reason: reason.into(),
        }
    }

    /// The category of this error, looking through rule context
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Configuration { .. } => ErrorKind::Configuration,
            ConvertError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ConvertError::MalformedInput { .. } => ErrorKind::MalformedInput,
            ConvertError::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
            ConvertError::Rule { source, .. } => source.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
