//! Refract Core - API reference rendering engine
//!
//! This crate turns an introspection dump of a typed API into a single
//! cross-referenced HTML reference:
//! - Graph: symbol graph construction from engine JSON
//! - Permalink: stable anchors and titles for every symbol
//! - Resolver: declaration-reference link resolution
//! - Category: group and category ordering for member listings
//! - Comment: documentation comment and tag processing
//! - Render: polymorphic HTML rendering

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Symbol graph - declarations, types and navigation
pub mod graph;

/// Permalink generation - anchors, titles and external documents
pub mod permalink;

/// Reference resolver - declaration-reference links to anchors
pub mod resolver;

/// Categorization - group and category ordering
pub mod category;

/// Comment processing - notices, tags and inline links
pub mod comment;

/// Rendering - polymorphic HTML output
pub mod render;

/// Markdown collaborator trait and default implementation
pub mod markdown;

/// Run configuration
pub mod config;

/// Error types
pub mod error;

/// Test helpers for building symbol graphs from JSON literals
#[cfg(test)]
pub(crate) mod testutil;

pub use config::RenderOptions;
pub use error::Error;
pub use graph::SymbolGraph;
pub use markdown::{ComrakRenderer, MarkdownRenderer};
pub use render::{Renderer, Style};
