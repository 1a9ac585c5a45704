//! Error types for graph loading and rendering

use thiserror::Error;

/// Errors surfaced while loading a symbol graph or rendering docs
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed symbol graph: {0}")]
    Json(#[from] serde_json::Error),
}
