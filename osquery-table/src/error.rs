//! Error types for table plugins and extension dispatch

use thiserror::Error;

/// Failures while decoding the `context` JSON osquery attaches to a generate request.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown operator code: {0}")]
    UnknownOperator(i64),

    #[error("operator is not an integer: {0:?}")]
    InvalidOperator(String),

    #[error("unknown column affinity: {0:?}")]
    UnknownAffinity(String),

    #[error("constraint list must be an array or an empty string, got string {0:?}")]
    UnexpectedList(String),

    #[error("constraint list must be an array or an empty string, got {0}")]
    InvalidList(String),

    #[error("malformed constraint: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("constraint expression must be a string or a number, got {0}")]
    InvalidExpression(String),

    #[error("column {column:?}: {source}")]
    Column {
        column: String,
        source: Box<ParseError>,
    },
}

/// Errors surfaced by a table plugin, either while it is being built or while
/// it serves a request. A failed request always yields zero rows.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid table definition: {0}")]
    Construction(String),

    #[error("request has no action")]
    MissingAction,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("error parsing context: {0}")]
    ContextParse(#[from] ParseError),

    #[error("error generating table: {0}")]
    Generation(String),

    #[error("row {row} does not match the table schema: {reason}")]
    RowContract { row: usize, reason: String },
}

/// Errors raised by the extension dispatch layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("unknown registry: {0}")]
    UnknownRegistry(String),

    #[error("no plugin {item} in registry {registry}")]
    UnknownPlugin { registry: String, item: String },

    #[error("plugin {item} registered twice in registry {registry}")]
    DuplicatePlugin { registry: String, item: String },
}
