use crate::data::NodeKind;

/// Result type used throughout the crate.
pub type Result<T, E = FormTreeError> = std::result::Result<T, E>;

/// Errors raised while building, addressing, rendering or casting form trees.
#[derive(Debug, thiserror::Error)]
pub enum FormTreeError {
    /// A serialised node carries a `kind` tag outside `item`/`array`/`object`.
    #[error("invalid node kind at `{path}`: {found}")]
    InvalidNodeKind { path: String, found: String },

    /// A node references a renderer that is not registered for its kind.
    #[error("no {kind} renderer registered as `{id}`")]
    UnknownRenderer { kind: NodeKind, id: String },

    /// A path does not address any node in the tree.
    #[error("path not found: `{0}`")]
    PathNotFound(String),

    /// A value edit targeted a node that is not an `item`.
    #[error("node at `{path}` is {kind}, not an item")]
    NotAnItem { path: String, kind: NodeKind },

    /// A value does not fit the shape or type expected at a path.
    #[error("type mismatch at `{path}`: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// A JSON Schema construct that cannot be turned into a form.
    #[error("unsupported schema at `{path}`: {reason}")]
    Schema { path: String, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FormTreeError {
    pub(crate) fn mismatch(
        path: &str,
        expected: impl Into<String>,
        actual: impl std::fmt::Display,
    ) -> Self {
        FormTreeError::TypeMismatch {
            path: path.to_string(),
            expected: expected.into(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn schema(path: &str, reason: impl Into<String>) -> Self {
        FormTreeError::Schema {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
