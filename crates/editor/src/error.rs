//! Error types shared by the scene core and the editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors surfaced by history, registry and editor operations.
///
/// Nothing in the core panics on these; every failure goes back to the caller.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Undo or redo requested with nothing on the corresponding stack.
    #[error("nothing to undo or redo")]
    EmptyHistory,

    /// The render or geometry collaborator refused the operation.
    #[error("operation rejected: {0}")]
    CollaboratorRejected(String),

    /// Registry insert with a name already held by another entity.
    #[error("name '{0}' is already in use")]
    DuplicateName(String),

    /// No live entity with this name.
    #[error("no object named '{0}'")]
    NotFound(String),

    /// Empty display name.
    #[error("object names must not be empty")]
    InvalidName,

    /// Numeric parameter outside its allowed range.
    #[error("parameter {name} = {value} is outside [{min}, {max}]")]
    InvalidParameter {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Working plane definition rejected.
    #[error("invalid working plane: {0}")]
    InvalidPlane(String),

    /// File extension not recognized, or no codec for it.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Nothing suitable to write (empty scene, no mesh geometry).
    #[error("{0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings or manifest JSON could not be parsed or written.
    #[error("JSON error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Plugin failed to load or initialize.
    #[error("plugin '{name}': {reason}")]
    Plugin { name: String, reason: String },
}

impl EditorError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        EditorError::CollaboratorRejected(reason.into())
    }
}
