/// Failures surfaced by path access, snippet edits and save pipelines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stored document text is not JSON. Not user-fixable.
    #[error("Invalid document JSON: {0}")]
    InvalidDocument(String),

    #[error("Invalid JSON: {0}")]
    InvalidSnippet(String),

    #[error("{0}")]
    TargetNotObject(String),

    #[error("Unable to resolve JSON path for the selected node")]
    PathResolution,

    #[error("JSON serialization error: {0}")]
    Serialize(String),

    #[error("No node at {0:?}")]
    NodeNotFound(String),

    #[error("Invalid JSON pointer: {0}")]
    InvalidPointer(String),

    #[error("Node is not being edited")]
    NotEditing,

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors the user can fix by changing the draft; shown inline instead of
    /// as a generic failure.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::InvalidSnippet(_) | Error::TargetNotObject(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
