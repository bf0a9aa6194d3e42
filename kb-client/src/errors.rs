use crate::forms::ValidationError;

pub type EditorResult<T> = std::result::Result<T, EditorError>;

#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    /// A required field is missing. Local, recoverable, never reaches the backend.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The backend rejected or failed a call; the message is whatever the service said.
    #[error("{message}")]
    Backend { message: String },
    /// The current user does not own the recipe.
    #[error("You don't have permission to edit this recipe")]
    Forbidden,
    #[error("Recipe not found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EditorError {
    pub fn backend(message: impl Into<String>) -> Self {
        EditorError::Backend {
            message: message.into(),
        }
    }
}
