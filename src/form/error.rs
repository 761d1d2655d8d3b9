use thiserror::Error;

/// Caller mistakes when driving a [`FormSession`](super::FormSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' is computed and cannot be edited")]
    ReadOnlyField(String),
    #[error("field '{0}' does not accept files")]
    NotFileField(String),
    #[error("the form was already submitted")]
    Finalized,
}
