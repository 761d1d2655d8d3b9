use thiserror::Error;

/// Problems detected while assembling a [`RecordSchema`](super::RecordSchema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("required key '{0}' does not name a field")]
    UnknownRequiredKey(String),
    #[error("identifier key '{0}' does not name a field")]
    UnknownIdKey(String),
    #[error("field '{field}' derives from unknown field '{dependency}'")]
    UnknownDependency { field: String, dependency: String },
    #[error("select field '{0}' has no options")]
    MissingOptions(String),
    #[error("check references unknown field '{0}'")]
    UnknownCheckField(String),
    #[error("derived fields form a cycle: {}", cycle.join(" -> "))]
    CyclicDerivation { cycle: Vec<String> },
    #[error("invalid pattern for field '{field}': {message}")]
    InvalidPattern { field: String, message: String },
}
