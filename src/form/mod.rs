mod actions;
mod buffer;
mod engine;
mod error;
mod navigator;
mod options;
mod pending;
mod reducers;
mod session;
mod validation;
mod value;

pub use actions::FormCommand;
pub use buffer::EditBuffer;
pub use engine::recompute;
pub use error::FormError;
pub use navigator::SectionNavigator;
pub use options::{FormOptions, PendingPolicy};
pub use pending::{FileOutcome, FilePayload, PendingToken, mime_for};
pub use reducers::{FormEngine, apply_command};
pub use session::{FormSession, SessionState};
pub use validation::{
    PENDING_MESSAGE, REQUIRED_MESSAGE, SubmitOutcome, ValidationErrors, ValidationResult,
};
