pub(crate) mod input;
mod options;
mod record_ui;
mod runtime;
mod status;
mod terminal;

pub use options::UiOptions;
pub use record_ui::RecordUI;
pub(crate) use runtime::{App, Mode};
