//! Host-level state shared across screens, passed explicitly instead of
//! living in globals.

mod context;
mod menu;

pub use context::{Operator, SessionContext};
pub use menu::{MenuItem, MenuLine, MenuState, default_menu};
