mod components;
mod view;

pub use view::{DetailView, FilePrompt, FormView, UiContext, draw};
