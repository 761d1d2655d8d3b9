use std::time::Duration;

use crate::form::FormOptions;

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub show_help: bool,
    pub show_sidebar: bool,
    /// Ask for a second Ctrl+Q before quitting with a form open.
    pub confirm_exit: bool,
    pub title: Option<String>,
    pub form: FormOptions,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            show_help: true,
            show_sidebar: true,
            confirm_exit: true,
            title: None,
            form: FormOptions::default(),
        }
    }
}

impl UiOptions {
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_sidebar(mut self, show: bool) -> Self {
        self.show_sidebar = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_form_options(mut self, form: FormOptions) -> Self {
        self.form = form;
        self
    }
}
