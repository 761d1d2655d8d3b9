#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Press n to add a record, / to search.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn form_opened(&mut self, title: &str, creating: bool) {
        self.message = if creating {
            format!("New {title}. Ctrl+S saves, Esc discards.")
        } else {
            format!("Editing {title}. Ctrl+S saves, Esc discards.")
        };
    }

    pub fn saved(&mut self, key: &str) {
        self.message = format!("Saved {key}");
    }

    pub fn deleted(&mut self, key: &str) {
        self.message = format!("Deleted {key}");
    }

    pub fn discarded(&mut self) {
        self.message = "Changes discarded".to_string();
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) remaining");
    }

    pub fn read_only(&mut self, label: &str) {
        self.message = format!("{label} is calculated automatically");
    }

    pub fn pending_exit(&mut self) {
        self.message = "A form is open. Press Ctrl+Q again to quit without saving.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
