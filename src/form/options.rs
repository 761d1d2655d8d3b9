/// What `submit` does while a file read or upload is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingPolicy {
    /// Report the in-flight field as invalid and keep the session open.
    #[default]
    Reject,
    /// Finalize with whatever the field holds now; the late result is dropped.
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    pub pending_policy: PendingPolicy,
    pub trim_text: bool,
}

impl FormOptions {
    pub fn with_pending_policy(mut self, policy: PendingPolicy) -> Self {
        self.pending_policy = policy;
        self
    }

    pub fn with_trim_text(mut self, trim: bool) -> Self {
        self.trim_text = trim;
        self
    }
}
