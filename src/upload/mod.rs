//! Boundary to the image hosting service: POST a file, receive its URL.

#[cfg(feature = "http-upload")]
mod http;
mod worker;

use std::env;

use thiserror::Error;

use crate::form::FilePayload;

#[cfg(feature = "http-upload")]
pub use http::HttpUploader;
pub use worker::UploadWorker;

pub const CLOUD_ENV: &str = "RECORDUI_UPLOAD_CLOUD";
pub const PRESET_ENV: &str = "RECORDUI_UPLOAD_PRESET";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("upload service is not configured: {0}")]
    NotConfigured(String),
    #[error("image upload failed: {0}")]
    Rejected(String),
    #[error("an error occurred during image upload: {0}")]
    Transport(String),
}

/// Implementations block until the host answers. The terminal host calls them
/// through [`UploadWorker`], off the event thread, and reports back through
/// [`FormSession::complete_file`](crate::form::FormSession::complete_file).
pub trait UploadService: Send + Sync {
    fn upload(&self, file: &FilePayload) -> Result<String, UploadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub endpoint: String,
}

impl UploadConfig {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        let cloud_name = cloud_name.into();
        let endpoint = format!("https://api.cloudinary.com/v1_1/{cloud_name}/image/upload");
        Self {
            cloud_name,
            upload_preset: upload_preset.into(),
            endpoint,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the two settings through `lookup`; blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, UploadError> {
        let read = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| UploadError::NotConfigured(format!("{name} is not set")))
        };
        Ok(Self::new(read(CLOUD_ENV)?, read(PRESET_ENV)?))
    }
}

/// Upload service used when nothing is configured: every upload fails with
/// the configuration problem, so the field stays empty and the user is told why.
#[derive(Debug, Clone)]
pub struct UnconfiguredUploader {
    reason: String,
}

impl UnconfiguredUploader {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl UploadService for UnconfiguredUploader {
    fn upload(&self, _file: &FilePayload) -> Result<String, UploadError> {
        Err(UploadError::NotConfigured(self.reason.clone()))
    }
}
