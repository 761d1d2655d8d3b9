use reqwest::blocking::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::form::FilePayload;

use super::{UploadConfig, UploadError, UploadService};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadResponseError>,
}

#[derive(Debug, Deserialize)]
struct UploadResponseError {
    message: String,
}

/// Multipart upload to an unsigned image-hosting preset.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: Client,
    config: UploadConfig,
}

impl HttpUploader {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl UploadService for HttpUploader {
    fn upload(&self, file: &FilePayload) -> Result<String, UploadError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|err| UploadError::Transport(err.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone());

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .map_err(|err| UploadError::Transport(err.to_string()))?;
        let status = response.status();
        let body: UploadResponse = response
            .json()
            .map_err(|err| UploadError::Transport(err.to_string()))?;

        match body.secure_url {
            Some(url) => {
                info!(file = %file.name, %url, "image uploaded");
                Ok(url)
            }
            None => {
                let reason = body
                    .error
                    .map(|error| error.message)
                    .unwrap_or_else(|| format!("service answered {status} without a URL"));
                warn!(file = %file.name, %reason, "image upload rejected");
                Err(UploadError::Rejected(reason))
            }
        }
    }
}
