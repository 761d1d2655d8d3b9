use base64::{Engine, engine::general_purpose::STANDARD};
use indexmap::IndexMap;
use serde_json::{Value, json};

/// A file picked by the user, already read into memory by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Guesses the media type from the file extension.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for(&name).to_string();
        Self { name, mime, bytes }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Descriptor stored for attachment lists.
    pub fn descriptor(&self) -> Value {
        json!({
            "name": self.name,
            "mime": self.mime,
            "size": self.bytes.len(),
        })
    }
}

pub fn mime_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Handle for one outstanding file read or upload. Completing a token that
/// was superseded, or that belongs to a closed session, has no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToken {
    pub(crate) session: u64,
    pub(crate) key: String,
    pub(crate) seq: u64,
}

impl PendingToken {
    pub fn session_id(&self) -> u64 {
        self.session
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Result of a file operation, as reported back by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Local read finished; the payload is stored as a data URL.
    Read(FilePayload),
    /// Upload service answered with a reference URL.
    Uploaded(String),
    /// The read or upload failed; the message is shown to the user.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PendingOps {
    next_seq: u64,
    inflight: IndexMap<String, u64>,
}

impl PendingOps {
    /// Starting a new operation on a key supersedes the previous one.
    pub(crate) fn begin(&mut self, session: u64, key: &str) -> PendingToken {
        self.next_seq += 1;
        self.inflight.insert(key.to_string(), self.next_seq);
        PendingToken {
            session,
            key: key.to_string(),
            seq: self.next_seq,
        }
    }

    /// True when `token` is the live operation for its key; clears it.
    pub(crate) fn finish(&mut self, token: &PendingToken) -> bool {
        match self.inflight.get(&token.key) {
            Some(seq) if *seq == token.seq => {
                self.inflight.shift_remove(&token.key);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel(&mut self, key: &str) {
        self.inflight.shift_remove(key);
    }

    pub(crate) fn is_pending(&self, key: &str) -> bool {
        self.inflight.contains_key(key)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &String> {
        self.inflight.keys()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }
}
