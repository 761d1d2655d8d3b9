use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    thread,
};

use tracing::{debug, warn};

use crate::form::{FileOutcome, FilePayload, PendingToken};

use super::UploadService;

type Finished = (PendingToken, FileOutcome);

/// Runs uploads on background threads. The event loop collects results with
/// [`UploadWorker::drain`] and routes them back by token.
pub struct UploadWorker {
    service: Arc<dyn UploadService>,
    results_tx: Sender<Finished>,
    results_rx: Receiver<Finished>,
    in_flight: usize,
}

impl UploadWorker {
    pub fn new(service: Arc<dyn UploadService>) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            service,
            results_tx,
            results_rx,
            in_flight: 0,
        }
    }

    /// Starts uploading `payload` and returns at once.
    pub fn spawn(&mut self, token: PendingToken, payload: FilePayload) {
        let service = Arc::clone(&self.service);
        let results_tx = self.results_tx.clone();
        debug!(field = token.key(), file = %payload.name, "upload started");
        self.in_flight += 1;
        thread::spawn(move || {
            let outcome = match service.upload(&payload) {
                Ok(url) => FileOutcome::Uploaded(url),
                Err(err) => {
                    warn!(field = token.key(), error = %err, "upload failed");
                    FileOutcome::Failed(err.to_string())
                }
            };
            let _ = results_tx.send((token, outcome));
        });
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Uploads finished since the last call. Never waits.
    pub fn drain(&mut self) -> Vec<Finished> {
        let finished: Vec<Finished> = self.results_rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(finished.len());
        finished
    }
}
