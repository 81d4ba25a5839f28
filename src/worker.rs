//! Background dataset loader
//!
//! Retrieval is the only blocking work in the application. It runs on one
//! worker thread; the UI thread sends requests and polls for results once per
//! frame. Results come back in the order requests were served.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::data::{DatasetSource, DatasetStore};
use crate::error::{ExplorerError, Result};

/// Requests that can be sent to the loader
pub enum LoadRequest {
    /// Fetch up to `limit` records from `source`
    Load {
        source: Box<dyn DatasetSource>,
        limit: usize,
    },
    /// Shutdown the worker
    Shutdown,
}

/// Results returned from the loader
#[derive(Debug)]
pub enum LoadResult {
    Loaded(DatasetStore),
    Failed {
        source: String,
        error: ExplorerError,
    },
}

/// Loader thread plus its two channel ends
pub struct BackgroundLoader {
    tx: Sender<LoadRequest>,
    rx: Receiver<LoadResult>,
    handle: Option<JoinHandle<()>>,
    pending: usize,
}

impl BackgroundLoader {
    /// Spawn the loader thread
    pub fn spawn() -> Self {
        let (req_tx, req_rx) = channel::<LoadRequest>();
        let (res_tx, res_rx) = channel::<LoadResult>();

        let handle = thread::Builder::new()
            .name("dataset-loader".into())
            .spawn(move || Self::worker_loop(req_rx, res_tx))
            .map_err(|e| warn!("Could not spawn loader thread: {}", e))
            .ok();

        Self {
            tx: req_tx,
            rx: res_rx,
            handle,
            pending: 0,
        }
    }

    fn worker_loop(rx: Receiver<LoadRequest>, tx: Sender<LoadResult>) {
        while let Ok(request) = rx.recv() {
            let result = match request {
                LoadRequest::Load { source, limit } => Self::load(source.as_ref(), limit),
                LoadRequest::Shutdown => break,
            };

            if tx.send(result).is_err() {
                break;
            }
        }
    }

    fn load(source: &dyn DatasetSource, limit: usize) -> LoadResult {
        profiling::scope!("load_dataset");

        let label = source.describe();
        info!("Loading up to {} records from {}", limit, label);
        match source.fetch(limit) {
            Ok(store) => {
                info!(
                    "Loaded {} records from {} ({} dropped)",
                    store.len(),
                    label,
                    store.dropped()
                );
                LoadResult::Loaded(store)
            }
            Err(error) => {
                warn!("Load from {} failed: {}", label, error);
                LoadResult::Failed {
                    source: label,
                    error,
                }
            }
        }
    }

    /// Queue a load (non-blocking)
    pub fn request(&mut self, source: Box<dyn DatasetSource>, limit: usize) -> Result<()> {
        if self.handle.is_none() {
            return Err(ExplorerError::WorkerGone);
        }
        self.tx
            .send(LoadRequest::Load { source, limit })
            .map_err(|_| ExplorerError::WorkerGone)?;
        self.pending += 1;
        Ok(())
    }

    /// Poll for a finished load (non-blocking)
    pub fn poll(&mut self) -> Option<LoadResult> {
        match self.rx.try_recv() {
            Ok(result) => {
                self.pending = self.pending.saturating_sub(1);
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) if self.pending > 0 => {
                self.pending = 0;
                Some(LoadResult::Failed {
                    source: String::new(),
                    error: ExplorerError::WorkerGone,
                })
            }
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Check if any request is still outstanding
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    #[cfg(test)]
    fn wait(&mut self, timeout: std::time::Duration) -> Option<LoadResult> {
        let result = self.rx.recv_timeout(timeout).ok();
        if result.is_some() {
            self.pending = self.pending.saturating_sub(1);
        }
        result
    }
}

impl Drop for BackgroundLoader {
    fn drop(&mut self) {
        let _ = self.tx.send(LoadRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        Self::spawn()
    }
}
