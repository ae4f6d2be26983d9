//! Background thread worker for find requests.
//!
//! Long notes with one or two character terms can take a while to scan, so
//! debounced searches run here instead of on the UI thread. Only the newest
//! queued request is computed; the coordinator decides whether a result is
//! still wanted when it arrives.

use std::io;
use std::panic;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::{FindQuery, MatchHandler, MatchRange};
use crate::error::{FindError, FindResult};

pub struct FindRequest {
    pub generation: u64,
    /// Document revision `lines` was taken from
    pub revision: u64,
    pub query: FindQuery,
    pub lines: Arc<[String]>,
    pub handler: Arc<dyn MatchHandler>,
}

#[derive(Debug)]
pub struct FindResponse {
    pub generation: u64,
    pub revision: u64,
    pub query: FindQuery,
    pub result: FindResult<Vec<MatchRange>>,
}

/// Handle to the background find worker
pub struct FindWorker {
    request_sender: Sender<FindRequest>,
    result_receiver: Receiver<FindResponse>,
    #[allow(dead_code)]
    thread_handle: JoinHandle<()>,
}

impl FindWorker {
    pub fn new() -> io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<FindRequest>();
        let (result_tx, result_rx) = mpsc::channel::<FindResponse>();

        let thread_handle = thread::Builder::new()
            .name("find-worker".into())
            .spawn(move || {
                worker_thread_loop(request_rx, result_tx);
            })?;

        Ok(Self {
            request_sender: request_tx,
            result_receiver: result_rx,
            thread_handle,
        })
    }

    #[inline]
    pub fn request(&self, request: FindRequest) {
        let _ = self.request_sender.send(request);
    }

    #[inline]
    pub fn try_recv(&self) -> Option<FindResponse> {
        match self.result_receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<FindResponse> {
        self.result_receiver.recv_timeout(timeout).ok()
    }
}

/// Main loop for the worker thread
fn worker_thread_loop(receiver: Receiver<FindRequest>, sender: Sender<FindResponse>) {
    while let Ok(request) = receiver.recv() {
        let mut latest_request = request;
        while let Ok(newer) = receiver.try_recv() {
            latest_request = newer;
        }

        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            latest_request
                .handler
                .find_matches(&latest_request.lines, &latest_request.query)
        }))
        .unwrap_or(Err(FindError::DocumentNotReady));

        let response = FindResponse {
            generation: latest_request.generation,
            revision: latest_request.revision,
            query: latest_request.query,
            result,
        };
        if sender.send(response).is_err() {
            break;
        }
    }
}
