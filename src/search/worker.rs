use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::library::Track;

use super::remote::{RemoteLookup, SearchError};

/// A search accepted by the coordinator that still needs its online half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

/// The online half of a search, delivered back to the runtime thread.
#[derive(Debug)]
pub struct SearchOutcome {
    pub seq: u64,
    pub query: String,
    pub remote: Result<Vec<Track>, SearchError>,
}

/// Runs each online lookup on its own thread.
///
/// Lookups are never cancelled; outcomes arrive in completion order and the
/// coordinator decides which one still counts.
pub struct SearchWorker {
    lookup: Arc<dyn RemoteLookup>,
    limit: usize,
    tx: Sender<SearchOutcome>,
    rx: Receiver<SearchOutcome>,
}

impl SearchWorker {
    pub fn new(lookup: Arc<dyn RemoteLookup>, limit: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            lookup,
            limit,
            tx,
            rx,
        }
    }

    pub fn dispatch(&self, ticket: SearchTicket) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        let limit = self.limit;
        let spawned = thread::Builder::new()
            .name(format!("search-{}", ticket.seq))
            .spawn(move || {
                let remote = lookup.lookup(&ticket.query, limit);
                match &remote {
                    Ok(tracks) => debug!(seq = ticket.seq, found = tracks.len(), "lookup finished"),
                    Err(e) => warn!(seq = ticket.seq, query = %ticket.query, error = %e, "lookup failed"),
                }
                let _ = tx.send(SearchOutcome {
                    seq: ticket.seq,
                    query: ticket.query,
                    remote,
                });
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not start search thread");
        }
    }

    /// Outcomes that arrived since the last call.
    pub fn drain(&self) -> Vec<SearchOutcome> {
        self.rx.try_iter().collect()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<SearchOutcome> {
        self.rx.recv_timeout(timeout).ok()
    }
}
