use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::library::{Track, TrackId};

struct Fixed(Vec<Track>);

impl RemoteLookup for Fixed {
    fn lookup(&self, term: &str, limit: usize) -> Result<Vec<Track>, SearchError> {
        Ok(self
            .0
            .iter()
            .filter(|t| t.title.contains(term))
            .take(limit)
            .cloned()
            .collect())
    }
}

struct Offline;

impl RemoteLookup for Offline {
    fn lookup(&self, _term: &str, _limit: usize) -> Result<Vec<Track>, SearchError> {
        Err(SearchError::Request("network unreachable".into()))
    }
}

fn remote(id: u64, title: &str) -> Track {
    Track {
        id: TrackId::Numeric(id),
        title: title.into(),
        artist: "Remote".into(),
        genre: "Pop".into(),
        duration_label: None,
        image_url: String::new(),
        audio_url: format!("https://audio.example/{id}.m4a"),
    }
}

#[test]
fn worker_delivers_outcome_tagged_with_ticket() {
    let worker = SearchWorker::new(
        Arc::new(Fixed(vec![remote(1, "love a"), remote(2, "love b"), remote(3, "x")])),
        1,
    );
    worker.dispatch(SearchTicket {
        seq: 4,
        query: "love".into(),
    });

    let outcome = worker.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(outcome.seq, 4);
    assert_eq!(outcome.query, "love");
    let tracks = outcome.remote.unwrap();
    assert_eq!(tracks.len(), 1, "limit is applied");
    assert_eq!(tracks[0].id, TrackId::Numeric(1));
}

#[test]
fn worker_delivers_failures_instead_of_dropping_them() {
    let worker = SearchWorker::new(Arc::new(Offline), 10);
    worker.dispatch(SearchTicket {
        seq: 1,
        query: "anything".into(),
    });

    let outcome = worker.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(matches!(outcome.remote, Err(SearchError::Request(_))));
    assert!(worker.drain().is_empty());
}
