//! Search: the local library filter, the online lookup and the worker that
//! runs lookups off the UI thread.

mod local;
mod remote;
mod worker;

pub use local::local_matches;
pub use remote::{ItunesLookup, RemoteLookup, SearchError};
pub use worker::{SearchOutcome, SearchTicket, SearchWorker};

#[cfg(test)]
mod tests;
