//! Unix-socket plumbing towards the hyprgrd daemon.
//!
//! The daemon listens on a stream socket and reads newline-delimited JSON.
//! [`endpoint`] resolves where that socket lives; [`client`] writes to it.

pub mod client;
pub mod endpoint;
