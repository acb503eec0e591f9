//! Unix-socket [`Transport`] implementation.
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`.  No length
//! prefix, no response.  One-shot commands use a fresh connection each;
//! a swipe gesture keeps one connection open from begin to end.

use crate::command::WireMessage;
use crate::ipc::endpoint::Endpoint;
use crate::traits::Transport;
use log::{debug, trace};
use std::io::Write;
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// A [`Transport`] that connects to the daemon's Unix stream socket.
#[derive(Debug, Clone)]
pub struct UnixSocketTransport {
    endpoint: Endpoint,
}

/// Errors produced while talking to the daemon socket.
///
/// These never leave the transport: the [`Transport`] contract collapses
/// them into `bool` / `Option`.  They exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write: {0}")]
    Write(#[source] std::io::Error),
}

impl UnixSocketTransport {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn connect(&self) -> Result<UnixStream, TransportError> {
        UnixStream::connect(self.endpoint.path()).map_err(|source| TransportError::Connect {
            path: self.endpoint.path().to_path_buf(),
            source,
        })
    }

    fn try_send_once(&self, message: &WireMessage) -> Result<(), TransportError> {
        let mut stream = self.connect()?;
        write_line(&mut stream, message)
        // `stream` is dropped (closed) here.
    }
}

impl Default for UnixSocketTransport {
    fn default() -> Self {
        Self::new(Endpoint::process_default().clone())
    }
}

/// Write `message` and its terminating newline in a single buffer.
fn write_line(stream: &mut UnixStream, message: &WireMessage) -> Result<(), TransportError> {
    let mut line = String::with_capacity(message.len() + 1);
    line.push_str(message.as_str());
    line.push('\n');
    stream
        .write_all(line.as_bytes())
        .map_err(TransportError::Write)
}

impl Transport for UnixSocketTransport {
    type Connection = UnixStream;

    fn send_once(&self, message: &WireMessage) -> bool {
        match self.try_send_once(message) {
            Ok(()) => {
                debug!("sent {}", message);
                true
            }
            Err(e) => {
                debug!("failed to send {}: {}", message, e);
                false
            }
        }
    }

    fn open_persistent(&self) -> Option<UnixStream> {
        match self.connect() {
            Ok(stream) => Some(stream),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }

    fn send_persistent(&self, connection: &mut UnixStream, message: &WireMessage) {
        if let Err(e) = write_line(connection, message) {
            trace!("dropped {}: {}", message, e);
        }
    }

    fn close_persistent(&self, connection: UnixStream) {
        let _ = connection.shutdown(Shutdown::Both);
    }
}

//  Tests
