//! Core trait that decouples the plugin from any specific transport.
//!
//! The [`GestureSession`](crate::session::GestureSession) and the
//! [`Plugin`](crate::hyprland::dispatch::Plugin) facade only depend on
//! [`Transport`].  The real implementation is
//! [`UnixSocketTransport`](crate::ipc::client::UnixSocketTransport); tests
//! substitute a recording double.

use crate::command::WireMessage;

/// A way of delivering newline-terminated messages to the daemon.
///
/// # Contract
///
/// * Every method returns immediately or after a single short blocking
///   connect/write; none of them retry.
/// * No method panics or surfaces an error beyond its return value.
/// * One-shot sends report success, persistent sends do not: the next write
///   or the teardown is where a dead connection is discovered.
pub trait Transport {
    /// An open connection owned by the caller.
    type Connection;

    /// Connect, write `message` plus `\n`, close.  Returns `true` only if
    /// the whole line was written.
    fn send_once(&self, message: &WireMessage) -> bool;

    /// Open a connection for a sequence of messages, or `None` if the
    /// daemon cannot be reached.
    fn open_persistent(&self) -> Option<Self::Connection>;

    /// Best-effort write of `message` plus `\n` on an open connection.
    fn send_persistent(&self, connection: &mut Self::Connection, message: &WireMessage);

    /// Close a connection.  Taking it by value makes a second close
    /// impossible; callers keep it in an `Option` and `take()` it.
    fn close_persistent(&self, connection: Self::Connection);
}

#[cfg(test)]
pub(crate) mod mock {
    //! A [`Transport`] double that records every call made to it.

    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Once(String),
        Open(u32),
        Send(u32, String),
        Close(u32),
    }

    /// Connections are plain ids so tests can tell them apart.
    #[derive(Debug)]
    pub struct MockConnection(pub u32);

    #[derive(Debug)]
    pub struct MockTransport {
        pub reachable: Cell<bool>,
        pub calls: RefCell<Vec<Call>>,
        next_id: Cell<u32>,
    }

    impl MockTransport {
        pub fn reachable() -> Self {
            Self {
                reachable: Cell::new(true),
                calls: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }
        }

        pub fn unreachable() -> Self {
            let t = Self::reachable();
            t.reachable.set(false);
            t
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        pub fn clear(&self) {
            self.calls.borrow_mut().clear();
        }
    }

    impl Transport for MockTransport {
        type Connection = MockConnection;

        fn send_once(&self, message: &WireMessage) -> bool {
            if !self.reachable.get() {
                return false;
            }
            self.calls
                .borrow_mut()
                .push(Call::Once(message.as_str().to_string()));
            true
        }

        fn open_persistent(&self) -> Option<MockConnection> {
            if !self.reachable.get() {
                return None;
            }
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.calls.borrow_mut().push(Call::Open(id));
            Some(MockConnection(id))
        }

        fn send_persistent(&self, connection: &mut MockConnection, message: &WireMessage) {
            self.calls
                .borrow_mut()
                .push(Call::Send(connection.0, message.as_str().to_string()));
        }

        fn close_persistent(&self, connection: MockConnection) {
            self.calls.borrow_mut().push(Call::Close(connection.0));
        }
    }

    #[test]
    fn mock_transport_records_calls() {
        let t = MockTransport::reachable();
        let msg = crate::command::Command::ToggleVisualizer.to_wire();
        assert!(t.send_once(&msg));
        let mut conn = t.open_persistent().unwrap();
        t.send_persistent(&mut conn, &msg);
        t.close_persistent(conn);
        assert_eq!(
            t.calls(),
            vec![
                Call::Once("\"ToggleVisualizer\"".into()),
                Call::Open(1),
                Call::Send(1, "\"ToggleVisualizer\"".into()),
                Call::Close(1),
            ]
        );
    }

    #[test]
    fn unreachable_mock_refuses_everything() {
        let t = MockTransport::unreachable();
        assert!(!t.send_once(&crate::command::SwipeEvent::End.to_wire()));
        assert!(t.open_persistent().is_none());
        assert!(t.calls().is_empty());
    }
}
