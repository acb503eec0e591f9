//! Gesture session: one persistent daemon connection per touchpad swipe.
//!
//! | State    | Event           | Effect                                      | Verdict |
//! |----------|-----------------|---------------------------------------------|---------|
//! | `Idle`   | begin, connects | open, send `SwipeBegin` → `Active`          | claim   |
//! | `Idle`   | begin, no daemon| nothing                                     | decline |
//! | `Active` | update          | send `SwipeUpdate`                          | claim   |
//! | `Active` | end             | send `SwipeEnd`, close → `Idle`             | claim   |
//! | `Idle`   | update / end    | nothing                                     | decline |
//!
//! Reaching the daemon at begin is the only thing that decides whether the
//! host keeps its native gesture handling.  Once a gesture is claimed it is
//! never handed back mid-stream: write failures are swallowed and
//! undecodable updates degrade to a zero-delta update.

use crate::command::SwipeEvent;
use crate::traits::Transport;
use log::{debug, warn};

/// Whether the host should suppress its own handling of a gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The daemon owns the gesture; the host must cancel its default action.
    Claim,
    /// The host keeps its native behaviour.
    Decline,
}

impl Verdict {
    pub fn is_claim(self) -> bool {
        self == Verdict::Claim
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// State for at most one in-flight swipe gesture.
///
/// The session is `Active` exactly while it holds a connection.  Dropping
/// the session force-closes that connection without a `SwipeEnd`.
pub struct GestureSession<T: Transport> {
    transport: T,
    connection: Option<T::Connection>,
    fingers: u32,
}

impl<T: Transport> GestureSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            connection: None,
            fingers: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn state(&self) -> SessionState {
        if self.connection.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    /// Finger count recorded at begin, while a gesture is active.
    pub fn fingers(&self) -> Option<u32> {
        self.connection.as_ref().map(|_| self.fingers)
    }

    /// Feed one decoded event through the state machine.
    pub fn handle(&mut self, event: SwipeEvent) -> Verdict {
        match event {
            SwipeEvent::Begin { fingers } => self.on_begin(fingers),
            SwipeEvent::Update { fingers, dx, dy } => self.on_update(fingers, dx, dy),
            SwipeEvent::End => self.on_end(),
        }
    }

    pub fn on_begin(&mut self, fingers: u32) -> Verdict {
        if self.connection.is_some() {
            // The host promised gestures never overlap; start over cleanly.
            warn!("swipe begin while a gesture is active, dropping the old one");
            self.close();
        }

        let Some(connection) = self.transport.open_persistent() else {
            debug!("daemon unreachable, leaving {}-finger swipe to the host", fingers);
            return Verdict::Decline;
        };

        self.fingers = fingers;
        let connection = self.connection.insert(connection);
        let message = SwipeEvent::Begin { fingers }.to_wire();
        self.transport.send_persistent(connection, &message);
        debug!("swipe begin: {} fingers", fingers);
        Verdict::Claim
    }

    pub fn on_update(&mut self, fingers: u32, dx: f64, dy: f64) -> Verdict {
        self.send_update(SwipeEvent::Update { fingers, dx, dy })
    }

    /// An update whose payload could not be decoded.  Keeps the stream going
    /// with the recorded finger count and no movement.
    pub fn on_undecodable_update(&mut self) -> Verdict {
        let fingers = self.fingers;
        self.send_update(SwipeEvent::Update {
            fingers,
            dx: 0.0,
            dy: 0.0,
        })
    }

    fn send_update(&mut self, event: SwipeEvent) -> Verdict {
        let Some(connection) = self.connection.as_mut() else {
            return Verdict::Decline;
        };
        self.transport.send_persistent(connection, &event.to_wire());
        Verdict::Claim
    }

    pub fn on_end(&mut self) -> Verdict {
        let Some(mut connection) = self.connection.take() else {
            return Verdict::Decline;
        };
        self.transport
            .send_persistent(&mut connection, &SwipeEvent::End.to_wire());
        self.transport.close_persistent(connection);
        debug!("swipe end");
        Verdict::Claim
    }

    /// Force-close any open connection without telling the daemon.
    pub fn teardown(&mut self) {
        if self.connection.is_some() {
            debug!("closing swipe connection on teardown");
            self.close();
        }
    }

    fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            self.transport.close_persistent(connection);
        }
    }
}

impl<T: Transport> Drop for GestureSession<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mock::{Call, MockTransport};

    const BEGIN3: &str = r#"{"SwipeBegin":{"fingers":3}}"#;
    const END: &str = r#""SwipeEnd""#;

    fn reachable() -> GestureSession<MockTransport> {
        GestureSession::new(MockTransport::reachable())
    }

    #[test]
    fn new_session_is_idle() {
        let s = reachable();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.fingers(), None);
    }

    #[test]
    fn full_gesture_is_claimed_and_streamed_on_one_connection() {
        let mut s = reachable();

        assert_eq!(s.on_begin(3), Verdict::Claim);
        assert_eq!(s.state(), SessionState::Active);
        assert_eq!(s.fingers(), Some(3));

        assert_eq!(s.on_update(3, 10.5, -2.3), Verdict::Claim);
        assert_eq!(s.on_update(3, -1.0, 0.25), Verdict::Claim);
        assert_eq!(s.on_end(), Verdict::Claim);
        assert_eq!(s.state(), SessionState::Idle);

        assert_eq!(
            s.transport().calls(),
            vec![
                Call::Open(1),
                Call::Send(1, BEGIN3.into()),
                Call::Send(
                    1,
                    r#"{"SwipeUpdate":{"fingers":3,"dx":10.500000,"dy":-2.300000}}"#.into()
                ),
                Call::Send(
                    1,
                    r#"{"SwipeUpdate":{"fingers":3,"dx":-1.000000,"dy":0.250000}}"#.into()
                ),
                Call::Send(1, END.into()),
                Call::Close(1),
            ]
        );
    }

    #[test]
    fn update_uses_the_events_own_finger_count() {
        let mut s = reachable();
        s.on_begin(3);
        s.on_update(4, 1.0, 2.0);
        assert_eq!(
            s.transport().calls()[2],
            Call::Send(1, r#"{"SwipeUpdate":{"fingers":4,"dx":1.000000,"dy":2.000000}}"#.into())
        );
    }

    #[test]
    fn undecodable_update_degrades_to_zero_delta_and_still_claims() {
        let mut s = reachable();
        s.on_begin(4);
        assert_eq!(s.on_undecodable_update(), Verdict::Claim);
        assert_eq!(
            s.transport().calls().last(),
            Some(&Call::Send(
                1,
                r#"{"SwipeUpdate":{"fingers":4,"dx":0.000000,"dy":0.000000}}"#.into()
            ))
        );
        assert_eq!(s.state(), SessionState::Active);
    }

    #[test]
    fn unreachable_daemon_declines_and_stays_idle() {
        let mut s = GestureSession::new(MockTransport::unreachable());

        assert_eq!(s.on_begin(3), Verdict::Decline);
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.on_update(3, 5.0, 5.0), Verdict::Decline);
        assert_eq!(s.on_undecodable_update(), Verdict::Decline);
        assert_eq!(s.on_end(), Verdict::Decline);
        assert!(s.transport().calls().is_empty());
    }

    #[test]
    fn session_recovers_after_daemon_comes_back() {
        let mut s = GestureSession::new(MockTransport::unreachable());
        assert_eq!(s.on_begin(3), Verdict::Decline);

        s.transport().reachable.set(true);
        assert_eq!(s.on_begin(3), Verdict::Claim);
        assert_eq!(s.on_update(3, 1.0, 0.0), Verdict::Claim);
    }

    #[test]
    fn update_and_end_without_begin_are_no_ops() {
        let mut s = reachable();
        assert_eq!(s.on_update(3, 1.0, 1.0), Verdict::Decline);
        assert_eq!(s.on_end(), Verdict::Decline);
        assert!(s.transport().calls().is_empty());
    }

    #[test]
    fn second_end_does_nothing() {
        let mut s = reachable();
        s.on_begin(3);
        assert_eq!(s.on_end(), Verdict::Claim);
        s.transport().clear();

        assert_eq!(s.on_end(), Verdict::Decline);
        assert!(s.transport().calls().is_empty());
    }

    #[test]
    fn begin_while_active_replaces_the_stale_connection() {
        let mut s = reachable();
        s.on_begin(3);
        assert_eq!(s.on_begin(4), Verdict::Claim);
        assert_eq!(s.fingers(), Some(4));
        assert_eq!(
            s.transport().calls(),
            vec![
                Call::Open(1),
                Call::Send(1, BEGIN3.into()),
                Call::Close(1),
                Call::Open(2),
                Call::Send(2, r#"{"SwipeBegin":{"fingers":4}}"#.into()),
            ]
        );
    }

    #[test]
    fn begin_while_active_with_daemon_gone_ends_idle() {
        let mut s = reachable();
        s.on_begin(3);
        s.transport().reachable.set(false);
        assert_eq!(s.on_begin(3), Verdict::Decline);
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.transport().calls().last(), Some(&Call::Close(1)));
    }

    #[test]
    fn teardown_closes_without_end_message() {
        let mut s = reachable();
        s.on_begin(3);
        s.teardown();
        assert_eq!(s.state(), SessionState::Idle);
        let calls = s.transport().calls();
        assert_eq!(calls.last(), Some(&Call::Close(1)));
        assert!(!calls.contains(&Call::Send(1, END.into())));

        // Idempotent.
        s.teardown();
        assert_eq!(s.transport().calls().len(), calls.len());
    }

    #[test]
    fn handle_routes_events() {
        let mut s = reachable();
        assert!(s.handle(SwipeEvent::Begin { fingers: 3 }).is_claim());
        assert!(s.handle(SwipeEvent::Update { fingers: 3, dx: 0.5, dy: 0.0 }).is_claim());
        assert!(s.handle(SwipeEvent::End).is_claim());
        assert!(!s.handle(SwipeEvent::End).is_claim());
    }
}
