//! The [`Plugin`] facade Hyprland calls into.
//!
//! # Dispatchers
//!
//! ```text
//! hyprgrd:go                  <direction>   move one grid cell
//! hyprgrd:movego              <direction>   move the focused window and follow
//! hyprgrd:switch              <col> <row>   jump to an absolute grid position
//! hyprgrd:movetomonitor       <direction>   move focused window to monitor in direction
//! hyprgrd:movetomonitorindex  <n>           move focused window to monitor n (0-based)
//! hyprgrd:togglevis                         toggle the persistent visualizer overlay
//! ```
//!
//! A dispatcher validates its argument, then performs one short-lived
//! connect/write/close.  Invalid arguments never touch the socket.
//!
//! # Swipe hooks
//!
//! `swipeBegin` / `swipeUpdate` / `swipeEnd` are forwarded over one
//! persistent connection and cancelled in Hyprland, but only when the
//! daemon accepted the connection at begin.  Without a daemon the user
//! keeps Hyprland's native workspace swipe.

use crate::command::{CommandKind, SwipeEvent, ValidationError};
use crate::config::{Config, GestureConfig};
use crate::hyprland::gestures::{decode_begin, decode_end, decode_update, DecodeError};
use crate::ipc::client::UnixSocketTransport;
use crate::session::{GestureSession, SessionState, Verdict};
use crate::traits::Transport;
use log::{debug, info, warn};
use std::any::Any;

/// Error text returned when the daemon could not be reached.
pub const SEND_FAILED: &str = "failed to send command";

/// Outcome of a dispatcher, as Hyprland expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub success: bool,
    /// Human-readable reason; empty on success.
    pub error: String,
}

impl DispatchResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: String::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl Default for DispatchResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl From<ValidationError> for DispatchResult {
    fn from(e: ValidationError) -> Self {
        Self::failure(e.to_string())
    }
}

/// Per-call hook information.  Setting `cancelled` stops Hyprland from
/// running its own handler for the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallbackInfo {
    pub cancelled: bool,
}

impl CallbackInfo {
    fn apply(&mut self, verdict: Verdict) {
        self.cancelled = verdict.is_claim();
    }
}

/// Plugin state for one load/unload cycle.
///
/// Built when Hyprland loads the plugin and dropped when it unloads it.
/// Dropping force-closes any in-flight swipe connection.
pub struct Plugin<T: Transport = UnixSocketTransport> {
    session: GestureSession<T>,
    gestures: GestureConfig,
}

impl Plugin<UnixSocketTransport> {
    /// Build the plugin from `config`, talking to its resolved endpoint.
    pub fn new(config: &Config) -> Self {
        let transport = UnixSocketTransport::new(config.endpoint());
        info!("forwarding to {}", transport.endpoint());
        Self::with_transport(transport, config.gestures.clone())
    }
}

impl<T: Transport> Plugin<T> {
    pub fn with_transport(transport: T, gestures: GestureConfig) -> Self {
        Self {
            session: GestureSession::new(transport),
            gestures,
        }
    }

    /// Names to register with Hyprland, in registration order.
    pub fn dispatcher_names() -> impl Iterator<Item = &'static str> {
        CommandKind::ALL.into_iter().map(CommandKind::dispatcher_name)
    }

    pub fn transport(&self) -> &T {
        self.session.transport()
    }

    pub fn gesture_state(&self) -> SessionState {
        self.session.state()
    }

    //  Dispatchers

    /// Run the dispatcher registered as `name` (prefix optional).
    pub fn dispatch(&self, name: &str, arg: &str) -> DispatchResult {
        match CommandKind::from_name(name) {
            Some(kind) => self.run(kind, arg),
            None => ValidationError::UnknownCommand(name.trim().to_string()).into(),
        }
    }

    /// `hyprgrd:go <direction>`
    pub fn dispatch_go(&self, arg: &str) -> DispatchResult {
        self.run(CommandKind::Go, arg)
    }

    /// `hyprgrd:movego <direction>`
    pub fn dispatch_move_go(&self, arg: &str) -> DispatchResult {
        self.run(CommandKind::MoveGo, arg)
    }

    /// `hyprgrd:switch <col> <row>`
    pub fn dispatch_switch(&self, arg: &str) -> DispatchResult {
        self.run(CommandKind::Switch, arg)
    }

    /// `hyprgrd:movetomonitor <direction>`
    pub fn dispatch_move_to_monitor(&self, arg: &str) -> DispatchResult {
        self.run(CommandKind::MoveToMonitor, arg)
    }

    /// `hyprgrd:movetomonitorindex <n>`
    pub fn dispatch_move_to_monitor_index(&self, arg: &str) -> DispatchResult {
        self.run(CommandKind::MoveToMonitorIndex, arg)
    }

    /// `hyprgrd:togglevis`.  Hyprland passes an empty argument; any argument
    /// is ignored.
    pub fn dispatch_toggle_vis(&self, arg: &str) -> DispatchResult {
        self.run(CommandKind::ToggleVis, arg)
    }

    fn run(&self, kind: CommandKind, arg: &str) -> DispatchResult {
        let message = match kind.encode(arg) {
            Ok(message) => message,
            Err(e) => {
                warn!("{}: {}", kind, e);
                return e.into();
            }
        };
        if self.session.transport().send_once(&message) {
            DispatchResult::ok()
        } else {
            warn!("{}: {}", kind, SEND_FAILED);
            DispatchResult::failure(SEND_FAILED)
        }
    }

    //  Swipe hooks

    /// `swipeBegin` hook.
    pub fn on_swipe_begin(&mut self, info: &mut CallbackInfo, payload: &dyn Any) {
        if !self.gestures.forward {
            info.cancelled = false;
            return;
        }
        let event = decode_begin(payload).unwrap_or_else(|e| {
            let fingers = self.gestures.fallback_fingers;
            debug!("{}, assuming {} fingers", e, fingers);
            SwipeEvent::Begin { fingers }
        });
        info.apply(self.session.handle(event));
    }

    /// `swipeUpdate` hook.
    pub fn on_swipe_update(&mut self, info: &mut CallbackInfo, payload: &dyn Any) {
        if !self.gestures.forward {
            info.cancelled = false;
            return;
        }
        let verdict = match decode_update(payload) {
            Ok(event) => self.session.handle(event),
            Err(DecodeError { phase }) => {
                debug!("undecodable {}, sending a zero-delta update", phase);
                self.session.on_undecodable_update()
            }
        };
        info.apply(verdict);
    }

    /// `swipeEnd` hook.
    pub fn on_swipe_end(&mut self, info: &mut CallbackInfo, payload: &dyn Any) {
        if !self.gestures.forward {
            info.cancelled = false;
            return;
        }
        let verdict = self.session.handle(decode_end(payload));
        info.apply(verdict);
    }
}

impl<T: Transport> Drop for Plugin<T> {
    fn drop(&mut self) {
        if self.session.state() == SessionState::Active {
            info!("unloading with a swipe in flight");
        }
        self.session.teardown();
    }
}
