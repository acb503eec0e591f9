//! **hyprgrd-plugin**: dispatchers and swipe forwarding for hyprgrd.
//!
//! Keybindings and touchpad gestures in Hyprland drive the hyprgrd daemon
//! over its Unix socket.  This crate is the layer in between:
//!
//! * [`command`] turns a dispatcher invocation (`hyprgrd:go right`) into a
//!   validated, newline-free JSON message.
//! * [`ipc`] resolves the daemon socket and writes to it, either one-shot or
//!   over a connection held open for a whole gesture.
//! * [`session`] owns that gesture connection and decides, at swipe begin,
//!   whether the daemon or Hyprland handles the gesture.
//! * [`hyprland`] is the facade Hyprland calls into.
//!
//! Delivery is best-effort and fire-and-forget: no retries, no buffering,
//! no responses.  Nothing here panics on bad input or a missing daemon.
//!
//! # Architecture
//!
//! [`traits::Transport`] abstracts the socket so the session and the facade
//! can be exercised without a running daemon.

pub mod command;
pub mod config;
pub mod hyprland;
pub mod ipc;
pub mod session;
pub mod traits;
