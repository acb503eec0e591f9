//! Hyprland-facing adapter.
//!
//! Hyprland calls into the plugin synchronously: one function per
//! `hyprgrd:*` dispatcher and one callback per swipe hook.  This module
//! translates those calls into [`command`](crate::command) encodings and
//! [`GestureSession`](crate::session::GestureSession) transitions, and
//! translates the outcome back into Hyprland's result shapes.
//!
//! Nothing outside this module should reference Hyprland directly.

pub mod dispatch;
pub mod gestures;
