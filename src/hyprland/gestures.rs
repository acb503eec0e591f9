//! Decoding of Hyprland's swipe hook payloads.
//!
//! Hyprland hands every `swipeBegin` / `swipeUpdate` / `swipeEnd` hook an
//! opaque payload.  The registration point knows which phase it handles, so
//! each callback decodes exactly once into a [`SwipeEvent`] with a checked
//! downcast.  A payload of the wrong type is a [`DecodeError`], never a panic.

use crate::command::SwipeEvent;
use std::any::Any;
use std::fmt;

/// Payload of the `swipeBegin` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeBeginEvent {
    pub fingers: u32,
}

/// Payload of the `swipeUpdate` hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeUpdateEvent {
    pub fingers: u32,
    /// Finger movement since the previous update, in pixels.
    pub delta: Vector2D,
}

/// Payload of the `swipeEnd` hook.  The daemon only needs to know that the
/// gesture ended, so nothing is read from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwipeEndEvent;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

/// The three swipe hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipePhase {
    Begin,
    Update,
    End,
}

impl SwipePhase {
    /// Event name the callback is registered under.
    pub fn hook_name(self) -> &'static str {
        match self {
            SwipePhase::Begin => "swipeBegin",
            SwipePhase::Update => "swipeUpdate",
            SwipePhase::End => "swipeEnd",
        }
    }
}

impl fmt::Display for SwipePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hook_name())
    }
}

/// A hook payload that was not the type its phase expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{phase} payload has an unexpected type")]
pub struct DecodeError {
    pub phase: SwipePhase,
}

pub fn decode_begin(payload: &dyn Any) -> Result<SwipeEvent, DecodeError> {
    payload
        .downcast_ref::<SwipeBeginEvent>()
        .map(|ev| SwipeEvent::Begin { fingers: ev.fingers })
        .ok_or(DecodeError {
            phase: SwipePhase::Begin,
        })
}

pub fn decode_update(payload: &dyn Any) -> Result<SwipeEvent, DecodeError> {
    payload
        .downcast_ref::<SwipeUpdateEvent>()
        .map(|ev| SwipeEvent::Update {
            fingers: ev.fingers,
            dx: ev.delta.x,
            dy: ev.delta.y,
        })
        .ok_or(DecodeError {
            phase: SwipePhase::Update,
        })
}

/// The end payload carries nothing the daemon needs, so any payload will do.
pub fn decode_end(_payload: &dyn Any) -> SwipeEvent {
    SwipeEvent::End
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_payload_decodes() {
        let ev = SwipeBeginEvent { fingers: 4 };
        assert_eq!(decode_begin(&ev), Ok(SwipeEvent::Begin { fingers: 4 }));
    }

    #[test]
    fn update_payload_decodes() {
        let ev = SwipeUpdateEvent {
            fingers: 3,
            delta: Vector2D { x: 10.5, y: -2.3 },
        };
        assert_eq!(
            decode_update(&ev),
            Ok(SwipeEvent::Update { fingers: 3, dx: 10.5, dy: -2.3 })
        );
    }

    #[test]
    fn wrong_payload_type_is_a_decode_error() {
        let err = decode_begin(&"three fingers").unwrap_err();
        assert_eq!(err.phase, SwipePhase::Begin);
        assert_eq!(err.to_string(), "swipeBegin payload has an unexpected type");

        let begin = SwipeBeginEvent { fingers: 3 };
        assert_eq!(
            decode_update(&begin),
            Err(DecodeError {
                phase: SwipePhase::Update
            })
        );
    }

    #[test]
    fn end_accepts_anything() {
        assert_eq!(decode_end(&SwipeEndEvent::default()), SwipeEvent::End);
        assert_eq!(decode_end(&()), SwipeEvent::End);
    }
}
