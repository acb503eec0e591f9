//! Commands and their wire encoding.
//!
//! This module defines the vocabulary the plugin speaks to the daemon:
//! [`Command`] describes every one-shot action a dispatcher can request,
//! [`SwipeEvent`] describes the raw touchpad stream, and [`encode`] turns a
//! dispatcher invocation (`name`, raw argument) into a [`WireMessage`].
//!
//! Arguments are validated here, before any I/O happens.  The daemon only
//! ever receives canonical payloads:
//!
//! ```json
//! {"Go":"Right"}
//! {"SwitchTo":{"x":2,"y":1}}
//! {"MoveWindowToMonitorIndex":2}
//! "ToggleVisualizer"
//! {"SwipeUpdate":{"fingers":3,"dx":10.500000,"dy":-2.300000}}
//! ```

use log::error;
use serde::Serialize;
use std::fmt;
use std::io;

/// Namespace prefix the host puts in front of every dispatcher name.
pub const DISPATCHER_PREFIX: &str = "hyprgrd:";

/// Direction for grid and monitor navigation.
///
/// Serializes as its capitalized name (`"Right"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Absolute grid cell, 0-indexed.  Encoded as `{"x":col,"y":row}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPosition {
    #[serde(rename = "x")]
    pub col: usize,
    #[serde(rename = "y")]
    pub row: usize,
}

/// 0-based monitor index, in the order the window manager reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonitorIndex(pub usize);

/// Every one-shot action a dispatcher can ask the daemon to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Command {
    /// Move one cell in the given direction.
    Go(Direction),

    /// Move the focused window one cell and follow it.
    MoveWindowAndGo(Direction),

    /// Jump to an absolute grid position.
    SwitchTo(GridPosition),

    /// Move the focused window to the monitor in the given direction.
    MoveWindowToMonitor(Direction),

    /// Move the focused window to the monitor at the given index.
    MoveWindowToMonitorIndex(MonitorIndex),

    /// Toggle the persistent visualizer overlay.
    ///
    /// On the wire this is the bare JSON string `"ToggleVisualizer"`.
    ToggleVisualizer,
}

impl Command {
    /// Encode the command as a single compact JSON value.
    pub fn to_wire(&self) -> WireMessage {
        serialize_wire(self)
    }
}

/// One tick of a multi-finger touchpad swipe, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SwipeEvent {
    #[serde(rename = "SwipeBegin")]
    Begin { fingers: u32 },
    /// `dx` / `dy` are raw pixel deltas; the daemon applies its own scaling.
    #[serde(rename = "SwipeUpdate")]
    Update { fingers: u32, dx: f64, dy: f64 },
    #[serde(rename = "SwipeEnd")]
    End,
}

impl SwipeEvent {
    /// Encode the event for the persistent gesture stream.
    ///
    /// Deltas always carry six fractional digits.  Non-finite deltas are
    /// sent as zero so the line stays valid JSON.
    pub fn to_wire(&self) -> WireMessage {
        let event = match *self {
            SwipeEvent::Update { fingers, dx, dy } => SwipeEvent::Update {
                fingers,
                dx: finite_or_zero(dx),
                dy: finite_or_zero(dy),
            },
            other => other,
        };
        serialize_wire(&event)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// A single encoded message, without the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage(String);

impl WireMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<WireMessage> for String {
    fn from(message: WireMessage) -> Self {
        message.0
    }
}

/// A dispatcher argument that does not describe a valid command.
///
/// Every variant carries the offending (trimmed) argument text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid direction {0:?}: expected left, right, up or down")]
    InvalidDirection(String),
    #[error("invalid grid position {0:?}: expected \"<col> <row>\" as non-negative integers")]
    InvalidGridPosition(String),
    #[error("invalid monitor index {0:?}: expected a single non-negative integer")]
    InvalidMonitorIndex(String),
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}

//  Dispatcher names

/// The user-facing dispatchers, one per [`Command`] shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Go,
    MoveGo,
    Switch,
    MoveToMonitor,
    MoveToMonitorIndex,
    ToggleVis,
}

impl CommandKind {
    pub const ALL: [CommandKind; 6] = [
        CommandKind::Go,
        CommandKind::MoveGo,
        CommandKind::Switch,
        CommandKind::MoveToMonitor,
        CommandKind::MoveToMonitorIndex,
        CommandKind::ToggleVis,
    ];

    /// Short name, as typed after the `hyprgrd:` prefix.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Go => "go",
            CommandKind::MoveGo => "movego",
            CommandKind::Switch => "switch",
            CommandKind::MoveToMonitor => "movetomonitor",
            CommandKind::MoveToMonitorIndex => "movetomonitorindex",
            CommandKind::ToggleVis => "togglevis",
        }
    }

    /// Fully qualified name registered with the host.
    pub fn dispatcher_name(self) -> &'static str {
        match self {
            CommandKind::Go => "hyprgrd:go",
            CommandKind::MoveGo => "hyprgrd:movego",
            CommandKind::Switch => "hyprgrd:switch",
            CommandKind::MoveToMonitor => "hyprgrd:movetomonitor",
            CommandKind::MoveToMonitorIndex => "hyprgrd:movetomonitorindex",
            CommandKind::ToggleVis => "hyprgrd:togglevis",
        }
    }

    /// Look up a dispatcher by name, with or without the `hyprgrd:` prefix.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let short = name.strip_prefix(DISPATCHER_PREFIX).unwrap_or(name);
        Self::ALL.into_iter().find(|kind| kind.name() == short)
    }

    /// Validate `raw` and build the command.
    ///
    /// The argument is trimmed first.  `togglevis` ignores it entirely.
    pub fn parse(self, raw: &str) -> Result<Command, ValidationError> {
        let arg = raw.trim();
        match self {
            CommandKind::Go => parse_direction(arg).map(Command::Go),
            CommandKind::MoveGo => parse_direction(arg).map(Command::MoveWindowAndGo),
            CommandKind::Switch => parse_grid_position(arg).map(Command::SwitchTo),
            CommandKind::MoveToMonitor => parse_direction(arg).map(Command::MoveWindowToMonitor),
            CommandKind::MoveToMonitorIndex => {
                parse_monitor_index(arg).map(Command::MoveWindowToMonitorIndex)
            }
            CommandKind::ToggleVis => Ok(Command::ToggleVisualizer),
        }
    }

    pub fn encode(self, raw: &str) -> Result<WireMessage, ValidationError> {
        self.parse(raw).map(|cmd| cmd.to_wire())
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dispatcher_name())
    }
}

/// Encode the dispatcher `command_name` invoked with `raw_argument`.
pub fn encode(command_name: &str, raw_argument: &str) -> Result<WireMessage, ValidationError> {
    let kind = CommandKind::from_name(command_name)
        .ok_or_else(|| ValidationError::UnknownCommand(command_name.trim().to_string()))?;
    kind.encode(raw_argument)
}

//  Argument parsing

/// Upper-case the first character, leaving the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a direction, case-insensitively.  `arg` must already be trimmed.
fn parse_direction(arg: &str) -> Result<Direction, ValidationError> {
    match capitalize(&arg.to_lowercase()).as_str() {
        "Left" => Ok(Direction::Left),
        "Right" => Ok(Direction::Right),
        "Up" => Ok(Direction::Up),
        "Down" => Ok(Direction::Down),
        _ => Err(ValidationError::InvalidDirection(arg.to_string())),
    }
}

/// Parse a plain decimal token.  Signs, decimals and overflow are rejected.
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn parse_grid_position(arg: &str) -> Result<GridPosition, ValidationError> {
    let invalid = || ValidationError::InvalidGridPosition(arg.to_string());
    let mut tokens = arg.split_whitespace();
    let (Some(col), Some(row), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(invalid());
    };
    Ok(GridPosition {
        col: parse_index(col).ok_or_else(invalid)?,
        row: parse_index(row).ok_or_else(invalid)?,
    })
}

fn parse_monitor_index(arg: &str) -> Result<MonitorIndex, ValidationError> {
    let mut tokens = arg.split_whitespace();
    match (tokens.next().and_then(parse_index), tokens.next()) {
        (Some(n), None) => Ok(MonitorIndex(n)),
        _ => Err(ValidationError::InvalidMonitorIndex(arg.to_string())),
    }
}

//  JSON

/// Compact JSON, except that floats are written with exactly six
/// fractional digits (`10.500000`).
struct FixedDeltas;

impl serde_json::ser::Formatter for FixedDeltas {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        write!(writer, "{:.6}", value)
    }
}

fn serialize_wire<T: Serialize>(value: &T) -> WireMessage {
    let mut out = Vec::with_capacity(64);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, FixedDeltas);
    if let Err(e) = value.serialize(&mut serializer) {
        // Unreachable for the types above: a Vec never fails to write and
        // every map key is a field name.
        error!("failed to serialize message: {}", e);
        out.clear();
    }
    WireMessage(String::from_utf8_lossy(&out).into_owned())
}

/// Escape `s` for use inside a JSON string literal.
///
/// Backslash and double quote are always escaped; control characters are
/// escaped too so that a stray newline can never split a message.  The
/// output agrees with serde_json's string escaping.
pub fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}
