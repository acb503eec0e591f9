//! Entry point for **hyprgrd-ctl**, a command-line client for the daemon.
//!
//! Runs the same code path as the Hyprland dispatchers, for scripts and
//! key-bind helpers outside Hyprland:
//!
//! ```text
//! hyprgrd-ctl [--socket PATH] [--print] <command> [ARG...]
//! hyprgrd-ctl [--socket PATH] swipe <fingers> <dx>,<dy> [<dx>,<dy>...]
//! ```
//!
//! `<command>` is any dispatcher name (`go`, `hyprgrd:switch`, ...).  Extra
//! arguments are joined with spaces, so `hyprgrd-ctl switch 2 1` works.
//! `swipe` replays a synthetic gesture through a real gesture session.

use hyprgrd_plugin::command::{encode, ValidationError};
use hyprgrd_plugin::config::Config;
use hyprgrd_plugin::hyprland::dispatch::{CallbackInfo, Plugin};
use hyprgrd_plugin::hyprland::gestures::{
    SwipeBeginEvent, SwipeEndEvent, SwipeUpdateEvent, Vector2D,
};
use log::{error, info};
use std::path::PathBuf;

const USAGE: &str = "\
usage: hyprgrd-ctl [--socket PATH] [--print] <command> [ARG...]
       hyprgrd-ctl [--socket PATH] swipe <fingers> <dx>,<dy> [<dx>,<dy>...]

commands: go, movego, switch, movetomonitor, movetomonitorindex, togglevis";

/// Errors that end the process with a non-zero status.
#[derive(Debug, thiserror::Error)]
enum CtlError {
    #[error("{usage}", usage = USAGE)]
    Help,
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),
    #[error("{0}")]
    Invalid(#[from] ValidationError),
    #[error("{0}")]
    Dispatch(String),
    #[error("daemon did not accept the swipe (is hyprgrd running?)")]
    SwipeDeclined,
}

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    socket: Option<PathBuf>,
    print: bool,
    command: String,
    rest: Vec<String>,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args, CtlError> {
    let mut socket = None;
    let mut print = false;
    let mut positional = Vec::new();
    let mut argv = argv.into_iter();

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(CtlError::Help),
            "--print" => print = true,
            "--socket" => {
                let path = argv
                    .next()
                    .ok_or_else(|| CtlError::Usage("--socket needs a path".into()))?;
                socket = Some(PathBuf::from(path));
            }
            _ => {
                positional.push(arg);
                positional.extend(argv.by_ref());
            }
        }
    }

    let mut positional = positional.into_iter();
    let command = positional
        .next()
        .ok_or_else(|| CtlError::Usage("missing command".into()))?;
    Ok(Args {
        socket,
        print,
        command,
        rest: positional.collect(),
    })
}

/// Parse `"<dx>,<dy>"`.
fn parse_delta(s: &str) -> Result<Vector2D, CtlError> {
    let bad = || CtlError::Usage(format!("bad swipe delta {:?}, expected <dx>,<dy>", s));
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    Ok(Vector2D {
        x: x.trim().parse().map_err(|_| bad())?,
        y: y.trim().parse().map_err(|_| bad())?,
    })
}

fn run_swipe(plugin: &mut Plugin, rest: &[String]) -> Result<(), CtlError> {
    let (fingers, deltas) = rest
        .split_first()
        .ok_or_else(|| CtlError::Usage("swipe needs a finger count".into()))?;
    let fingers: u32 = fingers
        .parse()
        .map_err(|_| CtlError::Usage(format!("bad finger count {:?}", fingers)))?;
    let deltas = deltas
        .iter()
        .map(|d| parse_delta(d))
        .collect::<Result<Vec<_>, _>>()?;

    let mut info = CallbackInfo::default();
    plugin.on_swipe_begin(&mut info, &SwipeBeginEvent { fingers });
    if !info.cancelled {
        return Err(CtlError::SwipeDeclined);
    }
    for delta in &deltas {
        plugin.on_swipe_update(&mut info, &SwipeUpdateEvent { fingers, delta: *delta });
    }
    plugin.on_swipe_end(&mut info, &SwipeEndEvent::default());
    info!("replayed {}-finger swipe with {} updates", fingers, deltas.len());
    Ok(())
}

fn run(args: Args) -> Result<(), CtlError> {
    let mut config = Config::load_or_default();
    if let Some(socket) = args.socket {
        config.socket_path = Some(socket);
    }

    if args.command == "swipe" {
        let mut plugin = Plugin::new(&config);
        return run_swipe(&mut plugin, &args.rest);
    }

    let arg = args.rest.join(" ");
    if args.print {
        println!("{}", encode(&args.command, &arg)?);
        return Ok(());
    }

    let result = Plugin::new(&config).dispatch(&args.command, &arg);
    if result.success {
        Ok(())
    } else {
        Err(CtlError::Dispatch(result.error))
    }
}

//  Main

fn main() {
    env_logger::init();

    match parse_args(std::env::args().skip(1)).and_then(run) {
        Ok(()) => {}
        Err(CtlError::Help) => println!("{}", USAGE),
        Err(e) => {
            error!("{}", e);
            eprintln!("hyprgrd-ctl: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, CtlError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_command_and_arguments() {
        let a = args(&["switch", "2", "1"]).unwrap();
        assert_eq!(a.command, "switch");
        assert_eq!(a.rest, vec!["2", "1"]);
        assert_eq!(a.socket, None);
        assert!(!a.print);
    }

    #[test]
    fn parses_options_before_command() {
        let a = args(&["--socket", "/tmp/x.sock", "--print", "go", "right"]).unwrap();
        assert_eq!(a.socket, Some(PathBuf::from("/tmp/x.sock")));
        assert!(a.print);
        assert_eq!(a.command, "go");
    }

    #[test]
    fn options_after_command_are_arguments() {
        let a = args(&["go", "--print"]).unwrap();
        assert!(!a.print);
        assert_eq!(a.rest, vec!["--print"]);
    }

    #[test]
    fn help_flag() {
        assert!(matches!(args(&["--help"]), Err(CtlError::Help)));
    }

    #[test]
    fn missing_command_is_usage_error() {
        assert!(matches!(args(&[]), Err(CtlError::Usage(_))));
        assert!(matches!(args(&["--socket"]), Err(CtlError::Usage(_))));
    }

    #[test]
    fn parses_swipe_deltas() {
        assert_eq!(parse_delta("10.5,-2.3").unwrap(), Vector2D { x: 10.5, y: -2.3 });
        assert_eq!(parse_delta(" 1 , 2 ").unwrap(), Vector2D { x: 1.0, y: 2.0 });
        assert!(parse_delta("10.5").is_err());
        assert!(parse_delta("a,b").is_err());
    }
}
