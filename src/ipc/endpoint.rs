//! Resolution of the daemon's socket address.
//!
//! The daemon binds `$XDG_RUNTIME_DIR/hyprgrd.sock`.  When the variable is
//! unset or empty, both sides fall back to `/tmp/hyprgrd.sock`.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File name of the daemon socket inside the runtime directory.
pub const SOCKET_NAME: &str = "hyprgrd.sock";

/// Socket path used when no runtime directory is available.
pub const FALLBACK_SOCKET_PATH: &str = "/tmp/hyprgrd.sock";

/// The resolved socket address.  Just a path; owns no resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    path: PathBuf,
}

impl Endpoint {
    /// An endpoint at an explicit path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve from the value of `XDG_RUNTIME_DIR`, if any.
    pub fn from_runtime_dir(runtime_dir: Option<&OsStr>) -> Self {
        match runtime_dir {
            Some(dir) if !dir.is_empty() => Self::new(Path::new(dir).join(SOCKET_NAME)),
            _ => Self::new(FALLBACK_SOCKET_PATH),
        }
    }

    /// Resolve from the current environment.
    pub fn from_env() -> Self {
        Self::from_runtime_dir(std::env::var_os("XDG_RUNTIME_DIR").as_deref())
    }

    /// The endpoint for this process, resolved from the environment on first
    /// use and fixed afterwards.
    pub fn process_default() -> &'static Endpoint {
        static ENDPOINT: OnceLock<Endpoint> = OnceLock::new();
        ENDPOINT.get_or_init(Self::from_env)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
