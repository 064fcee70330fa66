/*!
 * gpg executable and home directory configuration
 *
 * A `GnupgConfig` is resolved once and then passed, read-only, into every
 * invocation. Tests build one pointing at a stub executable instead of
 * mutating the environment.
 */

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{error_codes, GnupgError, GnupgResult};

/// Environment variable overriding the gpg executable path
pub const GNUPG_BIN_ENV: &str = "GNUPG_BIN";

/// Executable name looked up on `PATH` when no override is given
pub const DEFAULT_BINARY_NAME: &str = "gpg";

/// Home directory name, relative to the user's home
pub const DEFAULT_HOMEDIR_NAME: &str = ".gnupg";

/// Status output is requested on this file descriptor (stderr)
pub const STATUS_FD: &str = "2";

/// Resolved location of the gpg executable and its key storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnupgConfig {
    binary: PathBuf,
    homedir: PathBuf,
    loopback_pinentry: bool,
}

impl GnupgConfig {
    /// Resolve the executable from `GNUPG_BIN` or `PATH` and use `~/.gnupg`
    pub fn from_env() -> GnupgResult<Self> {
        let binary = match env::var_os(GNUPG_BIN_ENV).filter(|value| !value.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => find_on_path(DEFAULT_BINARY_NAME).ok_or_else(|| {
                GnupgError::configuration_error(
                    "binary",
                    "gpg binary not found",
                    error_codes::BINARY_NOT_FOUND,
                )
            })?,
        };

        Self::with_binary_path(binary)
    }

    /// Use an explicit gpg executable with the default home directory
    pub fn with_binary_path<P: AsRef<Path>>(binary: P) -> GnupgResult<Self> {
        let homedir = default_homedir()?;
        log::debug!(
            "Using gpg binary {} with home {}",
            binary.as_ref().display(),
            homedir.display()
        );

        Ok(Self {
            binary: binary.as_ref().to_path_buf(),
            homedir,
            loopback_pinentry: false,
        })
    }

    /// Replace the home directory (where gpg stores its keyrings)
    pub fn with_homedir<P: AsRef<Path>>(mut self, homedir: P) -> Self {
        self.homedir = homedir.as_ref().to_path_buf();
        self
    }

    /// Ask gpg 2.1+ to take passphrases from us instead of a pinentry program
    pub fn with_loopback_pinentry(mut self, enabled: bool) -> Self {
        self.loopback_pinentry = enabled;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn homedir(&self) -> &Path {
        &self.homedir
    }

    pub fn loopback_pinentry(&self) -> bool {
        self.loopback_pinentry
    }

    /// Flags placed before every operation's own arguments.
    ///
    /// Status lines go to stderr, no terminal is ever consulted, and the
    /// key storage is always explicit.
    pub fn base_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--status-fd".into(),
            STATUS_FD.into(),
            "--no-tty".into(),
            "--homedir".into(),
            self.homedir.clone().into_os_string(),
        ];
        if self.loopback_pinentry {
            args.push("--pinentry-mode".into());
            args.push("loopback".into());
        }
        args
    }
}

fn default_homedir() -> GnupgResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_HOMEDIR_NAME))
        .ok_or_else(|| {
            GnupgError::configuration_error(
                "homedir",
                "user home directory could not be determined",
                error_codes::HOMEDIR_UNRESOLVED,
            )
        })
}

/// Search `PATH` for an executable file called `name`
fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}
