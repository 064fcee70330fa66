/*!
 * gnupg-keyring
 *
 * Key management (generate, export, import, delete, change passphrase) on
 * top of the `gpg` executable. Every operation runs gpg as a child process
 * and reads its result from the machine-readable status channel rather
 * than from human-readable output.
 *
 * The layers, leaves first:
 *
 * - [`process`] runs gpg with concurrent stdin/stdout/status handling
 * - [`status`] decodes `[GNUPG:]` status lines into ordered records
 * - [`batch`] builds the generation parameter block and edit transcripts
 * - [`key_management`] implements the operations on top of the above
 */

/// ASCII-armor envelopes of exported keys
pub mod armor;

/// Parameter blocks and transcripts fed to gpg on stdin
pub mod batch;

/// gpg executable and home directory configuration
pub mod config;

/// Common error types
pub mod error;

/// Key-management operations
pub mod key_management;

/// Child process invocation
pub mod process;

/// Zeroizing containers for passphrases and stdin payloads
pub mod secure_memory;

/// Status protocol parsing
pub mod status;

// Re-export main types for convenience
pub use armor::ArmorKind;
pub use batch::{KeyLength, KeySpec};
pub use config::GnupgConfig;
pub use error::{GnupgError, GnupgResult};
pub use key_management::{Gnupg, KeyId};
pub use process::{CommandRunner, GpgProcess, Invocation, ProcessOutput};
pub use status::{StatusKeyword, StatusLog, StatusRecord};

/// Resolve gpg from the environment and return a ready-to-use handle.
///
/// Shorthand for [`Gnupg::init`].
///
/// # Example
///
/// ```no_run
/// use gnupg_keyring::prelude::*;
///
/// fn main() -> Result<(), GnupgError> {
///     let gpg = init()?;
///     println!("using {}", gpg.config().binary().display());
///     Ok(())
/// }
/// ```
pub fn init() -> GnupgResult<Gnupg> {
    Gnupg::init()
}

/// The types most callers need
pub mod prelude {
    pub use crate::armor::ArmorKind;
    pub use crate::batch::{KeyLength, KeySpec};
    pub use crate::config::GnupgConfig;
    pub use crate::error::{GnupgError, GnupgResult};
    pub use crate::init;
    pub use crate::key_management::{Gnupg, KeyId};
    pub use crate::process::{CommandRunner, GpgProcess};
    pub use crate::status::{StatusKeyword, StatusLog, StatusRecord};
}
