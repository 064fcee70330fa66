/*!
 * Key Management through gpg
 *
 * Each operation validates its inputs, runs exactly one gpg invocation (two
 * for `delete_keys`) and reads the result off the status channel. Nothing is
 * retried and nothing is cached; the keyring itself lives in gpg's home
 * directory.
 */

mod key_id;


pub use key_id::validate_selector;
pub use key_id::KeyId;

use crate::armor::ArmorKind;
use crate::batch::{passphrase_change_input, passphrase_input, KeySpec};
use crate::config::GnupgConfig;
use crate::error::{error_codes, GnupgError, GnupgResult};
use crate::process::{CommandRunner, GpgProcess, Invocation, ProcessOutput};
use crate::secure_memory::SecureBytes;
use crate::status::{diagnostic_lines, StatusKeyword, StatusRecord};

/// Operation labels used in invocations, logs and errors
pub mod operations {
    pub const GENERATE_KEY_PAIR: &str = "generate_key_pair";
    pub const EXPORT_PUBLIC_KEY: &str = "export_public_key";
    pub const EXPORT_PRIVATE_KEY: &str = "export_private_key";
    pub const IMPORT_KEY: &str = "import_key";
    pub const DELETE_PRIVATE_KEYS: &str = "delete_private_keys";
    pub const DELETE_PUBLIC_KEYS: &str = "delete_public_keys";
    pub const CHANGE_PASSPHRASE: &str = "change_passphrase";
}

use operations::*;

/// `GET_HIDDEN` prompt gpg issues for each passphrase it reads
const PASSPHRASE_PROMPT: &str = "passphrase.enter";

/// Diagnostic gpg prints when the old passphrase does not unlock the key
const PASSPHRASE_CHANGE_ERROR: &str = "error changing passphrase";

/// Key-management operations against one gpg home directory.
///
/// The runner defaults to the real executable; any [`CommandRunner`] can be
/// substituted.
///
/// # Example
///
/// ```no_run
/// use gnupg_keyring::prelude::*;
///
/// fn main() -> GnupgResult<()> {
///     let gpg = Gnupg::init()?;
///     let key_id = gpg.generate_key(2048, "me@foo.com", "myname", "comment", "qweqwe")?;
///     let armored = gpg.export_public_key(key_id.as_str())?;
///     assert!(armored.contains("BEGIN PGP PUBLIC KEY BLOCK"));
///     gpg.delete_keys(&[key_id.as_str()])?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Gnupg<R = GpgProcess> {
    config: GnupgConfig,
    runner: R,
}

impl Gnupg<GpgProcess> {
    /// Locate gpg (`GNUPG_BIN` or `PATH`) and use the default home directory
    pub fn init() -> GnupgResult<Self> {
        Ok(Self::new(GnupgConfig::from_env()?))
    }

    pub fn new(config: GnupgConfig) -> Self {
        Self::with_runner(config, GpgProcess)
    }
}

impl<R: CommandRunner> Gnupg<R> {
    pub fn with_runner(config: GnupgConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &GnupgConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn execute(&self, invocation: Invocation) -> GnupgResult<ProcessOutput> {
        self.runner.run(&self.config, &invocation)
    }

    /// Generate an RSA key pair protected by `passphrase`.
    ///
    /// Convenience over [`KeySpec::new`] and [`create_key_pair`](Self::create_key_pair).
    /// Returns the fingerprint of the new key.
    pub fn generate_key(
        &self,
        length: u32,
        email: &str,
        name: &str,
        comment: &str,
        passphrase: &str,
    ) -> GnupgResult<KeyId> {
        let spec = KeySpec::new(length, email, name, comment, passphrase)?;
        self.create_key_pair(&spec)
    }

    /// Generate a key pair from a validated spec.
    ///
    /// The first `KEY_CREATED` record names the new key; gpg reports the
    /// fingerprint as its second payload token.
    pub fn create_key_pair(&self, spec: &KeySpec) -> GnupgResult<KeyId> {
        let invocation = Invocation::new(GENERATE_KEY_PAIR)
            .args(["--gen-key", "--batch"])
            .input(spec.batch_input());
        let log = self.execute(invocation)?.status_log();

        let record = match log.first(&StatusKeyword::KeyCreated) {
            Some(record) => record,
            None if log.contains(&StatusKeyword::KeyNotCreated) => {
                log::warn!("gpg refused to create a {}-bit key", spec.length());
                return Err(GnupgError::protocol_error(
                    GENERATE_KEY_PAIR,
                    "KEY_CREATED",
                    "gpg reported KEY_NOT_CREATED",
                    error_codes::KEY_NOT_CREATED,
                ));
            }
            None => {
                return Err(GnupgError::protocol_error(
                    GENERATE_KEY_PAIR,
                    "KEY_CREATED",
                    "no KEY_CREATED record in status output",
                    error_codes::STATUS_RECORD_MISSING,
                ))
            }
        };

        let key_id = key_id_from(GENERATE_KEY_PAIR, record)?;
        log::info!("Generated {}-bit key pair {}", spec.length(), key_id);
        Ok(key_id)
    }

    /// Armored public key block for `key`
    pub fn export_public_key(&self, key: &str) -> GnupgResult<String> {
        self.export(key, ArmorKind::PublicKey)
    }

    /// Armored private key block for `key`
    pub fn export_private_key(&self, key: &str) -> GnupgResult<String> {
        self.export(key, ArmorKind::PrivateKey)
    }

    /// Armored private key block for `key`, unlocking it with `passphrase`.
    ///
    /// gpg 2.1+ asks for the passphrase before exporting a protected secret
    /// key. It is handed over on stdin through loopback pinentry, which is
    /// requested here if the configuration does not already do so.
    pub fn export_private_key_with_passphrase(
        &self,
        key: &str,
        passphrase: &str,
    ) -> GnupgResult<String> {
        validate_selector(key)?;
        let input = passphrase_input(passphrase)?;

        let mut invocation = Invocation::new(EXPORT_PRIVATE_KEY).arg("--batch");
        if !self.config.loopback_pinentry() {
            invocation = invocation.args(["--pinentry-mode", "loopback"]);
        }
        let invocation = invocation
            .args(["--passphrase-fd", "0", "--export-secret-key", "-a", key])
            .input(input);
        self.armored_export(invocation, key, ArmorKind::PrivateKey)
    }

    fn export(&self, key: &str, kind: ArmorKind) -> GnupgResult<String> {
        let flag = match kind {
            ArmorKind::PublicKey => "--export",
            ArmorKind::PrivateKey => "--export-secret-key",
        };
        validate_selector(key)?;

        let invocation = Invocation::new(export_operation(kind)).args([flag, "-a", key]);
        self.armored_export(invocation, key, kind)
    }

    fn armored_export(
        &self,
        invocation: Invocation,
        key: &str,
        kind: ArmorKind,
    ) -> GnupgResult<String> {
        let operation = invocation.operation();
        let output = self
            .execute(invocation)
            .map_err(|e| e.with_context("key_id", key))?;

        // gpg exits cleanly with an empty stdout when no key matched
        if output.stdout.is_empty() {
            return Err(GnupgError::process_error(
                operation,
                "nothing exported",
                error_codes::NOTHING_EXPORTED,
            )
            .with_context("key_id", key));
        }

        let armored = String::from_utf8(output.stdout).map_err(|_| {
            GnupgError::protocol_error(
                operation,
                "armored text",
                "output is not valid UTF-8",
                error_codes::OUTPUT_NOT_UTF8,
            )
            .with_context("key_id", key)
        })?;

        if !kind.encloses(&armored) {
            return Err(GnupgError::protocol_error(
                operation,
                kind.begin_marker(),
                &format!("output does not hold an armored {}", kind),
                error_codes::OUTPUT_NOT_ARMORED,
            )
            .with_context("key_id", key));
        }

        log::debug!("Exported {} for {}", kind, key);
        Ok(armored)
    }

    /// Import key material (armored or binary) into the keyring.
    ///
    /// Returns the fingerprint from the first `IMPORT_OK` record.
    pub fn import_key<M: AsRef<[u8]>>(&self, material: M) -> GnupgResult<KeyId> {
        let material = material.as_ref();
        if material.is_empty() {
            return Err(GnupgError::invalid_parameter(
                "key",
                "non-empty key material",
                "empty input",
                error_codes::INVALID_FIELD_VALUE,
            ));
        }

        let invocation = Invocation::new(IMPORT_KEY)
            .args(["--batch", "--import"])
            .input(SecureBytes::new(material));
        let log = self.execute(invocation)?.status_log();

        let record = match log.first(&StatusKeyword::ImportOk) {
            Some(record) => record,
            None => {
                let cause = match log.first(&StatusKeyword::ImportProblem) {
                    Some(problem) => describe_import_problem(problem),
                    None => "no IMPORT_OK record in status output".to_string(),
                };
                log::warn!("Key import failed: {}", cause);
                return Err(GnupgError::import_failed(&cause));
            }
        };

        let key_id = key_id_from(IMPORT_KEY, record)?;
        log::info!("Imported key {}", key_id);
        Ok(key_id)
    }

    /// Delete the secret keys of `keys`
    pub fn delete_private_keys<S: AsRef<str>>(&self, keys: &[S]) -> GnupgResult<()> {
        self.delete(DELETE_PRIVATE_KEYS, "--delete-secret-keys", keys)
    }

    /// Delete the public keys of `keys`
    pub fn delete_public_keys<S: AsRef<str>>(&self, keys: &[S]) -> GnupgResult<()> {
        self.delete(DELETE_PUBLIC_KEYS, "--delete-keys", keys)
    }

    /// Delete secret keys, then public keys.
    ///
    /// gpg will not drop a public key whose secret part is still present, so
    /// the public step only runs once the private step succeeded.
    pub fn delete_keys<S: AsRef<str>>(&self, keys: &[S]) -> GnupgResult<()> {
        self.delete_private_keys(keys)?;
        self.delete_public_keys(keys)
    }

    fn delete<S: AsRef<str>>(
        &self,
        operation: &'static str,
        flag: &str,
        keys: &[S],
    ) -> GnupgResult<()> {
        if keys.is_empty() {
            return Err(GnupgError::invalid_parameter(
                "keys",
                "at least one key",
                "empty list",
                error_codes::EMPTY_KEY_LIST,
            ));
        }
        for key in keys {
            validate_selector(key.as_ref())?;
        }

        let selectors: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
        let invocation = Invocation::new(operation)
            .args(["--batch", "--yes", flag])
            .args(selectors.iter().copied());
        self.execute(invocation)
            .map_err(|e| e.with_context("key_ids", &selectors.join(" ")))?;

        log::info!("{}: removed {}", operation, selectors.join(" "));
        Ok(())
    }

    /// Change the passphrase protecting the secret part of `key`.
    ///
    /// gpg exits cleanly even when it rejects the old passphrase. It then
    /// reads the rest of the transcript as edit commands, so success needs
    /// positive evidence: both the old and the new passphrase must have been
    /// prompted for, with no rejection reported in between.
    pub fn change_passphrase(&self, key: &str, old: &str, new: &str) -> GnupgResult<()> {
        validate_selector(key)?;
        let transcript = passphrase_change_input(old, new)?;

        // without loopback the answers would go to a pinentry, not stdin
        let mut invocation = Invocation::new(CHANGE_PASSPHRASE);
        if !self.config.loopback_pinentry() {
            invocation = invocation.args(["--pinentry-mode", "loopback"]);
        }
        let invocation = invocation
            .args(["--command-fd", "0", "--passphrase-repeat", "0", "--edit-key", key])
            .input(transcript);
        let output = self
            .execute(invocation)
            .map_err(|e| e.with_context("key_id", key))?;

        if let Some(cause) = passphrase_change_rejection(&output) {
            log::warn!("Passphrase change for {} rejected: {}", key, cause);
            return Err(
                GnupgError::authentication_error(CHANGE_PASSPHRASE, cause)
                    .with_context("key_id", key),
            );
        }

        log::info!("Changed passphrase of {}", key);
        Ok(())
    }
}

fn export_operation(kind: ArmorKind) -> &'static str {
    match kind {
        ArmorKind::PublicKey => EXPORT_PUBLIC_KEY,
        ArmorKind::PrivateKey => EXPORT_PRIVATE_KEY,
    }
}

/// The key id carried as second payload token of `KEY_CREATED`/`IMPORT_OK`
fn key_id_from(operation: &str, record: &StatusRecord) -> GnupgResult<KeyId> {
    let token = record.token(1).ok_or_else(|| {
        GnupgError::protocol_error(
            operation,
            "a key id in the status payload",
            &format!("{} record has no key id: {:?}", record.keyword, record.text),
            error_codes::STATUS_RECORD_MALFORMED,
        )
    })?;

    KeyId::parse(token).ok_or_else(|| {
        GnupgError::protocol_error(
            operation,
            "a hexadecimal key id or fingerprint",
            &format!("malformed key id {:?} in {} record", token, record.keyword),
            error_codes::STATUS_RECORD_MALFORMED,
        )
    })
}

/// Why a passphrase-change run did not change anything, if it didn't
fn passphrase_change_rejection(output: &ProcessOutput) -> Option<&'static str> {
    let log = output.status_log();
    if log.contains(&StatusKeyword::BadPassphrase)
        || diagnostic_lines(&output.status).any(|line| line.contains(PASSPHRASE_CHANGE_ERROR))
    {
        return Some("bad old passphrase");
    }

    let prompts = log
        .iter()
        .filter(|record| {
            record.keyword == StatusKeyword::GetHidden
                && record.token(0) == Some(PASSPHRASE_PROMPT)
        })
        .count();
    if prompts < 2 {
        return Some("gpg never asked for the new passphrase");
    }
    None
}

/// Human-readable reason of an `IMPORT_PROBLEM <reason> [<fpr>]` record
fn describe_import_problem(record: &StatusRecord) -> String {
    let reason = match record.token(0) {
        Some("1") => "invalid certificate",
        Some("2") => "issuer certificate missing",
        Some("3") => "certificate chain too long",
        Some("4") => "error storing certificate",
        _ => "no specific reason given",
    };
    match record.token(1) {
        Some(fingerprint) => format!("gpg reported an import problem for {}: {}", fingerprint, reason),
        None => format!("gpg reported an import problem: {}", reason),
    }
}
