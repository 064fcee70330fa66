/*!
 * Batch input for unattended gpg operations
 *
 * Key generation reads a parameter block from stdin (`--gen-key --batch`);
 * passphrase changes are driven through `--command-fd 0` with a short
 * edit-key transcript. Both are validated here, before any process exists.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{error_codes, GnupgError, GnupgResult};
use crate::secure_memory::{Passphrase, SecureBytes};

#[cfg(test)]
mod tests;

const PASSPHRASE_PARAM: &str = "Passphrase: ";
const NO_PROTECTION: &str = "%no-protection";
const COMMIT: &str = "%commit";

/// RSA key sizes accepted for generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyLength {
    Rsa1024,
    Rsa2048,
}

impl KeyLength {
    pub const ALL: [KeyLength; 2] = [KeyLength::Rsa1024, KeyLength::Rsa2048];

    pub fn bits(self) -> u32 {
        match self {
            KeyLength::Rsa1024 => 1024,
            KeyLength::Rsa2048 => 2048,
        }
    }
}

impl TryFrom<u32> for KeyLength {
    type Error = GnupgError;

    fn try_from(bits: u32) -> GnupgResult<Self> {
        match bits {
            1024 => Ok(KeyLength::Rsa1024),
            2048 => Ok(KeyLength::Rsa2048),
            other => Err(GnupgError::invalid_parameter(
                "length",
                "1024 or 2048",
                &other.to_string(),
                error_codes::INVALID_KEY_LENGTH,
            )),
        }
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Parameters of a key pair to generate. Keys never expire.
#[derive(Debug, Clone)]
pub struct KeySpec {
    length: KeyLength,
    name: String,
    comment: String,
    email: String,
    passphrase: Passphrase,
}

impl KeySpec {
    /// Validate generation parameters.
    ///
    /// Fails with `InvalidParameter` for a length outside the accepted set,
    /// for any field containing a line break, or when both name and email
    /// are empty.
    pub fn new(
        length: u32,
        email: &str,
        name: &str,
        comment: &str,
        passphrase: &str,
    ) -> GnupgResult<Self> {
        let length = KeyLength::try_from(length)?;
        ensure_single_line("email", email)?;
        ensure_single_line("name", name)?;
        ensure_single_line("comment", comment)?;
        ensure_single_line("passphrase", passphrase)?;

        if name.is_empty() && email.is_empty() {
            return Err(GnupgError::invalid_parameter(
                "name",
                "a real name or an email address",
                "both empty",
                error_codes::MISSING_USER_ID,
            ));
        }

        Ok(Self {
            length,
            name: name.to_string(),
            comment: comment.to_string(),
            email: email.to_string(),
            passphrase: Passphrase::new(passphrase),
        })
    }

    pub fn length(&self) -> KeyLength {
        self.length
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Render the `--gen-key --batch` parameter block.
    ///
    /// `Key-Type` has to be the very first line; the remaining order is
    /// fixed so the block is reproducible. Empty optional fields are left
    /// out rather than sent as empty values. Without a passphrase the block
    /// asks for `%no-protection`, otherwise gpg 2.1+ falls back to pinentry.
    pub fn batch_input(&self) -> SecureBytes {
        let mut lines = vec![
            "Key-Type: RSA".to_string(),
            format!("Key-Length: {}", self.length.bits()),
        ];
        for (key, value) in [
            ("Name-Real", &self.name),
            ("Name-Comment", &self.comment),
            ("Name-Email", &self.email),
        ] {
            if !value.is_empty() {
                lines.push(format!("{}: {}", key, value));
            }
        }
        lines.push("Expire-Date: 0".to_string());

        let secret_len = if self.passphrase.is_empty() {
            NO_PROTECTION.len() + 1
        } else {
            PASSPHRASE_PARAM.len() + self.passphrase.expose().len() + 1
        };
        let capacity = lines.iter().map(|line| line.len() + 1).sum::<usize>()
            + secret_len
            + COMMIT.len()
            + 1;

        // sized up front so the passphrase is never left behind by a realloc
        let mut input = SecureBytes::with_capacity(capacity);
        for line in &lines {
            push_line(&mut input, line);
        }
        if self.passphrase.is_empty() {
            push_line(&mut input, NO_PROTECTION);
        } else {
            input.extend_from_slice(PASSPHRASE_PARAM.as_bytes());
            input.extend_from_slice(self.passphrase.expose().as_bytes());
            input.extend_from_slice(b"\n");
        }
        push_line(&mut input, COMMIT);
        input
    }
}

/// A single passphrase line, as read by `--passphrase-fd 0`
pub fn passphrase_input(passphrase: &str) -> GnupgResult<SecureBytes> {
    ensure_single_line("passphrase", passphrase)?;

    let mut input = SecureBytes::with_capacity(passphrase.len() + 1);
    input.extend_from_slice(passphrase.as_bytes());
    input.extend_from_slice(b"\n");
    Ok(input)
}

/// Edit-key transcript changing a key's passphrase.
///
/// gpg reads the commands and the passphrase answers from the same
/// descriptor (`--command-fd 0`).
pub fn passphrase_change_input(old: &str, new: &str) -> GnupgResult<SecureBytes> {
    ensure_single_line("old_passphrase", old)?;
    ensure_single_line("new_passphrase", new)?;

    let mut input = SecureBytes::with_capacity(14 + old.len() + new.len());
    input.extend_from_slice(b"passwd\n");
    input.extend_from_slice(old.as_bytes());
    input.extend_from_slice(b"\n");
    input.extend_from_slice(new.as_bytes());
    input.extend_from_slice(b"\n");
    input.extend_from_slice(b"save\n");
    Ok(input)
}

fn ensure_single_line(parameter: &str, value: &str) -> GnupgResult<()> {
    if value.contains(&['\n', '\r'][..]) {
        let actual = if parameter.contains("passphrase") {
            "a value containing a line break".to_string()
        } else {
            format!("{:?}", value)
        };
        return Err(GnupgError::invalid_parameter(
            parameter,
            "a single line of text",
            &actual,
            error_codes::INVALID_FIELD_VALUE,
        ));
    }
    Ok(())
}

fn push_line(input: &mut SecureBytes, line: &str) {
    input.extend_from_slice(line.as_bytes());
    input.extend_from_slice(b"\n");
}

