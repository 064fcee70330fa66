// Key handles returned by gpg and selectors passed back to it

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{error_codes, GnupgError, GnupgResult};

/// Hex lengths gpg uses for key ids (short, long) and fingerprints (v3, v4, v5)
const KEY_ID_LENGTHS: [usize; 5] = [8, 16, 32, 40, 64];

/// Identifier of a key in the keyring, as reported by gpg.
///
/// Always a non-empty hexadecimal key id or fingerprint. Callers should
/// treat it as an opaque handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyId(String);

impl KeyId {
    /// Accept `text` if it has key id or fingerprint syntax
    pub fn parse(text: &str) -> Option<Self> {
        let well_formed = KEY_ID_LENGTHS.contains(&text.len())
            && text.chars().all(|c| c.is_ascii_hexdigit());
        well_formed.then(|| KeyId(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a full fingerprint rather than a short or long key id
    pub fn is_fingerprint(&self) -> bool {
        self.0.len() >= 32
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KeyId {
    type Error = GnupgError;

    fn try_from(text: String) -> GnupgResult<Self> {
        KeyId::parse(&text).ok_or_else(|| {
            GnupgError::invalid_parameter(
                "key_id",
                "a hexadecimal key id or fingerprint",
                &text,
                error_codes::INVALID_KEY_SELECTOR,
            )
        })
    }
}

impl From<KeyId> for String {
    fn from(key_id: KeyId) -> Self {
        key_id.0
    }
}

/// Check a key selector before it is placed on gpg's command line.
///
/// Selectors are opaque (key id, fingerprint, user id substring) but an
/// empty one, one with control characters, or one starting with `-` would
/// change the meaning of the invocation.
pub fn validate_selector(selector: &str) -> GnupgResult<()> {
    let problem = if selector.trim().is_empty() {
        Some("empty selector")
    } else if selector.chars().any(char::is_control) {
        Some("selector contains control characters")
    } else if selector.starts_with('-') {
        Some("selector starts with '-'")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(GnupgError::invalid_parameter(
            "key_id",
            "a key id, fingerprint or user id",
            problem,
            error_codes::INVALID_KEY_SELECTOR,
        )),
        None => Ok(()),
    }
}
