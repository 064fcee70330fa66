//! Secure Memory Handling Utilities
//!
//! Passphrases and the stdin payloads that embed them (batch blocks, edit
//! transcripts) live in containers that are zeroed when dropped and never
//! print their contents through `Debug`.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A byte container for sensitive data that is zeroed on drop.
///
/// Used for every payload written to the standard input of a gpg process,
/// since generation blocks and passphrase transcripts contain secrets.
///
/// # Example
///
/// ```
/// use gnupg_keyring::secure_memory::SecureBytes;
///
/// let mut input = SecureBytes::new(b"passwd\n");
/// input.extend_from_slice(b"old secret\n");
/// assert_eq!(input.len(), 18);
///
/// // When `input` goes out of scope, memory is securely zeroed
/// ```
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes {
    bytes: Vec<u8>,
}

impl SecureBytes {
    /// Create a new SecureBytes holding a copy of `data`
    pub fn new(data: &[u8]) -> Self {
        Self {
            bytes: data.to_vec(),
        }
    }

    /// Create an empty SecureBytes with pre-allocated capacity
    ///
    /// Pre-allocating matters here: growing a `Vec` reallocates and leaves
    /// the old, unzeroed allocation behind.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Get a reference to the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Append data to the end of the buffer
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Clear the buffer, securely zeroing all data
    pub fn clear(&mut self) {
        self.bytes.zeroize();
        self.bytes.clear();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes the buffer can hold before it has to reallocate
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

impl From<&str> for SecureBytes {
    fn from(data: &str) -> Self {
        Self::new(data.as_bytes())
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// A passphrase protecting a secret key.
///
/// Zeroed on drop and redacted in `Debug` output so it cannot leak through
/// logs or error messages.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase {
    secret: String,
}

impl Passphrase {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Expose the passphrase text, e.g. to write it into a batch block
    pub fn expose(&self) -> &str {
        &self.secret
    }

    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

impl From<&str> for Passphrase {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for Passphrase {
    fn from(secret: String) -> Self {
        Self { secret }
    }
}
