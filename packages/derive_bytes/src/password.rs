//! Text password encoding
//!
//! The legacy derivation hashes passwords as 7-bit ASCII. Text passwords are
//! either transcoded the way the legacy encoder does it (every non-ASCII
//! character becomes one `?`) or rejected outright.

use crate::{DeriveBytesError, Result};
use zeroize::Zeroizing;

/// Byte substituted for each character outside the ASCII range
pub const REPLACEMENT_BYTE: u8 = b'?';

/// How non-ASCII characters in a text password are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AsciiPolicy {
    /// Replace each non-ASCII character with `?`, as the legacy encoder does
    #[default]
    Lossy,
    /// Reject passwords containing non-ASCII characters
    Strict,
}

impl AsciiPolicy {
    /// Encode `password` to ASCII bytes under this policy.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` under `Strict` when the
    /// password contains a non-ASCII character.
    pub fn encode(self, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            Self::Lossy => Ok(encode_ascii_lossy(password)),
            Self::Strict => encode_ascii_strict(password),
        }
    }
}

/// Encode `password` as ASCII, substituting `?` for each non-ASCII char.
#[must_use]
pub fn encode_ascii_lossy(password: &str) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(Vec::with_capacity(password.len()));
    bytes.extend(password.chars().map(|c| {
        if c.is_ascii() {
            c as u8
        } else {
            REPLACEMENT_BYTE
        }
    }));
    bytes
}

/// Encode `password` as ASCII, rejecting any non-ASCII char.
///
/// # Errors
///
/// Returns `DeriveBytesError::Configuration` naming the byte offset of the
/// first non-ASCII character.
pub fn encode_ascii_strict(password: &str) -> Result<Zeroizing<Vec<u8>>> {
    if let Some((offset, _)) = password.char_indices().find(|(_, c)| !c.is_ascii()) {
        return Err(DeriveBytesError::configuration(format!(
            "Password contains a non-ASCII character at byte offset {offset}"
        )));
    }
    Ok(Zeroizing::new(password.as_bytes().to_vec()))
}
