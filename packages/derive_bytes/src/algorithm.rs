//! Digest registry
//!
//! Resolves hash algorithm names the way the legacy platforms spell them
//! (`SHA-1`, `SHA1`, `SHA`, `MD5`, `SHA-256`, ...) and computes one-shot
//! digests over concatenated inputs.

use crate::{DeriveBytesError, Result};
use digest::Digest;
use std::fmt;
use std::str::FromStr;

/// Name used when no hash algorithm is configured
pub const DEFAULT_HASH_NAME: &str = "SHA-1";

/// Supported digest functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// MD5
    Md5,
    /// SHA-1
    #[default]
    Sha1,
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// SHA-512/224
    Sha512_224,
    /// SHA-512/256
    Sha512_256,
    /// SHA3-224
    Sha3_224,
    /// SHA3-256
    Sha3_256,
    /// SHA3-384
    Sha3_384,
    /// SHA3-512
    Sha3_512,
    /// BLAKE2b with 512-bit output
    Blake2b512,
    /// BLAKE2s with 256-bit output
    Blake2s256,
}

impl HashAlgorithm {
    /// Every supported algorithm, in declaration order
    pub const ALL: [HashAlgorithm; 14] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Blake2b512,
        Self::Blake2s256,
    ];

    /// Resolve an algorithm by name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` if the name does not match a
    /// supported digest.
    pub fn from_name(name: &str) -> Result<Self> {
        let algorithm = match name.trim().to_ascii_uppercase().as_str() {
            "MD5" => Self::Md5,
            "SHA-1" | "SHA1" | "SHA" => Self::Sha1,
            "SHA-224" | "SHA224" => Self::Sha224,
            "SHA-256" | "SHA256" => Self::Sha256,
            "SHA-384" | "SHA384" => Self::Sha384,
            "SHA-512" | "SHA512" => Self::Sha512,
            "SHA-512/224" | "SHA512/224" => Self::Sha512_224,
            "SHA-512/256" | "SHA512/256" => Self::Sha512_256,
            "SHA3-224" => Self::Sha3_224,
            "SHA3-256" => Self::Sha3_256,
            "SHA3-384" => Self::Sha3_384,
            "SHA3-512" => Self::Sha3_512,
            "BLAKE2B-512" | "BLAKE2B512" => Self::Blake2b512,
            "BLAKE2S-256" | "BLAKE2S256" => Self::Blake2s256,
            _ => {
                return Err(DeriveBytesError::configuration(format!(
                    "Unsupported hash algorithm: {name}"
                )));
            }
        };
        Ok(algorithm)
    }

    /// Canonical name of the algorithm
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
            Self::Sha512_224 => "SHA-512/224",
            Self::Sha512_256 => "SHA-512/256",
            Self::Sha3_224 => "SHA3-224",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_384 => "SHA3-384",
            Self::Sha3_512 => "SHA3-512",
            Self::Blake2b512 => "BLAKE2b-512",
            Self::Blake2s256 => "BLAKE2s-256",
        }
    }

    /// Returns the size of the digest in bytes.
    #[must_use]
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 | Self::Sha512_224 | Self::Sha3_224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 | Self::Blake2s256 => 32,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 | Self::Blake2b512 => 64,
        }
    }

    /// Hash the concatenation of `parts` in a single pass.
    #[must_use]
    pub fn digest(&self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Md5 => digest_parts::<md5::Md5>(parts),
            Self::Sha1 => digest_parts::<sha1::Sha1>(parts),
            Self::Sha224 => digest_parts::<sha2::Sha224>(parts),
            Self::Sha256 => digest_parts::<sha2::Sha256>(parts),
            Self::Sha384 => digest_parts::<sha2::Sha384>(parts),
            Self::Sha512 => digest_parts::<sha2::Sha512>(parts),
            Self::Sha512_224 => digest_parts::<sha2::Sha512_224>(parts),
            Self::Sha512_256 => digest_parts::<sha2::Sha512_256>(parts),
            Self::Sha3_224 => digest_parts::<sha3::Sha3_224>(parts),
            Self::Sha3_256 => digest_parts::<sha3::Sha3_256>(parts),
            Self::Sha3_384 => digest_parts::<sha3::Sha3_384>(parts),
            Self::Sha3_512 => digest_parts::<sha3::Sha3_512>(parts),
            Self::Blake2b512 => digest_parts::<blake2::Blake2b512>(parts),
            Self::Blake2s256 => digest_parts::<blake2::Blake2s256>(parts),
        }
    }
}

fn digest_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

impl FromStr for HashAlgorithm {
    type Err = DeriveBytesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
