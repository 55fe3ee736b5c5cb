//! # Cryypt Legacy Password Derive Bytes
//!
//! Bit-exact reproduction of the legacy `PasswordDeriveBytes` key derivation:
//! a PBKDF1-style iterated hash, extended past one digest width with
//! counter-prefixed blocks, plus the historical splice between the first two
//! requests that legacy key + IV derivation relied on.
//!
//! This is a compatibility primitive for reading data protected by older
//! systems. New designs should use PBKDF2, Argon2 or HKDF instead.
//!
//! ## Quick Start
//!
//! ```rust
//! use cryypt_derive_bytes::PasswordDeriveBytes;
//!
//! # fn main() -> Result<(), cryypt_derive_bytes::DeriveBytesError> {
//! let salt = vec![1, 2, 3, 4, 5, 6, 7, 8];
//! let mut pdb = PasswordDeriveBytes::new("password", Some(salt))?;
//!
//! let key = pdb.get_bytes(16)?;
//! let iv = pdb.get_bytes(16)?;
//! assert_eq!(key.len(), 16);
//! assert_eq!(iv.len(), 16);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod builder;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod password;

// Re-export core types
pub use algorithm::HashAlgorithm;
pub use builder::DeriveBytesBuilder;
pub use chain::{ChainCursor, MAX_CHAIN_BLOCKS};
pub use config::DeriveBytesConfig;
pub use engine::{DerivedKeyMaterial, PasswordDeriveBytes, Phase};
pub use error::{DeriveBytesError, Result};
pub use password::AsciiPolicy;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AsciiPolicy, DeriveBytesBuilder, DeriveBytesConfig, DeriveBytesError, HashAlgorithm,
        PasswordDeriveBytes, Phase, Result,
    };
}
