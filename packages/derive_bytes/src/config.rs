//! Derivation parameters as a serializable document

use crate::algorithm::{DEFAULT_HASH_NAME, HashAlgorithm};
use crate::{DeriveBytesError, Result};
use serde::{Deserialize, Serialize};

/// Iteration count used when none is configured
pub const DEFAULT_ITERATIONS: u32 = 100;

/// Parameters for a [`PasswordDeriveBytes`](crate::PasswordDeriveBytes) engine
///
/// The password is deliberately not part of the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveBytesConfig {
    /// Digest name, e.g. `SHA-1` or `SHA256`
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,
    /// Iteration count, at least 1
    #[serde(default = "default_iteration_count")]
    pub iteration_count: u32,
    /// Hex-encoded salt; absent means the unsalted initial hash
    #[serde(default)]
    pub salt: Option<String>,
}

fn default_hash_algorithm() -> String {
    DEFAULT_HASH_NAME.to_string()
}

fn default_iteration_count() -> u32 {
    DEFAULT_ITERATIONS
}

impl Default for DeriveBytesConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: default_hash_algorithm(),
            iteration_count: default_iteration_count(),
            salt: None,
        }
    }
}

impl DeriveBytesConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Serialization` for malformed JSON and
    /// `DeriveBytesError::Configuration` if [`validate`](Self::validate) fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set the salt from raw bytes
    #[must_use]
    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = Some(hex::encode(salt));
        self
    }

    /// Resolve the configured digest.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` for an unknown name.
    pub fn algorithm(&self) -> Result<HashAlgorithm> {
        HashAlgorithm::from_name(&self.hash_algorithm)
    }

    /// Decode the salt.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` if the salt is not valid hex.
    pub fn salt_bytes(&self) -> Result<Option<Vec<u8>>> {
        self.salt
            .as_deref()
            .map(|s| {
                hex::decode(s).map_err(|e| {
                    DeriveBytesError::configuration(format!("Salt is not valid hex: {e}"))
                })
            })
            .transpose()
    }

    /// Check every field without building an engine.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` for an unknown algorithm, an
    /// iteration count of 0, or a malformed salt.
    pub fn validate(&self) -> Result<()> {
        self.algorithm()?;
        if self.iteration_count < 1 {
            return Err(DeriveBytesError::configuration(
                "Iteration count must be greater than 0",
            ));
        }
        self.salt_bytes()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_legacy_defaults() {
        let config = DeriveBytesConfig::from_json("{}").ok();
        assert_eq!(config, Some(DeriveBytesConfig::default()));

        let config = DeriveBytesConfig::default();
        assert_eq!(config.hash_algorithm, "SHA-1");
        assert_eq!(config.iteration_count, 100);
        assert_eq!(config.salt, None);
    }

    #[test]
    fn hex_salt_decodes() {
        let config = DeriveBytesConfig::from_json(
            r#"{"hash_algorithm":"SHA256","iteration_count":1000,"salt":"0102030405060708"}"#,
        );
        let config = config.ok();
        assert_eq!(
            config.as_ref().and_then(|c| c.salt_bytes().ok()).flatten(),
            Some(vec![1, 2, 3, 4, 5, 6, 7, 8])
        );
        assert_eq!(
            config.and_then(|c| c.algorithm().ok()),
            Some(HashAlgorithm::Sha256)
        );
    }

    #[test]
    fn invalid_documents_are_rejected() {
        assert!(matches!(
            DeriveBytesConfig::from_json(r#"{"hash_algorithm":"ROT13"}"#),
            Err(DeriveBytesError::Configuration(_))
        ));
        assert!(matches!(
            DeriveBytesConfig::from_json(r#"{"iteration_count":0}"#),
            Err(DeriveBytesError::Configuration(_))
        ));
        assert!(matches!(
            DeriveBytesConfig::from_json(r#"{"salt":"zz"}"#),
            Err(DeriveBytesError::Configuration(_))
        ));
        assert!(matches!(
            DeriveBytesConfig::from_json(r#"{"iteration_count":-5}"#),
            Err(DeriveBytesError::Serialization(_))
        ));
    }

    #[test]
    fn json_round_trip_keeps_salt() {
        let config = DeriveBytesConfig::default().with_salt(&[0xde, 0xad]);
        let json = config.to_json().ok();
        assert!(json.as_deref().is_some_and(|j| j.contains("\"dead\"")));
        let parsed = json.and_then(|j| DeriveBytesConfig::from_json(&j).ok());
        assert_eq!(parsed, Some(config));
    }
}
