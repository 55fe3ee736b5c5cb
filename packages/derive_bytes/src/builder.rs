//! Builder for [`PasswordDeriveBytes`]
//!
//! Explicit setters take precedence over a supplied [`DeriveBytesConfig`],
//! which takes precedence over the legacy defaults (SHA-1, 100 iterations,
//! no salt).

use crate::algorithm::DEFAULT_HASH_NAME;
use crate::config::{DEFAULT_ITERATIONS, DeriveBytesConfig};
use crate::password::AsciiPolicy;
use crate::{DeriveBytesError, PasswordDeriveBytes, Result};
use zeroize::Zeroizing;

enum PasswordSource {
    Bytes(Zeroizing<Vec<u8>>),
    Text(Zeroizing<String>),
}

/// Builder for a derivation engine
#[derive(Default)]
pub struct DeriveBytesBuilder {
    password: Option<PasswordSource>,
    ascii_policy: AsciiPolicy,
    salt: Option<Vec<u8>>,
    hash_name: Option<String>,
    iterations: Option<u32>,
    config: Option<DeriveBytesConfig>,
}

impl DeriveBytesBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use raw password bytes
    #[must_use]
    pub fn password(mut self, password: impl Into<Vec<u8>>) -> Self {
        self.password = Some(PasswordSource::Bytes(Zeroizing::new(password.into())));
        self
    }

    /// Use a text password, encoded to ASCII under the builder's policy
    #[must_use]
    pub fn text_password(mut self, password: &str) -> Self {
        self.password = Some(PasswordSource::Text(Zeroizing::new(password.to_string())));
        self
    }

    /// How non-ASCII text passwords are handled (default: lossy)
    #[must_use]
    pub fn ascii_policy(mut self, policy: AsciiPolicy) -> Self {
        self.ascii_policy = policy;
        self
    }

    /// Set the salt
    #[must_use]
    pub fn salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Set the hash algorithm by name
    #[must_use]
    pub fn hash_algorithm(mut self, hash_name: impl Into<String>) -> Self {
        self.hash_name = Some(hash_name.into());
        self
    }

    /// Set the iteration count
    #[must_use]
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Take unset parameters from a configuration document
    #[must_use]
    pub fn config(mut self, config: DeriveBytesConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` if no password was given,
    /// a text password violates the strict ASCII policy, the algorithm name
    /// is unknown, the iteration count is 0, or the configured salt is not
    /// valid hex.
    pub fn build(self) -> Result<PasswordDeriveBytes> {
        let password = match self.password {
            Some(PasswordSource::Bytes(bytes)) => bytes,
            Some(PasswordSource::Text(text)) => self.ascii_policy.encode(&text)?,
            None => return Err(DeriveBytesError::configuration("Password must not be absent")),
        };

        let config_salt = match &self.config {
            Some(config) => config.salt_bytes()?,
            None => None,
        };
        let salt = self.salt.or(config_salt);

        let hash_name = self
            .hash_name
            .or_else(|| self.config.as_ref().map(|c| c.hash_algorithm.clone()))
            .unwrap_or_else(|| DEFAULT_HASH_NAME.to_string());

        let iterations = self
            .iterations
            .or_else(|| self.config.as_ref().map(|c| c.iteration_count))
            .unwrap_or(DEFAULT_ITERATIONS);

        PasswordDeriveBytes::prepare(password, salt, &hash_name, iterations)
    }
}
