//! Core derivation engine
//!
//! [`PasswordDeriveBytes`] reproduces the legacy `PasswordDeriveBytes` byte
//! stream exactly, quirks included:
//!
//! - the seed is hashed `max(1, iterations - 1) - 1` times on top of the
//!   initial `H(password || salt)`, so iteration counts 1 and 2 agree
//! - the stream extends past one digest through counter-prefixed blocks
//!   (see [`chain`](crate::chain))
//! - the second request after a reset has a prefix spliced in from the
//!   boundary with the first request, emulating the legacy key + IV overlap
//!
//! The engine is not internally synchronized. Every mutating operation takes
//! `&mut self`; share an instance across threads only behind a lock.

use crate::algorithm::{DEFAULT_HASH_NAME, HashAlgorithm};
use crate::builder::DeriveBytesBuilder;
use crate::chain::{ChainCursor, MAX_CHAIN_BLOCKS};
use crate::config::{DEFAULT_ITERATIONS, DeriveBytesConfig};
use crate::password::encode_ascii_lossy;
use crate::{DeriveBytesError, Result};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Width the legacy splice assumes for a key-or-IV request, regardless of digest
const LEGACY_SPLICE_WIDTH: usize = 20;

/// Where the engine stands in the legacy two-request sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing derived since construction or the last reset
    #[default]
    Uninitialized,
    /// One request served; the next one may be spliced
    FirstChunkEmitted,
    /// Two or more requests served; no further splicing
    SecondChunkEmitted,
}

/// Stateful legacy password-based byte generator
pub struct PasswordDeriveBytes {
    password: Zeroizing<Vec<u8>>,
    salt: Option<Zeroizing<Vec<u8>>>,
    hash_name: String,
    algorithm: HashAlgorithm,
    iterations: u32,

    phase: Phase,
    initial: Zeroizing<Vec<u8>>,
    seed: Option<Zeroizing<Vec<u8>>>,
    cursor: ChainCursor,
    pending_skip: usize,
    first_chunk: Zeroizing<Vec<u8>>,
}

impl PasswordDeriveBytes {
    /// Create an engine using SHA-1 and 100 iterations.
    ///
    /// # Errors
    ///
    /// Infallible for the defaults; the `Result` matches the other constructors.
    pub fn new(password: impl Into<Vec<u8>>, salt: Option<Vec<u8>>) -> Result<Self> {
        Self::with_params(password, salt, DEFAULT_HASH_NAME, DEFAULT_ITERATIONS)
    }

    /// Create an engine with an explicit hash algorithm and iteration count.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` if `hash_name` is unknown or
    /// `iterations` is 0.
    pub fn with_params(
        password: impl Into<Vec<u8>>,
        salt: Option<Vec<u8>>,
        hash_name: &str,
        iterations: u32,
    ) -> Result<Self> {
        Self::prepare(Zeroizing::new(password.into()), salt, hash_name, iterations)
    }

    /// Create an engine from a text password using SHA-1 and 100 iterations.
    ///
    /// Non-ASCII characters are encoded as `?`, as the legacy API does.
    ///
    /// # Errors
    ///
    /// Infallible for the defaults; the `Result` matches the other constructors.
    pub fn from_text(password: &str, salt: Option<Vec<u8>>) -> Result<Self> {
        Self::from_text_with_params(password, salt, DEFAULT_HASH_NAME, DEFAULT_ITERATIONS)
    }

    /// Create an engine from a text password with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` if `hash_name` is unknown or
    /// `iterations` is 0.
    pub fn from_text_with_params(
        password: &str,
        salt: Option<Vec<u8>>,
        hash_name: &str,
        iterations: u32,
    ) -> Result<Self> {
        Self::prepare(encode_ascii_lossy(password), salt, hash_name, iterations)
    }

    /// Create an engine from a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Configuration` if the document names an
    /// unknown algorithm, has an iteration count of 0, or a malformed salt.
    pub fn from_config(password: impl Into<Vec<u8>>, config: &DeriveBytesConfig) -> Result<Self> {
        Self::prepare(
            Zeroizing::new(password.into()),
            config.salt_bytes()?,
            &config.hash_algorithm,
            config.iteration_count,
        )
    }

    /// Start a builder
    #[must_use]
    pub fn builder() -> DeriveBytesBuilder {
        DeriveBytesBuilder::new()
    }

    pub(crate) fn prepare(
        password: Zeroizing<Vec<u8>>,
        salt: Option<Vec<u8>>,
        hash_name: &str,
        iterations: u32,
    ) -> Result<Self> {
        let algorithm = HashAlgorithm::from_name(hash_name)?;
        validate_iterations(iterations)?;

        Ok(Self {
            password,
            salt: salt.map(Zeroizing::new),
            hash_name: hash_name.to_string(),
            algorithm,
            iterations,
            phase: Phase::Uninitialized,
            initial: Zeroizing::new(Vec::new()),
            seed: None,
            cursor: ChainCursor::new(),
            pending_skip: 0,
            first_chunk: Zeroizing::new(Vec::new()),
        })
    }

    /// Current salt, if any
    #[must_use]
    pub fn salt(&self) -> Option<&[u8]> {
        self.salt.as_ref().map(|s| s.as_slice())
    }

    /// Replace the salt.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::State` once bytes have been derived.
    pub fn set_salt(&mut self, salt: Option<Vec<u8>>) -> Result<()> {
        self.ensure_configurable("salt")?;
        self.salt = salt.map(Zeroizing::new);
        Ok(())
    }

    /// Hash algorithm name as it was configured
    #[must_use]
    pub fn hash_algorithm(&self) -> &str {
        &self.hash_name
    }

    /// Resolved hash algorithm
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Replace the hash algorithm.
    ///
    /// An unknown name leaves the current algorithm in place.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::State` once bytes have been derived and
    /// `DeriveBytesError::Configuration` for an unknown name.
    pub fn set_hash_algorithm(&mut self, hash_name: &str) -> Result<()> {
        self.ensure_configurable("hash algorithm")?;
        let algorithm = HashAlgorithm::from_name(hash_name).inspect_err(|_| {
            tracing::warn!(hash_name, "Rejected unknown hash algorithm");
        })?;
        self.algorithm = algorithm;
        self.hash_name = hash_name.to_string();
        Ok(())
    }

    /// Iteration count
    #[must_use]
    pub fn iteration_count(&self) -> u32 {
        self.iterations
    }

    /// Replace the iteration count.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::State` once bytes have been derived and
    /// `DeriveBytesError::Configuration` for 0.
    pub fn set_iteration_count(&mut self, iterations: u32) -> Result<()> {
        self.ensure_configurable("iteration count")?;
        validate_iterations(iterations)?;
        self.iterations = iterations;
        Ok(())
    }

    /// Current phase of the two-request sequence
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Output width of the configured digest
    #[must_use]
    pub fn digest_len(&self) -> usize {
        self.algorithm.digest_len()
    }

    /// Position of the next byte in the chain
    #[must_use]
    pub fn cursor(&self) -> ChainCursor {
        self.cursor
    }

    /// Restart the stream from the beginning.
    ///
    /// Recomputes the initial hash from the current parameters and unlocks
    /// them for modification until the next [`get_bytes`](Self::get_bytes).
    pub fn reset(&mut self) {
        self.phase = Phase::Uninitialized;
        self.cursor = ChainCursor::new();
        self.pending_skip = 0;
        self.seed = None;
        self.first_chunk.zeroize();

        let initial = match &self.salt {
            Some(salt) => self
                .algorithm
                .digest(&[self.password.as_slice(), salt.as_slice()]),
            None => self.algorithm.digest(&[self.password.as_slice()]),
        };
        self.initial = Zeroizing::new(initial);

        tracing::debug!(
            algorithm = %self.algorithm,
            iterations = self.iterations,
            salted = self.salt.is_some(),
            "Derivation state reset"
        );
    }

    /// Derive the next `count` bytes of the stream.
    ///
    /// The first request after construction or [`reset`](Self::reset)
    /// recomputes the initial hash and locks the parameters. The request
    /// after that receives the legacy splice. On error nothing is returned
    /// and the stream position is unchanged.
    ///
    /// A second request shorter than the splice gets only the bytes that
    /// fit. The legacy implementation threw on such sequences, so no
    /// stored key material depends on them.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Range` if `count` is 0 and
    /// `DeriveBytesError::DerivationOverflow` if the request runs past the
    /// last chain block.
    pub fn get_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        if count < 1 {
            return Err(DeriveBytesError::Range { requested: count });
        }

        if self.phase == Phase::Uninitialized {
            self.reset();
        }

        let available = self.cursor.remaining(self.algorithm.digest_len());
        if count > available {
            tracing::warn!(
                count,
                available,
                counter = self.cursor.counter(),
                "Derivation request exceeds the chain ceiling"
            );
            return Err(DeriveBytesError::DerivationOverflow {
                counter: MAX_CHAIN_BLOCKS,
            });
        }

        let seed: &[u8] = self
            .seed
            .get_or_insert_with(|| harden_seed(self.algorithm, &self.initial, self.iterations));

        let mut out = vec![0u8; count];
        let mut cursor = self.cursor;
        cursor.fill(self.algorithm, seed, &mut out)?;
        self.cursor = cursor;

        match self.phase {
            Phase::Uninitialized => {
                self.pending_skip = legacy_skip(count);
                self.first_chunk = Zeroizing::new(out.clone());
                self.phase = Phase::FirstChunkEmitted;
                tracing::debug!(count, pending_skip = self.pending_skip, "First chunk recorded");
            }
            Phase::FirstChunkEmitted => {
                if self.pending_skip > 0 {
                    self.splice(&mut out);
                    self.pending_skip = 0;
                }
                self.first_chunk.zeroize();
                self.phase = Phase::SecondChunkEmitted;
            }
            Phase::SecondChunkEmitted => {}
        }

        Ok(out)
    }

    /// Derive a key and an IV the way legacy callers did: reset, then two
    /// consecutive requests sharing one stream.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::Range` if either length is 0 and
    /// `DeriveBytesError::DerivationOverflow` if the pair runs past the
    /// last chain block.
    pub fn derive_key_iv(&mut self, key_len: usize, iv_len: usize) -> Result<DerivedKeyMaterial> {
        for requested in [key_len, iv_len] {
            if requested < 1 {
                return Err(DeriveBytesError::Range { requested });
            }
        }

        self.reset();
        let key = self.get_bytes(key_len)?;
        let iv = self.get_bytes(iv_len)?;
        Ok(DerivedKeyMaterial { key, iv })
    }

    fn ensure_configurable(&self, property: &str) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            tracing::warn!(property, phase = ?self.phase, "Rejected parameter change");
            return Err(DeriveBytesError::state(format!(
                "Can't change the {property} once derivation has started"
            )));
        }
        Ok(())
    }

    // Overwrite the head of the second chunk with bytes from the boundary
    // between the first and second chunks.
    fn splice(&self, out: &mut [u8]) {
        let skip = self.pending_skip;
        let mut combined = Zeroizing::new(Vec::with_capacity(self.first_chunk.len() + out.len()));
        combined.extend_from_slice(&self.first_chunk);
        combined.extend_from_slice(out);

        let spliced = skip.min(out.len()).min(combined.len().saturating_sub(skip));
        if spliced < skip {
            tracing::warn!(
                pending_skip = skip,
                spliced,
                "Second request too short for the full splice"
            );
        }
        if spliced > 0 {
            out[..spliced].copy_from_slice(&combined[skip..skip + spliced]);
        }
        tracing::debug!(spliced, "Second chunk spliced");
    }
}

impl fmt::Debug for PasswordDeriveBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDeriveBytes")
            .field("hash_algorithm", &self.hash_name)
            .field("iterations", &self.iterations)
            .field("salted", &self.salt.is_some())
            .field("phase", &self.phase)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Key and IV derived from one stream
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeyMaterial {
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl DerivedKeyMaterial {
    /// Key bytes
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// IV bytes
    #[must_use]
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }
}

impl fmt::Debug for DerivedKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKeyMaterial")
            .field("key_len", &self.key.len())
            .field("iv_len", &self.iv.len())
            .finish()
    }
}

fn validate_iterations(iterations: u32) -> Result<()> {
    if iterations < 1 {
        return Err(DeriveBytesError::configuration(
            "Iteration count must be greater than 0",
        ));
    }
    Ok(())
}

// The initial hash counts as one application; legacy arithmetic then
// subtracts one more.
fn seed_rounds(iterations: u32) -> u32 {
    iterations.saturating_sub(1).max(1) - 1
}

fn harden_seed(algorithm: HashAlgorithm, initial: &[u8], iterations: u32) -> Zeroizing<Vec<u8>> {
    let mut seed = Zeroizing::new(initial.to_vec());
    for _ in 0..seed_rounds(iterations) {
        seed = Zeroizing::new(algorithm.digest(&[seed.as_slice()]));
    }
    seed
}

fn legacy_skip(first_count: usize) -> usize {
    let span = if first_count > LEGACY_SPLICE_WIDTH {
        2 * LEGACY_SPLICE_WIDTH
    } else {
        LEGACY_SPLICE_WIDTH
    };
    span.saturating_sub(first_count)
}
