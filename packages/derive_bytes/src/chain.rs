//! Hash-chain expansion
//!
//! The derived stream is the concatenation of chain blocks computed from the
//! iteration-hardened seed:
//!
//! - block 0 is `H(seed)`
//! - block `n` (1..=999) is `H(decimal(n) || seed)`, the counter written as
//!   unpadded ASCII digits
//!
//! A [`ChainCursor`] tracks which block is current and how many of its bytes
//! have been handed out already.

use crate::{DeriveBytesError, HashAlgorithm, Result};
use zeroize::Zeroizing;

/// Ceiling on the chain counter; block `MAX_CHAIN_BLOCKS` is never produced
pub const MAX_CHAIN_BLOCKS: u32 = 1000;

/// Read position within the derived stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainCursor {
    counter: u32,
    position: usize,
}

impl ChainCursor {
    /// Cursor at the start of the stream
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the block the next byte comes from
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Bytes of the current block already consumed
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes the chain can still produce from this position.
    #[must_use]
    pub fn remaining(&self, digest_len: usize) -> usize {
        let blocks = MAX_CHAIN_BLOCKS.saturating_sub(self.counter) as usize;
        blocks
            .saturating_mul(digest_len)
            .saturating_sub(self.position)
    }

    /// Compute the block at the current counter.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::DerivationOverflow` once the counter has
    /// reached [`MAX_CHAIN_BLOCKS`].
    pub fn block(&self, algorithm: HashAlgorithm, seed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let block = match self.counter {
            0 => algorithm.digest(&[seed]),
            n if n < MAX_CHAIN_BLOCKS => {
                let prefix = n.to_string();
                algorithm.digest(&[prefix.as_bytes(), seed])
            }
            n => return Err(DeriveBytesError::DerivationOverflow { counter: n }),
        };
        tracing::trace!(counter = self.counter, "Chain block computed");
        Ok(Zeroizing::new(block))
    }

    /// Fill `out` from the stream and advance past the bytes written.
    ///
    /// On error the cursor may have advanced part of the way; callers that
    /// need all-or-nothing semantics should fill a copy and commit it.
    ///
    /// # Errors
    ///
    /// Returns `DeriveBytesError::DerivationOverflow` if `out` reaches past
    /// the last block the chain can produce.
    pub fn fill(&mut self, algorithm: HashAlgorithm, seed: &[u8], out: &mut [u8]) -> Result<()> {
        let mut written = 0usize;

        while written < out.len() {
            let block = self.block(algorithm, seed)?;
            let take = (out.len() - written).min(block.len() - self.position);
            out[written..written + take]
                .copy_from_slice(&block[self.position..self.position + take]);

            written += take;
            self.position += take;
            while self.position >= block.len() {
                self.position -= block.len();
                self.counter += 1;
            }
        }

        Ok(())
    }
}
