//! Hashing primitives shared by the header, state root and key-image derivation.

use crate::Bytes32;
use sha2::{
    Digest,
    Sha256,
};

/// Standard hasher of the chain: SHA-256.
#[derive(Debug, Default, Clone)]
pub struct Hasher(Sha256);

impl Hasher {
    /// Length of the produced digest.
    pub const OUTPUT_LEN: usize = Bytes32::LEN;

    /// Appends data to the hash state.
    pub fn input<B: AsRef<[u8]>>(&mut self, data: B) {
        self.0.update(data)
    }

    /// Consumes the hasher, appends data and returns it.
    pub fn chain<B: AsRef<[u8]>>(self, data: B) -> Self {
        Self(self.0.chain_update(data))
    }

    /// Appends every item of the iterator to the hash state.
    pub fn extend_chain<B, I>(mut self, iter: I) -> Self
    where
        B: AsRef<[u8]>,
        I: IntoIterator<Item = B>,
    {
        iter.into_iter().for_each(|b| self.input(b));
        self
    }

    /// Finalizes the hash, consuming the hasher.
    pub fn finalize(self) -> Bytes32 {
        let mut digest = [0u8; Bytes32::LEN];
        digest.copy_from_slice(&self.0.finalize());
        digest.into()
    }

    /// Hashes the data in one call.
    pub fn hash<B: AsRef<[u8]>>(data: B) -> Bytes32 {
        let mut hasher = Self::default();
        hasher.input(data);
        hasher.finalize()
    }
}
