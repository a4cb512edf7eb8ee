//! The location of a contract storage slot and its canonical byte encoding.
//!
//! The encoding is the owner identity as 20 raw bytes followed by the key as
//! variable-length bytes: a compact length prefix and then the key itself. The
//! prefix is one byte for lengths below `0xFD`, otherwise a marker byte
//! (`0xFD`, `0xFE`, `0xFF`) followed by the length as little-endian `u16`, `u32`
//! or `u64`. Only the shortest prefix is accepted when decoding, so every key has
//! exactly one encoding.

use crate::codec::{
    Decode,
    Encode,
};
use comb_core_types::Address;
use std::borrow::Cow;

const U16_MARKER: u8 = 0xFD;
const U32_MARKER: u8 = 0xFE;
const U64_MARKER: u8 = 0xFF;

/// The error returned when bytes are not a valid storage key encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input ends before the owner identity is complete.
    #[error("owner requires {expected} bytes, only {available} available")]
    TruncatedOwner {
        /// The width of the owner identity.
        expected: usize,
        /// The bytes left in the input.
        available: usize,
    },
    /// The length prefix of the key is missing or incomplete.
    #[error("the length prefix of the key is truncated")]
    TruncatedLength,
    /// The length prefix uses a wider form than the value needs.
    #[error("the length prefix `{0}` is not in the shortest form")]
    NonCanonicalLength(u64),
    /// The declared length of the key doesn't match the bytes that follow it.
    #[error("the key declares {declared} bytes, but {available} follow the prefix")]
    LengthMismatch {
        /// The length from the prefix.
        declared: u64,
        /// The bytes after the prefix.
        available: usize,
    },
}

/// Identifies one storage slot of one contract.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageKey {
    /// The code hash identity of the contract owning the slot.
    pub owner: Address,
    /// The key of the slot inside the contract's storage.
    pub key: Vec<u8>,
}

impl StorageKey {
    /// Creates the storage key.
    pub fn new(owner: Address, key: impl Into<Vec<u8>>) -> Self {
        Self {
            owner,
            key: key.into(),
        }
    }

    /// Serializes the key into its canonical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(
            Address::LEN
                .saturating_add(9)
                .saturating_add(self.key.len()),
        );
        bytes.extend_from_slice(self.owner.as_ref());
        write_var_bytes(&mut bytes, &self.key);
        bytes
    }

    /// Deserializes the key, rejecting any input that isn't exactly one encoded key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < Address::LEN {
            return Err(DecodeError::TruncatedOwner {
                expected: Address::LEN,
                available: bytes.len(),
            })
        }
        let (owner, rest) = bytes.split_at(Address::LEN);
        let owner = Address::try_from(owner).map_err(|_| DecodeError::TruncatedOwner {
            expected: Address::LEN,
            available: owner.len(),
        })?;
        let (key, rest) = read_var_bytes(rest)?;
        if !rest.is_empty() {
            return Err(DecodeError::LengthMismatch {
                declared: key.len() as u64,
                available: key.len().saturating_add(rest.len()),
            })
        }
        Ok(Self {
            owner,
            key: key.to_vec(),
        })
    }
}

/// Appends the compact length prefix and the bytes to `out`.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_var_uint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Reads one length-prefixed byte string and returns it with the remaining input.
pub fn read_var_bytes(input: &[u8]) -> Result<(&[u8], &[u8]), DecodeError> {
    let (declared, rest) = read_var_uint(input)?;
    match usize::try_from(declared) {
        Ok(len) if len <= rest.len() => Ok(rest.split_at(len)),
        _ => Err(DecodeError::LengthMismatch {
            declared,
            available: rest.len(),
        }),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn write_var_uint(out: &mut Vec<u8>, value: u64) {
    if value < u64::from(U16_MARKER) {
        out.push(value as u8);
    } else if value <= u64::from(u16::MAX) {
        out.push(U16_MARKER);
        out.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= u64::from(u32::MAX) {
        out.push(U32_MARKER);
        out.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        out.push(U64_MARKER);
        out.extend_from_slice(&value.to_le_bytes());
    }
}

fn read_var_uint(input: &[u8]) -> Result<(u64, &[u8]), DecodeError> {
    let (&marker, rest) = input.split_first().ok_or(DecodeError::TruncatedLength)?;
    let (value, rest, min) = match marker {
        U16_MARKER => {
            let (bytes, rest) = take::<2>(rest)?;
            (u64::from(u16::from_le_bytes(bytes)), rest, u64::from(U16_MARKER))
        }
        U32_MARKER => {
            let (bytes, rest) = take::<4>(rest)?;
            (
                u64::from(u32::from_le_bytes(bytes)),
                rest,
                u64::from(u16::MAX).saturating_add(1),
            )
        }
        U64_MARKER => {
            let (bytes, rest) = take::<8>(rest)?;
            (
                u64::from_le_bytes(bytes),
                rest,
                u64::from(u32::MAX).saturating_add(1),
            )
        }
        small => return Ok((u64::from(small), rest)),
    };
    if value < min {
        return Err(DecodeError::NonCanonicalLength(value))
    }
    Ok((value, rest))
}

fn take<const N: usize>(input: &[u8]) -> Result<([u8; N], &[u8]), DecodeError> {
    if input.len() < N {
        return Err(DecodeError::TruncatedLength)
    }
    let (head, rest) = input.split_at(N);
    let head = <[u8; N]>::try_from(head).map_err(|_| DecodeError::TruncatedLength)?;
    Ok((head, rest))
}

/// The codec of the [`StorageKey`] used by the `ContractsState` table.
pub struct StorageKeyCodec;

impl Encode<StorageKey> for StorageKeyCodec {
    type Encoder<'a> = Cow<'a, [u8]>;

    fn encode(t: &StorageKey) -> Self::Encoder<'_> {
        Cow::Owned(t.to_bytes())
    }
}

impl Decode<StorageKey> for StorageKeyCodec {
    fn decode(bytes: &[u8]) -> anyhow::Result<StorageKey> {
        Ok(StorageKey::from_bytes(bytes)?)
    }
}
