//! How table keys and values turn into bytes.
//!
//! Every [`crate::tables::Table`] names one codec for its key and one for its value.
//! Key codecs must be deterministic: equal keys give equal bytes.

use crate::kv_store::Value;
use std::borrow::Cow;

pub mod json;
pub mod postcard;
pub mod primitive;
pub mod raw;

/// Encoded bytes, either borrowed from the source or owned.
pub trait Encoder {
    /// The encoded bytes.
    fn as_bytes(&self) -> Cow<[u8]>;
}

/// Turns a `T` into bytes.
pub trait Encode<T: ?Sized> {
    /// The holder of the encoded bytes. Fixed-width types use arrays, so encoding
    /// a height or a word doesn't allocate.
    type Encoder<'a>: Encoder
    where
        T: 'a;

    /// Encodes `t`.
    fn encode(t: &T) -> Self::Encoder<'_>;

    /// Encodes `t` into an owned [`Value`] ready to be stored.
    fn encode_as_value(t: &T) -> Value {
        Value::new(Self::encode(t).as_bytes().into_owned())
    }
}

/// Restores a `T` from bytes.
pub trait Decode<T> {
    /// Decodes `bytes`, failing if they aren't exactly one encoded `T`.
    fn decode(bytes: &[u8]) -> anyhow::Result<T>;

    /// Decodes a stored [`Value`].
    fn decode_from_value(value: Value) -> anyhow::Result<T> {
        Self::decode(value.as_slice())
    }
}

impl<'a> Encoder for Cow<'a, [u8]> {
    fn as_bytes(&self) -> Cow<[u8]> {
        Cow::Borrowed(self.as_ref())
    }
}

impl<const SIZE: usize> Encoder for [u8; SIZE] {
    fn as_bytes(&self) -> Cow<[u8]> {
        Cow::Borrowed(self.as_slice())
    }
}
