//! The `Json` codec stores human-readable documents, like the chain configuration,
//! in the same form operators author them.

use crate::codec::{
    Decode,
    Encode,
};
use std::borrow::Cow;

/// The codec serializes values with `serde_json`.
pub struct Json;

impl<T> Encode<T> for Json
where
    T: ?Sized + serde::Serialize,
{
    type Encoder<'a> = Cow<'a, [u8]> where T: 'a;

    fn encode(value: &T) -> Self::Encoder<'_> {
        Cow::Owned(serde_json::to_vec(value).expect(
            "It should be impossible to fail because our types don't use maps with non-string keys.",
        ))
    }
}

impl<T> Decode<T> for Json
where
    T: serde::de::DeserializeOwned,
{
    fn decode(bytes: &[u8]) -> anyhow::Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
