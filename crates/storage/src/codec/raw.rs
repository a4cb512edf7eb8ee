//! Values that already are bytes: hashes, addresses, contract code.

use crate::codec::{
    Decode,
    Encode,
};
use std::borrow::Cow;

/// Stores the bytes as they are.
pub struct Raw;

impl<T> Encode<T> for Raw
where
    T: ?Sized + AsRef<[u8]>,
{
    type Encoder<'a> = Cow<'a, [u8]> where T: 'a;

    fn encode(t: &T) -> Self::Encoder<'_> {
        Cow::Borrowed(t.as_ref())
    }
}

impl<T> Decode<T> for Raw
where
    for<'a> T: TryFrom<&'a [u8]>,
{
    fn decode(bytes: &[u8]) -> anyhow::Result<T> {
        T::try_from(bytes).map_err(|_| {
            anyhow::anyhow!(
                "{} bytes don't form a `{}`",
                bytes.len(),
                core::any::type_name::<T>()
            )
        })
    }
}
