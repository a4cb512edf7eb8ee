//! Compact binary encoding of serde types, used for blocks, receipts and accounts.

use crate::codec::{
    Decode,
    Encode,
};
use std::borrow::Cow;

/// Encodes values with `postcard`.
pub struct Postcard;

impl<T> Encode<T> for Postcard
where
    T: ?Sized + serde::Serialize,
{
    type Encoder<'a> = Cow<'a, [u8]> where T: 'a;

    fn encode(value: &T) -> Self::Encoder<'_> {
        Cow::Owned(
            postcard::to_allocvec(value)
                .expect("postcard serialization of stored types can't fail"),
        )
    }
}

impl<T> Decode<T> for Postcard
where
    T: serde::de::DeserializeOwned,
{
    fn decode(bytes: &[u8]) -> anyhow::Result<T> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comb_core_types::{
        entities::account::Account,
        U256,
    };

    #[test]
    fn account_survives_storage() {
        let account = Account {
            balance: U256::from(1_000u64),
            nonce: 3,
            ..Default::default()
        };
        let value = Postcard::encode_as_value(&account);
        let decoded: Account = Postcard::decode_from_value(value).unwrap();
        assert_eq!(decoded, account);
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let bytes = Postcard::encode_as_value(&Account::default());
        let truncated = &bytes[..1];
        assert!(<Postcard as Decode<Account>>::decode(truncated).is_err());
    }
}
