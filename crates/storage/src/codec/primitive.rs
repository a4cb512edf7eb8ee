//! Fixed-width big-endian integers. Big-endian keeps the byte order of encoded
//! heights equal to their numeric order.

use crate::codec::{
    Decode,
    Encode,
};
use comb_core_types::{
    BlockHeight,
    U256,
};

/// Encodes a number as exactly `SIZE` big-endian bytes.
pub struct Primitive<const SIZE: usize>;

macro_rules! big_endian {
    ($($ty:ty => $size:literal),* $(,)?) => {
        $(
            impl Encode<$ty> for Primitive<$size> {
                type Encoder<'a> = [u8; $size];

                fn encode(t: &$ty) -> Self::Encoder<'_> {
                    t.to_be_bytes()
                }
            }

            impl Decode<$ty> for Primitive<$size> {
                fn decode(bytes: &[u8]) -> anyhow::Result<$ty> {
                    Ok(<$ty>::from_be_bytes(<[u8; $size]>::try_from(bytes)?))
                }
            }
        )*
    };
}

big_endian! {
    u64 => 8,
    BlockHeight => 8,
}

impl Encode<U256> for Primitive<32> {
    type Encoder<'a> = [u8; 32];

    fn encode(t: &U256) -> Self::Encoder<'_> {
        let mut bytes = [0u8; 32];
        t.to_big_endian(&mut bytes);
        bytes
    }
}

impl Decode<U256> for Primitive<32> {
    fn decode(bytes: &[u8]) -> anyhow::Result<U256> {
        Ok(U256::from_big_endian(&<[u8; 32]>::try_from(bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_height_is_big_endian_so_keys_sort_by_height() {
        let low = Primitive::<8>::encode(&BlockHeight::new(1));
        let high = Primitive::<8>::encode(&BlockHeight::new(256));
        assert!(low < high);
        let decoded: BlockHeight = Primitive::<8>::decode(&high).unwrap();
        assert_eq!(decoded, BlockHeight::new(256));
    }

    #[test]
    fn decode_rejects_wrong_width() {
        let result: anyhow::Result<u64> = Primitive::<8>::decode(&[0u8; 4]);
        assert!(result.is_err());
    }
}
