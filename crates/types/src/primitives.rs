//! Fixed-width byte types and block heights.

use core::{
    fmt,
    ops::{
        Deref,
        DerefMut,
    },
    str::FromStr,
};

/// The error returned when a fixed-width type is parsed from text or bytes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The input is not valid hex.
    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// The input has a length different from the type's width.
    #[error("expected {expected} bytes, got {found}")]
    InvalidLength {
        /// The width of the type.
        expected: usize,
        /// The length of the decoded input.
        found: usize,
    },
}

macro_rules! key {
    ($i:ident, $s:expr) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        /// Fixed-width byte array rendered as `0x`-prefixed hex.
        pub struct $i([u8; $s]);

        impl $i {
            /// Memory length of the type.
            pub const LEN: usize = $s;

            /// Bytes constructor.
            pub const fn new(bytes: [u8; $s]) -> Self {
                Self(bytes)
            }

            /// Zeroes bytes constructor.
            pub const fn zeroed() -> Self {
                Self([0; $s])
            }

            /// Returns `true` if all bytes are zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// The inner bytes as a slice.
            pub fn as_slice(&self) -> &[u8] {
                &self.0
            }

            /// Builds the value from a slice of at most `LEN` bytes, padding on the left.
            pub fn from_slice_left_padded(bytes: &[u8]) -> Result<Self, ParseError> {
                if bytes.len() > $s {
                    return Err(ParseError::InvalidLength {
                        expected: $s,
                        found: bytes.len(),
                    })
                }
                let mut inner = [0u8; $s];
                let offset = Self::LEN.saturating_sub(bytes.len());
                inner[offset..].copy_from_slice(bytes);
                Ok(Self(inner))
            }
        }

        impl Deref for $i {
            type Target = [u8; $s];

            fn deref(&self) -> &[u8; $s] {
                &self.0
            }
        }

        impl DerefMut for $i {
            fn deref_mut(&mut self) -> &mut [u8; $s] {
                &mut self.0
            }
        }

        impl AsRef<[u8]> for $i {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $s]> for $i {
            fn from(bytes: [u8; $s]) -> Self {
                Self(bytes)
            }
        }

        impl From<$i> for [u8; $s] {
            fn from(value: $i) -> [u8; $s] {
                value.0
            }
        }

        impl TryFrom<&[u8]> for $i {
            type Error = ParseError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                <[u8; $s]>::try_from(bytes)
                    .map(Self)
                    .map_err(|_| ParseError::InvalidLength {
                        expected: $s,
                        found: bytes.len(),
                    })
            }
        }

        impl fmt::LowerHex for $i {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if f.alternate() {
                    write!(f, "0x")?;
                }
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $i {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self)
            }
        }

        impl fmt::Display for $i {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self)
            }
        }

        /// Accepts the hex form with or without the `0x` prefix.
        impl FromStr for $i {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let stripped = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(stripped)?;
                Self::try_from(bytes.as_slice())
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $i {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&format!("{:#x}", self))
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $i {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        #[cfg(feature = "random")]
        impl rand::distributions::Distribution<$i> for rand::distributions::Standard {
            fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> $i {
                $i(rng.gen())
            }
        }
    };
}

key!(Address, 20);
key!(Bytes32, 32);

impl Address {
    /// Builds the address whose big-endian value is `value`.
    pub fn from_low_u64_be(value: u64) -> Self {
        let mut bytes = [0u8; Self::LEN];
        bytes[Self::LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Interprets the address as a left-padded 32-byte word.
    pub fn into_word(self) -> Bytes32 {
        let mut word = [0u8; Bytes32::LEN];
        word[Bytes32::LEN - Self::LEN..].copy_from_slice(&self.0);
        Bytes32(word)
    }
}

impl Bytes32 {
    /// The low 20 bytes of the word.
    pub fn to_address(&self) -> Address {
        let mut address = [0u8; Address::LEN];
        address.copy_from_slice(&self.0[Bytes32::LEN - Address::LEN..]);
        Address(address)
    }
}

/// Height of a block on the chain.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
    derive_more::FromStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// The genesis height.
    pub const GENESIS: Self = Self(0);

    /// Creates the height from the number.
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// The height as a number.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian representation used in storage keys and hashes.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Restores the height from its big-endian representation.
    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }

    /// Returns `true` for the genesis height.
    pub fn is_genesis(&self) -> bool {
        self.0 == 0
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0x0000000000000000000000000000000000000064" => Ok(Address::from_low_u64_be(100)) ; "prefixed")]
    #[test_case("0000000000000000000000000000000000000064" => Ok(Address::from_low_u64_be(100)) ; "unprefixed")]
    #[test_case("0x64" => Err(ParseError::InvalidLength { expected: 20, found: 1 }) ; "too short")]
    fn address_from_str(input: &str) -> Result<Address, ParseError> {
        input.parse()
    }

    #[test]
    fn address_from_str__rejects_invalid_hex() {
        let result = "0xzz00000000000000000000000000000000000000".parse::<Address>();
        assert!(matches!(result, Err(ParseError::InvalidHex(_))));
    }

    #[test]
    fn left_padding_places_bytes_at_the_end() {
        let value = Bytes32::from_slice_left_padded(&[0x01, 0x02]).unwrap();
        assert_eq!(value[30], 0x01);
        assert_eq!(value[31], 0x02);
        assert!(value[..30].iter().all(|b| *b == 0));
    }

    #[test_case(&[] => Ok(Address::zeroed()) ; "empty")]
    #[test_case(&[0x64] => Ok(Address::from_low_u64_be(100)) ; "one byte")]
    #[test_case(&[0xff; 20] => Ok(Address::new([0xff; 20])) ; "full width")]
    #[test_case(&[0; 21] => Err(ParseError::InvalidLength { expected: 20, found: 21 }) ; "too long")]
    fn address_from_slice_left_padded(bytes: &[u8]) -> Result<Address, ParseError> {
        Address::from_slice_left_padded(bytes)
    }

    #[test]
    fn left_padding_rejects_too_long_input() {
        let result = Bytes32::from_slice_left_padded(&[0u8; 33]);
        assert_eq!(
            result,
            Err(ParseError::InvalidLength {
                expected: 32,
                found: 33
            })
        );
    }

    #[test]
    fn address_word_round_trip() {
        let address = Address::from_low_u64_be(0xdead_beef);
        assert_eq!(address.into_word().to_address(), address);
    }

    #[test]
    fn display_is_prefixed_lower_hex() {
        let value = Address::from_low_u64_be(0xab);
        assert_eq!(
            value.to_string(),
            "0x00000000000000000000000000000000000000ab"
        );
    }

    #[test]
    fn serde_uses_hex_strings() {
        let value = Bytes32::from([0x11; 32]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "11".repeat(32)));
        let decoded: Bytes32 = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, value);
    }
}
