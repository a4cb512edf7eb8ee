use comb_core_types::{
    Bytes32,
    U256,
};
use core::fmt;
use serde::{
    de::{
        Error,
        Visitor,
    },
    Deserializer,
    Serializer,
};
use serde_with::{
    DeserializeAs,
    SerializeAs,
};

/// Unsigned integers written as `0x`-prefixed hex and read from either a hex
/// string, a decimal string or a plain JSON number.
pub struct HexOrDecimal;

struct U64Visitor;

impl<'de> Visitor<'de> for U64Visitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an unsigned 64-bit integer as a number, hex or decimal string")
    }

    fn visit_u64<E: Error>(self, value: u64) -> Result<u64, E> {
        Ok(value)
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<u64, E> {
        match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
            Some("") => Err(E::custom("empty hex number")),
            Some(digits) => u64::from_str_radix(digits, 16).map_err(E::custom),
            None => value.parse().map_err(E::custom),
        }
    }
}

impl SerializeAs<u64> for HexOrDecimal {
    fn serialize_as<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{value:#x}"))
    }
}

impl<'de> DeserializeAs<'de, u64> for HexOrDecimal {
    fn deserialize_as<D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(U64Visitor)
    }
}

struct U256Visitor;

impl<'de> Visitor<'de> for U256Visitor {
    type Value = U256;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a 256-bit unsigned integer as a number, hex or decimal string")
    }

    fn visit_u64<E: Error>(self, value: u64) -> Result<U256, E> {
        Ok(U256::from(value))
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<U256, E> {
        match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
            Some("") => Err(E::custom("empty hex number")),
            Some(digits) if digits.len() > 64 => {
                Err(E::custom(format!("hex number `{value}` exceeds 256 bits")))
            }
            Some(digits) => U256::from_str_radix(digits, 16).map_err(E::custom),
            None => U256::from_dec_str(value).map_err(|e| E::custom(format!("{e:?}"))),
        }
    }
}

impl SerializeAs<U256> for HexOrDecimal {
    fn serialize_as<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{value:#x}"))
    }
}

impl<'de> DeserializeAs<'de, U256> for HexOrDecimal {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(U256Visitor)
    }
}

/// Byte strings as `0x`-prefixed hex.
pub struct HexType;

impl<T: AsRef<[u8]>> SerializeAs<T> for HexType {
    fn serialize_as<S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_hex::serialize(value, serializer)
    }
}

impl<'de, T, E> DeserializeAs<'de, T> for HexType
where
    for<'a> T: TryFrom<&'a [u8], Error = E>,
    E: fmt::Display,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_hex::deserialize(deserializer)
    }
}

/// A 32-byte storage word written by hand: the `0x` prefix is optional, shorter
/// values are padded on the left and more than 64 hex characters are rejected.
pub struct StorageWord;

impl StorageWord {
    /// Parses the textual form of a storage word.
    pub fn parse(raw: &str) -> Result<Bytes32, String> {
        let digits = raw.strip_prefix("0x").unwrap_or(raw);
        let max = Bytes32::LEN.saturating_mul(2);
        if digits.len() > max {
            return Err(format!(
                "storage word `{raw}` has {} hex characters, at most {max} allowed",
                digits.len()
            ))
        }
        let bytes = hex::decode(digits).map_err(|e| e.to_string())?;
        Bytes32::from_slice_left_padded(&bytes).map_err(|e| e.to_string())
    }
}

impl SerializeAs<Bytes32> for StorageWord {
    fn serialize_as<S>(value: &Bytes32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_hex::serialize(value, serializer)
    }
}

impl<'de> DeserializeAs<'de, Bytes32> for StorageWord {
    fn deserialize_as<D>(deserializer: D) -> Result<Bytes32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: String = serde::Deserialize::deserialize(deserializer)?;
        StorageWord::parse(&raw).map_err(D::Error::custom)
    }
}

pub mod serde_hex {
    use core::fmt;
    use hex::{
        FromHex,
        ToHex,
    };
    use serde::{
        de::Error,
        Deserializer,
        Serializer,
    };

    pub fn serialize<T, S>(target: T, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: ToHex,
    {
        let s = format!("0x{}", target.encode_hex::<String>());
        ser.serialize_str(&s)
    }

    pub fn deserialize<'de, T, E, D>(des: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        for<'a> T: TryFrom<&'a [u8], Error = E>,
        E: fmt::Display,
    {
        let raw_string: String = serde::Deserialize::deserialize(des)?;
        let stripped_prefix = raw_string.strip_prefix("0x").unwrap_or(&raw_string);
        let bytes: Vec<u8> =
            FromHex::from_hex(stripped_prefix).map_err(D::Error::custom)?;
        let result = T::try_from(bytes.as_slice()).map_err(D::Error::custom)?;
        Ok(result)
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde::{
        Deserialize,
        Serialize,
    };
    use serde_with::serde_as;
    use test_case::test_case;

    #[serde_as]
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Numbers {
        #[serde_as(as = "HexOrDecimal")]
        small: u64,
        #[serde_as(as = "HexOrDecimal")]
        big: U256,
    }

    #[serde_as]
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Word(#[serde_as(as = "StorageWord")] Bytes32);

    #[test_case(r#"{"small":"0x2fefd8","big":"0x100000"}"#, 3_141_592, 1_048_576 ; "hex strings")]
    #[test_case(r#"{"small":"3141592","big":"1048576"}"#, 3_141_592, 1_048_576 ; "decimal strings")]
    #[test_case(r#"{"small":3141592,"big":1048576}"#, 3_141_592, 1_048_576 ; "json numbers")]
    fn hex_or_decimal__accepts_every_textual_form(json: &str, small: u64, big: u64) {
        let numbers: Numbers = serde_json::from_str(json).unwrap();
        assert_eq!(
            numbers,
            Numbers {
                small,
                big: U256::from(big)
            }
        );
    }

    #[test]
    fn hex_or_decimal__writes_hex() {
        let json = serde_json::to_string(&Numbers {
            small: 42,
            big: U256::from(131_072u64),
        })
        .unwrap();
        assert_eq!(json, r#"{"small":"0x2a","big":"0x20000"}"#);
    }

    #[test_case(r#"{"small":"0x","big":"0"}"# ; "empty hex")]
    #[test_case(r#"{"small":"0xzz","big":"0"}"# ; "invalid hex digit")]
    #[test_case(r#"{"small":"0x1ffffffffffffffff","big":"0"}"# ; "overflowing u64")]
    #[test_case(r#"{"small":"-1","big":"0"}"# ; "negative decimal")]
    fn hex_or_decimal__rejects_malformed_numbers(json: &str) {
        assert!(serde_json::from_str::<Numbers>(json).is_err());
    }

    #[test_case("0x01", 31 ; "prefixed short word")]
    #[test_case("01", 31 ; "unprefixed short word")]
    #[test_case("0x", 32 ; "empty word")]
    fn storage_word__pads_on_the_left(raw: &str, first_value_byte: usize) {
        let Word(word) = serde_json::from_str(&format!("\"{raw}\"")).unwrap();
        assert!(word[..first_value_byte].iter().all(|b| *b == 0));
        if first_value_byte < 32 {
            assert_eq!(word[first_value_byte], 1);
        }
    }

    #[test]
    fn storage_word__accepts_exactly_64_hex_characters() {
        let raw = "ab".repeat(32);
        let Word(word) = serde_json::from_str(&format!("\"0x{raw}\"")).unwrap();
        assert_eq!(word, Bytes32::from([0xab; 32]));
    }

    #[test]
    fn storage_word__rejects_more_than_64_hex_characters() {
        let raw = "00".repeat(32) + "01";
        let err = serde_json::from_str::<Word>(&format!("\"{raw}\"")).unwrap_err();
        assert!(err.to_string().contains("at most 64"), "{err}");
    }

    #[test]
    fn storage_word__rejects_odd_length() {
        assert!(serde_json::from_str::<Word>("\"0x123\"").is_err());
    }
}
