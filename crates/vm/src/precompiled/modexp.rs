//! Arbitrary-precision modular exponentiation, priced by the Byzantium rules.
//!
//! Input: `base_len ‖ exp_len ‖ mod_len` as 32-byte words, followed by the base, the
//! exponent and the modulus as big-endian numbers of those lengths. Missing bytes read
//! as zero. Each declared length is capped at [`MAX_OPERAND_LEN`].

use super::{
    padded_slice,
    PrecompiledContract,
    WORD_SIZE,
};
use crate::{
    CallContext,
    PrecompileError,
    StateDb,
};
use comb_core_types::U256;
use num_bigint::BigUint;
use num_traits::Zero;
use std::ops::Shl;

const GAS_QUAD_DIVISOR: u128 = 20;
const HEADER_LEN: usize = 3 * WORD_SIZE;
/// Far beyond any operand a block's gas can pay for.
pub const MAX_OPERAND_LEN: usize = 1 << 20;

#[derive(Debug, Clone, Copy)]
pub struct BigModExp;

struct Lengths {
    base: U256,
    exp: U256,
    modulus: U256,
}

fn read_lengths(input: &[u8]) -> Lengths {
    let word = |offset| U256::from_big_endian(&padded_slice(input, offset, WORD_SIZE));
    Lengths {
        base: word(0),
        exp: word(WORD_SIZE),
        modulus: word(2 * WORD_SIZE),
    }
}

fn to_usize(value: U256) -> Option<usize> {
    if value > U256::from(u64::MAX) {
        return None
    }
    usize::try_from(value.as_u64()).ok()
}

fn mult_complexity(x: u128) -> u128 {
    let square = x.saturating_mul(x);
    if x <= 64 {
        square
    } else if x <= 1024 {
        (square / 4)
            .saturating_add(x.saturating_mul(96))
            .saturating_sub(3_072)
    } else {
        (square / 16)
            .saturating_add(x.saturating_mul(480))
            .saturating_sub(199_680)
    }
}

/// Reads `len` bytes at `offset` as a big-endian number; bytes past the input are zero.
/// Only the bytes present in `input` are copied.
fn read_number(input: &[u8], offset: usize, len: usize) -> BigUint {
    let available = input.get(offset..).unwrap_or_default();
    let taken = available.len().min(len);
    let missing_bits = len.saturating_sub(taken).saturating_mul(8);
    BigUint::from_bytes_be(&available[..taken]).shl(missing_bits)
}

impl PrecompiledContract for BigModExp {
    fn name(&self) -> &'static str {
        "modexp"
    }

    fn required_gas(&self, input: &[u8]) -> u64 {
        let lengths = read_lengths(input);
        let (Some(base_len), Some(exp_len), Some(mod_len)) = (
            to_usize(lengths.base),
            to_usize(lengths.exp),
            to_usize(lengths.modulus),
        ) else {
            return u64::MAX
        };

        // Only the first word of the exponent is looked at.
        let exp_offset = HEADER_LEN.saturating_add(base_len);
        let head_len = exp_len.min(WORD_SIZE);
        let mut head = [0u8; WORD_SIZE];
        let head_bytes = padded_slice(input, exp_offset, head_len);
        head[WORD_SIZE.saturating_sub(head_len)..].copy_from_slice(&head_bytes);
        let head_bits = u128::try_from(U256::from_big_endian(&head).bits()).unwrap_or(0);

        let adjusted_exp_len = u128::try_from(exp_len)
            .unwrap_or(u128::MAX)
            .saturating_sub(32)
            .saturating_mul(8)
            .saturating_add(head_bits.saturating_sub(1))
            .max(1);

        let x = u128::try_from(base_len.max(mod_len)).unwrap_or(u128::MAX);
        let gas = mult_complexity(x).saturating_mul(adjusted_exp_len) / GAS_QUAD_DIVISOR;
        u64::try_from(gas).unwrap_or(u64::MAX)
    }

    fn run(
        &self,
        input: &[u8],
        _: &CallContext,
        _: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        let lengths = read_lengths(input);
        let too_long = PrecompileError::InvalidInput("modexp length exceeds the operand limit");
        let bounded = |len| to_usize(len).filter(|len| *len <= MAX_OPERAND_LEN);
        let base_len = bounded(lengths.base).ok_or_else(|| too_long.clone())?;
        let exp_len = bounded(lengths.exp).ok_or_else(|| too_long.clone())?;
        let mod_len = bounded(lengths.modulus).ok_or(too_long)?;

        if mod_len == 0 {
            return Ok(vec![])
        }

        let exp_offset = HEADER_LEN.saturating_add(base_len);
        let mod_offset = exp_offset.saturating_add(exp_len);
        let base = read_number(input, HEADER_LEN, base_len);
        let exponent = read_number(input, exp_offset, exp_len);
        let modulus = read_number(input, mod_offset, mod_len);

        let mut output = vec![0u8; mod_len];
        if modulus.is_zero() {
            return Ok(output)
        }
        let result = base.modpow(&exponent, &modulus).to_bytes_be();
        let start = mod_len.saturating_sub(result.len());
        output[start..].copy_from_slice(&result);
        Ok(output)
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStateDb;
    use proptest::prelude::*;
    use test_case::test_case;

    fn encode(base: &[u8], exp: &[u8], modulus: &[u8]) -> Vec<u8> {
        let mut input = Vec::new();
        for len in [base.len(), exp.len(), modulus.len()] {
            let mut word = [0u8; 32];
            U256::from(len).to_big_endian(&mut word);
            input.extend_from_slice(&word);
        }
        input.extend_from_slice(base);
        input.extend_from_slice(exp);
        input.extend_from_slice(modulus);
        input
    }

    fn run(input: &[u8]) -> Vec<u8> {
        BigModExp
            .run(input, &CallContext::default(), &mut MemoryStateDb::new())
            .unwrap()
    }

    fn fermat_input() -> Vec<u8> {
        let exp =
            hex::decode("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2e")
                .unwrap();
        let modulus =
            hex::decode("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f")
                .unwrap();
        encode(&[3], &exp, &modulus)
    }

    #[test]
    fn fermat_little_theorem() {
        let output = run(&fermat_input());
        let mut expected = vec![0u8; 32];
        expected[31] = 1;
        assert_eq!(output, expected);
        assert_eq!(BigModExp.required_gas(&fermat_input()), 13_056);
    }

    #[test]
    fn small_numbers() {
        // 2^10 mod 1000 = 24
        assert_eq!(run(&encode(&[2], &[10], &[0x03, 0xe8])), vec![0, 24]);
    }

    #[test]
    fn zero_modulus_gives_zero_output() {
        assert_eq!(run(&encode(&[7], &[1], &[0, 0])), vec![0, 0]);
        assert!(run(&encode(&[7], &[1], &[])).is_empty());
    }

    #[test]
    fn truncated_input_is_zero_padded() {
        let mut input = encode(&[2], &[3], &[0x10]);
        // Dropping the modulus byte turns the modulus into zero.
        input.pop();
        assert_eq!(run(&input), vec![0]);
        assert!(run(&[]).is_empty());
    }

    #[test_case(32, 32, 32 => 51 ; "zero exponent counts as one")]
    #[test_case(64, 64, 64 => 52_428 ; "long exponent")]
    #[test_case(1, 1, 2_000 => 50_516 ; "large modulus")]
    fn gas_by_lengths(base_len: u64, exp_len: u64, mod_len: u64) -> u64 {
        BigModExp.required_gas(&header(base_len, exp_len, mod_len))
    }

    #[test]
    fn unrepresentable_length_is_rejected() {
        let mut input = vec![0xff; 32];
        input.extend_from_slice(&[0; 63]);
        input.push(1);
        assert_eq!(BigModExp.required_gas(&input), u64::MAX);
        assert!(matches!(
            BigModExp.run(&input, &CallContext::default(), &mut MemoryStateDb::new()),
            Err(PrecompileError::InvalidInput(_))
        ));
    }

    fn header(base_len: u64, exp_len: u64, mod_len: u64) -> Vec<u8> {
        let mut input = Vec::new();
        for len in [base_len, exp_len, mod_len] {
            let mut word = [0u8; 32];
            U256::from(len).to_big_endian(&mut word);
            input.extend_from_slice(&word);
        }
        input
    }

    #[test_case(1, 1 << 36, 1 ; "huge exponent")]
    #[test_case(1 << 40, 1, 1 ; "huge base")]
    #[test_case(1, 1, 1 << 40 ; "huge modulus")]
    fn oversized_operand_is_rejected_without_allocating(
        base_len: u64,
        exp_len: u64,
        mod_len: u64,
    ) {
        let mut input = header(base_len, exp_len, mod_len);
        input.extend_from_slice(&[2, 3, 5]);

        let result =
            BigModExp.run(&input, &CallContext::default(), &mut MemoryStateDb::new());

        assert!(matches!(result, Err(PrecompileError::InvalidInput(_))));
    }

    #[test]
    fn operand_at_the_limit_is_accepted() {
        let limit = u64::try_from(MAX_OPERAND_LEN).unwrap();
        let mut input = header(1, limit, 1);
        input.extend_from_slice(&[2, 1]);

        // The exponent is 1 followed by zero bytes and the modulus is missing, so zero.
        assert_eq!(run(&input), vec![0]);
    }

    #[test]
    fn partially_present_modulus_is_zero_extended() {
        let mut input = encode(&[2], &[10], &[0x03, 0xe8]);
        input.pop();

        // 2^10 mod 0x0300 = 1024 mod 768
        assert_eq!(run(&input), vec![0x01, 0x00]);
    }

    proptest! {
        #[test]
        fn matches_u64_arithmetic(base in any::<u32>(), exp in 0u8..16, modulus in 1u32..) {
            let modulus_64 = u64::from(modulus);
            let expected = (0..exp).fold(1u64.checked_rem(modulus_64).unwrap(), |acc, _| {
                acc.wrapping_mul(u64::from(base)).checked_rem(modulus_64).unwrap()
            });
            let output = run(&encode(&base.to_be_bytes(), &[exp], &modulus.to_be_bytes()));
            let expected = u32::try_from(expected).unwrap();
            prop_assert_eq!(output, expected.to_be_bytes().to_vec());
        }
    }
}
