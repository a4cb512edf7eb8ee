//! Operations on the alt_bn128 pairing curve.
//!
//! G1 points are two 32-byte big-endian coordinates with `(0, 0)` standing for the point
//! at infinity. G2 coordinates are elements of Fq2 written imaginary part first.

// Group operations are closed and never overflow.
#![allow(clippy::arithmetic_side_effects)]

use super::{
    padded_slice,
    PrecompiledContract,
};
use crate::{
    CallContext,
    PrecompileError,
    StateDb,
};
use bn::{
    AffineG1,
    AffineG2,
    Fq,
    Fq2,
    Fr,
    Group,
    Gt,
    G1,
    G2,
};

const ADD_GAS: u64 = 500;
const SCALAR_MUL_GAS: u64 = 40_000;
const PAIRING_BASE_GAS: u64 = 100_000;
const PAIRING_PER_POINT_GAS: u64 = 80_000;

const FIELD_LEN: usize = 32;
const G1_LEN: usize = 2 * FIELD_LEN;
const G2_LEN: usize = 4 * FIELD_LEN;
const PAIR_LEN: usize = G1_LEN + G2_LEN;

fn read_fq(bytes: &[u8]) -> Result<Fq, PrecompileError> {
    Fq::from_slice(bytes).map_err(|_| PrecompileError::InvalidFieldElement)
}

fn read_g1(bytes: &[u8]) -> Result<G1, PrecompileError> {
    let x = read_fq(&bytes[..FIELD_LEN])?;
    let y = read_fq(&bytes[FIELD_LEN..G1_LEN])?;
    if x == Fq::zero() && y == Fq::zero() {
        return Ok(G1::zero())
    }
    AffineG1::new(x, y)
        .map(G1::from)
        .map_err(|_| PrecompileError::InvalidPoint)
}

fn read_g2(bytes: &[u8]) -> Result<G2, PrecompileError> {
    let word = |index: usize| {
        let start = index.saturating_mul(FIELD_LEN);
        read_fq(&bytes[start..start.saturating_add(FIELD_LEN)])
    };
    let x = Fq2::new(word(1)?, word(0)?);
    let y = Fq2::new(word(3)?, word(2)?);
    if x == Fq2::zero() && y == Fq2::zero() {
        return Ok(G2::zero())
    }
    AffineG2::new(x, y)
        .map(G2::from)
        .map_err(|_| PrecompileError::InvalidPoint)
}

fn encode_g1(point: G1) -> Result<Vec<u8>, PrecompileError> {
    let mut output = vec![0u8; G1_LEN];
    if let Some(affine) = AffineG1::from_jacobian(point) {
        let (x, y) = output.split_at_mut(FIELD_LEN);
        affine
            .x()
            .to_big_endian(x)
            .map_err(|_| PrecompileError::InvalidFieldElement)?;
        affine
            .y()
            .to_big_endian(y)
            .map_err(|_| PrecompileError::InvalidFieldElement)?;
    }
    Ok(output)
}

/// Point addition in G1. Input: two points; output: their sum.
#[derive(Debug, Clone, Copy)]
pub struct Bn256Add;

impl PrecompiledContract for Bn256Add {
    fn name(&self) -> &'static str {
        "bn256_add"
    }

    fn required_gas(&self, _input: &[u8]) -> u64 {
        ADD_GAS
    }

    fn run(
        &self,
        input: &[u8],
        _: &CallContext,
        _: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        let input = padded_slice(input, 0, 2 * G1_LEN);
        let a = read_g1(&input[..G1_LEN])?;
        let b = read_g1(&input[G1_LEN..])?;
        encode_g1(a + b)
    }
}

/// Scalar multiplication in G1. Input: a point and a 32-byte scalar.
#[derive(Debug, Clone, Copy)]
pub struct Bn256ScalarMul;

impl PrecompiledContract for Bn256ScalarMul {
    fn name(&self) -> &'static str {
        "bn256_scalar_mul"
    }

    fn required_gas(&self, _input: &[u8]) -> u64 {
        SCALAR_MUL_GAS
    }

    fn run(
        &self,
        input: &[u8],
        _: &CallContext,
        _: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        let input = padded_slice(input, 0, G1_LEN + FIELD_LEN);
        let point = read_g1(&input[..G1_LEN])?;
        let scalar = Fr::from_slice(&input[G1_LEN..])
            .map_err(|_| PrecompileError::InvalidFieldElement)?;
        encode_g1(point * scalar)
    }
}

/// Checks that the product of the pairings of (G1, G2) pairs is one. Output: a word
/// holding 1 or 0.
#[derive(Debug, Clone, Copy)]
pub struct Bn256Pairing;

impl PrecompiledContract for Bn256Pairing {
    fn name(&self) -> &'static str {
        "bn256_pairing"
    }

    fn required_gas(&self, input: &[u8]) -> u64 {
        let pairs = u64::try_from(input.len() / PAIR_LEN).unwrap_or(u64::MAX);
        PAIRING_BASE_GAS.saturating_add(PAIRING_PER_POINT_GAS.saturating_mul(pairs))
    }

    fn run(
        &self,
        input: &[u8],
        _: &CallContext,
        _: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        if input.len() % PAIR_LEN != 0 {
            return Err(PrecompileError::InvalidInput(
                "pairing input is not a sequence of (G1, G2) pairs",
            ))
        }
        let pairs = input
            .chunks_exact(PAIR_LEN)
            .map(|pair| Ok((read_g1(&pair[..G1_LEN])?, read_g2(&pair[G1_LEN..])?)))
            .collect::<Result<Vec<_>, PrecompileError>>()?;

        let holds = pairs.is_empty() || bn::pairing_batch(&pairs) == Gt::one();
        let mut output = vec![0u8; FIELD_LEN];
        output[FIELD_LEN - 1] = u8::from(holds);
        Ok(output)
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStateDb;
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };

    fn run(contract: &dyn PrecompiledContract, input: &[u8]) -> Result<Vec<u8>, PrecompileError> {
        contract.run(input, &CallContext::default(), &mut MemoryStateDb::new())
    }

    fn fq_bytes(value: Fq) -> Vec<u8> {
        let mut out = vec![0u8; FIELD_LEN];
        value.to_big_endian(&mut out).unwrap();
        out
    }

    fn encode_g2(point: G2) -> Vec<u8> {
        let affine = AffineG2::from_jacobian(point).unwrap();
        let mut out = fq_bytes(affine.x().imaginary());
        out.extend(fq_bytes(affine.x().real()));
        out.extend(fq_bytes(affine.y().imaginary()));
        out.extend(fq_bytes(affine.y().real()));
        out
    }

    fn scalar_word(value: u64) -> Vec<u8> {
        let mut word = vec![0u8; FIELD_LEN];
        word[24..].copy_from_slice(&value.to_be_bytes());
        word
    }

    #[test]
    fn add__doubling_matches_scalar_mul() {
        let generator = encode_g1(G1::one()).unwrap();
        let sum = run(&Bn256Add, &[generator.clone(), generator.clone()].concat()).unwrap();
        let doubled = run(&Bn256ScalarMul, &[generator, scalar_word(2)].concat()).unwrap();
        assert_eq!(sum, doubled);
        assert_eq!(sum, encode_g1(G1::one() + G1::one()).unwrap());
    }

    #[test]
    fn add__infinity_is_neutral() {
        let generator = encode_g1(G1::one()).unwrap();
        let sum = run(&Bn256Add, &generator).unwrap();
        assert_eq!(sum, generator);
        assert_eq!(run(&Bn256Add, &[]).unwrap(), vec![0u8; G1_LEN]);
    }

    #[test]
    fn add__rejects_point_off_the_curve() {
        let mut input = scalar_word(1);
        input.extend(scalar_word(3));
        assert_eq!(run(&Bn256Add, &input), Err(PrecompileError::InvalidPoint));
    }

    #[test]
    fn add__rejects_coordinate_above_the_modulus() {
        let input = vec![0xff; G1_LEN];
        assert_eq!(
            run(&Bn256Add, &input),
            Err(PrecompileError::InvalidFieldElement)
        );
    }

    #[test]
    fn scalar_mul__by_zero_is_infinity() {
        let generator = encode_g1(G1::one()).unwrap();
        let output = run(&Bn256ScalarMul, &[generator, scalar_word(0)].concat()).unwrap();
        assert_eq!(output, vec![0u8; G1_LEN]);
    }

    #[test]
    fn pairing__of_inverse_points_holds() {
        let mut rng = StdRng::seed_from_u64(3);
        let scalar = Fr::random(&mut rng);
        let p = G1::one() * scalar;
        let q = G2::one();
        let input = [
            encode_g1(p).unwrap(),
            encode_g2(q),
            encode_g1(-p).unwrap(),
            encode_g2(q),
        ]
        .concat();

        let output = run(&Bn256Pairing, &input).unwrap();
        assert_eq!(output, scalar_word(1));
        assert_eq!(Bn256Pairing.required_gas(&input), 260_000);
    }

    #[test]
    fn pairing__of_a_single_pair_fails() {
        let input = [encode_g1(G1::one()).unwrap(), encode_g2(G2::one())].concat();
        assert_eq!(run(&Bn256Pairing, &input).unwrap(), scalar_word(0));
    }

    #[test]
    fn pairing__empty_input_holds() {
        assert_eq!(run(&Bn256Pairing, &[]).unwrap(), scalar_word(1));
        assert_eq!(Bn256Pairing.required_gas(&[]), PAIRING_BASE_GAS);
    }

    #[test]
    fn pairing__rejects_partial_pairs() {
        assert!(matches!(
            run(&Bn256Pairing, &[0u8; PAIR_LEN + 1]),
            Err(PrecompileError::InvalidInput(_))
        ));
    }
}
