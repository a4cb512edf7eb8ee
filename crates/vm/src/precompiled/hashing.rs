//! Signature recovery, the standard hashes and the identity copy.

use super::{
    linear_cost,
    padded_slice,
    PrecompiledContract,
};
use crate::{
    CallContext,
    PrecompileError,
    StateDb,
};
use comb_core_types::{
    Address,
    Bytes32,
};
use k256::ecdsa::{
    RecoveryId,
    Signature,
    VerifyingKey,
};
use ripemd::Ripemd160;
use sha2::{
    Digest,
    Sha256,
};
use sha3::Keccak256;

const ECRECOVER_GAS: u64 = 3_000;
const ECRECOVER_INPUT_LEN: usize = 128;

/// Recovers the signer of a 32-byte hash. Input: `hash ‖ v ‖ r ‖ s`, each a 32-byte word.
/// Output: the signer as a left-padded word, or nothing when the signature is invalid.
#[derive(Debug, Clone, Copy)]
pub struct Ecrecover;

fn recover_signer(prehash: &[u8], is_y_odd: bool, rs: &[u8]) -> Option<Address> {
    let mut signature = Signature::from_slice(rs).ok()?;
    let mut is_y_odd = is_y_odd;
    // The curve library only accepts the low-s form; negating s mirrors the point.
    if let Some(normalized) = signature.normalize_s() {
        signature = normalized;
        is_y_odd = !is_y_odd;
    }
    let recovery_id = RecoveryId::new(is_y_odd, false);
    let key = VerifyingKey::recover_from_prehash(prehash, &signature, recovery_id).ok()?;
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(point.as_bytes().get(1..)?);
    Address::try_from(digest.get(12..)?).ok()
}

impl PrecompiledContract for Ecrecover {
    fn name(&self) -> &'static str {
        "ecrecover"
    }

    fn required_gas(&self, _input: &[u8]) -> u64 {
        ECRECOVER_GAS
    }

    fn run(
        &self,
        input: &[u8],
        _: &CallContext,
        _: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        let input = padded_slice(input, 0, ECRECOVER_INPUT_LEN);
        let (hash, rest) = input.split_at(32);
        let (v, rs) = rest.split_at(32);

        let is_y_odd = match v.split_last() {
            Some((&27, head)) if head.iter().all(|b| *b == 0) => false,
            Some((&28, head)) if head.iter().all(|b| *b == 0) => true,
            _ => return Ok(vec![]),
        };
        Ok(recover_signer(hash, is_y_odd, rs)
            .map(|signer| signer.into_word().to_vec())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sha256Hash;

impl PrecompiledContract for Sha256Hash {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn required_gas(&self, input: &[u8]) -> u64 {
        linear_cost(input.len(), 60, 12)
    }

    fn run(
        &self,
        input: &[u8],
        _: &CallContext,
        _: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        Ok(Sha256::digest(input).to_vec())
    }
}

/// RIPEMD-160 of the input, left-padded to a word.
#[derive(Debug, Clone, Copy)]
pub struct Ripemd160Hash;

impl PrecompiledContract for Ripemd160Hash {
    fn name(&self) -> &'static str {
        "ripemd160"
    }

    fn required_gas(&self, input: &[u8]) -> u64 {
        linear_cost(input.len(), 600, 120)
    }

    fn run(
        &self,
        input: &[u8],
        _: &CallContext,
        _: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        let digest = Ripemd160::digest(input);
        let word = Bytes32::from_slice_left_padded(&digest)
            .map_err(|_| PrecompileError::InvalidInput("ripemd160 digest width"))?;
        Ok(word.to_vec())
    }
}

/// Returns the input unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Identity;

impl PrecompiledContract for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn required_gas(&self, input: &[u8]) -> u64 {
        linear_cost(input.len(), 15, 3)
    }

    fn run(
        &self,
        input: &[u8],
        _: &CallContext,
        _: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        Ok(input.to_vec())
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStateDb;
    use k256::{
        ecdsa::SigningKey,
        elliptic_curve::scalar::IsHigh,
        Scalar,
    };
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };
    use test_case::test_case;

    fn run(contract: &dyn PrecompiledContract, input: &[u8]) -> Vec<u8> {
        contract
            .run(input, &CallContext::default(), &mut MemoryStateDb::new())
            .unwrap()
    }

    fn signer_address(key: &SigningKey) -> Address {
        let point = key.verifying_key().to_encoded_point(false);
        let digest = Keccak256::digest(&point.as_bytes()[1..]);
        Address::try_from(&digest[12..]).unwrap()
    }

    fn ecrecover_input(hash: &[u8; 32], v: u8, r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut input = hash.to_vec();
        input.extend_from_slice(&[0u8; 31]);
        input.push(v);
        input.extend_from_slice(r);
        input.extend_from_slice(s);
        input
    }

    #[test]
    fn ecrecover__recovers_the_signer() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..4 {
            let key = SigningKey::random(&mut rng);
            let hash: [u8; 32] = Sha256::digest(b"comb").into();
            let (signature, recovery_id) = key.sign_prehash_recoverable(&hash).unwrap();
            let bytes = signature.to_bytes();
            let v = if recovery_id.is_y_odd() { 28 } else { 27 };

            let output = run(&Ecrecover, &ecrecover_input(&hash, v, &bytes[..32], &bytes[32..]));
            assert_eq!(output, signer_address(&key).into_word().to_vec());
        }
    }

    #[test]
    fn ecrecover__accepts_high_s() {
        let mut rng = StdRng::seed_from_u64(2);
        let key = SigningKey::random(&mut rng);
        let hash: [u8; 32] = Sha256::digest(b"high s").into();
        let (signature, recovery_id) = key.sign_prehash_recoverable(&hash).unwrap();
        let (r, s) = signature.split_scalars();
        let high_s: Scalar = s.negate();
        assert!(bool::from(high_s.is_high()));
        let v = if recovery_id.is_y_odd() { 27 } else { 28 };

        let output = run(
            &Ecrecover,
            &ecrecover_input(&hash, v, &(*r).to_bytes(), &high_s.to_bytes()),
        );
        assert_eq!(output, signer_address(&key).into_word().to_vec());
    }

    #[test_case(26 ; "v below range")]
    #[test_case(29 ; "v above range")]
    fn ecrecover__invalid_v_returns_nothing(v: u8) {
        let input = ecrecover_input(&[1; 32], v, &[1; 32], &[1; 32]);
        assert!(run(&Ecrecover, &input).is_empty());
    }

    #[test]
    fn ecrecover__zero_signature_returns_nothing() {
        let input = ecrecover_input(&[1; 32], 27, &[0; 32], &[0; 32]);
        assert!(run(&Ecrecover, &input).is_empty());
        assert!(run(&Ecrecover, &[]).is_empty());
        assert_eq!(Ecrecover.required_gas(&[0; 1000]), ECRECOVER_GAS);
    }

    #[test]
    fn sha256__matches_known_digest() {
        assert_eq!(
            hex::encode(run(&Sha256Hash, b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn ripemd160__is_left_padded() {
        assert_eq!(
            hex::encode(run(&Ripemd160Hash, b"")),
            "0000000000000000000000009c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    #[test_case(&Sha256Hash, 0 => 60)]
    #[test_case(&Sha256Hash, 64 => 84)]
    #[test_case(&Ripemd160Hash, 1 => 720)]
    #[test_case(&Identity, 65 => 24)]
    fn gas_schedule(contract: &dyn PrecompiledContract, len: usize) -> u64 {
        contract.required_gas(&vec![0u8; len])
    }
}
