//! Native contracts living at reserved addresses.
//!
//! Each fork set is an immutable table built on first use. The table in force for a
//! block is chosen with [`PrecompileSet::active`]; addresses outside it are ordinary
//! accounts.

use crate::{
    CallContext,
    PrecompileError,
    StateDb,
    TxView,
};
use comb_core_chain_config::ChainConfig;
use comb_core_types::{
    Address,
    BlockHeight,
};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

pub mod addresses;
pub mod bn256;
pub mod hashing;
pub mod modexp;
pub mod vault;

use addresses::ReservedAddresses;

/// Size of an EVM word, the unit linear gas costs are charged by.
pub const WORD_SIZE: usize = 32;

/// A contract executed natively instead of by the interpreter.
pub trait PrecompiledContract: Send + Sync {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Gas charged before [`PrecompiledContract::run`]. Depends on nothing but the
    /// input.
    fn required_gas(&self, input: &[u8]) -> u64;

    fn run(
        &self,
        input: &[u8],
        context: &CallContext,
        state: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError>;

    /// Checks a transaction calling the contract before any gas is charged.
    fn validate_tx(&self, _state: &dyn StateDb, _tx: &TxView) -> Result<(), PrecompileError> {
        Ok(())
    }
}

/// Charges the gas of `contract` from `supplied_gas` and runs it. Returns the output and
/// the gas left.
pub fn run_precompiled(
    contract: &dyn PrecompiledContract,
    input: &[u8],
    context: &CallContext,
    state: &mut dyn StateDb,
    supplied_gas: u64,
) -> Result<(Vec<u8>, u64), PrecompileError> {
    let required = contract.required_gas(input);
    let remaining = supplied_gas
        .checked_sub(required)
        .ok_or(PrecompileError::OutOfGas {
            required,
            supplied: supplied_gas,
        })?;
    let output = contract.run(input, context, state)?;
    tracing::trace!(
        contract = contract.name(),
        gas_used = required,
        output_len = output.len(),
        "Executed native contract"
    );
    Ok((output, remaining))
}

/// Whether `address` can never hold user-deployed code.
pub fn is_reserved(address: &Address) -> bool {
    ReservedAddresses::all().contains(address)
}

/// Linear gas: `base` plus `per_word` for every started word of input.
pub(crate) fn linear_cost(input_len: usize, base: u64, per_word: u64) -> u64 {
    let words = u64::try_from(input_len.div_ceil(WORD_SIZE)).unwrap_or(u64::MAX);
    base.saturating_add(per_word.saturating_mul(words))
}

/// `len` bytes of `input` starting at `offset`, zero-filled past its end.
pub(crate) fn padded_slice(input: &[u8], offset: usize, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    if let Some(available) = input.get(offset..) {
        let copied = available.len().min(len);
        out[..copied].copy_from_slice(&available[..copied]);
    }
    out
}

type ContractTable = BTreeMap<Address, &'static dyn PrecompiledContract>;

static HOMESTEAD: Lazy<ContractTable> = Lazy::new(|| {
    let contracts: [(Address, &'static dyn PrecompiledContract); 6] = [
        (addresses::ECRECOVER, &hashing::Ecrecover),
        (addresses::SHA256, &hashing::Sha256Hash),
        (addresses::RIPEMD160, &hashing::Ripemd160Hash),
        (addresses::IDENTITY, &hashing::Identity),
        (addresses::COMB_COIN, &vault::Vault::COIN),
        (addresses::COMB_STAMP, &vault::Vault::STAMP),
    ];
    BTreeMap::from(contracts)
});

static BYZANTIUM: Lazy<ContractTable> = Lazy::new(|| {
    let added: [(Address, &'static dyn PrecompiledContract); 4] = [
        (addresses::MODEXP, &modexp::BigModExp),
        (addresses::BN256_ADD, &bn256::Bn256Add),
        (addresses::BN256_SCALAR_MUL, &bn256::Bn256ScalarMul),
        (addresses::BN256_PAIRING, &bn256::Bn256Pairing),
    ];
    let mut contracts = ContractTable::clone(&HOMESTEAD);
    contracts.extend(added);
    contracts
});

/// The native contracts of a group of forks.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    enum_iterator::Sequence,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum PrecompileSet {
    /// Frontier and Homestead: signature recovery, hashes, identity and the vaults.
    Homestead,
    /// Adds modular exponentiation and the bn256 curve operations.
    Byzantium,
}

impl PrecompileSet {
    /// The set in force at `height` of the chain configured by `config`.
    pub fn active(config: &ChainConfig, height: BlockHeight) -> Self {
        if config.is_byzantium(height) {
            Self::Byzantium
        } else {
            Self::Homestead
        }
    }

    pub fn contracts(&self) -> &'static BTreeMap<Address, &'static dyn PrecompiledContract> {
        match self {
            Self::Homestead => &HOMESTEAD,
            Self::Byzantium => &BYZANTIUM,
        }
    }

    pub fn get(&self, address: &Address) -> Option<&'static dyn PrecompiledContract> {
        self.contracts().get(address).copied()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.contracts().contains_key(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &'static Address> {
        self.contracts().keys()
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStateDb;
    use std::collections::BTreeSet;
    use test_case::test_case;

    comb_core_trace::enable_tracing!();

    #[test]
    fn homestead_set_is_contained_in_byzantium() {
        for address in PrecompileSet::Homestead.addresses() {
            let homestead = PrecompileSet::Homestead.get(address).unwrap();
            let byzantium = PrecompileSet::Byzantium.get(address).unwrap();
            assert_eq!(homestead.name(), byzantium.name());
        }
        assert_eq!(PrecompileSet::Homestead.contracts().len(), 6);
        assert_eq!(PrecompileSet::Byzantium.contracts().len(), 10);
    }

    #[test]
    fn named_operations_never_share_an_address() {
        for set in enum_iterator::all::<PrecompileSet>() {
            let names: BTreeSet<_> = set.contracts().values().map(|c| c.name()).collect();
            assert_eq!(names.len(), set.contracts().len(), "{set}");
        }
    }

    #[test]
    fn every_native_contract_address_is_reserved() {
        for address in PrecompileSet::Byzantium.addresses() {
            assert!(is_reserved(address), "{address}");
        }
        assert!(!is_reserved(&Address::from_low_u64_be(9)));
        assert!(!is_reserved(&Address::from_low_u64_be(0xdead_beef)));
    }

    #[test_case(None, 0 => PrecompileSet::Homestead ; "byzantium never scheduled")]
    #[test_case(Some(10), 9 => PrecompileSet::Homestead ; "before activation")]
    #[test_case(Some(10), 10 => PrecompileSet::Byzantium ; "at activation")]
    #[test_case(Some(0), 0 => PrecompileSet::Byzantium ; "active from genesis")]
    fn active__follows_byzantium_fork(fork: Option<u64>, height: u64) -> PrecompileSet {
        let config = ChainConfig {
            byzantium_block: fork.map(Into::into),
            ..Default::default()
        };
        PrecompileSet::active(&config, height.into())
    }

    #[test]
    fn lookup_outside_the_set_is_none() {
        assert!(PrecompileSet::Homestead.get(&addresses::MODEXP).is_none());
        assert!(PrecompileSet::Byzantium.get(&addresses::MODEXP).is_some());
        assert!(!PrecompileSet::Byzantium.contains(&addresses::OTA_BALANCE_STORAGE));
    }

    #[test]
    fn set_names_parse() {
        assert_eq!("byzantium".parse(), Ok(PrecompileSet::Byzantium));
        assert_eq!(PrecompileSet::Homestead.to_string(), "homestead");
    }

    #[test]
    fn run_precompiled__charges_gas_before_running() {
        let identity = PrecompileSet::Homestead.get(&addresses::IDENTITY).unwrap();
        let mut state = MemoryStateDb::new();
        let input = [7u8; 33];

        let (output, remaining) =
            run_precompiled(identity, &input, &CallContext::default(), &mut state, 100)
                .unwrap();
        assert_eq!(output, input.to_vec());
        assert_eq!(remaining, 100 - 21);

        let err = run_precompiled(identity, &input, &CallContext::default(), &mut state, 20)
            .unwrap_err();
        assert_eq!(
            err,
            PrecompileError::OutOfGas {
                required: 21,
                supplied: 20
            }
        );
    }

    #[test_case(0, 10 ; "empty input")]
    #[test_case(1, 13 ; "one started word")]
    #[test_case(32, 13 ; "one full word")]
    #[test_case(33, 16 ; "two words")]
    fn linear_cost__counts_started_words(len: usize, expected: u64) {
        assert_eq!(linear_cost(len, 10, 3), expected);
    }

    #[test]
    fn padded_slice__zero_fills() {
        assert_eq!(padded_slice(&[1, 2, 3], 1, 4), vec![2, 3, 0, 0]);
        assert_eq!(padded_slice(&[1, 2, 3], 5, 2), vec![0, 0]);
        assert_eq!(padded_slice(&[1, 2, 3], 0, 2), vec![1, 2]);
    }
}
