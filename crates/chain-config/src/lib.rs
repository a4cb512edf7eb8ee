//! Chain configuration, the genesis specification and the deterministic genesis
//! state builder of the Comb chain.

#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::arithmetic_side_effects)]
#![deny(unused_crate_dependencies)]

pub mod config;
mod genesis;
mod serialization;

pub use config::*;
pub use genesis::{
    AccountState,
    GenesisCommitment,
    StateImage,
    GENESIS_DIFFICULTY,
    GENESIS_GAS_LIMIT,
};
pub use serialization::{
    serde_hex,
    HexOrDecimal,
    HexType,
    StorageWord,
};

#[cfg(test)]
mod dev_deps {
    use pretty_assertions as _;
    use proptest as _;
    use rand as _;
    use tempfile as _;
    use ::test_case as _;
}
