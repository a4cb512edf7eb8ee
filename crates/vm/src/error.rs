use comb_core_types::{
    Address,
    Bytes32,
    U256,
};

/// Failure of a native contract. The whole call fails and no state change
/// made by the contract survives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrecompileError {
    #[error("out of gas: the contract requires {required}, {supplied} supplied")]
    OutOfGas { required: u64, supplied: u64 },
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("invalid curve point")]
    InvalidPoint,
    #[error("invalid field element")]
    InvalidFieldElement,
    #[error("unknown method selector")]
    UnknownSelector,
    #[error("{0} is not a valid denomination")]
    InvalidDenomination(U256),
    #[error("insufficient balance of {address}: {available} available, {required} required")]
    InsufficientBalance {
        address: Address,
        required: U256,
        available: U256,
    },
    #[error("one-time key {0} is already in use")]
    KeyAlreadyUsed(Bytes32),
    #[error("one-time key {0} was never bought")]
    UnknownKey(Bytes32),
    #[error("one-time key {0} was already refunded")]
    KeyAlreadySpent(Bytes32),
    #[error("balance overflow")]
    Overflow,
}
