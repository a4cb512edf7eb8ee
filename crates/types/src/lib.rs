//! The crate `comb-core-types` contains plain rust common types used by `comb-core` and related
//! libraries. This crate doesn't contain any business logic and is to be as primitive as
//! possible.

#![deny(clippy::arithmetic_side_effects)]
#![deny(clippy::cast_possible_truncation)]
// TODO: Document the header accessors and enable the lint.
// #![deny(missing_docs)]

pub mod blockchain;
pub mod crypto;
pub mod entities;
pub mod merkle;
pub mod primitives;

pub use primitive_types::U256;
pub use primitives::{
    Address,
    BlockHeight,
    Bytes32,
};
