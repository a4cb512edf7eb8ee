#![deny(clippy::arithmetic_side_effects)]
#![deny(clippy::cast_possible_truncation)]

pub mod database;
pub mod service;
pub mod state;

#[doc(no_inline)]
pub use comb_core_chain_config as chain_config;
#[doc(no_inline)]
pub use comb_core_storage as storage;
#[doc(no_inline)]
pub use comb_core_types as types;
