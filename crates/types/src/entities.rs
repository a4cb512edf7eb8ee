//! Higher level domain types

pub mod account;
