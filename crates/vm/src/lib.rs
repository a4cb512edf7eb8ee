//! The crate `comb-vm` holds the parts of the Comb virtual machines every node must agree on
//! bit for bit: the native contracts at reserved addresses and the values of the stack
//! machine.

#![deny(clippy::arithmetic_side_effects)]
#![deny(clippy::cast_possible_truncation)]
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod precompiled;
pub mod stack_item;
pub mod state;

pub use error::PrecompileError;
pub use precompiled::{
    addresses::ReservedAddresses,
    is_reserved,
    run_precompiled,
    PrecompileSet,
    PrecompiledContract,
};
pub use stack_item::{
    InteropHandle,
    InteropInterface,
    StackItem,
    StackItemError,
    StackItemKind,
};
pub use state::{
    CallContext,
    MemoryStateDb,
    StateDb,
    TxView,
};

#[cfg(test)]
mod dev_deps {
    use comb_core_trace as _;
    use hex as _;
    use pretty_assertions as _;
    use proptest as _;
    use rand as _;
    use ::test_case as _;
}
