//! The view of the world state native contracts operate on.

use crate::PrecompileError;
use comb_core_types::{
    Address,
    Bytes32,
    U256,
};
use std::collections::BTreeMap;

/// Account balances and contract storage as seen by a native contract. Missing
/// balances and slots read as zero.
pub trait StateDb {
    fn balance(&self, address: &Address) -> U256;

    fn set_balance(&mut self, address: &Address, balance: U256);

    fn storage(&self, address: &Address, key: &Bytes32) -> Bytes32;

    fn set_storage(&mut self, address: &Address, key: Bytes32, value: Bytes32);

    /// Moves `amount` from `from` to `to`, failing without changes if `from` can't
    /// cover it.
    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), PrecompileError> {
        let available = self.balance(from);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or(PrecompileError::InsufficientBalance {
                    address: *from,
                    required: amount,
                    available,
                })?;
        self.set_balance(from, remaining);
        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or(PrecompileError::Overflow)?;
        self.set_balance(to, credited);
        Ok(())
    }
}

/// The call frame a native contract runs in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub value: U256,
}

/// The parts of a transaction checked before it is executed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxView {
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub gas_limit: u64,
    pub gas_price: U256,
}

impl TxView {
    /// The most the sender can be charged: value plus the whole gas allowance.
    pub fn max_cost(&self) -> Option<U256> {
        self.gas_price
            .checked_mul(U256::from(self.gas_limit))?
            .checked_add(self.value)
    }
}

/// A [`StateDb`] held entirely in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStateDb {
    balances: BTreeMap<Address, U256>,
    storage: BTreeMap<(Address, Bytes32), Bytes32>,
}

impl MemoryStateDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, address: Address, balance: U256) -> Self {
        self.set_balance(&address, balance);
        self
    }

    /// The non-zero slots of `address` in key order.
    pub fn storage_of(&self, address: &Address) -> impl Iterator<Item = (&Bytes32, &Bytes32)> {
        let address = *address;
        self.storage
            .range((address, Bytes32::zeroed())..)
            .take_while(move |((owner, _), _)| *owner == address)
            .map(|((_, key), value)| (key, value))
    }
}

impl StateDb for MemoryStateDb {
    fn balance(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    fn set_balance(&mut self, address: &Address, balance: U256) {
        if balance.is_zero() {
            self.balances.remove(address);
        } else {
            self.balances.insert(*address, balance);
        }
    }

    fn storage(&self, address: &Address, key: &Bytes32) -> Bytes32 {
        self.storage
            .get(&(*address, *key))
            .copied()
            .unwrap_or_default()
    }

    fn set_storage(&mut self, address: &Address, key: Bytes32, value: Bytes32) {
        if value.is_zero() {
            self.storage.remove(&(*address, key));
        } else {
            self.storage.insert((*address, key), value);
        }
    }
}
