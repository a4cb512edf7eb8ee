//! The native coin and stamp vaults.
//!
//! Buying locks a fixed denomination under a one-time key and records the buyer in the
//! storage of the denomination's address. Refunding pays the amount back to the buyer and
//! spends the key for good.
//!
//! Storage layout:
//! - denomination address: one-time key -> buyer
//! - [`OTA_BALANCE_STORAGE`]: denomination -> number of outstanding keys
//! - [`OTA_IMAGE_STORAGE`]: one-time key -> 1 once refunded

use super::{
    addresses::{
        amount_word,
        denomination_address,
        COIN_DENOMINATIONS,
        COMB_COIN,
        COMB_STAMP,
        OTA_BALANCE_STORAGE,
        OTA_IMAGE_STORAGE,
        STAMP_DENOMINATIONS,
    },
    linear_cost,
    PrecompiledContract,
    WORD_SIZE,
};
use crate::{
    CallContext,
    PrecompileError,
    StateDb,
    TxView,
};
use comb_core_types::{
    Address,
    Bytes32,
    U256,
};
use once_cell::sync::Lazy;
use sha3::{
    Digest,
    Keccak256,
};

const SELECTOR_LEN: usize = 4;
const BUY_INPUT_LEN: usize = SELECTOR_LEN + WORD_SIZE;
const REFUND_INPUT_LEN: usize = SELECTOR_LEN + 2 * WORD_SIZE;

type Selector = [u8; SELECTOR_LEN];

fn selector(signature: &str) -> Selector {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; SELECTOR_LEN];
    selector.copy_from_slice(&digest[..SELECTOR_LEN]);
    selector
}

struct Selectors {
    buy: Selector,
    refund: Selector,
}

static COIN_SELECTORS: Lazy<Selectors> = Lazy::new(|| Selectors {
    buy: selector("buyCoin(bytes32)"),
    refund: selector("refundCoin(bytes32,uint256)"),
});

static STAMP_SELECTORS: Lazy<Selectors> = Lazy::new(|| Selectors {
    buy: selector("buyStamp(bytes32)"),
    refund: selector("refundStamp(bytes32,uint256)"),
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum VaultKind {
    Coin,
    Stamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultCall {
    Buy { key: Bytes32 },
    Refund { key: Bytes32, amount: U256 },
}

/// A vault holding one family of denominations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vault {
    kind: VaultKind,
}

impl Vault {
    pub const COIN: Self = Self {
        kind: VaultKind::Coin,
    };
    pub const STAMP: Self = Self {
        kind: VaultKind::Stamp,
    };

    pub fn kind(&self) -> VaultKind {
        self.kind
    }

    /// The address the vault lives at and holds the locked funds on.
    pub fn address(&self) -> Address {
        match self.kind {
            VaultKind::Coin => COMB_COIN,
            VaultKind::Stamp => COMB_STAMP,
        }
    }

    pub fn denominations(&self) -> &'static [u128] {
        match self.kind {
            VaultKind::Coin => &COIN_DENOMINATIONS,
            VaultKind::Stamp => &STAMP_DENOMINATIONS,
        }
    }

    fn selectors(&self) -> &'static Selectors {
        match self.kind {
            VaultKind::Coin => &COIN_SELECTORS,
            VaultKind::Stamp => &STAMP_SELECTORS,
        }
    }

    /// The denomination equal to `amount`.
    fn denomination(&self, amount: U256) -> Result<u128, PrecompileError> {
        self.denominations()
            .iter()
            .copied()
            .find(|denomination| U256::from(*denomination) == amount)
            .ok_or(PrecompileError::InvalidDenomination(amount))
    }

    pub fn buy_input(&self, key: Bytes32) -> Vec<u8> {
        [self.selectors().buy.as_slice(), key.as_slice()].concat()
    }

    pub fn refund_input(&self, key: Bytes32, amount: U256) -> Vec<u8> {
        [
            self.selectors().refund.as_slice(),
            key.as_slice(),
            amount_word(amount).as_slice(),
        ]
        .concat()
    }

    pub fn decode(&self, input: &[u8]) -> Result<VaultCall, PrecompileError> {
        let selector = input
            .get(..SELECTOR_LEN)
            .ok_or(PrecompileError::UnknownSelector)?;
        let selectors = self.selectors();
        let word = |index: usize| -> Result<Bytes32, PrecompileError> {
            let start = SELECTOR_LEN.saturating_add(index.saturating_mul(WORD_SIZE));
            input
                .get(start..start.saturating_add(WORD_SIZE))
                .and_then(|bytes| Bytes32::try_from(bytes).ok())
                .ok_or(PrecompileError::InvalidInput("truncated vault call"))
        };

        if selector == selectors.buy {
            if input.len() != BUY_INPUT_LEN {
                return Err(PrecompileError::InvalidInput("buy takes one word"))
            }
            Ok(VaultCall::Buy { key: word(0)? })
        } else if selector == selectors.refund {
            if input.len() != REFUND_INPUT_LEN {
                return Err(PrecompileError::InvalidInput("refund takes two words"))
            }
            Ok(VaultCall::Refund {
                key: word(0)?,
                amount: U256::from_big_endian(word(1)?.as_slice()),
            })
        } else {
            Err(PrecompileError::UnknownSelector)
        }
    }

    fn buy(
        &self,
        key: Bytes32,
        context: &CallContext,
        state: &mut dyn StateDb,
    ) -> Result<(), PrecompileError> {
        if key.is_zero() {
            return Err(PrecompileError::InvalidInput("zero one-time key"))
        }
        let denomination = self.denomination(context.value)?;
        let holder = denomination_address(denomination);
        if !state.storage(&holder, &key).is_zero() {
            return Err(PrecompileError::KeyAlreadyUsed(key))
        }
        let counter = amount_word(context.value);
        let outstanding = U256::from_big_endian(
            state.storage(&OTA_BALANCE_STORAGE, &counter).as_slice(),
        )
        .checked_add(U256::one())
        .ok_or(PrecompileError::Overflow)?;

        state.transfer(&context.caller, &self.address(), context.value)?;
        state.set_storage(&holder, key, context.caller.into_word());
        state.set_storage(&OTA_BALANCE_STORAGE, counter, amount_word(outstanding));
        tracing::debug!(
            vault = %self.kind,
            %key,
            amount = %context.value,
            "Locked denomination"
        );
        Ok(())
    }

    fn refund(
        &self,
        key: Bytes32,
        amount: U256,
        context: &CallContext,
        state: &mut dyn StateDb,
    ) -> Result<(), PrecompileError> {
        if !context.value.is_zero() {
            return Err(PrecompileError::InvalidInput("refund carries no value"))
        }
        let denomination = self.denomination(amount)?;
        let holder = denomination_address(denomination);
        let buyer = state.storage(&holder, &key);
        if buyer.is_zero() {
            return Err(PrecompileError::UnknownKey(key))
        }
        if !state.storage(&OTA_IMAGE_STORAGE, &key).is_zero() {
            return Err(PrecompileError::KeyAlreadySpent(key))
        }

        state.transfer(&self.address(), &buyer.to_address(), amount)?;
        state.set_storage(&OTA_IMAGE_STORAGE, key, amount_word(U256::one()));
        let counter = amount_word(amount);
        let outstanding = U256::from_big_endian(
            state.storage(&OTA_BALANCE_STORAGE, &counter).as_slice(),
        )
        .saturating_sub(U256::one());
        state.set_storage(&OTA_BALANCE_STORAGE, counter, amount_word(outstanding));
        tracing::debug!(vault = %self.kind, %key, %amount, "Refunded denomination");
        Ok(())
    }

    /// Keys locked and not yet refunded for `amount`.
    pub fn outstanding(state: &dyn StateDb, amount: U256) -> U256 {
        U256::from_big_endian(
            state
                .storage(&OTA_BALANCE_STORAGE, &amount_word(amount))
                .as_slice(),
        )
    }
}

impl PrecompiledContract for Vault {
    fn name(&self) -> &'static str {
        match self.kind {
            VaultKind::Coin => "comb_coin",
            VaultKind::Stamp => "comb_stamp",
        }
    }

    fn required_gas(&self, input: &[u8]) -> u64 {
        linear_cost(input.len(), 25_000, 3)
    }

    fn run(
        &self,
        input: &[u8],
        context: &CallContext,
        state: &mut dyn StateDb,
    ) -> Result<Vec<u8>, PrecompileError> {
        match self.decode(input)? {
            VaultCall::Buy { key } => self.buy(key, context, state)?,
            VaultCall::Refund { key, amount } => self.refund(key, amount, context, state)?,
        }
        Ok(amount_word(U256::one()).to_vec())
    }

    fn validate_tx(&self, state: &dyn StateDb, tx: &TxView) -> Result<(), PrecompileError> {
        match self.decode(&tx.data)? {
            VaultCall::Buy { .. } => {
                self.denomination(tx.value)?;
            }
            VaultCall::Refund { amount, .. } => {
                self.denomination(amount)?;
                if !tx.value.is_zero() {
                    return Err(PrecompileError::InvalidInput("refund carries no value"))
                }
            }
        }
        let required = tx.max_cost().ok_or(PrecompileError::Overflow)?;
        let available = state.balance(&tx.from);
        if available < required {
            return Err(PrecompileError::InsufficientBalance {
                address: tx.from,
                required,
                available,
            })
        }
        Ok(())
    }
}
