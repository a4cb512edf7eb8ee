use crate::{
    Genesis,
    GenesisAccount,
    GenesisAlloc,
};
use comb_core_types::{
    blockchain::{
        block::Block,
        header::BlockHeader,
        primitives::BlockId,
    },
    crypto::Hasher,
    entities::account::Account,
    merkle::{
        self,
        MerkleRootCalculator,
    },
    Address,
    BlockHeight,
    Bytes32,
    U256,
};
use std::collections::BTreeMap;

/// Gas limit of the genesis block when the specification leaves it at zero.
pub const GENESIS_GAS_LIMIT: u64 = 4_712_388;
/// Difficulty of the genesis block when the specification leaves it unset.
pub const GENESIS_DIFFICULTY: u64 = 131_072;

const ACCOUNT_LEAF_LEN: usize = Address::LEN + 32 + 8 + 2 * Bytes32::LEN;

/// Values that commit to their content with a single root.
pub trait GenesisCommitment {
    fn root(&self) -> Bytes32;
}

/// The state of one account as the genesis block leaves it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountState {
    pub balance: U256,
    pub nonce: u64,
    pub code: Vec<u8>,
    /// Non-zero storage slots. A zero value is the same as an absent slot.
    pub storage: BTreeMap<Bytes32, Bytes32>,
}

impl AccountState {
    pub fn code_hash(&self) -> Bytes32 {
        Hasher::hash(&self.code)
    }

    /// The account record persisted in the accounts table.
    pub fn to_account(&self) -> Account {
        Account {
            balance: self.balance,
            nonce: self.nonce,
            code_hash: self.code_hash(),
            storage_root: self.root(),
        }
    }

    fn leaf(&self, address: &Address) -> Vec<u8> {
        let mut balance = [0u8; 32];
        self.balance.to_big_endian(&mut balance);
        let mut leaf = Vec::with_capacity(ACCOUNT_LEAF_LEN);
        leaf.extend_from_slice(address.as_slice());
        leaf.extend_from_slice(&balance);
        leaf.extend_from_slice(&self.nonce.to_be_bytes());
        leaf.extend_from_slice(self.code_hash().as_slice());
        leaf.extend_from_slice(self.root().as_slice());
        leaf
    }
}

impl From<&GenesisAccount> for AccountState {
    fn from(account: &GenesisAccount) -> Self {
        Self {
            balance: account.balance,
            nonce: account.nonce,
            code: account.code.clone(),
            storage: account
                .storage
                .iter()
                .filter(|(_, value)| !value.is_zero())
                .map(|(key, value)| (*key, *value))
                .collect(),
        }
    }
}

impl GenesisCommitment for AccountState {
    /// The storage root: slots in key order, each leaf the key followed by the value.
    fn root(&self) -> Bytes32 {
        let mut calculator = MerkleRootCalculator::new();
        for (key, value) in &self.storage {
            let mut leaf = [0u8; 2 * Bytes32::LEN];
            leaf[..Bytes32::LEN].copy_from_slice(key.as_slice());
            leaf[Bytes32::LEN..].copy_from_slice(value.as_slice());
            calculator.push(&leaf);
        }
        calculator.root()
    }
}

/// The complete state produced by a genesis specification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateImage {
    accounts: BTreeMap<Address, AccountState>,
}

impl StateImage {
    pub fn from_alloc(alloc: &GenesisAlloc) -> Self {
        Self {
            accounts: alloc
                .iter()
                .map(|(address, account)| (*address, AccountState::from(account)))
                .collect(),
        }
    }

    pub fn accounts(&self) -> &BTreeMap<Address, AccountState> {
        &self.accounts
    }

    pub fn account(&self, address: &Address) -> Option<&AccountState> {
        self.accounts.get(address)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl GenesisCommitment for StateImage {
    fn root(&self) -> Bytes32 {
        if self.accounts.is_empty() {
            return merkle::empty_root()
        }
        MerkleRootCalculator::root_from_iterator(
            self.accounts
                .iter()
                .map(|(address, account)| account.leaf(address)),
        )
    }
}

impl Genesis {
    pub fn effective_gas_limit(&self) -> u64 {
        match self.gas_limit {
            0 => GENESIS_GAS_LIMIT,
            gas_limit => gas_limit,
        }
    }

    pub fn effective_difficulty(&self) -> U256 {
        match self.difficulty {
            Some(difficulty) if !difficulty.is_zero() => difficulty,
            _ => U256::from(GENESIS_DIFFICULTY),
        }
    }

    /// Builds the genesis block and the state it commits to. Building is pure: the
    /// same specification always gives the same block.
    pub fn to_block(&self) -> (Block, StateImage) {
        let state = StateImage::from_alloc(&self.alloc);
        let header = BlockHeader {
            parent_hash: self.parent_hash,
            coinbase: self.coinbase,
            state_root: state.root(),
            difficulty: self.effective_difficulty(),
            number: BlockHeight::new(self.number),
            gas_limit: self.effective_gas_limit(),
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            mix_hash: self.mix_hash,
            nonce: self.nonce,
            ..Default::default()
        };
        (Block::new(header, vec![]), state)
    }

    pub fn block_hash(&self) -> BlockId {
        self.to_block().0.id()
    }
}
