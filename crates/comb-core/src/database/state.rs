use crate::database::Database;
use comb_core_storage::{
    structured_storage::StorageAsRef,
    tables::{
        Accounts,
        ContractsRawCode,
        ContractsState,
    },
    Result as StorageResult,
    StorageKey,
};
use comb_core_types::{
    entities::account::Account,
    Address,
    Bytes32,
};

impl Database {
    pub fn account(&self, address: &Address) -> StorageResult<Option<Account>> {
        self.storage::<Accounts>().get(address)
    }

    pub fn contract_code(&self, code_hash: &Bytes32) -> StorageResult<Option<Vec<u8>>> {
        self.storage::<ContractsRawCode>().get(code_hash)
    }

    pub fn contract_state(&self, key: &StorageKey) -> StorageResult<Option<Bytes32>> {
        self.storage::<ContractsState>().get(key)
    }
}
