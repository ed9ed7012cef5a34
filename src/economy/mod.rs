//! Economy: the currency/inventory ledger and its persistence store.

pub mod ledger;
pub mod store;

pub use ledger::{
    EconomyLedger, Inventory, LedgerSnapshot, PersistStatus, BALANCE_KEY, DEFAULT_BALANCE,
    INVENTORY_KEY,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
