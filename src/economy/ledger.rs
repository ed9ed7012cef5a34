//! Economy ledger: currency balance and card inventory.
//!
//! Every mutating operation persists both keys before returning. A failed
//! write is reported through [`PersistStatus::Failed`] and a warning, but
//! the in-memory change stands: gameplay stays available when the store
//! does not.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::store::KeyValueStore;
use crate::cards::CardId;
use crate::core::SummonConfig;
use crate::error::LedgerError;

/// Balance for a fresh or reset ledger.
pub const DEFAULT_BALANCE: u64 = 100;

/// Store key holding the currency balance.
pub const BALANCE_KEY: &str = "gems";

/// Store key holding the inventory map.
pub const INVENTORY_KEY: &str = "inventory";

/// Owned card counts. Absent ids are owned zero times.
///
/// Persistent map so snapshots for readers are O(1).
pub type Inventory = im::HashMap<CardId, u32>;

/// Outcome of writing the ledger to its store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistStatus {
    /// Both keys were written.
    Saved,
    /// The write failed; in-memory state was kept.
    Failed(String),
}

impl PersistStatus {
    /// Did the write succeed?
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistStatus::Saved)
    }
}

/// Immutable copy of the ledger for readers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Currency balance.
    pub balance: u64,
    /// Owned card counts.
    pub inventory: Inventory,
}

impl LedgerSnapshot {
    /// Copies owned of `id`.
    #[must_use]
    pub fn count(&self, id: &str) -> u32 {
        self.inventory.get(id).copied().unwrap_or(0)
    }

    /// Total cards owned across all ids.
    #[must_use]
    pub fn total_cards(&self) -> u64 {
        self.inventory.values().map(|&n| u64::from(n)).sum()
    }
}

/// Currency balance plus per-card inventory, persisted on every change.
pub struct EconomyLedger {
    store: Arc<dyn KeyValueStore>,
    balance: u64,
    inventory: Inventory,
    default_balance: u64,
}

impl EconomyLedger {
    /// Open a ledger from `store`, falling back to defaults for missing or
    /// unreadable keys.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Self::open_with_default(store, DEFAULT_BALANCE)
    }

    /// Like [`open`](Self::open) with a custom starting balance.
    pub fn open_with_default(store: Arc<dyn KeyValueStore>, default_balance: u64) -> Self {
        let balance = read_key::<u64>(store.as_ref(), BALANCE_KEY).unwrap_or(default_balance);
        let inventory = read_key::<Inventory>(store.as_ref(), INVENTORY_KEY).unwrap_or_default();
        debug!(
            "ledger opened: balance {balance}, {} distinct cards",
            inventory.len()
        );
        Self {
            store,
            balance,
            inventory,
            default_balance,
        }
    }

    /// Open with the starting balance from `config`.
    pub fn with_config(store: Arc<dyn KeyValueStore>, config: &SummonConfig) -> Self {
        Self::open_with_default(store, config.starting_balance)
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Balance restored by [`reset`](Self::reset).
    #[must_use]
    pub fn default_balance(&self) -> u64 {
        self.default_balance
    }

    /// Copies owned of `id`.
    #[must_use]
    pub fn count(&self, id: &str) -> u32 {
        self.inventory.get(id).copied().unwrap_or(0)
    }

    /// Owned card counts.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Total cards owned across all ids.
    #[must_use]
    pub fn total_cards(&self) -> u64 {
        self.inventory.values().map(|&n| u64::from(n)).sum()
    }

    /// Number of distinct cards owned at least once.
    #[must_use]
    pub fn distinct_cards(&self) -> usize {
        self.inventory.values().filter(|&&n| n > 0).count()
    }

    /// Cheap immutable copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.balance,
            inventory: self.inventory.clone(),
        }
    }

    /// Is `balance >= cost`?
    #[must_use]
    pub fn can_afford(&self, cost: u64) -> bool {
        self.balance >= cost
    }

    /// Take `cost` from the balance.
    pub fn debit(&mut self, cost: u64) -> Result<PersistStatus, LedgerError> {
        self.take(cost)?;
        Ok(self.persist())
    }

    /// Add `count` copies of `card_id` to the inventory.
    pub fn credit(&mut self, card_id: &CardId, count: u32) -> PersistStatus {
        self.add_card(card_id, count);
        self.persist()
    }

    /// Grant currency (reward and debug flows).
    pub fn add_currency(&mut self, amount: u64) -> PersistStatus {
        self.balance = self.balance.saturating_add(amount);
        self.persist()
    }

    /// Commit a draw: debit `cost`, credit one copy of each card, persist once.
    ///
    /// The debit is applied before any card is credited. Nothing changes if
    /// the balance cannot cover `cost`.
    pub fn commit_draw(&mut self, cost: u64, cards: &[CardId]) -> Result<PersistStatus, LedgerError> {
        self.take(cost)?;
        for card_id in cards {
            self.add_card(card_id, 1);
        }
        debug!(
            "draw committed: -{cost}, {} cards, balance now {}",
            cards.len(),
            self.balance
        );
        Ok(self.persist())
    }

    /// Restore the default balance, clear the inventory and persist.
    pub fn reset(&mut self) -> PersistStatus {
        self.balance = self.default_balance;
        self.inventory = Inventory::new();
        self.persist()
    }

    /// Write balance and inventory to the store.
    pub fn persist(&self) -> PersistStatus {
        match self.write_all() {
            Ok(()) => PersistStatus::Saved,
            Err(reason) => {
                warn!("failed to persist ledger: {reason}");
                PersistStatus::Failed(reason)
            }
        }
    }

    fn take(&mut self, cost: u64) -> Result<(), LedgerError> {
        if !self.can_afford(cost) {
            return Err(LedgerError::InsufficientFunds {
                required: cost,
                available: self.balance,
            });
        }
        self.balance -= cost;
        Ok(())
    }

    fn add_card(&mut self, card_id: &CardId, count: u32) {
        let entry = self.inventory.entry(card_id.clone()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    fn write_all(&self) -> Result<(), String> {
        let balance = serde_json::to_string(&self.balance).map_err(|err| err.to_string())?;
        // Sorted so the persisted text is stable across runs
        let sorted: BTreeMap<&CardId, &u32> = self.inventory.iter().collect();
        let inventory = serde_json::to_string(&sorted).map_err(|err| err.to_string())?;

        self.store
            .set(BALANCE_KEY, &balance)
            .map_err(|err| err.to_string())?;
        self.store
            .set(INVENTORY_KEY, &inventory)
            .map_err(|err| err.to_string())
    }
}

impl std::fmt::Debug for EconomyLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EconomyLedger")
            .field("balance", &self.balance)
            .field("inventory", &self.inventory)
            .field("default_balance", &self.default_balance)
            .finish_non_exhaustive()
    }
}

fn read_key<T: serde::de::DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!("failed to read {key} from store, using default: {err}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("ignoring corrupt {key} in store: {err}");
            None
        }
    }
}
