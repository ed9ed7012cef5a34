//! Persistence integration tests.
//!
//! Exercise the ledger and catalog against real files in a temp directory.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use summon_engine::cards::{Catalog, FileSource, Rarity};
use summon_engine::core::SummonConfig;
use summon_engine::economy::{
    EconomyLedger, FileStore, KeyValueStore, BALANCE_KEY, DEFAULT_BALANCE, INVENTORY_KEY,
};
use summon_engine::error::LoadError;
use summon_engine::summon::{LogSink, SummonSession};
use tempfile::tempdir;

const CARDS_JSON: &str = r#"[
    {"id": "slime", "name": "Slime", "rarity": "common", "weight": 60},
    {"id": "knight", "name": "Knight", "rarity": "rare", "weight": 30},
    {"id": "wyrm", "name": "Wyrm", "rarity": "legendary", "weight": 9, "art": "wyrm.png"},
    {"id": 404, "name": "Glitch", "rarity": "mythic", "weight": 1, "season": 2}
]"#;

fn instant_config() -> SummonConfig {
    SummonConfig::default()
        .with_seed(7)
        .with_settle(Duration::ZERO, Duration::ZERO)
}

/// Test loading `cards.json` from disk.
#[test]
fn test_catalog_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cards.json");
    std::fs::write(&path, CARDS_JSON).unwrap();

    let catalog = Catalog::load(&FileSource::new(&path)).unwrap();

    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.total_weight(), 100.0);
    assert_eq!(catalog.probability("knight"), Some(0.3));
    assert!((catalog.probability_at_least(&Rarity::Legendary) - 0.1).abs() < 1e-12);

    let glitch = catalog.get("404").unwrap();
    assert_eq!(glitch.rarity, Rarity::Mythic);
    assert_eq!(glitch.meta("season"), Some(&serde_json::json!(2)));
}

/// Test that a missing catalog file is reported as unreachable.
#[test]
fn test_missing_catalog_file() {
    let dir = tempdir().unwrap();
    let err = Catalog::load(&FileSource::new(dir.path().join("cards.json"))).unwrap_err();
    assert!(matches!(err, LoadError::Unreachable(_)));
}

/// Test that draws survive a restart.
#[tokio::test]
async fn test_draws_survive_reopen() {
    let dir = tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    let catalog = Catalog::from_json_str(CARDS_JSON).unwrap();

    let ledger = Arc::new(Mutex::new(EconomyLedger::open(store.clone())));
    let session = SummonSession::new(catalog, ledger, Arc::new(LogSink), instant_config())
        .unwrap();

    let outcome = session.summon_multi().await.unwrap();
    assert!(outcome.persist.is_saved());
    let before = session.ledger().lock().snapshot();
    drop(session);

    let reopened = EconomyLedger::open(Arc::new(FileStore::new(dir.path())));
    assert_eq!(reopened.snapshot(), before);
    assert_eq!(reopened.balance(), 0);
    assert_eq!(reopened.total_cards(), 10);
}

/// Test that a reset is what the next launch sees.
#[tokio::test]
async fn test_reset_survives_reopen() {
    let dir = tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    let catalog = Catalog::from_json_str(CARDS_JSON).unwrap();

    let ledger = Arc::new(Mutex::new(EconomyLedger::open(store.clone())));
    let session = SummonSession::new(catalog, ledger, Arc::new(LogSink), instant_config())
        .unwrap();
    session.summon_single().await.unwrap();
    session.summon_single().await.unwrap();
    assert!(session.reset().unwrap().is_saved());

    let reopened = EconomyLedger::open(store.clone());
    assert_eq!(reopened.balance(), DEFAULT_BALANCE);
    assert!(reopened.inventory().is_empty());
    assert_eq!(store.get(INVENTORY_KEY).unwrap().as_deref(), Some("{}"));
}

/// Test that hand-edited garbage in the save files falls back to defaults.
#[test]
fn test_corrupt_save_files() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.set(BALANCE_KEY, "lots").unwrap();
    store.set(INVENTORY_KEY, "{\"slime\": -1}").unwrap();

    let ledger = EconomyLedger::open(Arc::new(store));
    assert_eq!(ledger.balance(), DEFAULT_BALANCE);
    assert!(ledger.inventory().is_empty());
}

/// Test that an unwritable save directory keeps the game playable.
#[tokio::test]
async fn test_unwritable_store_keeps_playing() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("save");
    std::fs::write(&blocker, "not a directory").unwrap();

    let catalog = Catalog::from_json_str(CARDS_JSON).unwrap();
    let ledger = Arc::new(Mutex::new(EconomyLedger::open(Arc::new(FileStore::new(
        &blocker,
    )))));
    let session = SummonSession::new(catalog, ledger, Arc::new(LogSink), instant_config())
        .unwrap();

    let outcome = session.summon_single().await.unwrap();
    assert!(!outcome.persist.is_saved());
    assert_eq!(outcome.balance_after, 90);
    assert_eq!(session.ledger().lock().total_cards(), 1);
    assert!(!session.is_locked());
}
