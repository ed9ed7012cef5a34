//! # summon-engine
//!
//! Weighted card summoning with a persisted currency ledger.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: All randomness flows through an injectable
//!    `RandomSource`; a seeded `GameRng` reproduces every pull.
//!
//! 2. **Pay Before Receive**: A draw debits before crediting any card and
//!    persists once per draw, never leaving cards without payment.
//!
//! 3. **One Reveal at a Time**: The session lock rejects overlapping draws
//!    and is always released after the settle window, even when the
//!    presentation layer fails or goes away.
//!
//! ## Modules
//!
//! - `core`: RNG and configuration
//! - `cards`: Card definitions, rarity tiers, the catalog and its sources
//! - `selection`: Weighted random selection
//! - `economy`: Currency/inventory ledger and key-value persistence
//! - `summon`: Draw sessions, reports and notification sinks
//! - `error`: Error types

pub mod core;
pub mod cards;
pub mod selection;
pub mod economy;
pub mod summon;
pub mod error;

// Re-export commonly used types
pub use crate::core::{GameRng, RandomSource, SummonConfig};

pub use crate::cards::{
    CardDefinition, CardId, Catalog, CatalogSource, FileSource, Rarity, StaticSource,
};

pub use crate::selection::{select, select_index};

pub use crate::economy::{
    EconomyLedger, FileStore, KeyValueStore, LedgerSnapshot, MemoryStore, PersistStatus,
};

pub use crate::summon::{
    ChannelSink, DrawOutcome, LedgerHandle, LogSink, NotificationSink, PendingReveal,
    SessionState, SummonReport, SummonResult, SummonSession,
};

pub use crate::error::{
    ConfigError, InvariantViolation, LedgerError, LoadError, SinkError, SourceError, StoreError,
    SummonError,
};
