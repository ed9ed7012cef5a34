//! Error types for the summon engine.
//!
//! Recoverable conditions (`InsufficientFunds`, `AlreadyInProgress`,
//! `NotLoaded`) are reported to the caller synchronously and never change
//! state. `InvariantViolation` marks programmer errors that correct session
//! gating makes unreachable.

use std::path::PathBuf;

use thiserror::Error;

/// Failure fetching raw catalog data from a [`CatalogSource`](crate::cards::CatalogSource).
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading the backing file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The source is unavailable for another reason.
    #[error("{0}")]
    Unavailable(String),
}

/// Errors raised while loading a card catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The catalog source could not be fetched.
    #[error("catalog source unreachable: {0}")]
    Unreachable(#[from] SourceError),

    /// The payload was not a valid definition list.
    #[error("malformed catalog: {0}")]
    Malformed(String),
}

/// Errors raised by a key-value persistence store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing a key failed.
    #[error("store i/o failed for key {key:?}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store cannot currently accept reads or writes.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Programmer errors: states correct session gating never produces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// The selector was handed an empty catalog.
    #[error("weighted selection on an empty catalog")]
    EmptyCatalog,

    /// A card weight was not strictly positive after validation.
    #[error("card {id:?} has non-positive weight {weight}")]
    NonPositiveWeight {
        /// Offending card id.
        id: String,
        /// The weight found.
        weight: f64,
    },
}

/// Errors from economy ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Balance is lower than the requested debit.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// The amount required.
        required: u64,
        /// The balance available.
        available: u64,
    },
}

/// Failure reported by a [`NotificationSink`](crate::summon::NotificationSink).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The sink refused the report.
    #[error("sink rejected report: {0}")]
    Rejected(String),

    /// The receiving end is gone.
    #[error("sink disconnected")]
    Disconnected,
}

/// Errors returned when requesting a summon.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummonError {
    /// No cards are loaded.
    #[error("card pool not loaded")]
    NotLoaded,

    /// Not enough currency for the requested draw.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// Total cost of the draw.
        required: u64,
        /// Balance at the time of the request.
        available: u64,
    },

    /// A draw is already running its reveal.
    #[error("a summon is already in progress")]
    AlreadyInProgress,

    /// Draw count must be at least one.
    #[error("draw count must be at least 1")]
    InvalidDrawCount,

    /// Internal invariant broken.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl From<LedgerError> for SummonError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                required,
                available,
            } => SummonError::InsufficientFunds {
                required,
                available,
            },
        }
    }
}

/// Errors loading or validating [`SummonConfig`](crate::core::SummonConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML text could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
