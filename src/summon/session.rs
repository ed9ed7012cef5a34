//! Summon session: the draw transaction and its reveal lock.
//!
//! ## State machine
//!
//! ```text
//! Idle --begin_draw(n)--> Locked --settle delay elapsed--> Idle
//! ```
//!
//! `begin_draw` checks preconditions, selects `n` cards, commits them to
//! the ledger (debit first, single persist) and emits one report to the
//! sink, all before returning. The session then stays `Locked` until the
//! returned [`PendingReveal`] is settled or dropped. Requests arriving while
//! `Locked` fail with [`SummonError::AlreadyInProgress`]; they are never
//! queued.
//!
//! Rejected requests (`NotLoaded`, `InsufficientFunds`, `InvalidDrawCount`)
//! leave both the session and the ledger untouched.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::report::{SummonReport, SummonResult, SummonResults};
use super::sink::NotificationSink;
use crate::cards::{CardId, Catalog};
use crate::core::{GameRng, RandomSource, SummonConfig};
use crate::economy::{EconomyLedger, PersistStatus};
use crate::error::{ConfigError, SummonError};
use crate::selection::select;

/// Shared handle to the host-owned ledger.
pub type LedgerHandle = Arc<Mutex<EconomyLedger>>;

/// Lock state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Ready for a new draw.
    #[default]
    Idle,
    /// A draw is committed and its reveal window is running.
    Locked,
}

/// What a completed draw did.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawOutcome {
    /// The report sent to the sink.
    pub report: SummonReport,
    /// Total currency spent.
    pub cost: u64,
    /// Balance after the debit.
    pub balance_after: u64,
    /// Whether the ledger write succeeded.
    pub persist: PersistStatus,
    /// Whether the sink accepted the report.
    pub delivered: bool,
}

/// Returns the session to `Idle` when dropped.
#[derive(Debug)]
struct LockRelease<'s> {
    state: &'s Mutex<SessionState>,
}

impl Drop for LockRelease<'_> {
    fn drop(&mut self) {
        *self.state.lock() = SessionState::Idle;
        debug!("summon lock released");
    }
}

/// A committed draw whose reveal window has not yet elapsed.
///
/// Awaiting [`settle`](Self::settle) waits out the delay and unlocks the
/// session. Dropping it early (host teardown, cancelled task) unlocks
/// immediately, so the session can never stay locked forever.
#[must_use = "the session stays locked until this is settled or dropped"]
#[derive(Debug)]
pub struct PendingReveal<'s> {
    outcome: DrawOutcome,
    delay: Duration,
    release: LockRelease<'s>,
}

impl<'s> PendingReveal<'s> {
    /// The committed draw.
    #[must_use]
    pub fn outcome(&self) -> &DrawOutcome {
        &self.outcome
    }

    /// Length of the reveal window.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the reveal window, unlock, and hand back the outcome.
    pub async fn settle(self) -> DrawOutcome {
        let PendingReveal {
            outcome,
            delay,
            release,
        } = self;
        tokio::time::sleep(delay).await;
        drop(release);
        outcome
    }
}

/// Orchestrates draws against a catalog and a ledger.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use parking_lot::Mutex;
/// use summon_engine::cards::Catalog;
/// use summon_engine::core::SummonConfig;
/// use summon_engine::economy::{EconomyLedger, MemoryStore};
/// use summon_engine::summon::{LogSink, SummonSession};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let catalog = Catalog::from_json_str(
///     r#"[{"id": "a", "name": "Slime", "rarity": "common"}]"#,
/// ).unwrap();
/// let ledger = Arc::new(Mutex::new(EconomyLedger::open(Arc::new(MemoryStore::new()))));
/// let config = SummonConfig::default()
///     .with_seed(1)
///     .with_settle(Duration::ZERO, Duration::ZERO);
///
/// let session = SummonSession::new(catalog, ledger.clone(), Arc::new(LogSink), config).unwrap();
/// let outcome = session.summon_single().await.unwrap();
///
/// assert_eq!(outcome.report.draw_count, 1);
/// assert_eq!(ledger.lock().balance(), 90);
/// # });
/// ```
pub struct SummonSession<R = GameRng> {
    catalog: RwLock<Arc<Catalog>>,
    ledger: LedgerHandle,
    sink: Arc<dyn NotificationSink>,
    config: SummonConfig,
    rng: Mutex<R>,
    state: Mutex<SessionState>,
}

impl SummonSession<GameRng> {
    /// Create a session using a [`GameRng`] seeded from `config.seed`
    /// (or OS entropy when unset).
    ///
    /// Fails if `config` does not pass [`SummonConfig::validate`].
    pub fn new(
        catalog: Catalog,
        ledger: LedgerHandle,
        sink: Arc<dyn NotificationSink>,
        config: SummonConfig,
    ) -> Result<Self, ConfigError> {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Self::with_rng(catalog, ledger, sink, config, rng)
    }
}

impl<R: RandomSource + Send> SummonSession<R> {
    /// Create a session with an explicit random source.
    ///
    /// Fails if `config` does not pass [`SummonConfig::validate`].
    pub fn with_rng(
        catalog: Catalog,
        ledger: LedgerHandle,
        sink: Arc<dyn NotificationSink>,
        config: SummonConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog: RwLock::new(Arc::new(catalog)),
            ledger,
            sink,
            config,
            rng: Mutex::new(rng),
            state: Mutex::new(SessionState::Idle),
        })
    }

    /// Current lock state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Is a reveal in flight?
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state() == SessionState::Locked
    }

    /// The active catalog.
    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read())
    }

    /// Ledger handle, for reads and host-side flows.
    #[must_use]
    pub fn ledger(&self) -> &LedgerHandle {
        &self.ledger
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &SummonConfig {
        &self.config
    }

    /// Swap in a freshly loaded catalog. Refused during a reveal.
    pub fn install_catalog(&self, catalog: Catalog) -> Result<(), SummonError> {
        let state = self.state.lock();
        if *state == SessionState::Locked {
            return Err(SummonError::AlreadyInProgress);
        }
        info!("installing catalog with {} cards", catalog.len());
        *self.catalog.write() = Arc::new(catalog);
        Ok(())
    }

    /// Draw one card at `unit_cost`, then wait the single-pull reveal.
    pub async fn summon_single(&self) -> Result<DrawOutcome, SummonError> {
        self.request_draw(1, self.config.single_settle()).await
    }

    /// Draw `multi_draw_size` cards, then wait the multi-pull reveal.
    pub async fn summon_multi(&self) -> Result<DrawOutcome, SummonError> {
        self.request_draw(self.config.multi_draw_size, self.config.multi_settle())
            .await
    }

    /// Draw `count` cards and hold the lock for `settle`.
    pub async fn request_draw(
        &self,
        count: u32,
        settle: Duration,
    ) -> Result<DrawOutcome, SummonError> {
        let pending = self.begin_draw(count, settle)?;
        Ok(pending.settle().await)
    }

    /// Run the draw transaction and lock the session.
    ///
    /// Everything up to and including the sink notification happens before
    /// this returns; the returned [`PendingReveal`] owns the lock.
    pub fn begin_draw(
        &self,
        count: u32,
        settle: Duration,
    ) -> Result<PendingReveal<'_>, SummonError> {
        let mut state = self.state.lock();
        if *state == SessionState::Locked {
            return Err(SummonError::AlreadyInProgress);
        }
        if count == 0 {
            return Err(SummonError::InvalidDrawCount);
        }

        let catalog = self.catalog();
        if catalog.is_empty() {
            return Err(SummonError::NotLoaded);
        }

        let cost = self.config.cost_of(count);
        let mut ledger = self.ledger.lock();
        if !ledger.can_afford(cost) {
            return Err(SummonError::InsufficientFunds {
                required: cost,
                available: ledger.balance(),
            });
        }

        let picks = {
            let mut rng = self.rng.lock();
            (0..count)
                .map(|_| select(&catalog, &mut *rng))
                .collect::<Result<SmallVec<[_; 10]>, _>>()?
        };

        let threshold = &self.config.notable_threshold;
        let mut seen = FxHashSet::default();
        let results: SummonResults = picks
            .iter()
            .map(|card| SummonResult {
                card: (*card).clone(),
                notable: card.is_notable(threshold),
                first_copy: ledger.count(card.id.as_str()) == 0 && seen.insert(&card.id),
            })
            .collect();
        let ids: Vec<CardId> = picks.iter().map(|card| card.id.clone()).collect();

        let persist = ledger.commit_draw(cost, &ids)?;
        let balance_after = ledger.balance();
        drop(ledger);

        *state = SessionState::Locked;
        drop(state);
        let release = LockRelease { state: &self.state };

        let report = SummonReport::new(results);
        debug!(
            "summoned {} cards for {cost}, balance now {balance_after}",
            report.draw_count
        );
        for result in report.notable() {
            debug!("rare pull: {} ({})", result.card.name, result.card.rarity);
        }

        let delivered = self.notify(&report);

        Ok(PendingReveal {
            outcome: DrawOutcome {
                report,
                cost,
                balance_after,
                persist,
                delivered,
            },
            delay: settle,
            release,
        })
    }

    /// Add `grant_amount` currency to the ledger.
    pub fn grant_currency(&self) -> PersistStatus {
        self.ledger.lock().add_currency(self.config.grant_amount)
    }

    /// Reset the ledger to defaults. Refused during a reveal.
    pub fn reset(&self) -> Result<PersistStatus, SummonError> {
        let state = self.state.lock();
        if *state == SessionState::Locked {
            return Err(SummonError::AlreadyInProgress);
        }
        info!("resetting ledger");
        Ok(self.ledger.lock().reset())
    }

    fn notify(&self, report: &SummonReport) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(|| self.sink.on_summon(report))) {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                warn!("notification sink failed: {err}");
                false
            }
            Err(_) => {
                warn!("notification sink panicked");
                false
            }
        }
    }
}
