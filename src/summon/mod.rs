//! Summoning: the draw transaction, its reveal lock, and reporting.
//!
//! ## Key Types
//!
//! - `SummonSession`: Validates, debits, selects, commits and locks
//! - `PendingReveal`: Owns the lock for the settle window
//! - `SummonReport`: Ordered results plus the rare trigger
//! - `NotificationSink`: Presentation collaborator

mod report;
mod session;
mod sink;

pub use report::{SummonReport, SummonResult, SummonResults};
pub use session::{DrawOutcome, LedgerHandle, PendingReveal, SessionState, SummonSession};
pub use sink::{ChannelSink, LogSink, NotificationSink};
