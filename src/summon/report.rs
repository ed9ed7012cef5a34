//! Draw results handed to the notification sink.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardDefinition, Rarity};

/// One pulled card plus presentation flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonResult {
    /// The card drawn.
    pub card: CardDefinition,

    /// Rarity is at or above the notable threshold.
    pub notable: bool,

    /// The card was not owned before this draw.
    pub first_copy: bool,
}

/// Ordered results of one draw.
///
/// SmallVec keeps a standard ten-pull off the heap.
pub type SummonResults = SmallVec<[SummonResult; 10]>;

/// Payload emitted once per completed draw, before the settle delay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonReport {
    /// Results in draw order.
    pub results: SummonResults,

    /// At least one result is notable.
    pub has_rare_trigger: bool,

    /// Number of cards drawn.
    pub draw_count: usize,
}

impl SummonReport {
    /// Build a report, deriving the rare trigger from the results.
    #[must_use]
    pub fn new(results: SummonResults) -> Self {
        let has_rare_trigger = results.iter().any(|result| result.notable);
        let draw_count = results.len();
        Self {
            results,
            has_rare_trigger,
            draw_count,
        }
    }

    /// Results that raised the rare trigger.
    pub fn notable(&self) -> impl Iterator<Item = &SummonResult> {
        self.results.iter().filter(|result| result.notable)
    }

    /// Highest rarity in the draw.
    #[must_use]
    pub fn best_rarity(&self) -> Option<&Rarity> {
        self.results
            .iter()
            .map(|result| &result.card.rarity)
            .max_by_key(|rarity| rarity.rank())
    }

    /// One-line summary for a "recent pulls" feed.
    #[must_use]
    pub fn headline(&self) -> String {
        match self.results.as_slice() {
            [single] => format!("You got: {} ({})", single.card.name, single.card.rarity),
            results => format!("You pulled {} cards!", results.len()),
        }
    }
}
