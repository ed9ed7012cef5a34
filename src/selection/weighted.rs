//! Weighted random selection over a catalog.
//!
//! Each card is drawn with probability `weight / total_weight`. The walk
//! draws `r` in `[0, total)` and returns the first card whose running
//! cumulative weight is strictly greater than `r`. If rounding lets the
//! walk run off the end, the last card is returned, so selection on a
//! non-empty catalog always yields a member of that catalog.

use crate::cards::{Catalog, CardDefinition};
use crate::core::RandomSource;
use crate::error::InvariantViolation;

/// Select one card from `catalog`.
///
/// ## Example
///
/// ```
/// use summon_engine::cards::Catalog;
/// use summon_engine::core::GameRng;
/// use summon_engine::selection::select;
///
/// let catalog = Catalog::from_json_str(r#"[
///     {"id": "a", "name": "A", "rarity": "common"},
///     {"id": "b", "name": "B", "rarity": "rare", "weight": 3}
/// ]"#).unwrap();
///
/// let mut rng = GameRng::new(42);
/// let card = select(&catalog, &mut rng).unwrap();
/// assert!(catalog.contains(card.id.as_str()));
/// ```
pub fn select<'c, R>(catalog: &'c Catalog, rng: &mut R) -> Result<&'c CardDefinition, InvariantViolation>
where
    R: RandomSource + ?Sized,
{
    let index = select_index(catalog, rng)?;
    Ok(&catalog.cards()[index])
}

/// Select one card and return its position in catalog order.
pub fn select_index<R>(catalog: &Catalog, rng: &mut R) -> Result<usize, InvariantViolation>
where
    R: RandomSource + ?Sized,
{
    let cards = catalog.cards();
    let last = cards.len().checked_sub(1).ok_or(InvariantViolation::EmptyCatalog)?;

    let r = rng.uniform(catalog.total_weight());
    let mut cumulative = 0.0;

    for (index, card) in cards.iter().enumerate() {
        if card.weight <= 0.0 || card.weight.is_nan() {
            return Err(InvariantViolation::NonPositiveWeight {
                id: card.id.to_string(),
                weight: card.weight,
            });
        }
        cumulative += card.weight;
        if cumulative > r {
            return Ok(index);
        }
    }

    // Floating point edge case (or r >= total) - fall back to the last entry
    Ok(last)
}
