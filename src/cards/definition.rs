//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a drawable card:
//! its id, display name, rarity tier and draw weight. Presentation data
//! (art reference and any extra catalog fields) rides along untouched.
//!
//! Ownership counts live in the [`EconomyLedger`](crate::economy::EconomyLedger),
//! never on the definition.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;

use super::rarity::Rarity;

/// Weight used when a definition has no usable weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Unique identifier for a card definition.
///
/// Catalogs may use string or integer ids; integers are normalised to
/// their decimal string when loaded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for CardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Clamp a raw weight into the valid range.
///
/// Missing, non-finite and non-positive weights all become [`DEFAULT_WEIGHT`].
#[must_use]
pub fn normalize_weight(raw: Option<f64>) -> f64 {
    match raw {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => DEFAULT_WEIGHT,
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use summon_engine::cards::{CardDefinition, Rarity};
///
/// let dragon = CardDefinition::new("dragon", "Elder Dragon", Rarity::Legendary)
///     .with_weight(0.5)
///     .with_art("art/dragon.png");
///
/// assert_eq!(dragon.weight, 0.5);
/// assert!(dragon.is_notable(&Rarity::Legendary));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display).
    pub name: String,

    /// Rarity tier.
    pub rarity: Rarity,

    /// Relative draw weight. Always strictly positive.
    pub weight: f64,

    /// Art reference, passed through to the notification sink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art: Option<String>,

    /// Any other catalog fields, passed through unexamined.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl CardDefinition {
    /// Create a new card definition with the default weight.
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity,
            weight: DEFAULT_WEIGHT,
            art: None,
            metadata: Map::new(),
        }
    }

    /// Set the draw weight (builder pattern). Invalid weights fall back to
    /// [`DEFAULT_WEIGHT`].
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = normalize_weight(Some(weight));
        self
    }

    /// Set the art reference.
    #[must_use]
    pub fn with_art(mut self, art: impl Into<String>) -> Self {
        self.art = Some(art.into());
        self
    }

    /// Attach an opaque metadata field.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get a metadata field.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Is this card's rarity at or above `threshold`?
    #[must_use]
    pub fn is_notable(&self, threshold: &Rarity) -> bool {
        self.rarity.is_at_least(threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new("slime");
        assert_eq!(id.as_str(), "slime");
        assert_eq!(format!("{}", id), "slime");
        assert_eq!(CardId::from("slime"), id);
    }

    #[test]
    fn test_normalize_weight() {
        assert_eq!(normalize_weight(Some(2.5)), 2.5);
        assert_eq!(normalize_weight(None), DEFAULT_WEIGHT);
        assert_eq!(normalize_weight(Some(0.0)), DEFAULT_WEIGHT);
        assert_eq!(normalize_weight(Some(-3.0)), DEFAULT_WEIGHT);
        assert_eq!(normalize_weight(Some(f64::NAN)), DEFAULT_WEIGHT);
        assert_eq!(normalize_weight(Some(f64::INFINITY)), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_builder() {
        let card = CardDefinition::new("knight", "Knight", Rarity::Rare)
            .with_weight(4.0)
            .with_art("art/knight.png")
            .with_meta("element", "steel");

        assert_eq!(card.id, CardId::new("knight"));
        assert_eq!(card.weight, 4.0);
        assert_eq!(card.art.as_deref(), Some("art/knight.png"));
        assert_eq!(card.meta("element"), Some(&Value::from("steel")));
        assert_eq!(card.meta("missing"), None);
    }

    #[test]
    fn test_builder_rejects_bad_weight() {
        let card = CardDefinition::new("x", "X", Rarity::Common).with_weight(-1.0);
        assert_eq!(card.weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_notable() {
        let epic = CardDefinition::new("e", "E", Rarity::Epic);
        let mythic = CardDefinition::new("m", "M", Rarity::Mythic);

        assert!(!epic.is_notable(&Rarity::Legendary));
        assert!(mythic.is_notable(&Rarity::Legendary));
        assert!(epic.is_notable(&Rarity::Epic));
    }

    #[test]
    fn test_serialization() {
        let card = CardDefinition::new("k", "Knight", Rarity::Rare).with_weight(2.0);

        let json = serde_json::to_string(&card).unwrap();
        assert!(!json.contains("art"));
        assert!(!json.contains("metadata"));

        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);
    }
}
