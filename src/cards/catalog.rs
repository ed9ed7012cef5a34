//! Card catalog: the drawable pool.
//!
//! A `Catalog` is built once from a definition list and never changes
//! afterwards. Entry order is preserved (the selector walks it in order)
//! and the total weight is computed at load time.

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use tracing::info;

use super::definition::{normalize_weight, CardDefinition, CardId};
use super::rarity::Rarity;
use super::source::CatalogSource;
use crate::error::LoadError;

const REQUIRED_FIELDS: [&str; 3] = ["id", "name", "rarity"];

/// Immutable, ordered set of drawable cards.
///
/// ## Example
///
/// ```
/// use summon_engine::cards::Catalog;
///
/// let catalog = Catalog::from_json_str(r#"[
///     {"id": "a", "name": "Slime", "rarity": "common", "weight": 1},
///     {"id": "b", "name": "Wyrm", "rarity": "legendary", "weight": 3}
/// ]"#).unwrap();
///
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.total_weight(), 4.0);
/// assert_eq!(catalog.probability("b"), Some(0.75));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: Vec<CardDefinition>,
    index: FxHashMap<CardId, usize>,
    total_weight: f64,
}

impl Catalog {
    /// An empty catalog (nothing loaded yet).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fetch and parse a catalog from `source`.
    pub fn load<S: CatalogSource + ?Sized>(source: &S) -> Result<Self, LoadError> {
        let text = source.fetch()?;
        let catalog = Self::from_json_str(&text)?;
        info!(
            "card pool loaded from {}: {} cards, total weight {}",
            source.describe(),
            catalog.len(),
            catalog.total_weight
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| LoadError::Malformed(format!("invalid JSON: {err}")))?;
        Self::from_value(value)
    }

    /// Build a catalog from an already-parsed JSON value.
    ///
    /// The value must be an array of objects, each carrying `id`, `name`
    /// and `rarity`. `weight` and `art` are optional; other fields are kept
    /// as opaque metadata.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let entries = match value {
            Value::Array(entries) => entries,
            other => {
                return Err(LoadError::Malformed(format!(
                    "expected a list of cards, found {}",
                    json_kind(&other)
                )))
            }
        };

        let cards = entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| parse_entry(position, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_definitions(cards)
    }

    /// Build a catalog from definitions.
    ///
    /// Weights are re-normalised; duplicate ids and a total weight that
    /// overflows to infinity are rejected.
    pub fn from_definitions(mut cards: Vec<CardDefinition>) -> Result<Self, LoadError> {
        let mut index = FxHashMap::default();
        let mut total_weight = 0.0;

        for (position, card) in cards.iter_mut().enumerate() {
            card.weight = normalize_weight(Some(card.weight));
            total_weight += card.weight;
            if index.insert(card.id.clone(), position).is_some() {
                return Err(LoadError::Malformed(format!(
                    "duplicate card id {:?}",
                    card.id.as_str()
                )));
            }
        }

        if !total_weight.is_finite() {
            return Err(LoadError::Malformed(format!(
                "total weight of {} cards overflows",
                cards.len()
            )));
        }

        Ok(Self {
            cards,
            index,
            total_weight,
        })
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Sum of all weights, computed at load.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Cards in catalog order.
    #[must_use]
    pub fn cards(&self) -> &[CardDefinition] {
        &self.cards
    }

    /// Iterate over cards in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.iter()
    }

    /// Look up a card by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CardDefinition> {
        self.index.get(id).map(|&position| &self.cards[position])
    }

    /// Check if a card id is in the pool.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Chance of drawing `id` on a single pull.
    #[must_use]
    pub fn probability(&self, id: &str) -> Option<f64> {
        self.get(id).map(|card| card.weight / self.total_weight)
    }

    /// Chance of a single pull landing at or above `threshold`.
    #[must_use]
    pub fn probability_at_least(&self, threshold: &Rarity) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let notable: f64 = self
            .cards
            .iter()
            .filter(|card| card.is_notable(threshold))
            .map(|card| card.weight)
            .sum();
        notable / self.total_weight
    }
}

fn parse_entry(position: usize, entry: Value) -> Result<CardDefinition, LoadError> {
    let mut fields = match entry {
        Value::Object(fields) => fields,
        other => {
            return Err(LoadError::Malformed(format!(
                "entry {position} is {}, expected an object",
                json_kind(&other)
            )))
        }
    };

    for field in REQUIRED_FIELDS {
        if fields.get(field).map_or(true, Value::is_null) {
            return Err(LoadError::Malformed(format!(
                "entry {position} is missing `{field}`"
            )));
        }
    }

    let id = match fields.remove("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => CardId::new(id),
        Some(Value::Number(id)) => CardId::new(id.to_string()),
        _ => {
            return Err(LoadError::Malformed(format!(
                "entry {position} has an invalid `id`"
            )))
        }
    };
    let name = take_string(&mut fields, "name")
        .ok_or_else(|| LoadError::Malformed(format!("entry {position} has a non-text `name`")))?;
    let rarity = take_string(&mut fields, "rarity")
        .map(|label| Rarity::parse(&label))
        .ok_or_else(|| {
            LoadError::Malformed(format!("entry {position} has a non-text `rarity`"))
        })?;

    let weight = normalize_weight(fields.remove("weight").and_then(|w| w.as_f64()));

    let art = match fields.remove("art") {
        Some(Value::String(art)) => Some(art),
        Some(Value::Null) | None => None,
        Some(other) => {
            fields.insert("art".to_string(), other);
            None
        }
    };

    Ok(CardDefinition {
        id,
        name,
        rarity,
        weight,
        art,
        metadata: fields,
    })
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
