//! Card system: definitions, rarity tiers, the catalog and its sources.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `Rarity`: Tier label, ordered common → mythic
//! - `CardDefinition`: Static card data with draw weight
//! - `Catalog`: Immutable, ordered drawable pool
//! - `CatalogSource`: Where the raw definition list comes from

pub mod catalog;
pub mod definition;
pub mod rarity;
pub mod source;

pub use catalog::Catalog;
pub use definition::{normalize_weight, CardDefinition, CardId, DEFAULT_WEIGHT};
pub use rarity::Rarity;
pub use source::{CatalogSource, FileSource, StaticSource};
