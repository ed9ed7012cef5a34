//! Rarity tiers.
//!
//! Tiers are ordered by [`Rarity::rank`]. The five built-in tiers cover the
//! usual common → mythic ladder; any other label loaded from a catalog is
//! kept verbatim as [`Rarity::Other`] and ranks below `Common`.

use serde::{Deserialize, Serialize};

/// Rarity tier for a card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    /// Gray tier, the bulk of the pool.
    #[default]
    Common,
    /// Blue tier.
    Rare,
    /// Purple tier.
    Epic,
    /// Gold tier. The default notable threshold.
    Legendary,
    /// Red tier, the top of the ladder.
    Mythic,
    /// Catalog-defined label outside the built-in ladder.
    Other(String),
}

impl Rarity {
    /// All built-in tiers, lowest first.
    pub const LADDER: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    /// Parse a label. Matching is case-insensitive and ignores surrounding
    /// whitespace; unknown labels become [`Rarity::Other`].
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "common" => Rarity::Common,
            "rare" => Rarity::Rare,
            "epic" => Rarity::Epic,
            "legendary" => Rarity::Legendary,
            "mythic" => Rarity::Mythic,
            _ => Rarity::Other(trimmed.to_string()),
        }
    }

    /// Position on the ladder. `Other` labels rank 0.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Rarity::Other(_) => 0,
            Rarity::Common => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
            Rarity::Mythic => 5,
        }
    }

    /// Label as it appears in catalog data.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Mythic => "mythic",
            Rarity::Other(label) => label,
        }
    }

    /// True for the five built-in tiers.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Rarity::Other(_))
    }

    /// Is this tier at or above `threshold`?
    #[must_use]
    pub fn is_at_least(&self, threshold: &Rarity) -> bool {
        self.rank() >= threshold.rank()
    }
}

impl From<String> for Rarity {
    fn from(label: String) -> Self {
        Rarity::parse(&label)
    }
}

impl From<&str> for Rarity {
    fn from(label: &str) -> Self {
        Rarity::parse(label)
    }
}

impl From<Rarity> for String {
    fn from(rarity: Rarity) -> Self {
        match rarity {
            Rarity::Other(label) => label,
            builtin => builtin.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin() {
        assert_eq!(Rarity::parse("legendary"), Rarity::Legendary);
        assert_eq!(Rarity::parse("  Mythic "), Rarity::Mythic);
        assert_eq!(Rarity::parse("EPIC"), Rarity::Epic);
    }

    #[test]
    fn test_parse_unknown_keeps_label() {
        let rarity = Rarity::parse("Secret ");
        assert_eq!(rarity, Rarity::Other("Secret".to_string()));
        assert_eq!(rarity.as_str(), "Secret");
        assert!(!rarity.is_builtin());
    }

    #[test]
    fn test_ladder_is_ordered() {
        for pair in Rarity::LADDER.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_threshold() {
        let threshold = Rarity::Legendary;
        assert!(Rarity::Mythic.is_at_least(&threshold));
        assert!(Rarity::Legendary.is_at_least(&threshold));
        assert!(!Rarity::Epic.is_at_least(&threshold));
        assert!(!Rarity::Other("promo".into()).is_at_least(&threshold));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&Rarity::Epic).unwrap();
        assert_eq!(json, "\"epic\"");

        let parsed: Rarity = serde_json::from_str("\"Legendary\"").unwrap();
        assert_eq!(parsed, Rarity::Legendary);

        let other: Rarity = serde_json::from_str("\"promo\"").unwrap();
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"promo\"");
    }
}
