use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Food item as returned by the food-listing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "FoodTitle")]
    pub title: String,
    #[serde(rename = "FoodImage", default)]
    pub image_url: String,
    pub category: FoodCategory,
    #[serde(rename = "Quantity", default)]
    pub quantity: String,
    #[serde(rename = "AddedDate", default)]
    pub added_date: Option<String>,
    #[serde(rename = "ExpiryDate")]
    pub expiry_date: String, // parsed lazily so one bad date fails one record
    #[serde(rename = "email", default)]
    pub owner_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FoodCategory {
    Fruits,
    Vegetables,
    Dairy,
    SweetsAndSnacks,
    Proteins,
    FastFood,
    Grains,
    Beverages,
    /// Label outside the known set, kept verbatim.
    Other(String),
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 8] = [
        FoodCategory::Fruits,
        FoodCategory::Vegetables,
        FoodCategory::Dairy,
        FoodCategory::SweetsAndSnacks,
        FoodCategory::Proteins,
        FoodCategory::FastFood,
        FoodCategory::Grains,
        FoodCategory::Beverages,
    ];

    /// Label used by the add-food form and stored by the API.
    pub fn label(&self) -> &str {
        match self {
            FoodCategory::Fruits => "Fruits 🍎🍌",
            FoodCategory::Vegetables => "Vegetables 🥦🥕",
            FoodCategory::Dairy => "Dairy 🥛🧀",
            FoodCategory::SweetsAndSnacks => "Sweets & Snacks 🍩🍫",
            FoodCategory::Proteins => "Proteins 🍗🥩",
            FoodCategory::FastFood => "Fast Food & Junk Food 🍕🍔",
            FoodCategory::Grains => "Grains 🍚🍞",
            FoodCategory::Beverages => "Beverages ☕🥤",
            FoodCategory::Other(s) => s,
        }
    }

    /// Accepts the form label, its first word, or the snake-case name, ignoring
    /// case. Anything else becomes [`FoodCategory::Other`].
    pub fn from_label(s: &str) -> Self {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        let first_word = lower.split_whitespace().next().unwrap_or_default();

        FoodCategory::ALL
            .into_iter()
            .find(|c| {
                c.label().to_lowercase() == lower
                    || c.slug() == Some(lower.as_str())
                    || c.slug().and_then(|slug| slug.split('_').next()) == Some(first_word)
            })
            .unwrap_or_else(|| FoodCategory::Other(trimmed.to_string()))
    }

    fn slug(&self) -> Option<&'static str> {
        match self {
            FoodCategory::Fruits => Some("fruits"),
            FoodCategory::Vegetables => Some("vegetables"),
            FoodCategory::Dairy => Some("dairy"),
            FoodCategory::SweetsAndSnacks => Some("sweets_and_snacks"),
            FoodCategory::Proteins => Some("proteins"),
            FoodCategory::FastFood => Some("fast_food"),
            FoodCategory::Grains => Some("grains"),
            FoodCategory::Beverages => Some("beverages"),
            FoodCategory::Other(_) => None,
        }
    }
}

impl FromStr for FoodCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FoodCategory::from_label(s))
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FoodCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for FoodCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FoodCategory::from_label(&raw))
    }
}
