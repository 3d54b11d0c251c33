use serde::{Deserialize, Serialize};
use uuid::Uuid;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use printpilot_shared::decimal::fixed2;

/// Price-list categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Paper,
    Printing,
    Finishing,
    LargeFormat,
    Products,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Paper,
        Category::Printing,
        Category::Finishing,
        Category::LargeFormat,
        Category::Products,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Paper => "paper",
            Category::Printing => "printing",
            Category::Finishing => "finishing",
            Category::LargeFormat => "largeformat",
            Category::Products => "products",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

/// One priceable line in the shop's price list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListEntry {
    pub id: Uuid,
    pub service_name: String,
    pub category: Category,
    #[serde(with = "fixed2")]
    pub base_price: Decimal,
    pub unit: String,
    pub is_active: bool,
}

impl PriceListEntry {
    pub fn new(entry: NewPriceListEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_name: entry.service_name,
            category: entry.category,
            base_price: entry.base_price,
            unit: entry.unit,
            is_active: entry.is_active,
        }
    }

    /// Apply an administrative edit; absent fields are left untouched.
    pub fn apply(&mut self, patch: PriceListPatch) {
        if let Some(name) = patch.service_name {
            self.service_name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.base_price {
            self.base_price = price;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPriceListEntry {
    pub service_name: String,
    pub category: Category,
    pub base_price: Decimal,
    pub unit: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PriceListPatch {
    pub service_name: Option<String>,
    pub category: Option<Category>,
    pub base_price: Option<Decimal>,
    pub unit: Option<String>,
    pub is_active: Option<bool>,
}

/// Catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown price-list category: {0}")]
    UnknownCategory(String),
}
