use serde::Serialize;
use uuid::Uuid;
use crate::price_list::{Category, PriceListEntry};

/// A snapshot of the price list, held in a fixed lookup order.
///
/// Entries are sorted by `(category, lowercase service name, id)`. When more
/// than one active entry matches a lookup, the first one in that order wins.
#[derive(Debug, Clone, Default)]
pub struct PriceCatalog {
    entries: Vec<PriceListEntry>,
}

/// A lookup key that resolves to more than one active entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambiguity {
    pub category: Category,
    pub key: String,
    /// Ids of every entry the key matches, in lookup order. The first one wins.
    pub matches: Vec<Uuid>,
}

impl PriceCatalog {
    pub fn new(mut entries: Vec<PriceListEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.service_name.to_lowercase().cmp(&b.service_name.to_lowercase()))
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[PriceListEntry] {
        &self.entries
    }

    fn active_in(&self, category: Category) -> impl Iterator<Item = &PriceListEntry> {
        self.entries
            .iter()
            .filter(move |e| e.is_active && e.category == category)
    }

    /// First active entry whose name contains `key`, ignoring case.
    pub fn find_containing(&self, category: Category, key: &str) -> Option<&PriceListEntry> {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.active_in(category)
            .find(|e| e.service_name.to_lowercase().contains(&key))
    }

    /// First active entry whose name is exactly `name`.
    pub fn find_named(&self, category: Category, name: &str) -> Option<&PriceListEntry> {
        self.active_in(category).find(|e| e.service_name == name)
    }

    /// Active entries whose name would also satisfy a substring lookup for
    /// another entry's name in the same category.
    pub fn ambiguities(&self) -> Vec<Ambiguity> {
        let mut found: Vec<Ambiguity> = Vec::new();

        for category in Category::ALL {
            let active: Vec<&PriceListEntry> = self.active_in(category).collect();

            for candidate in &active {
                let key = candidate.service_name.to_lowercase();
                if found.iter().any(|a| a.category == category && a.key.to_lowercase() == key) {
                    continue;
                }

                let matches: Vec<Uuid> = active
                    .iter()
                    .filter(|e| e.service_name.to_lowercase().contains(&key))
                    .map(|e| e.id)
                    .collect();

                if matches.len() > 1 {
                    found.push(Ambiguity {
                        category,
                        key: candidate.service_name.clone(),
                        matches,
                    });
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price_list::NewPriceListEntry;
    use rust_decimal::Decimal;

    fn entry(name: &str, category: Category, cents: i64) -> PriceListEntry {
        PriceListEntry::new(NewPriceListEntry {
            service_name: name.to_string(),
            category,
            base_price: Decimal::new(cents, 2),
            unit: "sheet".to_string(),
            is_active: true,
        })
    }

    #[test]
    fn test_substring_lookup_ignores_case() {
        let catalog = PriceCatalog::new(vec![
            entry("A4 Paper", Category::Paper, 50),
            entry("Color", Category::Printing, 15),
        ]);

        let found = catalog.find_containing(Category::Paper, "a4").unwrap();
        assert_eq!(found.service_name, "A4 Paper");
        assert!(catalog.find_containing(Category::Printing, "a4").is_none());
        assert!(catalog.find_containing(Category::Paper, "").is_none());
    }

    #[test]
    fn test_inactive_entries_are_skipped() {
        let mut retired = entry("Binding", Category::Finishing, 300);
        retired.is_active = false;
        let catalog = PriceCatalog::new(vec![retired]);

        assert!(catalog.find_containing(Category::Finishing, "binding").is_none());
        assert!(catalog.find_named(Category::Finishing, "Binding").is_none());
    }

    #[test]
    fn test_tie_break_is_name_order() {
        // "A4" and "A4 Glossy" both contain "a4"; "A4" sorts first.
        let catalog = PriceCatalog::new(vec![
            entry("A4 Glossy", Category::Paper, 90),
            entry("A4", Category::Paper, 50),
        ]);

        let found = catalog.find_containing(Category::Paper, "A4").unwrap();
        assert_eq!(found.service_name, "A4");
        assert_eq!(found.base_price, Decimal::new(50, 2));
    }

    #[test]
    fn test_named_lookup_is_exact() {
        let catalog = PriceCatalog::new(vec![entry("Flex Banner", Category::LargeFormat, 200)]);

        assert!(catalog.find_named(Category::LargeFormat, "Flex Banner").is_some());
        assert!(catalog.find_named(Category::LargeFormat, "flex banner").is_none());
        assert!(catalog.find_named(Category::LargeFormat, "Flex").is_none());
    }

    #[test]
    fn test_ambiguities_report_overlapping_names() {
        let a4 = entry("A4", Category::Paper, 50);
        let glossy = entry("A4 Glossy", Category::Paper, 90);
        let a3 = entry("A3", Category::Paper, 100);
        let catalog = PriceCatalog::new(vec![glossy.clone(), a3, a4.clone()]);

        let found = catalog.ambiguities();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, Category::Paper);
        assert_eq!(found[0].key, "A4");
        assert_eq!(found[0].matches, vec![a4.id, glossy.id]);
    }

    #[test]
    fn test_no_ambiguity_across_categories() {
        let catalog = PriceCatalog::new(vec![
            entry("Color", Category::Printing, 15),
            entry("Color Lamination", Category::Finishing, 150),
        ]);
        assert!(catalog.ambiguities().is_empty());
    }
}
