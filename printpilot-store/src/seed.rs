use rust_decimal::Decimal;
use tracing::info;
use printpilot_catalog::{Category, NewPriceListEntry, PriceListEntry};
use printpilot_core::{PriceListRepository, RepoResult};

const DEFAULT_PRICES: &[(&str, Category, i64, &str)] = &[
    ("A4", Category::Paper, 50, "sheet"),
    ("A3", Category::Paper, 100, "sheet"),
    ("A5", Category::Paper, 35, "sheet"),
    ("Letter", Category::Paper, 45, "sheet"),
    ("Legal", Category::Paper, 55, "sheet"),
    ("Tabloid", Category::Paper, 150, "sheet"),
    ("Color", Category::Printing, 15, "page"),
    ("Mono", Category::Printing, 5, "page"),
    ("Binding", Category::Finishing, 200, "job"),
    ("Lamination", Category::Finishing, 150, "job"),
    ("Cutting", Category::Finishing, 100, "job"),
    ("Folding", Category::Finishing, 75, "job"),
    ("Stapling", Category::Finishing, 50, "job"),
    ("Punching", Category::Finishing, 75, "job"),
    ("Flex Banner", Category::LargeFormat, 200, "sqft"),
    ("Sticker", Category::LargeFormat, 250, "sqft"),
    ("PU (Polyurethane)", Category::LargeFormat, 300, "sqft"),
    ("Window Graphics", Category::LargeFormat, 350, "sqft"),
    ("Jotter", Category::Products, 500, "piece"),
    ("Brochure", Category::Products, 120, "piece"),
];

/// The shop's starting price list
pub fn default_price_list() -> Vec<NewPriceListEntry> {
    DEFAULT_PRICES
        .iter()
        .map(|&(name, category, cents, unit)| NewPriceListEntry {
            service_name: name.to_string(),
            category,
            base_price: Decimal::new(cents, 2),
            unit: unit.to_string(),
            is_active: true,
        })
        .collect()
}

/// Inserts the default price list only when the catalog has no entries.
/// Returns how many entries were written.
pub async fn seed_if_empty(repo: &dyn PriceListRepository) -> RepoResult<usize> {
    if !repo.list_entries().await?.is_empty() {
        return Ok(0);
    }

    let entries = default_price_list();
    for entry in &entries {
        repo.create_entry(&PriceListEntry::new(entry.clone())).await?;
    }

    info!(count = entries.len(), "Seeded default price list");
    Ok(entries.len())
}
