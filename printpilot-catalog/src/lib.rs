pub mod price_list;
pub mod catalog;
pub mod pricing;

pub use price_list::{Category, CatalogError, NewPriceListEntry, PriceListEntry, PriceListPatch};
pub use catalog::{Ambiguity, PriceCatalog};
pub use pricing::{
    JobSpecification, LineItem, LineQuantity, PricingEngine, PricingError, PrintType, Quote, ServiceType,
    TAX_PERCENT,
};
