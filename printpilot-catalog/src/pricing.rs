use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use printpilot_shared::decimal::{fixed2, money_limit, round2};
use crate::catalog::PriceCatalog;
use crate::price_list::Category;

/// Flat sales tax applied to every order, in percent.
pub const TAX_PERCENT: u32 = 10;

fn tax_rate() -> Decimal {
    Decimal::new(TAX_PERCENT as i64, 2)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Printing,
    LargeFormat,
    Products,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Printing => "printing",
            ServiceType::LargeFormat => "largeformat",
            ServiceType::Products => "products",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "printing" => Some(ServiceType::Printing),
            "largeformat" => Some(ServiceType::LargeFormat),
            "products" => Some(ServiceType::Products),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrintType {
    Color,
    Mono,
}

impl PrintType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintType::Color => "color",
            PrintType::Mono => "mono",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "color" => Some(PrintType::Color),
            "mono" => Some(PrintType::Mono),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PrintType::Color => "Color Printing",
            PrintType::Mono => "Mono Printing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("{service}: line total is too large to compute")]
    LineOverflow { service: String },

    #[error("order total {total} exceeds the largest storable amount")]
    TotalTooLarge { total: Decimal },
}

/// What the customer asked for
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpecification {
    pub service_type: ServiceType,
    pub service_name: Option<String>,
    pub paper_size: Option<String>,
    pub print_type: Option<PrintType>,
    pub quantity: i32,
    pub custom_width: Option<Decimal>,
    pub custom_height: Option<Decimal>,
    pub finishing_options: Vec<String>,
    pub additional_specs: Option<String>,
}

/// Either a plain count or a description such as `3×2 sqft × 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineQuantity {
    Count(i32),
    Described(String),
}

impl std::fmt::Display for LineQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineQuantity::Count(n) => write!(f, "{}", n),
            LineQuantity::Described(s) => f.write_str(s),
        }
    }
}

/// One row of the itemized breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub service: String,
    pub quantity: LineQuantity,
    #[serde(with = "fixed2")]
    pub unit_price: Decimal,
    #[serde(with = "fixed2")]
    pub total: Decimal,
}

/// Priced breakdown with totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub breakdown: Vec<LineItem>,
    #[serde(with = "fixed2")]
    pub subtotal: Decimal,
    #[serde(with = "fixed2")]
    pub tax: Decimal,
    #[serde(with = "fixed2")]
    pub total: Decimal,
}

impl Quote {
    /// `subtotal = Σ line totals`, `tax = round(subtotal × rate, 2)`,
    /// `total = subtotal + tax`. Fails when the total would not fit a
    /// stored amount.
    pub fn from_breakdown(breakdown: Vec<LineItem>) -> Result<Self, PricingError> {
        let subtotal = breakdown
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.total))
            .ok_or(PricingError::TotalTooLarge { total: money_limit() })?;
        let tax = subtotal
            .checked_mul(tax_rate())
            .map(round2)
            .ok_or(PricingError::TotalTooLarge { total: subtotal })?;
        let total = subtotal
            .checked_add(tax)
            .ok_or(PricingError::TotalTooLarge { total: subtotal })?;
        if total > money_limit() {
            return Err(PricingError::TotalTooLarge { total });
        }

        Ok(Self {
            breakdown,
            subtotal,
            tax,
            total,
        })
    }
}

/// Prices a job against a catalog snapshot. Unmatched attributes are left
/// out of the breakdown rather than rejected.
pub struct PricingEngine<'a> {
    catalog: &'a PriceCatalog,
}

impl<'a> PricingEngine<'a> {
    pub fn new(catalog: &'a PriceCatalog) -> Self {
        Self { catalog }
    }

    pub fn quote(&self, job: &JobSpecification) -> Result<Quote, PricingError> {
        let breakdown = match job.service_type {
            ServiceType::Printing => self.price_printing(job)?,
            ServiceType::LargeFormat => self.price_large_format(job)?,
            ServiceType::Products => self.price_product(job)?,
        };
        Quote::from_breakdown(breakdown)
    }

    fn per_unit(service: String, unit_price: Decimal, quantity: i32) -> Result<LineItem, PricingError> {
        let total = unit_price
            .checked_mul(Decimal::from(quantity))
            .map(round2)
            .ok_or_else(|| PricingError::LineOverflow { service: service.clone() })?;
        Ok(LineItem {
            service,
            quantity: LineQuantity::Count(quantity),
            unit_price,
            total,
        })
    }

    fn price_printing(&self, job: &JobSpecification) -> Result<Vec<LineItem>, PricingError> {
        let mut lines = Vec::new();

        if let Some(size) = job.paper_size.as_deref() {
            if let Some(paper) = self.catalog.find_containing(Category::Paper, size) {
                lines.push(Self::per_unit(format!("{} Paper", size), paper.base_price, job.quantity)?);
            }
        }

        if let Some(print_type) = job.print_type {
            if let Some(entry) = self.catalog.find_containing(Category::Printing, print_type.as_str()) {
                lines.push(Self::per_unit(print_type.label().to_string(), entry.base_price, job.quantity)?);
            }
        }

        for option in &job.finishing_options {
            if let Some(entry) = self.catalog.find_containing(Category::Finishing, option) {
                lines.push(Self::per_unit(capitalize(option), entry.base_price, job.quantity)?);
            }
        }

        Ok(lines)
    }

    fn price_large_format(&self, job: &JobSpecification) -> Result<Vec<LineItem>, PricingError> {
        let Some(name) = job.service_name.as_deref() else {
            return Ok(Vec::new());
        };
        let Some(entry) = self.catalog.find_named(Category::LargeFormat, name) else {
            return Ok(Vec::new());
        };
        let (Some(width), Some(height)) = (job.custom_width, job.custom_height) else {
            return Ok(Vec::new());
        };

        let total = width
            .checked_mul(height)
            .and_then(|area| entry.base_price.checked_mul(area))
            .and_then(|cost| cost.checked_mul(Decimal::from(job.quantity)))
            .map(round2)
            .ok_or_else(|| PricingError::LineOverflow { service: name.to_string() })?;

        Ok(vec![LineItem {
            service: name.to_string(),
            quantity: LineQuantity::Described(format!(
                "{}×{} sqft × {}",
                width.normalize(),
                height.normalize(),
                job.quantity
            )),
            unit_price: entry.base_price,
            total,
        }])
    }

    fn price_product(&self, job: &JobSpecification) -> Result<Vec<LineItem>, PricingError> {
        let entry = job
            .service_name
            .as_deref()
            .and_then(|name| self.catalog.find_named(Category::Products, name).map(|e| (name, e)));
        match entry {
            Some((name, entry)) => Ok(vec![Self::per_unit(name.to_string(), entry.base_price, job.quantity)?]),
            None => Ok(Vec::new()),
        }
    }
}

fn capitalize(option: &str) -> String {
    let mut chars = option.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
