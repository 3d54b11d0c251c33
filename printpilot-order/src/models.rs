use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use printpilot_catalog::{JobSpecification, LineItem, PrintType, Quote, ServiceType};
use printpilot_shared::decimal::{fixed2, fixed2_opt};
use printpilot_shared::mint_reference;

/// A placed print job. Written once and never repriced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub job_number: String,
    pub service_type: ServiceType,
    pub service_name: Option<String>,
    pub paper_size: Option<String>,
    pub quantity: i32,
    pub print_type: Option<PrintType>,
    #[serde(default, with = "fixed2_opt")]
    pub custom_width: Option<Decimal>,
    #[serde(default, with = "fixed2_opt")]
    pub custom_height: Option<Decimal>,
    pub finishing_options: Vec<String>,
    pub additional_specs: Option<String>,
    #[serde(with = "fixed2")]
    pub subtotal: Decimal,
    #[serde(with = "fixed2")]
    pub tax: Decimal,
    #[serde(with = "fixed2")]
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        job: JobSpecification,
        quote: &Quote,
        payment_method: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_number: mint_reference("JOB", created_at),
            service_type: job.service_type,
            service_name: job.service_name,
            paper_size: job.paper_size,
            quantity: job.quantity,
            print_type: job.print_type,
            custom_width: job.custom_width,
            custom_height: job.custom_height,
            finishing_options: job.finishing_options,
            additional_specs: job.additional_specs,
            subtotal: quote.subtotal,
            tax: quote.tax,
            total: quote.total,
            payment_method,
            created_at,
        }
    }
}

/// Point-in-time copy of an order's pricing. Later catalog edits never
/// reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    pub receipt_number: String,
    pub order_id: Uuid,
    pub itemized_breakdown: Vec<LineItem>,
    #[serde(with = "fixed2")]
    pub subtotal: Decimal,
    #[serde(with = "fixed2")]
    pub tax: Decimal,
    #[serde(with = "fixed2")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    pub fn snapshot(order: &Order, quote: Quote) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_number: mint_reference("RCP", order.created_at),
            order_id: order.id,
            itemized_breakdown: quote.breakdown,
            subtotal: order.subtotal,
            tax: order.tax,
            total: order.total,
            created_at: order.created_at,
        }
    }
}
