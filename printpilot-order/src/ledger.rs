//! Bookkeeping records kept next to the orders: customers, counter sales,
//! deposits, goodwill credits and expenses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use printpilot_shared::decimal::{fixed2, money_limit};
use printpilot_shared::{mint_reference, Masked};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<Masked<String>>,
    pub phone: Option<Masked<String>>,
    pub company: Option<String>,
    pub address: Option<String>,
    #[serde(with = "fixed2")]
    pub balance: Decimal,
    #[serde(with = "fixed2")]
    pub total_deposits: Decimal,
    #[serde(with = "fixed2")]
    pub goodwill: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub balance: Decimal,
    pub total_deposits: Decimal,
    pub goodwill: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub balance: Option<Decimal>,
    pub total_deposits: Option<Decimal>,
    pub goodwill: Option<Decimal>,
}

impl Customer {
    pub fn new(input: NewCustomer, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email.map(Masked),
            phone: input.phone.map(Masked),
            company: input.company,
            address: input.address,
            balance: input.balance,
            total_deposits: input.total_deposits,
            goodwill: input.goodwill,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: CustomerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = Some(Masked(email));
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(Masked(phone));
        }
        if let Some(company) = patch.company {
            self.company = Some(company);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        if let Some(balance) = patch.balance {
            self.balance = balance;
        }
        if let Some(total) = patch.total_deposits {
            self.total_deposits = total;
        }
        if let Some(goodwill) = patch.goodwill {
            self.goodwill = goodwill;
        }
    }

    /// A deposit is money on account: it raises both the running deposit
    /// total and the spendable balance.
    pub fn record_deposit(&mut self, amount: Decimal) {
        self.total_deposits += amount;
        self.balance += amount;
    }

    pub fn record_goodwill(&mut self, kind: GoodwillType, amount: Decimal) {
        match kind {
            GoodwillType::Credit => self.goodwill += amount,
            GoodwillType::Debit => self.goodwill -= amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("sale total for {quantity} × {unit_price} exceeds the largest storable amount")]
    SaleTotalTooLarge { quantity: i32, unit_price: Decimal },
}

/// Over-the-counter paper sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub sale_number: String,
    pub paper_type: String,
    pub paper_variant: String,
    pub quantity: i32,
    #[serde(with = "fixed2")]
    pub unit_price: Decimal,
    #[serde(with = "fixed2")]
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub paper_type: String,
    pub paper_variant: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub payment_method: Option<String>,
}

impl Sale {
    pub fn new(input: NewSale, created_at: DateTime<Utc>) -> Result<Self, LedgerError> {
        let total = input
            .unit_price
            .checked_mul(Decimal::from(input.quantity))
            .filter(|total| *total <= money_limit())
            .ok_or(LedgerError::SaleTotalTooLarge {
                quantity: input.quantity,
                unit_price: input.unit_price,
            })?;

        Ok(Self {
            id: Uuid::new_v4(),
            sale_number: mint_reference("SALE", created_at),
            total,
            paper_type: input.paper_type,
            paper_variant: input.paper_variant,
            quantity: input.quantity,
            unit_price: input.unit_price,
            payment_method: input.payment_method,
            created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(with = "fixed2")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDeposit {
    pub customer_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub payment_method: Option<String>,
}

impl Deposit {
    pub fn new(input: NewDeposit, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            amount: input.amount,
            description: input.description,
            payment_method: input.payment_method,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoodwillType {
    Credit,
    Debit,
}

impl GoodwillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoodwillType::Credit => "credit",
            GoodwillType::Debit => "debit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credit" => Some(GoodwillType::Credit),
            "debit" => Some(GoodwillType::Debit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodwillTransaction {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(with = "fixed2")]
    pub amount: Decimal,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: GoodwillType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGoodwill {
    pub customer_id: Uuid,
    pub amount: Decimal,
    pub reason: String,
    pub kind: GoodwillType,
}

impl GoodwillTransaction {
    pub fn new(input: NewGoodwill, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            amount: input.amount,
            reason: input.reason,
            kind: input.kind,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub category: String,
    pub description: String,
    #[serde(with = "fixed2")]
    pub amount: Decimal,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub payment_method: String,
}

impl Expense {
    pub fn new(input: NewExpense, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: input.category,
            description: input.description,
            amount: input.amount,
            payment_method: input.payment_method,
            created_at,
        }
    }
}
