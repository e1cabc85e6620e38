use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rg5329_exempt: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub apply_rg5329: bool,
}

/// A VAT entry on a line. `rate` is a percentage (21.0, 10.5, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")]
    pub rate: Decimal,
}

impl Tax {
    pub fn new(rate: Decimal) -> Self {
        Self { name: None, rate }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: Product,
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")]
    pub price_without_tax: Decimal,
    pub taxes: Vec<Tax>,
}

impl OrderLine {
    pub fn new(product: Product, price_without_tax: Decimal, taxes: Vec<Tax>) -> Self {
        Self {
            product,
            price_without_tax,
            taxes,
        }
    }

    pub fn is_rg5329_eligible(&self) -> bool {
        self.product.apply_rg5329
    }

    pub fn product_label(&self) -> String {
        match (&self.product.name, self.product.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("product #{}", id),
            (None, None) => "unnamed product".to_string(),
        }
    }
}

/// Read-only snapshot of a host order. `id` is `None` while the order is unsaved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub customer: Option<Customer>,
    pub lines: Vec<OrderLine>,
}

impl Order {
    pub fn new(customer: Option<Customer>, lines: Vec<OrderLine>) -> Self {
        Self {
            id: None,
            name: None,
            customer,
            lines,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn display_name(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("order #{}", id),
            (None, None) => "new order".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rg5329Status {
    Applicable,
    CustomerExempt,
    NoEligibleProducts,
    BelowThreshold,
    AmountOutOfRange,
}

impl fmt::Display for Rg5329Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rg5329Status::Applicable => write!(f, "applicable"),
            Rg5329Status::CustomerExempt => write!(f, "customer exempt"),
            Rg5329Status::NoEligibleProducts => write!(f, "no RG5329 products"),
            Rg5329Status::BelowThreshold => write!(f, "below minimum threshold"),
            Rg5329Status::AmountOutOfRange => write!(f, "amount out of range"),
        }
    }
}

/// Advisory projection of the RG5329 perception for display. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub applicable: bool,
    pub status: Rg5329Status,
    pub reason: Option<String>,
    pub subtotal: Decimal,
    pub tax_21_amount: Decimal,
    pub tax_105_amount: Decimal,
    pub total_tax: Decimal,
    pub lines_count: usize,
}

impl CalculationResult {
    pub(crate) fn not_applicable(
        status: Rg5329Status,
        reason: String,
        subtotal: Decimal,
        lines_count: usize,
    ) -> Self {
        Self {
            applicable: false,
            status,
            reason: Some(reason),
            subtotal,
            tax_21_amount: Decimal::ZERO,
            tax_105_amount: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            lines_count,
        }
    }
}

/// Reply of the authoritative server-side procedure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "rust_decimal::serde::arbitrary_precision_option::deserialize"
    )]
    pub new_total: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}
