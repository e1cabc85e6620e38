//! JSON order snapshots exported by the host.
//!
//! Host exports are loose: fields may be missing. Conversion into the domain
//! [`Order`] rejects lines the calculator cannot evaluate instead of
//! defaulting them to zero.

use crate::core::calculator::MAX_LINE_AMOUNT;
use crate::domain::model::{Customer, Order, OrderLine, Product, Tax};
use crate::utils::error::{Result, Rg5329Error};
use rust_decimal::serde::arbitrary_precision_option;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default, deserialize_with = "arbitrary_precision_option::deserialize")]
    pub price_without_tax: Option<Decimal>,
    #[serde(default, deserialize_with = "arbitrary_precision_option::deserialize")]
    pub qty: Option<Decimal>,
    #[serde(default, deserialize_with = "arbitrary_precision_option::deserialize")]
    pub price_unit: Option<Decimal>,
    #[serde(default)]
    pub taxes: Vec<Tax>,
}

impl LineRecord {
    fn into_line(self, index: usize) -> Result<OrderLine> {
        let product = self.product.ok_or_else(|| Rg5329Error::InvalidOrderLine {
            index,
            reason: "missing product".to_string(),
        })?;

        let out_of_range = || Rg5329Error::InvalidOrderLine {
            index,
            reason: "amount out of range".to_string(),
        };

        let price_without_tax = match (self.price_without_tax, self.qty, self.price_unit) {
            (Some(price), _, _) => price,
            // POS payloads only carry quantity and unit price
            (None, Some(qty), Some(unit)) => qty.checked_mul(unit).ok_or_else(out_of_range)?,
            _ => {
                return Err(Rg5329Error::InvalidOrderLine {
                    index,
                    reason: "missing price_without_tax".to_string(),
                })
            }
        };

        if price_without_tax.abs() > MAX_LINE_AMOUNT
            || self.taxes.iter().any(|t| t.rate.abs() > MAX_LINE_AMOUNT)
        {
            return Err(out_of_range());
        }

        Ok(OrderLine::new(product, price_without_tax, self.taxes))
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = Rg5329Error;

    fn try_from(record: OrderRecord) -> Result<Self> {
        let lines = record
            .lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| line.into_line(index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Order {
            id: record.id,
            name: record.name,
            customer: record.customer,
            lines,
        })
    }
}

pub fn parse_order(content: &str) -> Result<Order> {
    let record: OrderRecord = serde_json::from_str(content)?;
    Order::try_from(record)
}

pub fn load_order<P: AsRef<Path>>(path: P) -> Result<Order> {
    let content = std::fs::read_to_string(&path)?;
    let order = parse_order(&content)?;
    tracing::debug!(
        "Loaded {} with {} lines from {}",
        order.display_name(),
        order.lines.len(),
        path.as_ref().display()
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_full_snapshot() {
        let order = parse_order(
            r#"{
                "id": 42,
                "name": "S00042",
                "customer": {"name": "EMPRESA DEMO RI", "rg5329_exempt": false},
                "lines": [
                    {
                        "product": {"id": 5, "name": "Notebook", "apply_rg5329": true},
                        "price_without_tax": 120000,
                        "taxes": [{"name": "IVA 21%", "rate": 21.0}]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(order.id, Some(42));
        assert_eq!(order.lines[0].price_without_tax, dec!(120000));
        assert_eq!(order.lines[0].taxes[0].rate, dec!(21));
        assert!(order.lines[0].is_rg5329_eligible());
    }

    #[test]
    fn test_qty_and_unit_price_fallback() {
        let order = parse_order(
            r#"{"lines": [{"product": {"apply_rg5329": true}, "qty": 4, "price_unit": "25000.50", "taxes": []}]}"#,
        )
        .unwrap();
        assert_eq!(order.lines[0].price_without_tax, dec!(100002.00));
    }

    #[test]
    fn test_missing_product_is_rejected() {
        let err = parse_order(r#"{"lines": [{"price_without_tax": 10}, {"price_without_tax": 20}]}"#)
            .unwrap_err();
        match err {
            Rg5329Error::InvalidOrderLine { index, reason } => {
                assert_eq!(index, 0);
                assert_eq!(reason, "missing product");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let err = parse_order(
            r#"{"lines": [{"product": {"apply_rg5329": true}}, {"product": {}, "qty": 1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Rg5329Error::InvalidOrderLine { index: 0, .. }));
    }

    #[test]
    fn test_json_numbers_keep_every_digit() {
        let order = parse_order(
            r#"{"lines": [
                {"product": {}, "price_without_tax": 1234567890123.456789, "taxes": [{"rate": 10.5}]},
                {"product": {}, "qty": 3, "price_unit": 0.1}
            ]}"#,
        )
        .unwrap();

        assert_eq!(order.lines[0].price_without_tax, dec!(1234567890123.456789));
        assert_eq!(order.lines[0].taxes[0].rate, dec!(10.5));
        assert_eq!(order.lines[1].price_without_tax, dec!(0.3));
    }

    #[test]
    fn test_overflowing_qty_times_unit_is_rejected() {
        let err = parse_order(
            r#"{"lines": [{"product": {}, "qty": "10000000000000000", "price_unit": "10000000000000000"}]}"#,
        )
        .unwrap_err();
        match err {
            Rg5329Error::InvalidOrderLine { index, reason } => {
                assert_eq!(index, 0);
                assert_eq!(reason, "amount out of range");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_line_amount_above_bound_is_rejected() {
        let err = parse_order(
            r#"{"lines": [
                {"product": {}, "price_without_tax": 10},
                {"product": {"apply_rg5329": true}, "price_without_tax": "50000000000000000000000000000"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Rg5329Error::InvalidOrderLine { index: 1, .. }));
        assert!(err.to_string().contains("amount out of range"));
    }
}
