use crate::core::calculator::{line_perception, RATE_105, RATE_21};
use crate::domain::model::{CalculationResult, Order, Rg5329Status};
use crate::utils::error::{Result, Rg5329Error};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a> {
    order_id: Option<u64>,
    order_name: Option<&'a str>,
    generated_at: DateTime<Utc>,
    result: &'a CalculationResult,
}

#[derive(Debug, Serialize)]
struct CsvRow {
    product: String,
    price_without_tax: Decimal,
    rate_21: bool,
    rate_105: bool,
    perception_21: Decimal,
    perception_105: Decimal,
}

pub fn render_report(order: &Order, result: &CalculationResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(order, result)),
        ReportFormat::Json => render_json(order, result),
        ReportFormat::Csv => render_csv(order, result),
    }
}

fn render_text(order: &Order, result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "RG5329 preview for {}", order.display_name());

    if !result.applicable {
        let _ = writeln!(
            out,
            "  Not applicable: {}",
            result.reason.as_deref().unwrap_or("unknown")
        );
        return out;
    }

    let _ = writeln!(out, "  Eligible lines: {}", result.lines_count);
    let _ = writeln!(out, "  Subtotal:       ${}", result.subtotal.round_dp(2));
    let _ = writeln!(out, "  Perception 3%:  ${}", result.tax_21_amount.round_dp(2));
    let _ = writeln!(out, "  Perception 1.5%: ${}", result.tax_105_amount.round_dp(2));
    let _ = writeln!(out, "  Total RG5329:   ${}", result.total_tax.round_dp(2));
    out
}

fn render_json(order: &Order, result: &CalculationResult) -> Result<String> {
    let envelope = ReportEnvelope {
        order_id: order.id,
        order_name: order.name.as_deref(),
        generated_at: Utc::now(),
        result,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

fn render_csv(order: &Order, result: &CalculationResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    // Line rows only where the subtotal was built from them.
    let itemize = matches!(
        result.status,
        Rg5329Status::Applicable | Rg5329Status::BelowThreshold
    );
    if itemize {
        for (index, line) in order.lines.iter().enumerate() {
            if !line.is_rg5329_eligible() {
                continue;
            }
            let (perception_21, perception_105) = if result.applicable {
                line_perception(line).ok_or_else(|| Rg5329Error::InvalidOrderLine {
                    index,
                    reason: "amount out of range".to_string(),
                })?
            } else {
                (Decimal::ZERO, Decimal::ZERO)
            };

            writer.serialize(CsvRow {
                product: line.product_label(),
                price_without_tax: line.price_without_tax,
                rate_21: line.taxes.iter().any(|t| t.rate == RATE_21),
                rate_105: line.taxes.iter().any(|t| t.rate == RATE_105),
                perception_21,
                perception_105,
            })?;
        }
    }

    writer.serialize(CsvRow {
        product: "TOTAL".to_string(),
        price_without_tax: result.subtotal,
        rate_21: false,
        rate_105: false,
        perception_21: result.tax_21_amount,
        perception_105: result.tax_105_amount,
    })?;

    let bytes = writer.into_inner().map_err(|e| Rg5329Error::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Rg5329Error::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::compute_rg5329;
    use crate::domain::model::{Customer, OrderLine, Product, Tax};
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order {
            id: Some(42),
            name: Some("S00042".to_string()),
            customer: None,
            lines: vec![
                OrderLine::new(
                    Product {
                        name: Some("Notebook".to_string()),
                        apply_rg5329: true,
                        ..Default::default()
                    },
                    dec!(60000),
                    vec![Tax::new(dec!(21))],
                ),
                OrderLine::new(
                    Product {
                        name: Some("Monitor".to_string()),
                        apply_rg5329: true,
                        ..Default::default()
                    },
                    dec!(60000),
                    vec![Tax::new(dec!(10.5))],
                ),
                OrderLine::new(Product::default(), dec!(999), vec![Tax::new(dec!(21))]),
            ],
        }
    }

    #[test]
    fn test_text_report_shows_totals() {
        let order = sample_order();
        let result = compute_rg5329(&order);
        let text = render_report(&order, &result, ReportFormat::Text).unwrap();
        assert!(text.contains("S00042"));
        assert!(text.contains("Total RG5329:   $2700.00"));
    }

    #[test]
    fn test_text_report_for_skipped_order() {
        let mut order = sample_order();
        order.lines.truncate(1);
        let result = compute_rg5329(&order);
        let text = render_report(&order, &result, ReportFormat::Text).unwrap();
        assert!(text.contains("Not applicable: below minimum threshold"));
    }

    #[test]
    fn test_json_report_wraps_result() {
        let order = sample_order();
        let result = compute_rg5329(&order);
        let json = render_report(&order, &result, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["order_id"], 42);
        assert_eq!(value["result"]["applicable"], true);
        assert_eq!(value["result"]["status"], "applicable");
        assert_eq!(value["result"]["lines_count"], 2);
    }

    #[test]
    fn test_csv_report_has_eligible_lines_and_total() {
        let order = sample_order();
        let result = compute_rg5329(&order);
        let csv = render_report(&order, &result, ReportFormat::Csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();

        assert_eq!(
            rows[0],
            "product,price_without_tax,rate_21,rate_105,perception_21,perception_105"
        );
        assert_eq!(rows.len(), 4);
        assert!(rows[1].starts_with("Notebook,60000,true,false,1800"));
        assert!(rows[3].starts_with("TOTAL,120000"));
    }

    #[test]
    fn test_csv_report_for_exempt_customer_has_only_total() {
        let mut order = sample_order();
        order.customer = Some(Customer {
            name: None,
            rg5329_exempt: true,
        });
        let result = compute_rg5329(&order);
        let csv = render_report(&order, &result, ReportFormat::Csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], "TOTAL,0,false,false,0,0");
    }

    #[test]
    fn test_csv_line_perceptions_add_up_to_total() {
        let mut order = sample_order();
        order.lines[0].taxes.push(Tax::new(dec!(10.5)));
        let result = compute_rg5329(&order);
        let csv = render_report(&order, &result, ReportFormat::Csv).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());

        let mut sum_21 = Decimal::ZERO;
        let mut sum_105 = Decimal::ZERO;
        let mut total = None;
        for record in reader.records() {
            let record = record.unwrap();
            let p21: Decimal = record[4].parse().unwrap();
            let p105: Decimal = record[5].parse().unwrap();
            if &record[0] == "TOTAL" {
                total = Some((p21, p105));
            } else {
                sum_21 += p21;
                sum_105 += p105;
            }
        }

        assert_eq!(total, Some((sum_21, sum_105)));
        assert_eq!(sum_105, dec!(1800));
    }

    #[test]
    fn test_csv_below_threshold_lists_lines_without_perception() {
        let mut order = sample_order();
        order.lines.truncate(1);
        let result = compute_rg5329(&order);
        let csv = render_report(&order, &result, ReportFormat::Csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "Notebook,60000,true,false,0,0");
        assert!(rows[2].starts_with("TOTAL,60000"));
    }
}
