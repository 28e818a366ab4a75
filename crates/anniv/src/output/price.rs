//! Shirt price output formatting.

use anniv_filter_rs::pricing::{category_of, price_of, SHIRT_SIZES};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::format_amount;

/// JSON output structure for one size.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOutput<'a> {
    pub size: &'a str,
    pub category: &'static str,
    pub plain: u32,
    pub with_print: u32,
}

impl<'a> PriceOutput<'a> {
    pub fn new(size: &'a str) -> Self {
        Self {
            size,
            category: category_of(size).as_str(),
            plain: price_of(size, false),
            with_print: price_of(size, true),
        }
    }
}

/// Formats the price of one size as JSON.
pub fn format_price_json(size: &str, has_print: bool) -> Result<String, serde_json::Error> {
    let output = serde_json::json!({
        "size": size,
        "hasPrint": has_print,
        "category": category_of(size).as_str(),
        "amount": price_of(size, has_print),
    });
    serde_json::to_string_pretty(&output)
}

/// Formats the price of one size as a single line.
pub fn format_price_line(size: &str, has_print: bool, use_colors: bool) -> String {
    let amount = format_amount(u64::from(price_of(size, has_print)));
    let kind = if has_print { "with print" } else { "plain" };
    let amount = if use_colors {
        amount.green().to_string()
    } else {
        amount
    };
    format!("{size} ({}, {kind}): {amount}\n", category_of(size))
}

/// Formats the full price table as JSON.
pub fn format_price_table_json() -> Result<String, serde_json::Error> {
    let sizes: Vec<PriceOutput> = SHIRT_SIZES.iter().map(|s| PriceOutput::new(s)).collect();
    serde_json::to_string_pretty(&serde_json::json!({ "sizes": sizes }))
}

/// Formats the full price table.
pub fn format_price_table(use_colors: bool) -> String {
    let mut output = String::new();

    let header = format!("{:<16} {:<8} {:>6} {:>6}", "Size", "Category", "Plain", "Print");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for size in SHIRT_SIZES {
        let row = PriceOutput::new(size);
        output.push_str(&format!(
            "{:<16} {:<8} {:>6} {:>6}\n",
            row.size,
            row.category,
            format_amount(u64::from(row.plain)),
            format_amount(u64::from(row.with_print)),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_line() {
        assert_eq!(format_price_line("M", true, false), "M (Adult, with print): ₱240\n");
        assert_eq!(format_price_line("TS", false, false), "TS (Teen, plain): ₱105\n");
        assert_eq!(format_price_line("XXL", false, false), "XXL (Adult, plain): -\n");
    }

    #[test]
    fn test_price_json() {
        let json = format_price_json("#8 (M) 5-6", false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["amount"], 92);
        assert_eq!(value["category"], "Kids");
    }

    #[test]
    fn test_price_table_lists_every_size() {
        let table = format_price_table(false);
        assert_eq!(table.lines().count(), SHIRT_SIZES.len() + 1);
        assert!(table.contains("2XL"));
        assert!(table.contains("₱220"));

        let json = format_price_table_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sizes"][9]["size"], "M");
        assert_eq!(value["sizes"][9]["withPrint"], 240);
    }
}
