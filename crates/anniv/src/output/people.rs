//! Filtered people and shirt summary output formatting.

use anniv_filter_rs::filter::resolver::has_shirt_order;
use anniv_filter_rs::pricing::{category_of, price_of};
use anniv_filter_rs::{FilterOutcome, Person, ShirtSummary};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_amount, format_flag, pad, truncate_id, truncate_str};

/// JSON output structure for the filter command.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    pub count: usize,
    pub duration: f64,
    pub shown: usize,
    pub results: &'a [Person],
}

/// Formats a filter outcome as JSON, keeping at most `limit` people.
///
/// `count` always reports the full number of matches.
pub fn format_people_json(
    outcome: &FilterOutcome,
    limit: Option<usize>,
) -> Result<String, serde_json::Error> {
    let shown = limit.map_or(outcome.results.len(), |n| n.min(outcome.results.len()));
    let output = FilterOutput {
        count: outcome.count,
        duration: outcome.duration_ms,
        shown,
        results: &outcome.results[..shown],
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a filter outcome as a table.
pub fn format_people_table(
    outcome: &FilterOutcome,
    limit: Option<usize>,
    use_colors: bool,
) -> String {
    if outcome.results.is_empty() {
        return "No matching people.\n".to_string();
    }

    let mut output = String::new();

    let header = format!(
        "{:<8} {:<28} {:<14} {:<8} {:>6} {:<7} {:<8} {}",
        "ID", "Name", "Size", "Category", "Amount", "Paid", "Shirt", "Location"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    let shown = limit.unwrap_or(usize::MAX);
    for person in outcome.results.iter().take(shown) {
        output.push_str(&format_person_row(person, use_colors));
        output.push('\n');
    }

    let footer = if outcome.results.len() > shown {
        format!(
            "\nShowing {} of {} people ({:.1} ms)",
            shown, outcome.count, outcome.duration_ms
        )
    } else {
        format!("\n{} people ({:.1} ms)", outcome.count, outcome.duration_ms)
    };
    if use_colors {
        output.push_str(&format!("{}\n", footer.dimmed()));
    } else {
        output.push_str(&footer);
        output.push('\n');
    }

    output
}

fn format_person_row(person: &Person, use_colors: bool) -> String {
    let size = person.shirt_size();
    let ordered = has_shirt_order(person);

    let name = truncate_str(&person.full_name(), 28);
    let amount = format_amount(u64::from(price_of(&size, person.has_print())));

    let paid_label = if person.is_paid() { "paid" } else { "unpaid" };
    let paid = if ordered {
        pad(
            &format_flag(person.is_paid(), "paid", "unpaid", use_colors),
            paid_label,
            7,
        )
    } else {
        format!("{:<7}", "")
    };

    let shirt_label = if person.shirt_given() { "given" } else { "pending" };
    let shirt = if ordered {
        pad(
            &format_flag(person.shirt_given(), "given", "pending", use_colors),
            shirt_label,
            8,
        )
    } else {
        format!("{:<8}", "")
    };

    format!(
        "{:<8} {:<28} {:<14} {:<8} {:>6} {} {} {}",
        truncate_id(&person.id.to_string()),
        name,
        truncate_str(&size, 14),
        category_of(&size).as_str(),
        amount,
        paid,
        shirt,
        person.text("location").unwrap_or_default()
    )
}

/// Formats shirt totals as JSON.
pub fn format_summary_json(summary: &ShirtSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

/// Formats shirt totals as a table.
pub fn format_summary_table(summary: &ShirtSummary, use_colors: bool) -> String {
    let mut output = String::new();

    let title = "Shirt summary";
    if use_colors {
        output.push_str(&format!("{}\n\n", title.green().bold()));
    } else {
        output.push_str(&format!("{title}\n\n"));
    }

    output.push_str(&format!("People:   {}\n", summary.people));
    output.push_str(&format!("Orders:   {}\n", summary.orders));
    output.push_str(&format!("Given:    {}\n", summary.given));
    output.push_str(&format!("Total:    {}\n", format_amount(summary.total_amount)));
    output.push_str(&format!("Paid:     {}\n", format_amount(summary.paid_amount)));

    let unpaid = format_amount(summary.unpaid_amount);
    if use_colors && summary.unpaid_amount > 0 {
        output.push_str(&format!("Unpaid:   {}\n", unpaid.red()));
    } else {
        output.push_str(&format!("Unpaid:   {unpaid}\n"));
    }

    if !summary.by_category.is_empty() {
        output.push_str("\nBy category:\n");
        for (category, count) in &summary.by_category {
            output.push_str(&format!("  {category:<10} {count}\n"));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> FilterOutcome {
        let people = vec![
            Person::new(1)
                .with("firstName", "Ana")
                .with("lastName", "Cruz")
                .with("shirtSize", "M")
                .with("paid", true),
            Person::new(2)
                .with("firstName", "Ben")
                .with("shirtSize", "No shirt"),
            Person::new(3).with("firstName", "Cara").with("shirtSize", "TS"),
        ];
        FilterOutcome {
            count: people.len(),
            results: people,
            duration_ms: 1.25,
        }
    }

    #[test]
    fn test_people_json_limit_keeps_count() {
        let json = format_people_json(&outcome(), Some(1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["count"], 3);
        assert_eq!(value["shown"], 1);
        assert_eq!(value["results"].as_array().unwrap().len(), 1);
        assert_eq!(value["results"][0]["firstName"], "Ana");
    }

    #[test]
    fn test_people_json_limit_larger_than_results() {
        let json = format_people_json(&outcome(), Some(50)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["shown"], 3);
    }

    #[test]
    fn test_people_table_rows() {
        let table = format_people_table(&outcome(), None, false);

        assert!(table.starts_with("ID"));
        assert!(table.contains("Ana Cruz"));
        assert!(table.contains("₱119"));
        assert!(table.contains("Teen"));
        assert!(table.contains("No Order"));
        assert!(table.contains("3 people"));
    }

    #[test]
    fn test_people_table_limit_footer() {
        let table = format_people_table(&outcome(), Some(2), false);
        assert!(!table.contains("Cara"));
        assert!(table.contains("Showing 2 of 3 people"));
    }

    #[test]
    fn test_people_table_empty() {
        let empty = FilterOutcome {
            results: vec![],
            count: 0,
            duration_ms: 0.0,
        };
        assert_eq!(format_people_table(&empty, None, false), "No matching people.\n");
    }

    #[test]
    fn test_summary_table() {
        let summary = ShirtSummary::from_people(&outcome().results);
        let table = format_summary_table(&summary, false);

        assert!(table.contains("People:   3"));
        assert!(table.contains("Paid:     ₱119"));
        assert!(table.contains("Kids") || table.contains("Teen"));
    }
}
