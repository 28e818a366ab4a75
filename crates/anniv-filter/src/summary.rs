//! Shirt order totals over a set of people.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::resolver::has_shirt_order;
use crate::models::Person;
use crate::pricing::{category_of, price_of};

/// Totals shown next to a filtered list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShirtSummary {
    /// People in the set.
    pub people: usize,
    /// People with a shirt order.
    pub orders: usize,
    pub total_amount: u64,
    pub paid_amount: u64,
    pub unpaid_amount: u64,
    /// Shirts already handed out.
    pub given: usize,
    /// People per size category label.
    pub by_category: BTreeMap<String, usize>,
}

impl ShirtSummary {
    /// Computes totals for the given people.
    pub fn from_people<'a, I>(people: I) -> Self
    where
        I: IntoIterator<Item = &'a Person>,
    {
        let mut summary = Self::default();

        for person in people {
            summary.people += 1;

            let size = person.shirt_size();
            *summary
                .by_category
                .entry(category_of(&size).as_str().to_string())
                .or_default() += 1;

            if !has_shirt_order(person) {
                continue;
            }
            summary.orders += 1;

            let amount = u64::from(price_of(&size, person.has_print()));
            summary.total_amount += amount;
            if person.is_paid() {
                summary.paid_amount += amount;
            } else {
                summary.unpaid_amount += amount;
            }
            if person.shirt_given() {
                summary.given += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = ShirtSummary::from_people(&Vec::<Person>::new());
        assert_eq!(summary, ShirtSummary::default());
    }

    #[test]
    fn test_summary_totals() {
        let people = vec![
            Person::new(1).with("shirtSize", "M").with("paid", true),
            Person::new(2)
                .with("shirtSize", "M")
                .with("hasPrint", true)
                .with("shirtGiven", true),
            Person::new(3).with("shirtSize", "#8 (M) 5-6").with("paid", true),
            Person::new(4).with("shirtSize", "No shirt"),
            Person::new(5),
        ];

        let summary = ShirtSummary::from_people(&people);

        assert_eq!(summary.people, 5);
        assert_eq!(summary.orders, 3);
        assert_eq!(summary.total_amount, 119 + 240 + 92);
        assert_eq!(summary.paid_amount, 119 + 92);
        assert_eq!(summary.unpaid_amount, 240);
        assert_eq!(summary.given, 1);
        assert_eq!(summary.by_category.get("Adult"), Some(&2));
        assert_eq!(summary.by_category.get("Kids"), Some(&1));
        assert_eq!(summary.by_category.get("No Order"), Some(&2));
    }

    #[test]
    fn test_summary_agrees_with_order_flag_for_non_string_sizes() {
        let people = vec![
            Person::new(1).with("shirtSize", 10),
            Person::new(2).with("shirtSize", false),
        ];

        let summary = ShirtSummary::from_people(&people);

        assert_eq!(summary.orders, 1);
        assert_eq!(summary.by_category.get("Adult"), Some(&1));
        assert_eq!(summary.by_category.get("No Order"), Some(&1));
        assert_eq!(summary.total_amount, 0);
    }
}
