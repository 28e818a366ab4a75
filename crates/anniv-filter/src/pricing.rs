//! Shirt pricing and size categories.
//!
//! Prices are fixed for the event and must match previously issued reports
//! exactly. The tables are plain constants, shared read-only by every
//! evaluator (inline or on the worker) without synchronization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size values meaning "no shirt selected".
pub const NO_SELECTION_SIZES: [&str; 4] = ["", "No shirt", "Select Size", "None yet"];

/// Kids sizes, smallest first.
pub const KIDS_SIZES: [&str; 6] = [
    "#4 (XS) 1-2",
    "#6 (S) 3-4",
    "#8 (M) 5-6",
    "#10 (L) 7-8",
    "#12 (XL) 9-10",
    "#14 (2XL) 11-12",
];

/// The single teen size.
pub const TEEN_SIZE: &str = "TS";

/// Every orderable size, in display order.
pub const SHIRT_SIZES: [&str; 13] = [
    "#4 (XS) 1-2",
    "#6 (S) 3-4",
    "#8 (M) 5-6",
    "#10 (L) 7-8",
    "#12 (XL) 9-10",
    "#14 (2XL) 11-12",
    "TS",
    "XS",
    "S",
    "M",
    "L",
    "XL",
    "2XL",
];

/// Plain shirt prices, keyed by size.
const PLAIN_PRICES: [(&str, u32); 13] = [
    ("#4 (XS) 1-2", 86),
    ("#6 (S) 3-4", 89),
    ("#8 (M) 5-6", 92),
    ("#10 (L) 7-8", 94),
    ("#12 (XL) 9-10", 97),
    ("#14 (2XL) 11-12", 99),
    ("TS", 105),
    ("XS", 109),
    ("S", 115),
    ("M", 119),
    ("L", 123),
    ("XL", 127),
    ("2XL", 131),
];

/// With-print price for kids and teen sizes.
const KIDS_PRINT_PRICE: u32 = 220;

/// With-print price for adult sizes.
const ADULT_PRINT_PRICE: u32 = 240;

/// Returns true if the size is one of the "no shirt selected" sentinels.
pub fn is_no_selection(size: &str) -> bool {
    NO_SELECTION_SIZES.contains(&size)
}

/// Returns the price of a shirt.
///
/// Sentinel and unknown sizes cost 0.
pub fn price_of(size: &str, has_print: bool) -> u32 {
    if is_no_selection(size) {
        return 0;
    }

    let Some(plain) = PLAIN_PRICES
        .iter()
        .find(|(s, _)| *s == size)
        .map(|(_, price)| *price)
    else {
        return 0;
    };

    if !has_print {
        plain
    } else if KIDS_SIZES.contains(&size) || size == TEEN_SIZE {
        KIDS_PRINT_PRICE
    } else {
        ADULT_PRINT_PRICE
    }
}

/// Age category derived from a shirt size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShirtCategory {
    #[serde(rename = "No Order")]
    NoOrder,
    Kids,
    Teen,
    Adult,
}

impl ShirtCategory {
    /// Returns the label used in filters and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShirtCategory::NoOrder => "No Order",
            ShirtCategory::Kids => "Kids",
            ShirtCategory::Teen => "Teen",
            ShirtCategory::Adult => "Adult",
        }
    }
}

impl fmt::Display for ShirtCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the category of a shirt size.
///
/// Any size that is neither a sentinel, a kids size nor the teen size is
/// `Adult`, including misspelled sizes.
pub fn category_of(size: &str) -> ShirtCategory {
    if is_no_selection(size) {
        ShirtCategory::NoOrder
    } else if KIDS_SIZES.contains(&size) {
        ShirtCategory::Kids
    } else if size == TEEN_SIZE {
        ShirtCategory::Teen
    } else {
        ShirtCategory::Adult
    }
}
