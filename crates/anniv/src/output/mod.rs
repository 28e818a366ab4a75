//! Output formatting utilities for the anniv CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by entity type:
//!
//! - [`people`] - Filtered people and shirt summaries
//! - [`presets`] - Saved filters (list, show, save, delete)
//! - [`price`] - Shirt prices
//! - [`helpers`] - Common formatting utilities (truncation, amounts, flags)

pub mod helpers;
mod people;
mod presets;
mod price;

// People
pub use people::{
    format_people_json, format_people_table, format_summary_json, format_summary_table,
};

// Presets
pub use presets::{
    format_deleted_preset, format_preset_details_json, format_preset_details_table,
    format_presets_json, format_presets_table, format_saved_preset,
};

// Prices
pub use price::{format_price_json, format_price_line, format_price_table, format_price_table_json};
