//! Price command implementation.

use super::{CommandContext, Result};
use crate::output::{format_price_json, format_price_line, format_price_table, format_price_table_json};

/// Prints the price of one size, or the whole table when no size is given.
pub fn execute(ctx: &CommandContext, size: Option<&str>, has_print: bool) -> Result<()> {
    match size {
        Some(size) => {
            let size = size.trim();
            if ctx.json_output {
                println!("{}", format_price_json(size, has_print)?);
            } else if !ctx.quiet {
                print!("{}", format_price_line(size, has_print, ctx.use_colors));
            }
        }
        None => {
            if ctx.json_output {
                println!("{}", format_price_table_json()?);
            } else if !ctx.quiet {
                print!("{}", format_price_table(ctx.use_colors));
            }
        }
    }

    Ok(())
}
