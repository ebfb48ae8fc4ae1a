//! CLI commands for dewey

pub mod check;
pub mod dispatch;
pub mod history;
pub mod prescreen;
pub mod recommend;
pub mod record;
pub mod report;

use serde::Serialize;

use dewey_core::error::Result;

/// Pretty-print a serializable report on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
