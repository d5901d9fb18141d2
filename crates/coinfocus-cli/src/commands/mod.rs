pub mod config;
pub mod ledger;
pub mod session;

use serde::Serialize;

/// Print one JSON object per line for streaming output.
pub(crate) fn emit<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
