//! Audit command implementation.

use std::fs;
use std::path::PathBuf;

use super::CliError;
use encore::Ledger;

/// Execute the audit command: load an exported ledger and reassert
/// linkage and proof of work for every block.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// chain fails validation.
pub(crate) fn execute(ledger_path: PathBuf) -> Result<(), CliError> {
    let json = fs::read_to_string(&ledger_path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", ledger_path.display())))?;
    let ledger: Ledger = serde_json::from_str(&json)
        .map_err(|e| CliError::new(format!("Failed to parse {}: {e}", ledger_path.display())))?;

    ledger.validate_chain()?;

    println!(
        "ledger valid: {} blocks at difficulty {}, tip {}",
        ledger.len(),
        ledger.difficulty(),
        ledger.tip()
    );
    Ok(())
}
