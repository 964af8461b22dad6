//! `list` command

use winenote::{RecordStore, StorageBackend, StorageError};

use crate::error::CliError;
use crate::output::format_record;

/// Handle the `list` command
pub fn handle_list<B: StorageBackend>(store: &RecordStore<B>, json: bool) -> Result<(), CliError> {
    if json {
        let content = serde_json::to_string_pretty(store.list_records()).map_err(|e| {
            StorageError::SerializationError(format!("Failed to serialize records: {}", e))
        })?;
        println!("{}", content);
        return Ok(());
    }

    if store.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    for (index, record) in store.list_records().iter().enumerate() {
        println!("{}", format_record(index, record));
    }
    println!();
    println!("{} records", store.len());
    Ok(())
}
