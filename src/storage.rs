//! Persistence of the address book.
//!
//! Each network gets one JSON file mapping logical contract names to their
//! addresses. The file is a snapshot of the latest run: it is replaced
//! wholesale, never merged, so stale entries from previous runs cannot
//! linger.

use std::{fs, path::PathBuf};

use serde_json::{json, Map, Value};
use tracing::info;

use crate::{errors::ScriptError, types::AddressBook};

/// A destination for per-network address records
pub trait AddressStore {
    fn write_record(&self, network: &str, record: &Value) -> Result<(), ScriptError>;
}

/// An [`AddressStore`] writing `<dir>/<network>Addresses.json` files
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl AddressStore for FsStore {
    fn write_record(&self, network: &str, record: &Value) -> Result<(), ScriptError> {
        fs::create_dir_all(&self.dir).map_err(|e| ScriptError::Persistence(e.to_string()))?;

        let path = self.dir.join(format!("{network}Addresses.json"));
        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| ScriptError::Persistence(e.to_string()))?;
        fs::write(&path, contents)
            .map_err(|e| ScriptError::Persistence(format!("{}: {e}", path.display())))?;

        info!(path = %path.display(), "address book persisted");
        Ok(())
    }
}

/// Builds the JSON record for the book: plain entries map to their address,
/// proxy entries to an object carrying both addresses
fn book_record(book: &AddressBook) -> Value {
    let mut record = Map::new();
    for (name, contract) in book.entries() {
        let value = match contract.implementation_address {
            Some(implementation) => json!({
                "address": format!("{:#x}", contract.address),
                "implementationAddress": format!("{implementation:#x}"),
            }),
            None => Value::String(format!("{:#x}", contract.address)),
        };
        record.insert(name.to_string(), value);
    }
    Value::Object(record)
}

/// Persists the book for the given network
pub fn persist<S: AddressStore + ?Sized>(
    book: &AddressBook,
    network: &str,
    store: &S,
) -> Result<(), ScriptError> {
    store.write_record(network, &book_record(book))
}
