//! Storage and persistence layer
//!
//! - Persisted address-store models
//! - File system operations (one JSON file per store slice)

mod file_system;
mod models;

pub use file_system::Storage;
pub use models::{AddressChains, AddressRecord, PartitionKey, Utxo, WalletData};
