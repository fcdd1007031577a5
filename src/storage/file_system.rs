use std::fs;
use std::path::PathBuf;

use crate::checks::WarningLog;
use crate::error::StorageError;
use crate::todos::TodosState;

use super::models::WalletData;

/// File-backed persistence: one directory per wallet, one JSON file per
/// store slice (`addresses.json`, `warnings.json`, `todos.json`).
#[derive(Clone)]
pub struct Storage {
    base_path: PathBuf,
}

impl Storage {
    /// Create a new storage instance with the default base directory ("./wallets")
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./wallets"),
        }
    }

    /// Create storage with custom base directory (for testing)
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_path
    }

    fn wallet_dir(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Create a new wallet directory structure
    pub fn create_wallet(&self, name: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)?;
        let wallet_dir = self.wallet_dir(name);
        fs::create_dir_all(&wallet_dir)?;
        Ok(())
    }

    /// Check if a wallet with the given name exists
    pub fn wallet_exists(&self, name: &str) -> bool {
        self.wallet_dir(name).exists()
    }

    /// Save the wallet address store to disk
    pub fn save_wallet_data(&self, name: &str, data: &WalletData) -> Result<(), StorageError> {
        let path = self.wallet_dir(name).join("addresses.json");
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load the wallet address store, or an empty default if never saved
    pub fn load_wallet_data(&self, name: &str) -> Result<WalletData, StorageError> {
        let path = self.wallet_dir(name).join("addresses.json");
        if !path.exists() {
            return Ok(WalletData::new(name));
        }
        let contents = fs::read_to_string(path)?;
        let data = serde_json::from_str(&contents)?;
        Ok(data)
    }

    /// Save the warning log to disk
    pub fn save_warnings(&self, name: &str, warnings: &WarningLog) -> Result<(), StorageError> {
        let path = self.wallet_dir(name).join("warnings.json");
        let json = serde_json::to_string_pretty(warnings)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load the warning log from disk, or an empty log if never saved
    pub fn load_warnings(&self, name: &str) -> Result<WarningLog, StorageError> {
        let path = self.wallet_dir(name).join("warnings.json");
        if !path.exists() {
            return Ok(WarningLog::default());
        }
        let contents = fs::read_to_string(path)?;
        let warnings = serde_json::from_str(&contents)?;
        Ok(warnings)
    }

    /// Save todo visibility state to disk
    pub fn save_todos(&self, name: &str, todos: &TodosState) -> Result<(), StorageError> {
        let path = self.wallet_dir(name).join("todos.json");
        let json = serde_json::to_string_pretty(todos)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load todo visibility state from disk, or defaults if never saved
    pub fn load_todos(&self, name: &str) -> Result<TodosState, StorageError> {
        let path = self.wallet_dir(name).join("todos.json");
        if !path.exists() {
            return Ok(TodosState::default());
        }
        let contents = fs::read_to_string(path)?;
        let todos = serde_json::from_str(&contents)?;
        Ok(todos)
    }

    /// List all wallet names in the storage directory
    pub fn list_wallets(&self) -> Result<Vec<String>, StorageError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut wallets = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name() {
                    if let Some(name_str) = name.to_str() {
                        wallets.push(name_str.to_string());
                    }
                }
            }
        }
        Ok(wallets)
    }

    /// Delete a wallet and all its associated data from disk
    pub fn delete_wallet(&self, name: &str) -> Result<(), StorageError> {
        let wallet_dir = self.wallet_dir(name);

        if !wallet_dir.exists() {
            return Err(StorageError::FileNotFound(
                wallet_dir.display().to_string(),
            ));
        }

        log::warn!("Deleting wallet directory: {:?}", wallet_dir);
        fs::remove_dir_all(&wallet_dir)?;
        log::info!("Wallet '{}' deleted successfully", name);

        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_wallet_data_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());

        storage.create_wallet("wallet0").unwrap();
        let mut data = WalletData::new("wallet0");
        data.chains_mut(
            crate::wallet::AvailableNetwork::Regtest,
            crate::wallet::AddressType::P2wpkh,
        );
        storage.save_wallet_data("wallet0", &data).unwrap();

        let loaded = storage.load_wallet_data("wallet0").unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_missing_slices_default() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());
        storage.create_wallet("wallet0").unwrap();

        assert_eq!(
            storage.load_wallet_data("wallet0").unwrap(),
            WalletData::new("wallet0")
        );
        assert_eq!(storage.load_warnings("wallet0").unwrap(), WarningLog::default());
        assert_eq!(storage.load_todos("wallet0").unwrap(), TodosState::default());
    }

    #[test]
    fn test_list_and_delete() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());
        storage.create_wallet("a").unwrap();
        storage.create_wallet("b").unwrap();

        let mut wallets = storage.list_wallets().unwrap();
        wallets.sort();
        assert_eq!(wallets, vec!["a", "b"]);

        storage.delete_wallet("a").unwrap();
        assert!(!storage.wallet_exists("a"));
        assert!(storage.delete_wallet("a").is_err());
    }
}
