use thiserror::Error;

use crate::wallet::AvailableNetwork;

#[derive(Error, Debug)]
pub enum SentinelError {
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Derivation error: {0}")]
    Derivation(String),

    #[error("Address chain was never initialized: {0}")]
    UninitializedChain(String),

    #[error("Storage check already running for {wallet} on {network}")]
    CheckInProgress {
        wallet: String,
        network: AvailableNetwork,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Esplora error: {0}")]
    Esplora(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Refresh error: {0}")]
    Refresh(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Wallet directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}
