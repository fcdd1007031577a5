//! Reliability core for a Bitcoin/Lightning wallet.
//!
//! Detects and repairs HD address-store corruption by cross-checking
//! persisted addresses against freshly derived ones, keeps an append-only
//! warning log with best-effort telemetry, and resolves the prioritized
//! list of user-facing suggestion cards from wallet, Lightning and order
//! snapshots.

pub mod checks;
pub mod config;
pub mod error;
pub mod manager;
pub mod storage;
pub mod todos;
pub mod wallet;

pub use checks::{RunChecksReport, Sentinel, StorageCheckOutcome};
pub use config::SentinelConfig;
pub use error::{SentinelError, StorageError};
pub use manager::SentinelManager;
