//! Append-only per-wallet warning log
//!
//! Detected inconsistencies are recorded for diagnostics and so failed
//! telemetry reports can be retried on a later run. Entries are never
//! deleted individually; the log only resets wholesale with the wallet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::todos::Channel;
use crate::wallet::AvailableNetwork;

use super::types::ImpactedAddressesRes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningId {
    StorageCheck,
    LdkMigration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum WarningData {
    ImpactedAddresses(ImpactedAddressesRes),
    Channels(Vec<Channel>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub id: Uuid,
    pub warning_id: WarningId,
    pub data: WarningData,
    pub warning_reported: bool,
    /// Creation time, epoch milliseconds
    pub timestamp: u64,
}

impl Warning {
    pub fn storage_check(data: ImpactedAddressesRes, reported: bool, timestamp: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            warning_id: WarningId::StorageCheck,
            data: WarningData::ImpactedAddresses(data),
            warning_reported: reported,
            timestamp,
        }
    }

    pub fn ldk_migration(channels: Vec<Channel>, timestamp: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            warning_id: WarningId::LdkMigration,
            data: WarningData::Channels(channels),
            warning_reported: false,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningLog {
    warnings: BTreeMap<AvailableNetwork, Vec<Warning>>,
}

impl WarningLog {
    pub fn add(&mut self, network: AvailableNetwork, warning: Warning) {
        self.warnings.entry(network).or_default().push(warning);
    }

    pub fn all(&self, network: AvailableNetwork) -> &[Warning] {
        self.warnings.get(&network).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unreported(&self, network: AvailableNetwork) -> Vec<Warning> {
        self.all(network)
            .iter()
            .filter(|w| !w.warning_reported)
            .cloned()
            .collect()
    }

    pub fn mark_reported(&mut self, network: AvailableNetwork, id: Uuid) {
        if let Some(warnings) = self.warnings.get_mut(&network) {
            for warning in warnings.iter_mut() {
                if warning.id == id {
                    warning.warning_reported = true;
                }
            }
        }
    }

    /// Wholesale reset, used only when the wallet itself is wiped
    pub fn reset(&mut self) {
        self.warnings.clear();
    }
}
