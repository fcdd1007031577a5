//! Result shapes produced by the address storage check

use serde::{Deserialize, Serialize};

use crate::storage::AddressRecord;
use crate::wallet::{AddressType, AvailableNetwork};

/// Min/max sentinel comparison for one key chain.
///
/// Both the stored and freshly generated records are kept even when they
/// match, for audit and display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinMaxAddressData {
    pub min_stored_address: Option<AddressRecord>,
    pub min_generated_address: Option<AddressRecord>,
    pub min_match: bool,
    pub max_stored_address: Option<AddressRecord>,
    pub max_generated_address: Option<AddressRecord>,
    pub max_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinMaxData {
    pub address_type: AddressType,
    pub selected_network: AvailableNetwork,
    pub address: MinMaxAddressData,
    pub change_address: MinMaxAddressData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressStorageCheckRes {
    pub all_match: bool,
    pub data: Vec<MinMaxData>,
}

/// A stored entry whose re-derived counterpart at the same index disagrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactedAddressPair {
    pub stored_address: AddressRecord,
    pub generated_address: AddressRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactedAddresses {
    pub address_type: AddressType,
    pub addresses: Vec<ImpactedAddressPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactedAddressesRes {
    pub impacted_addresses: Vec<ImpactedAddresses>,
    pub impacted_change_addresses: Vec<ImpactedAddresses>,
}

impl ImpactedAddressesRes {
    pub fn is_empty(&self) -> bool {
        self.impacted_addresses.is_empty() && self.impacted_change_addresses.is_empty()
    }

    /// All stored (corrupt) address strings across both chains, used for
    /// the impacted-balance lookup.
    pub fn stored_addresses(&self) -> Vec<String> {
        self.impacted_addresses
            .iter()
            .chain(self.impacted_change_addresses.iter())
            .flat_map(|group| group.addresses.iter())
            .map(|pair| pair.stored_address.address.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCheckOutcome {
    /// Every min/max sentinel matched; nothing was written
    AllMatch,
    /// Corrupt entries were found and replaced with regenerated records
    ReplacedImpactedAddresses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunChecksReport {
    pub ran_storage_check: bool,
    /// Warnings successfully re-reported during this run
    pub warnings_reported: usize,
}
