//! Data models for the persisted wallet address store

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::wallet::{AddressType, AvailableNetwork};

/// A derived address as it sits in storage.
///
/// `index == -1` is the "not yet generated" sentinel used by the
/// `address_index` / `change_address_index` cursors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub index: i32,
    pub path: String,
    pub address: String,
    pub script_hash: String,
    pub public_key: String,
}

impl Default for AddressRecord {
    fn default() -> Self {
        Self {
            index: -1,
            path: String::new(),
            address: String::new(),
            script_hash: String::new(),
            public_key: String::new(),
        }
    }
}

impl AddressRecord {
    pub fn is_generated(&self) -> bool {
        self.index >= 0
    }
}

/// Receive and change chains for one (network, address type) partition.
///
/// Repair replaces all four fields together; they are never patched
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressChains {
    pub addresses: BTreeMap<u32, AddressRecord>,
    pub change_addresses: BTreeMap<u32, AddressRecord>,
    pub address_index: AddressRecord,
    pub change_address_index: AddressRecord,
}

/// Composite key into the partition map, serialized as "network/address-type"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PartitionKey {
    pub network: AvailableNetwork,
    pub address_type: AddressType,
}

impl PartitionKey {
    pub fn new(network: AvailableNetwork, address_type: AddressType) -> Self {
        Self {
            network,
            address_type,
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.address_type)
    }
}

impl From<PartitionKey> for String {
    fn from(key: PartitionKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PartitionKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (network, address_type) = s
            .split_once('/')
            .ok_or_else(|| format!("Invalid partition key: {}", s))?;
        Ok(Self {
            network: AvailableNetwork::from_str(network)?,
            address_type: AddressType::from_str(address_type)?,
        })
    }
}

/// Cached unspent output, invalidated wholesale after a repair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub tx_id: String,
    pub vout: u32,
    pub value: u64,
    pub address: String,
    pub script_hash: String,
}

/// Per-wallet address store, partitioned by network and address type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletData {
    pub name: String,
    pub selected_address_type: AddressType,
    pub monitored_address_types: Vec<AddressType>,
    pub partitions: BTreeMap<PartitionKey, AddressChains>,
    pub utxos: BTreeMap<AvailableNetwork, Vec<Utxo>>,
}

impl WalletData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            selected_address_type: AddressType::P2wpkh,
            monitored_address_types: vec![AddressType::P2wpkh],
            partitions: BTreeMap::new(),
            utxos: BTreeMap::new(),
        }
    }

    pub fn chains(&self, network: AvailableNetwork, address_type: AddressType) -> Option<&AddressChains> {
        self.partitions.get(&PartitionKey::new(network, address_type))
    }

    pub fn chains_mut(
        &mut self,
        network: AvailableNetwork,
        address_type: AddressType,
    ) -> &mut AddressChains {
        self.partitions
            .entry(PartitionKey::new(network, address_type))
            .or_default()
    }

    /// Atomic overwrite of one partition's four fields
    pub fn replace_chains(
        &mut self,
        network: AvailableNetwork,
        address_type: AddressType,
        chains: AddressChains,
    ) {
        self.partitions
            .insert(PartitionKey::new(network, address_type), chains);
    }

    pub fn clear_utxos(&mut self, network: AvailableNetwork) {
        self.utxos.remove(&network);
    }

    /// Selected address type first, then any additionally monitored types
    pub fn address_types_to_monitor(&self) -> Vec<AddressType> {
        let mut types = vec![self.selected_address_type];
        for t in &self.monitored_address_types {
            if !types.contains(t) {
                types.push(*t);
            }
        }
        types
    }
}
