//! Address storage check operations
//!
//! Stored HD addresses are verified against freshly derived ground truth:
//! a cheap min/max sentinel comparison first, then a full-range
//! regenerate-and-diff for any partition the sentinels flag.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::SentinelError;
use crate::storage::{AddressChains, AddressRecord, WalletData};
use crate::wallet::{AddressDeriver, AddressType, AvailableNetwork, GenerateOptions, KeyChain};

use super::types::{
    AddressStorageCheckRes, ImpactedAddressPair, ImpactedAddresses, ImpactedAddressesRes,
    MinMaxAddressData, MinMaxData,
};

/// Compare the stored min/max entries of each requested address type
/// against re-derived addresses at the same indices.
///
/// A chain with no stored entries at all is an error, not a match: the
/// caller must not mistake an uninitialized partition for a healthy one.
pub fn address_storage_check(
    wallet: &WalletData,
    deriver: &impl AddressDeriver,
    network: AvailableNetwork,
    address_types: &[AddressType],
) -> Result<AddressStorageCheckRes, SentinelError> {
    let mut data = Vec::with_capacity(address_types.len());

    for &address_type in address_types {
        let chains = wallet.chains(network, address_type).ok_or_else(|| {
            SentinelError::UninitializedChain(format!("{} on {}", address_type, network))
        })?;

        if chains.change_addresses.is_empty() {
            return Err(SentinelError::UninitializedChain(format!(
                "{} change chain on {}",
                address_type, network
            )));
        }

        let address = create_min_max_data(
            deriver,
            network,
            address_type,
            KeyChain::Receive,
            &chains.addresses,
        )?;
        let change_address = create_min_max_data(
            deriver,
            network,
            address_type,
            KeyChain::Change,
            &chains.change_addresses,
        )?;

        data.push(MinMaxData {
            address_type,
            selected_network: network,
            address,
            change_address,
        });
    }

    let all_match = data.iter().all(|d| {
        d.address.min_match
            && d.address.max_match
            && d.change_address.min_match
            && d.change_address.max_match
    });

    Ok(AddressStorageCheckRes { all_match, data })
}

/// Re-derive exactly one address at the stored-min and stored-max indexes
/// and compare the `address` field byte-for-byte.
fn create_min_max_data(
    deriver: &impl AddressDeriver,
    network: AvailableNetwork,
    address_type: AddressType,
    chain: KeyChain,
    stored: &BTreeMap<u32, AddressRecord>,
) -> Result<MinMaxAddressData, SentinelError> {
    let (min_stored, max_stored) = match (stored.values().next(), stored.values().last()) {
        (Some(min), Some(max)) => (min.clone(), max.clone()),
        _ => {
            return Err(SentinelError::UninitializedChain(format!(
                "{} {:?} chain on {}",
                address_type, chain, network
            )))
        }
    };

    let min_generated = generate_single(deriver, network, address_type, chain, &min_stored)?;
    let max_generated = generate_single(deriver, network, address_type, chain, &max_stored)?;

    Ok(MinMaxAddressData {
        min_match: min_stored.address == min_generated.address,
        max_match: max_stored.address == max_generated.address,
        min_stored_address: Some(min_stored),
        min_generated_address: Some(min_generated),
        max_stored_address: Some(max_stored),
        max_generated_address: Some(max_generated),
    })
}

fn generate_single(
    deriver: &impl AddressDeriver,
    network: AvailableNetwork,
    address_type: AddressType,
    chain: KeyChain,
    stored: &AddressRecord,
) -> Result<AddressRecord, SentinelError> {
    let index = if stored.index >= 0 {
        stored.index as u32
    } else {
        return Err(SentinelError::Derivation(format!(
            "Stored address {} has no generated index",
            stored.address
        )));
    };

    let options = match chain {
        KeyChain::Receive => GenerateOptions {
            network,
            address_type,
            address_index: index,
            change_address_index: 0,
            address_amount: 1,
            change_address_amount: 0,
        },
        KeyChain::Change => GenerateOptions {
            network,
            address_type,
            address_index: 0,
            change_address_index: index,
            address_amount: 0,
            change_address_amount: 1,
        },
    };
    let generated = deriver.generate(&options)?;

    let record = match chain {
        KeyChain::Receive => generated.addresses.get(&index),
        KeyChain::Change => generated.change_addresses.get(&index),
    };
    record.cloned().ok_or_else(|| {
        SentinelError::Derivation(format!(
            "Deriver returned no address at index {} for {}",
            index, address_type
        ))
    })
}

/// Regenerate every address from index 0 through the larger of the stored
/// and generated max indexes, and collect stored entries whose re-derived
/// counterparts differ. Indexes with no stored entry are not flagged.
pub fn get_impacted_addresses(
    wallet: &WalletData,
    deriver: &impl AddressDeriver,
    network: AvailableNetwork,
    check_data: &[MinMaxData],
) -> Result<ImpactedAddressesRes, SentinelError> {
    let mut res = ImpactedAddressesRes::default();

    for data in check_data {
        let chains = wallet.chains(network, data.address_type).ok_or_else(|| {
            SentinelError::UninitializedChain(format!("{} on {}", data.address_type, network))
        })?;

        let receive_count = scan_count(&chains.addresses, &data.address);
        let change_count = scan_count(&chains.change_addresses, &data.change_address);

        let generated = deriver.generate(&GenerateOptions {
            network,
            address_type: data.address_type,
            address_index: 0,
            change_address_index: 0,
            address_amount: receive_count,
            change_address_amount: change_count,
        })?;

        let impacted = mismatched_addresses(&chains.addresses, &generated.addresses);
        let impacted_change =
            mismatched_addresses(&chains.change_addresses, &generated.change_addresses);

        if !impacted.is_empty() {
            res.impacted_addresses.push(ImpactedAddresses {
                address_type: data.address_type,
                addresses: impacted,
            });
        }
        if !impacted_change.is_empty() {
            res.impacted_change_addresses.push(ImpactedAddresses {
                address_type: data.address_type,
                addresses: impacted_change,
            });
        }
    }

    Ok(res)
}

/// Inclusive scan range: max of the stored and generated max indexes, plus one
fn scan_count(stored: &BTreeMap<u32, AddressRecord>, min_max: &MinMaxAddressData) -> u32 {
    let stored_max = stored.keys().last().copied().unwrap_or(0);
    let generated_max = min_max
        .max_generated_address
        .as_ref()
        .map(|a| a.index.max(0) as u32)
        .unwrap_or(0);
    stored_max.max(generated_max) + 1
}

fn mismatched_addresses(
    stored: &BTreeMap<u32, AddressRecord>,
    generated: &BTreeMap<u32, AddressRecord>,
) -> Vec<ImpactedAddressPair> {
    stored
        .iter()
        .filter_map(|(index, stored_address)| {
            let generated_address = generated.get(index)?;
            if generated_address != stored_address {
                Some(ImpactedAddressPair {
                    stored_address: stored_address.clone(),
                    generated_address: generated_address.clone(),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Swap every impacted entry for its regenerated counterpart.
///
/// Each affected partition is rebuilt and written back in one
/// `replace_chains` call, so the four partition fields change together.
/// The index cursors move only when they point at a replaced entry.
pub fn replace_impacted_addresses(
    wallet: &mut WalletData,
    network: AvailableNetwork,
    impacted: &ImpactedAddressesRes,
) -> Result<(), SentinelError> {
    let affected_types: BTreeSet<AddressType> = impacted
        .impacted_addresses
        .iter()
        .chain(impacted.impacted_change_addresses.iter())
        .map(|group| group.address_type)
        .collect();

    for address_type in affected_types {
        let mut chains: AddressChains = wallet
            .chains(network, address_type)
            .cloned()
            .unwrap_or_default();

        for group in impacted
            .impacted_addresses
            .iter()
            .filter(|g| g.address_type == address_type)
        {
            apply_pairs(
                &mut chains.addresses,
                &mut chains.address_index,
                &group.addresses,
            );
        }
        for group in impacted
            .impacted_change_addresses
            .iter()
            .filter(|g| g.address_type == address_type)
        {
            apply_pairs(
                &mut chains.change_addresses,
                &mut chains.change_address_index,
                &group.addresses,
            );
        }

        wallet.replace_chains(network, address_type, chains);
    }

    Ok(())
}

fn apply_pairs(
    stored: &mut BTreeMap<u32, AddressRecord>,
    cursor: &mut AddressRecord,
    pairs: &[ImpactedAddressPair],
) {
    for pair in pairs {
        if pair.stored_address.index >= 0 {
            stored.insert(
                pair.stored_address.index as u32,
                pair.generated_address.clone(),
            );
        }
        if cursor.index == pair.stored_address.index {
            *cursor = pair.generated_address.clone();
        }
    }
}
