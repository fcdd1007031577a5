use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bitcoin::bip32::{DerivationPath, Xpriv, Xpub};
use bitcoin::hashes::{sha256, Hash};
use bitcoin::key::CompressedPublicKey;
use bitcoin::secp256k1::{All, Secp256k1};
use bitcoin::{Address, Network, PublicKey};
use serde::{Deserialize, Serialize};

use crate::error::SentinelError;
use crate::storage::AddressRecord;
use crate::wallet::keys::KeyManager;

/// Network partition an address store belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailableNetwork {
    Bitcoin,
    Testnet,
    Regtest,
}

impl AvailableNetwork {
    pub fn as_bitcoin(self) -> Network {
        match self {
            AvailableNetwork::Bitcoin => Network::Bitcoin,
            AvailableNetwork::Testnet => Network::Testnet,
            AvailableNetwork::Regtest => Network::Regtest,
        }
    }

    /// BIP44 coin type: 0 for mainnet, 1 for all test networks
    pub fn coin_type(self) -> u32 {
        match self {
            AvailableNetwork::Bitcoin => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for AvailableNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AvailableNetwork::Bitcoin => "bitcoin",
            AvailableNetwork::Testnet => "testnet",
            AvailableNetwork::Regtest => "regtest",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for AvailableNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bitcoin" => Ok(AvailableNetwork::Bitcoin),
            "testnet" => Ok(AvailableNetwork::Testnet),
            "regtest" => Ok(AvailableNetwork::Regtest),
            other => Err(format!("Unknown network: {}", other)),
        }
    }
}

/// Bitcoin script/address format with its own derivation path template
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressType {
    P2wpkh,
    P2shP2wpkh,
    P2pkh,
}

impl AddressType {
    pub const ALL: [AddressType; 3] = [
        AddressType::P2wpkh,
        AddressType::P2shP2wpkh,
        AddressType::P2pkh,
    ];

    /// BIP43 purpose field for this address type
    pub fn purpose(self) -> u32 {
        match self {
            AddressType::P2wpkh => 84,
            AddressType::P2shP2wpkh => 49,
            AddressType::P2pkh => 44,
        }
    }

    /// Account-level derivation path, e.g. "m/84'/1'/0'"
    pub fn derivation_path(self, network: AvailableNetwork) -> String {
        format!("m/{}'/{}'/0'", self.purpose(), network.coin_type())
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressType::P2wpkh => "p2wpkh",
            AddressType::P2shP2wpkh => "p2sh-p2wpkh",
            AddressType::P2pkh => "p2pkh",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p2wpkh" => Ok(AddressType::P2wpkh),
            "p2sh-p2wpkh" => Ok(AddressType::P2shP2wpkh),
            "p2pkh" => Ok(AddressType::P2pkh),
            other => Err(format!("Unknown address type: {}", other)),
        }
    }
}

/// Receive (external) vs change (internal) key chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChain {
    Receive,
    Change,
}

impl KeyChain {
    pub fn index(self) -> u32 {
        match self {
            KeyChain::Receive => 0,
            KeyChain::Change => 1,
        }
    }
}

/// Address-generation request, covering both key chains in one call
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub network: AvailableNetwork,
    pub address_type: AddressType,
    /// First receive index to derive
    pub address_index: u32,
    /// First change index to derive
    pub change_address_index: u32,
    /// Number of receive addresses to derive
    pub address_amount: u32,
    /// Number of change addresses to derive
    pub change_address_amount: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedAddresses {
    pub addresses: BTreeMap<u32, AddressRecord>,
    pub change_addresses: BTreeMap<u32, AddressRecord>,
}

/// Ground-truth address derivation.
///
/// The consistency checker treats whatever this returns as the canonical
/// content for an index; stored entries that disagree are corrupt.
pub trait AddressDeriver {
    fn generate(&self, options: &GenerateOptions) -> Result<GeneratedAddresses, SentinelError>;
}

/// BIP32 deriver over a master extended private key
pub struct Bip32Deriver {
    master: Xpriv,
    secp: Secp256k1<All>,
}

impl Bip32Deriver {
    pub fn new(master: Xpriv) -> Self {
        Self {
            master,
            secp: Secp256k1::new(),
        }
    }

    /// Build a deriver from a BIP39 mnemonic phrase
    pub fn from_mnemonic(
        words: &str,
        passphrase: &str,
        network: AvailableNetwork,
    ) -> Result<Self, SentinelError> {
        let keys = KeyManager::from_mnemonic(words, passphrase, network)?;
        Ok(Self::new(keys.master))
    }

    /// Derive a single address record at `chain/index` for the given type
    fn derive_record(
        &self,
        address_type: AddressType,
        network: AvailableNetwork,
        chain: KeyChain,
        index: u32,
    ) -> Result<AddressRecord, SentinelError> {
        let path_str = format!(
            "{}/{}/{}",
            address_type.derivation_path(network),
            chain.index(),
            index
        );
        let path = DerivationPath::from_str(&path_str)
            .map_err(|e| SentinelError::Derivation(e.to_string()))?;

        let child = self
            .master
            .derive_priv(&self.secp, &path)
            .map_err(|e| SentinelError::Derivation(e.to_string()))?;
        let xpub = Xpub::from_priv(&self.secp, &child);

        let pubkey = PublicKey::new(xpub.public_key);
        let compressed = CompressedPublicKey::try_from(pubkey)
            .map_err(|e| SentinelError::Derivation(e.to_string()))?;

        let net = network.as_bitcoin();
        let address = match address_type {
            AddressType::P2wpkh => Address::p2wpkh(&compressed, net),
            AddressType::P2shP2wpkh => Address::p2shwpkh(&compressed, net),
            AddressType::P2pkh => Address::p2pkh(compressed.pubkey_hash(), net),
        };

        Ok(AddressRecord {
            index: index as i32,
            path: path_str,
            script_hash: electrum_script_hash(&address),
            address: address.to_string(),
            public_key: compressed.to_string(),
        })
    }
}

impl AddressDeriver for Bip32Deriver {
    fn generate(&self, options: &GenerateOptions) -> Result<GeneratedAddresses, SentinelError> {
        let mut generated = GeneratedAddresses::default();

        for i in 0..options.address_amount {
            let index = options.address_index + i;
            let record =
                self.derive_record(options.address_type, options.network, KeyChain::Receive, index)?;
            generated.addresses.insert(index, record);
        }
        for i in 0..options.change_address_amount {
            let index = options.change_address_index + i;
            let record =
                self.derive_record(options.address_type, options.network, KeyChain::Change, index)?;
            generated.change_addresses.insert(index, record);
        }

        Ok(generated)
    }
}

/// Electrum-style script hash: reversed SHA-256 of the script pubkey, hex encoded
fn electrum_script_hash(address: &Address) -> String {
    let script = address.script_pubkey();
    let mut hash = sha256::Hash::hash(script.as_bytes()).to_byte_array();
    hash.reverse();
    hex::encode(hash)
}
