//! Key and address derivation
//!
//! - Network and address-type enums with their derivation path templates
//! - BIP39 key restoration
//! - BIP32 ground-truth address derivation

mod derivation;
mod keys;

pub use derivation::{
    AddressDeriver, AddressType, AvailableNetwork, Bip32Deriver, GenerateOptions,
    GeneratedAddresses, KeyChain,
};
pub use keys::{KeyManager, WalletKeys};
