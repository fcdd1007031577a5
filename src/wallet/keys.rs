use bip39::Mnemonic;
use bitcoin::bip32::{Fingerprint, Xpriv};
use bitcoin::secp256k1::Secp256k1;

use crate::error::SentinelError;
use crate::wallet::AvailableNetwork;

pub struct WalletKeys {
    pub mnemonic: Mnemonic,
    pub master: Xpriv,
    pub fingerprint: Fingerprint,
}

pub struct KeyManager;

impl KeyManager {
    /// Restore wallet keys from an existing mnemonic phrase
    pub fn from_mnemonic(
        words: &str,
        passphrase: &str,
        network: AvailableNetwork,
    ) -> Result<WalletKeys, SentinelError> {
        let mnemonic =
            Mnemonic::parse(words).map_err(|e| SentinelError::InvalidMnemonic(e.to_string()))?;

        let seed = mnemonic.to_seed(passphrase);
        let master = Xpriv::new_master(network.as_bitcoin(), &seed)
            .map_err(|e| SentinelError::Derivation(e.to_string()))?;

        let secp = Secp256k1::new();
        let fingerprint = master.fingerprint(&secp);

        Ok(WalletKeys {
            mnemonic,
            master,
            fingerprint,
        })
    }
}
