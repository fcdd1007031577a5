//! Common test utilities for the consistency-check integration tests
//!
//! Provides mock collaborators (balance source, reporter, refresher) and
//! helpers to seed a wallet store from a known mnemonic.

use std::sync::Mutex;

use wallet_sentinel::checks::{
    BalanceSource, RefreshOptions, ReportPayload, WalletRefresher, WarningReporter,
};
use wallet_sentinel::error::SentinelError;
use wallet_sentinel::storage::WalletData;
use wallet_sentinel::wallet::{
    AddressDeriver, AddressType, AvailableNetwork, Bip32Deriver, GenerateOptions,
};

// BIP84 test vector mnemonic
pub const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

pub const NETWORK: AvailableNetwork = AvailableNetwork::Regtest;

pub fn deriver() -> Bip32Deriver {
    init_logging();
    Bip32Deriver::from_mnemonic(MNEMONIC, "", NETWORK).expect("valid mnemonic")
}

pub fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Wallet store seeded with `count` correct receive and change addresses
pub fn seeded_wallet(name: &str, address_type: AddressType, count: u32) -> WalletData {
    let generated = deriver()
        .generate(&GenerateOptions {
            network: NETWORK,
            address_type,
            address_index: 0,
            change_address_index: 0,
            address_amount: count,
            change_address_amount: count,
        })
        .expect("derivation");

    let mut wallet = WalletData::new(name);
    wallet.selected_address_type = address_type;
    let chains = wallet.chains_mut(NETWORK, address_type);
    chains.addresses = generated.addresses.clone();
    chains.change_addresses = generated.change_addresses.clone();
    chains.address_index = generated.addresses[&(count - 1)].clone();
    chains.change_address_index = generated.change_addresses[&(count - 1)].clone();
    wallet
}

/// Corrupt a stored record so it no longer matches its derivation
pub fn corrupt_receive(wallet: &mut WalletData, address_type: AddressType, index: u32) {
    let chains = wallet.chains_mut(NETWORK, address_type);
    let record = chains
        .addresses
        .get_mut(&index)
        .expect("seeded index present");
    record.address = format!("bcrt1corrupted{}", index);
    record.script_hash = "00".repeat(32);
}

pub fn corrupt_change(wallet: &mut WalletData, address_type: AddressType, index: u32) {
    let chains = wallet.chains_mut(NETWORK, address_type);
    let record = chains
        .change_addresses
        .get_mut(&index)
        .expect("seeded index present");
    record.address = format!("bcrt1corruptedchange{}", index);
    record.script_hash = "11".repeat(32);
}

#[derive(Default)]
pub struct MockBalanceSource {
    pub balance: u64,
    pub fail: Mutex<bool>,
    pub queried: Mutex<Vec<Vec<String>>>,
}

impl MockBalanceSource {
    pub fn with_balance(balance: u64) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }
}

impl BalanceSource for &MockBalanceSource {
    async fn address_balance(&self, addresses: &[String]) -> Result<u64, SentinelError> {
        self.queried.lock().unwrap().push(addresses.to_vec());
        if *self.fail.lock().unwrap() {
            return Err(SentinelError::Esplora("mock offline".to_string()));
        }
        Ok(self.balance)
    }
}

#[derive(Default)]
pub struct MockReporter {
    pub fail: Mutex<bool>,
    pub payloads: Mutex<Vec<ReportPayload>>,
}

impl MockReporter {
    pub fn failing() -> Self {
        Self {
            fail: Mutex::new(true),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl WarningReporter for &MockReporter {
    async fn report(&self, payload: &ReportPayload) -> Result<(), SentinelError> {
        if *self.fail.lock().unwrap() {
            return Err(SentinelError::Report("mock endpoint down".to_string()));
        }
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockRefresher {
    pub calls: Mutex<Vec<RefreshOptions>>,
    /// Milliseconds to stall inside refresh, to hold the check in flight
    pub delay_ms: u64,
}

impl WalletRefresher for &MockRefresher {
    async fn refresh(&self, options: RefreshOptions) -> Result<(), SentinelError> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        self.calls.lock().unwrap().push(options);
        Ok(())
    }
}
