use crate::checks::{
    BalanceChecker, BalanceSource, HttpReporter, RunChecksReport, Sentinel, StorageCheckOutcome,
    WalletRefresher, WarningReporter,
};
use crate::config::SentinelConfig;
use crate::error::SentinelError;
use crate::storage::Storage;
use crate::wallet::AddressDeriver;

/// Sentinel Manager - Orchestration Layer
///
/// Loads the persisted store slices for a wallet, runs the consistency
/// checks against them, and writes the mutated slices back.
pub struct SentinelManager<D, B, R, F> {
    pub config: SentinelConfig,
    pub storage: Storage,
    sentinel: Sentinel<D, B, R, F>,
}

impl<D, B, R, F> SentinelManager<D, B, R, F>
where
    D: AddressDeriver,
    B: BalanceSource,
    R: WarningReporter,
    F: WalletRefresher,
{
    pub fn new(
        config: SentinelConfig,
        storage: Storage,
        deriver: D,
        balance_source: B,
        reporter: R,
        refresher: F,
    ) -> Self {
        Self {
            config,
            storage,
            sentinel: Sentinel::new(deriver, balance_source, reporter, refresher),
        }
    }

    /// Startup health check for one wallet: storage check plus retry of
    /// unreported warnings, persisted on completion.
    pub async fn run_checks(&self, wallet_name: &str) -> Result<RunChecksReport, SentinelError> {
        if !self.storage.wallet_exists(wallet_name) {
            return Err(SentinelError::WalletNotFound(wallet_name.to_string()));
        }

        let mut wallet = self.storage.load_wallet_data(wallet_name)?;
        let mut warnings = self.storage.load_warnings(wallet_name)?;

        let report = self
            .sentinel
            .run_checks(&mut wallet, &mut warnings, self.config.network)
            .await?;

        self.storage.save_wallet_data(wallet_name, &wallet)?;
        self.storage.save_warnings(wallet_name, &warnings)?;

        Ok(report)
    }

    /// Run only the storage check, persisted on success.
    pub async fn run_storage_check(
        &self,
        wallet_name: &str,
        all_address_types: bool,
    ) -> Result<StorageCheckOutcome, SentinelError> {
        if !self.storage.wallet_exists(wallet_name) {
            return Err(SentinelError::WalletNotFound(wallet_name.to_string()));
        }

        let mut wallet = self.storage.load_wallet_data(wallet_name)?;
        let mut warnings = self.storage.load_warnings(wallet_name)?;

        let outcome = self
            .sentinel
            .run_storage_check(
                &mut wallet,
                &mut warnings,
                self.config.network,
                all_address_types,
            )
            .await?;

        self.storage.save_wallet_data(wallet_name, &wallet)?;
        self.storage.save_warnings(wallet_name, &warnings)?;

        Ok(outcome)
    }
}

/// Build the production HTTP collaborators from config.
pub fn http_collaborators(config: &SentinelConfig) -> (BalanceChecker, HttpReporter) {
    (
        BalanceChecker::new(config.esplora_url.clone()),
        HttpReporter::new(config.report_url.clone()),
    )
}
