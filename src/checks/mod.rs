//! Wallet consistency checks
//!
//! The storage check verifies persisted HD addresses against freshly
//! derived ground truth and repairs any corruption it finds, logging a
//! warning and reporting the impacted balance best-effort. `Sentinel`
//! owns the injected collaborators and sequences the whole run.

mod report;
mod single_flight;
mod storage_check;
mod types;
mod warnings;

pub use report::{
    report_impacted_address_balance, report_unreported_warnings, BalanceChecker, BalanceSource,
    HttpReporter, ReportPayload, WarningReporter,
};
pub use storage_check::{
    address_storage_check, get_impacted_addresses, replace_impacted_addresses,
};
pub use types::{
    AddressStorageCheckRes, ImpactedAddressPair, ImpactedAddresses, ImpactedAddressesRes,
    MinMaxAddressData, MinMaxData, RunChecksReport, StorageCheckOutcome,
};
pub use warnings::{Warning, WarningData, WarningId, WarningLog};

use crate::error::SentinelError;
use crate::storage::WalletData;
use crate::wallet::{AddressDeriver, AvailableNetwork};

use report::now_ms;
use single_flight::SingleFlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    pub onchain: bool,
    pub lightning: bool,
    pub scan_all_addresses: bool,
    pub show_notification: bool,
}

/// Full wallet re-scan, invoked after a repair so balances and history are
/// rebuilt from the corrected addresses
#[allow(async_fn_in_trait)]
pub trait WalletRefresher {
    async fn refresh(&self, options: RefreshOptions) -> Result<(), SentinelError>;
}

/// Owns the collaborators and runs the consistency checks.
///
/// At most one storage check per (wallet, network) pair may be in flight;
/// a concurrent attempt fails fast with `CheckInProgress`.
pub struct Sentinel<D, B, R, F> {
    deriver: D,
    balance_source: B,
    reporter: R,
    refresher: F,
    in_flight: SingleFlight,
}

impl<D, B, R, F> Sentinel<D, B, R, F>
where
    D: AddressDeriver,
    B: BalanceSource,
    R: WarningReporter,
    F: WalletRefresher,
{
    pub fn new(deriver: D, balance_source: B, reporter: R, refresher: F) -> Self {
        Self {
            deriver,
            balance_source,
            reporter,
            refresher,
            in_flight: SingleFlight::default(),
        }
    }

    /// Run the address storage check and repair any discrepancies.
    ///
    /// Checks the selected address type only, or every monitored type when
    /// `all_address_types` is set. Derivation failures and uninitialized
    /// chains abort before any mutation. A failed balance report does not
    /// abort the repair; it is recorded on the warning and retried later.
    pub async fn run_storage_check(
        &self,
        wallet: &mut WalletData,
        warnings: &mut WarningLog,
        network: AvailableNetwork,
        all_address_types: bool,
    ) -> Result<StorageCheckOutcome, SentinelError> {
        let _guard = self
            .in_flight
            .try_acquire(&wallet.name, network)
            .ok_or_else(|| SentinelError::CheckInProgress {
                wallet: wallet.name.clone(),
                network,
            })?;

        let address_types = if all_address_types {
            wallet.address_types_to_monitor()
        } else {
            vec![wallet.selected_address_type]
        };

        let check = address_storage_check(wallet, &self.deriver, network, &address_types)?;
        if check.all_match {
            log::debug!(
                "Storage check passed for {} on {}: all sentinels match",
                wallet.name,
                network
            );
            return Ok(StorageCheckOutcome::AllMatch);
        }

        log::warn!(
            "Address storage mismatch detected for {} on {}",
            wallet.name,
            network
        );

        let impacted = get_impacted_addresses(wallet, &self.deriver, network, &check.data)?;
        replace_impacted_addresses(wallet, network, &impacted)?;

        let mut warning_reported = false;
        match report_impacted_address_balance(&self.balance_source, &self.reporter, network, &impacted)
            .await
        {
            Ok(balance) => {
                warning_reported = true;
                log::info!("Reported impacted address balance of {} sats", balance);
            }
            Err(e) => log::warn!("Failed to report impacted addresses: {}", e),
        }

        // keep the evidence around for diagnostics and later re-reporting
        warnings.add(
            network,
            Warning::storage_check(impacted, warning_reported, now_ms()),
        );

        // the cached UTXO set may reference replaced addresses
        wallet.clear_utxos(network);

        self.refresher
            .refresh(RefreshOptions {
                onchain: true,
                lightning: true,
                scan_all_addresses: true,
                show_notification: false,
            })
            .await?;

        Ok(StorageCheckOutcome::ReplacedImpactedAddresses)
    }

    /// Startup health check: run the storage check, then retry any
    /// unreported warnings. A failed storage check is logged, not fatal.
    pub async fn run_checks(
        &self,
        wallet: &mut WalletData,
        warnings: &mut WarningLog,
        network: AvailableNetwork,
    ) -> Result<RunChecksReport, SentinelError> {
        let ran_storage_check = match self
            .run_storage_check(wallet, warnings, network, false)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Storage check did not run to completion: {}", e);
                false
            }
        };

        let warnings_reported =
            report_unreported_warnings(warnings, &self.balance_source, &self.reporter, network)
                .await;

        Ok(RunChecksReport {
            ran_storage_check,
            warnings_reported,
        })
    }
}
