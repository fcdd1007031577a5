//! Best-effort warning telemetry
//!
//! The balance sitting on impacted addresses is looked up via Esplora and
//! POSTed to the configured report endpoint. Failures never abort a
//! repair; the warning stays flagged unreported and is retried on the
//! next `run_checks`.

use serde::Serialize;

use crate::error::SentinelError;
use crate::wallet::AvailableNetwork;

use super::types::ImpactedAddressesRes;
use super::warnings::{WarningData, WarningId, WarningLog};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub id: WarningId,
    pub balance: u64,
    pub platform: &'static str,
    pub version: &'static str,
    pub network: AvailableNetwork,
    pub timestamp: u64,
}

/// Source for the total balance held by a set of addresses
#[allow(async_fn_in_trait)]
pub trait BalanceSource {
    async fn address_balance(&self, addresses: &[String]) -> Result<u64, SentinelError>;
}

/// Sink for warning telemetry payloads
#[allow(async_fn_in_trait)]
pub trait WarningReporter {
    async fn report(&self, payload: &ReportPayload) -> Result<(), SentinelError>;
}

/// Esplora-backed balance lookup
pub struct BalanceChecker {
    client: reqwest::Client,
    base_url: String,
}

impl BalanceChecker {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl BalanceSource for BalanceChecker {
    async fn address_balance(&self, addresses: &[String]) -> Result<u64, SentinelError> {
        let mut total = 0u64;

        for address in addresses {
            let url = format!("{}/address/{}", self.base_url, address);
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| SentinelError::Esplora(e.to_string()))?;

            if !response.status().is_success() {
                continue;
            }

            let info: serde_json::Value = response
                .json()
                .await
                .map_err(|e| SentinelError::Esplora(e.to_string()))?;

            let funded = info["chain_stats"]["funded_txo_sum"].as_u64().unwrap_or(0);
            let spent = info["chain_stats"]["spent_txo_sum"].as_u64().unwrap_or(0);
            total += funded.saturating_sub(spent);
        }

        Ok(total)
    }
}

/// JSON POST reporter
pub struct HttpReporter {
    client: reqwest::Client,
    url: String,
}

impl HttpReporter {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

impl WarningReporter for HttpReporter {
    async fn report(&self, payload: &ReportPayload) -> Result<(), SentinelError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SentinelError::Report(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SentinelError::Report(format!(
                "Report endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

pub(crate) fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Look up the balance sitting on the impacted (stored) addresses and send
/// it to the report endpoint. Returns the reported balance.
pub async fn report_impacted_address_balance(
    balance_source: &impl BalanceSource,
    reporter: &impl WarningReporter,
    network: AvailableNetwork,
    impacted: &ImpactedAddressesRes,
) -> Result<u64, SentinelError> {
    let addresses = impacted.stored_addresses();
    let balance = balance_source.address_balance(&addresses).await?;

    let payload = ReportPayload {
        id: WarningId::StorageCheck,
        balance,
        platform: std::env::consts::OS,
        version: env!("CARGO_PKG_VERSION"),
        network,
        timestamp: now_ms(),
    };
    reporter.report(&payload).await?;

    Ok(balance)
}

/// Retry every warning whose report never went through.
///
/// Warnings can go unreported if the host shuts down before the report is
/// sent, the send fails, or the server is down. Returns how many were
/// reported this time; failures are simply left for the next run.
pub async fn report_unreported_warnings(
    warnings: &mut WarningLog,
    balance_source: &impl BalanceSource,
    reporter: &impl WarningReporter,
    network: AvailableNetwork,
) -> usize {
    let mut reported = 0;

    for warning in warnings.unreported(network) {
        let WarningData::ImpactedAddresses(impacted) = &warning.data else {
            continue;
        };
        match report_impacted_address_balance(balance_source, reporter, network, impacted).await {
            Ok(_) => {
                warnings.mark_reported(network, warning.id);
                reported += 1;
            }
            Err(e) => {
                // server could be down, try again later
                log::debug!("Warning {} still unreported: {}", warning.id, e);
            }
        }
    }

    reported
}
