//! Sentinel configuration from environment variables
//!
//! Controls the Bitcoin network partition to check, the Esplora API
//! endpoint used for impacted-balance lookups, and the endpoint
//! warnings are reported to.

use std::env;

use crate::wallet::AvailableNetwork;

#[derive(Clone, Debug)]
pub struct SentinelConfig {
    /// Network partition the checks run against
    pub network: AvailableNetwork,
    /// Esplora API base URL
    pub esplora_url: String,
    /// Endpoint impacted-balance warnings are POSTed to
    pub report_url: String,
}

impl SentinelConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `BITCOIN_NETWORK`: "bitcoin", "testnet" or "regtest" (default)
    /// - `ESPLORA_URL`: Esplora API endpoint (optional, has per-network defaults)
    /// - `REPORT_URL`: warning report endpoint (optional)
    pub fn from_env() -> Self {
        let network_str = env::var("BITCOIN_NETWORK")
            .unwrap_or_else(|_| "regtest".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "bitcoin" | "mainnet" => AvailableNetwork::Bitcoin,
            "testnet" => AvailableNetwork::Testnet,
            "regtest" | "" => AvailableNetwork::Regtest,
            other => {
                log::warn!("Unknown network '{}', defaulting to regtest", other);
                AvailableNetwork::Regtest
            }
        };
        log::info!("Using {} network", network);

        let esplora_url = env::var("ESPLORA_URL").unwrap_or_else(|_| {
            let default_url = match network {
                AvailableNetwork::Bitcoin => "https://mempool.space/api".to_string(),
                AvailableNetwork::Testnet => "https://mempool.space/testnet/api".to_string(),
                AvailableNetwork::Regtest => "http://localhost:3000".to_string(),
            };
            log::info!("Esplora URL: {}", default_url);
            default_url
        });

        let report_url = env::var("REPORT_URL").unwrap_or_else(|_| match network {
            AvailableNetwork::Bitcoin => "https://api.blocktank.to/bk-info".to_string(),
            _ => "http://localhost:9000/alerts".to_string(),
        });

        Self {
            network,
            esplora_url,
            report_url,
        }
    }
}

impl Default for SentinelConfig {
    /// Default configuration (Regtest, local endpoints)
    fn default() -> Self {
        Self {
            network: AvailableNetwork::Regtest,
            esplora_url: "http://localhost:3000".to_string(),
            report_url: "http://localhost:9000/alerts".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_regtest() {
        let config = SentinelConfig::default();
        assert!(matches!(config.network, AvailableNetwork::Regtest));
    }

    #[test]
    fn test_coin_type() {
        assert_eq!(AvailableNetwork::Bitcoin.coin_type(), 0);
        assert_eq!(AvailableNetwork::Testnet.coin_type(), 1);
        assert_eq!(AvailableNetwork::Regtest.coin_type(), 1);
    }
}
