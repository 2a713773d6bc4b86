// src/config.rs
//! SDK configuration.
//!
//! Loaded from environment variables (with `.env` support) or built
//! directly. Nothing here touches the network; the server URL is handed
//! to whatever gateway implementation the caller constructs.
//!
//! ## Environment Variables
//! - `LEDGER_SERVER_URL`: websocket endpoint of the ledger node
//!   (default: public testnet)
//! - `LEDGER_NETWORK`: `mainnet` | `testnet` | `devnet`
//!   (default: `testnet`)
//! - `DID_NETWORK_ID`: network segment minted into DIDs (default: `1`)

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which ledger network the SDK targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}

/// Runtime configuration shared by the services.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub server_url: String,
    pub network: Network,
    /// Network segment minted into DIDs (`did:xrpl:<this>:<address>`).
    pub did_network_id: String,
}

impl SdkConfig {
    /// Builds a config for a specific endpoint, with the default DID
    /// network segment.
    pub fn new(server_url: &str, network: Network) -> Self {
        SdkConfig {
            server_url: server_url.to_string(),
            network,
            did_network_id: "1".to_string(),
        }
    }

    /// Loads configuration from the environment, reading `.env` first.
    /// Missing or unparsable variables fall back to testnet defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        SdkConfig {
            server_url: env::var("LEDGER_SERVER_URL")
                .unwrap_or_else(|_| "wss://s.altnet.rippletest.net:51233".into()),
            network: env::var("LEDGER_NETWORK")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Network::Testnet),
            did_network_id: env::var("DID_NETWORK_ID").unwrap_or_else(|_| "1".into()),
        }
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
