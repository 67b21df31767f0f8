// src/config.rs
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, read_keypair_file};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{Result, SubmitError};

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_PROGRAM_ID: &str = "6ujAE4E7VL17fLsUj87kFqvzhC5gKTzwA3TSvxKhdMcv";
pub const DEFAULT_EXPLORER_CLUSTER: &str = "devnet";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Maps a commitment name onto the client's commitment config.
pub fn parse_commitment(s: &str) -> Result<CommitmentConfig> {
    match s.trim().to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(SubmitError::Config(format!(
            "Unknown commitment level '{}'. Expected processed, confirmed or finalized.",
            other
        ))),
    }
}

/// Run configuration, loaded once at startup and passed by reference from there on.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rpc_url: String,
    pub keypair_path: PathBuf,
    pub program_id: Pubkey,
    pub commitment: CommitmentConfig,
    pub explorer_cluster: String,
    pub poll_interval: Duration,
    pub rpc_timeout: Duration,
    /// Replaces the built-in suite when set.
    pub cases_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let rpc_url = get("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let keypair_path = match get("KEYPAIR_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_keypair_path()?,
        };

        let program_id_str = get("PROGRAM_ID").unwrap_or_else(|| DEFAULT_PROGRAM_ID.to_string());
        let program_id = Pubkey::from_str(&program_id_str)
            .map_err(|_| SubmitError::InvalidProgramId(program_id_str.clone()))?;

        let commitment = match get("COMMITMENT") {
            Some(level) => parse_commitment(&level)?,
            None => CommitmentConfig::confirmed(),
        };

        let explorer_cluster =
            get("EXPLORER_CLUSTER").unwrap_or_else(|| DEFAULT_EXPLORER_CLUSTER.to_string());

        let poll_interval_ms = match get("POLL_INTERVAL_MS") {
            Some(ms) => ms.parse::<u64>().map_err(|_| {
                SubmitError::Config(format!("POLL_INTERVAL_MS must be a whole number, got '{}'", ms))
            })?,
            None => DEFAULT_POLL_INTERVAL_MS,
        };

        let rpc_timeout_secs = match get("RPC_TIMEOUT_SECS") {
            Some(secs) => secs.parse::<u64>().map_err(|_| {
                SubmitError::Config(format!("RPC_TIMEOUT_SECS must be a whole number, got '{}'", secs))
            })?,
            None => DEFAULT_RPC_TIMEOUT_SECS,
        };

        let cases_file = get("CASES_FILE").map(PathBuf::from);

        Ok(AppConfig {
            rpc_url,
            keypair_path,
            program_id,
            commitment,
            explorer_cluster,
            poll_interval: Duration::from_millis(poll_interval_ms),
            rpc_timeout: Duration::from_secs(rpc_timeout_secs),
            cases_file,
        })
    }

    /// Reads the signing keypair. Failure here is fatal for the whole run.
    pub fn load_keypair(&self) -> Result<Keypair> {
        read_keypair_file(&self.keypair_path).map_err(|e| SubmitError::Keypair {
            path: self.keypair_path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Explorer URL for a transaction on the configured cluster.
    pub fn explorer_link(&self, signature: &str) -> String {
        if self.explorer_cluster == "mainnet-beta" {
            format!("https://explorer.solana.com/tx/{}", signature)
        } else {
            format!(
                "https://explorer.solana.com/tx/{}?cluster={}",
                signature, self.explorer_cluster
            )
        }
    }
}

fn default_keypair_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".config").join("solana").join("id.json"))
        .ok_or_else(|| {
            SubmitError::Config("Could not resolve home directory. Please set KEYPAIR_PATH.".to_string())
        })
}
