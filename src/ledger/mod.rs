// src/ledger/mod.rs

use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::errors::Result;

pub mod rpc;

/// A blockhash to sign against, and the last block height at which it is still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentBlockhash {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// The remote ledger as seen by the batch runner.
///
/// Implementations carry their own confirmation level, so callers only deal in signatures.
pub trait Ledger: Send + Sync {
    /// Fetches a blockhash for a new transaction.
    fn latest_blockhash(&self) -> impl std::future::Future<Output = Result<RecentBlockhash>> + Send;

    /// Submits a signed transaction and returns its signature once the node has accepted it.
    fn submit(&self, transaction: &Transaction) -> impl std::future::Future<Output = Result<Signature>> + Send;

    /// Waits until `signature` reaches the configured confirmation level.
    ///
    /// Fails if the transaction errored on chain, or if the chain moves past
    /// `last_valid_block_height` before the transaction lands.
    fn await_confirmation(
        &self,
        signature: &Signature,
        last_valid_block_height: u64,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Returns the log lines recorded for a confirmed transaction.
    /// A record without logs yields an empty list.
    fn fetch_logs(&self, signature: &Signature) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}
