// src/ledger/rpc.rs

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::{Result, SubmitError};
use crate::ledger::{Ledger, RecentBlockhash};

/// A ledger reached through the nonblocking Solana RPC client.
pub struct RpcLedger {
    client: RpcClient,
    commitment: CommitmentConfig,
    poll_interval: Duration,
}

impl RpcLedger {
    pub fn new(config: &AppConfig) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            config.rpc_timeout,
            config.commitment,
        );

        Self {
            client,
            commitment: config.commitment,
            poll_interval: config.poll_interval,
        }
    }
}

impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> Result<RecentBlockhash> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?;

        Ok(RecentBlockhash {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn submit(&self, transaction: &Transaction) -> Result<Signature> {
        Ok(self.client.send_transaction(transaction).await?)
    }

    async fn await_confirmation(&self, signature: &Signature, last_valid_block_height: u64) -> Result<()> {
        loop {
            // Only statuses at or above the requested level come back as Some
            match self
                .client
                .get_signature_status_with_commitment(signature, self.commitment)
                .await?
            {
                Some(Ok(())) => return Ok(()),
                Some(Err(err)) => {
                    return Err(SubmitError::TransactionFailed {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    });
                }
                None => {}
            }

            let block_height = self
                .client
                .get_block_height_with_commitment(self.commitment)
                .await?;

            if block_height > last_valid_block_height {
                return Err(SubmitError::BlockHeightExceeded(signature.to_string()));
            }

            log::debug!(
                "{} not yet {:?} at block height {}",
                signature,
                self.commitment.commitment,
                block_height
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn fetch_logs(&self, signature: &Signature) -> Result<Vec<String>> {
        // getTransaction does not serve processed-level reads.
        let commitment = if self.commitment.is_at_least_confirmed() {
            self.commitment
        } else {
            CommitmentConfig::confirmed()
        };

        let record = self
            .client
            .get_transaction_with_config(
                signature,
                RpcTransactionConfig {
                    encoding: None,
                    commitment: Some(commitment),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await?;

        Ok(record
            .transaction
            .meta
            .and_then(|meta| Option::<Vec<String>>::from(meta.log_messages))
            .unwrap_or_default())
    }
}
