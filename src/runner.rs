// src/runner.rs
use crate::cases::TestCase;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::ledger::Ledger;
use regex::Regex;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use std::sync::LazyLock;
use std::time::Instant;

static CONSUMED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"consumed (\d+)").expect("compute unit pattern is valid"));

/// The recorded outcome of one test case. Built once and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    pub label: String,
    pub outcome: Outcome,
    /// Wall time from blockhash request to fetched logs, or to the failure.
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Confirmed {
        signature: String,
        /// `None` when no log line reported a cost for the program.
        compute_units: Option<u64>,
        compression_ratio: String,
        explorer_link: String,
    },
    Failed {
        message: String,
    },
}

impl SubmissionResult {
    pub fn is_confirmed(&self) -> bool {
        matches!(self.outcome, Outcome::Confirmed { .. })
    }

    /// Compute units as reported: 0 if confirmed without a cost line, -1 if the case failed.
    pub fn compute_units_used(&self) -> i64 {
        match &self.outcome {
            Outcome::Confirmed { compute_units, .. } => compute_units.map_or(0, |cu| cu as i64),
            Outcome::Failed { .. } => -1,
        }
    }

    pub fn compression_ratio(&self) -> String {
        match &self.outcome {
            Outcome::Confirmed { compression_ratio, .. } => compression_ratio.clone(),
            Outcome::Failed { .. } => "Error".to_string(),
        }
    }

    pub fn explorer(&self) -> String {
        match &self.outcome {
            Outcome::Confirmed { explorer_link, .. } => explorer_link.clone(),
            Outcome::Failed { message } => format!("Failed: {}", message),
        }
    }
}

/// The first line mentioning `Program <id> consumed`. Lines from other programs
/// (CPI targets, the compute budget program) are ignored.
pub fn find_compute_unit_line<'a>(logs: &'a [String], program_id: &Pubkey) -> Option<&'a str> {
    let marker = format!("Program {} consumed", program_id);
    logs.iter().map(String::as_str).find(|line| line.contains(&marker))
}

/// Finds the program's `consumed <n>` line and returns `n`.
pub fn parse_compute_units(logs: &[String], program_id: &Pubkey) -> Option<u64> {
    let line = find_compute_unit_line(logs, program_id)?;

    CONSUMED_PATTERN
        .captures(line)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Label length in UTF-16 code units over payload length in bytes, to two decimal places.
/// Ties round up on the exact ratio.
pub fn compression_ratio(label: &str, payload_len: usize) -> String {
    if payload_len == 0 {
        return "Infinity".to_string();
    }

    let label_len = label.encode_utf16().count() as u128;
    let payload_len = payload_len as u128;
    let hundredths = (200 * label_len + payload_len) / (2 * payload_len);

    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// One instruction carrying `payload` to `program_id`, with no accounts, paid and signed by `payer`.
pub fn build_transaction(program_id: &Pubkey, payer: &Keypair, payload: &[u8], blockhash: Hash) -> Transaction {
    let instruction = Instruction::new_with_bytes(*program_id, payload, vec![]);
    Transaction::new_signed_with_payer(&[instruction], Some(&payer.pubkey()), &[payer], blockhash)
}

async fn execute<L: Ledger>(
    ledger: &L,
    program_id: &Pubkey,
    payer: &Keypair,
    case: &TestCase,
) -> Result<(Signature, Vec<String>)> {
    let recent = ledger.latest_blockhash().await?;
    let tx = build_transaction(program_id, payer, &case.payload, recent.blockhash);

    let signature = ledger.submit(&tx).await?;
    log::info!("Submitted '{}' as {}", case.label, signature);

    ledger
        .await_confirmation(&signature, recent.last_valid_block_height)
        .await?;

    let logs = ledger.fetch_logs(&signature).await?;
    Ok((signature, logs))
}

/// Submit a single case and wait for it to land.
///
/// Never fails: any error along the way is recorded in the returned result.
pub async fn submit_one<L: Ledger>(
    ledger: &L,
    config: &AppConfig,
    payer: &Keypair,
    case: &TestCase,
) -> SubmissionResult {
    let start = Instant::now();

    println!("📤 Submitting '{}' ({} bytes)", case.label, case.payload.len());

    let outcome = match execute(ledger, &config.program_id, payer, case).await {
        Ok((signature, logs)) => {
            if let Some(line) = find_compute_unit_line(&logs, &config.program_id) {
                log::debug!("{}", line);
            }

            let compute_units = parse_compute_units(&logs, &config.program_id);
            let signature = signature.to_string();
            let elapsed_ms = start.elapsed().as_millis();

            match compute_units {
                Some(cu) => println!("✅ Confirmed {} ({} CU, {}ms)", signature, cu, elapsed_ms),
                None => {
                    println!("✅ Confirmed {} ({}ms)", signature, elapsed_ms);
                    log::warn!(
                        "No compute unit line for program {} in {} log lines of '{}'",
                        config.program_id,
                        logs.len(),
                        case.label
                    );
                }
            }

            Outcome::Confirmed {
                explorer_link: config.explorer_link(&signature),
                compression_ratio: compression_ratio(&case.label, case.payload.len()),
                compute_units,
                signature,
            }
        }
        Err(e) => {
            eprintln!("❌ '{}' failed: {}", case.label, e);
            log::error!("Submission error for '{}': {:?}", case.label, e);
            Outcome::Failed { message: e.to_string() }
        }
    };

    SubmissionResult {
        label: case.label.clone(),
        outcome,
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

/// Run every case, one after another, in input order.
///
/// Each case finishes before the next one starts, so the single payer never has two
/// transactions in flight. A failed case does not stop the batch.
pub async fn run_batch<L: Ledger>(
    ledger: &L,
    config: &AppConfig,
    payer: &Keypair,
    cases: &[TestCase],
) -> Vec<SubmissionResult> {
    let batch_start = Instant::now();
    let total = cases.len();
    let mut results = Vec::with_capacity(total);

    for (index, case) in cases.iter().enumerate() {
        log::info!("Case {}/{}: {}", index + 1, total, case.label);
        results.push(submit_one(ledger, config, payer, case).await);
    }

    let batch_total_ms = batch_start.elapsed().as_millis() as u64;
    println!("\n📊 Batch of {} completed in {}ms", total, batch_total_ms);

    results
}
