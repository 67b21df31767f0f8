// tests/integration_tests.rs
use cubench::cases::{TestCase, load_cases};
use cubench::config::AppConfig;
use cubench::errors::SubmitError;
use cubench::ledger::rpc::RpcLedger;
use cubench::report::summarize;
use cubench::runner::{build_transaction, run_batch};
use httpmock::prelude::*;
use serde_json::json;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Keypair;
use std::io::Write;

const PROGRAM: &str = "6ujAE4E7VL17fLsUj87kFqvzhC5gKTzwA3TSvxKhdMcv";

fn config_with(pairs: Vec<(&'static str, String)>) -> AppConfig {
    AppConfig::from_lookup(move |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap()
}

fn config_for(server: &MockServer) -> AppConfig {
    config_with(vec![
        ("KEYPAIR_PATH", "/tmp/unused.json".to_string()),
        ("RPC_URL", server.url("/")),
        ("POLL_INTERVAL_MS", "1".to_string()),
    ])
}

fn url_cases() -> Vec<TestCase> {
    vec![
        TestCase::from_hex("https://a.a", "01612e61").unwrap(),
        TestCase::from_hex("https://google.com", "01676f6f676c6503").unwrap(),
    ]
}

fn blockhash() -> Hash {
    Hash::new_from_array([5u8; 32])
}

async fn mock_node_basics(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("getVersion");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": { "solana-core": "2.2.0", "feature-set": 1 }
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("getLatestBlockhash");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "context": { "slot": 1 },
                    "value": {
                        "blockhash": blockhash().to_string(),
                        "lastValidBlockHeight": 300
                    }
                }
            }));
        })
        .await;
}

#[tokio::test]
async fn test_batch_against_rpc_node() {
    let server = MockServer::start_async().await;
    let config = config_for(&server);
    let payer = Keypair::new();
    let case = TestCase::from_hex("https://a.a", "01612e61").unwrap();

    // The node must echo the signature of the transaction it was sent
    let expected_tx = build_transaction(&config.program_id, &payer, &case.payload, blockhash());
    let signature = expected_tx.signatures[0].to_string();

    mock_node_basics(&server).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("sendTransaction");
            then.status(200)
                .json_body(json!({ "jsonrpc": "2.0", "id": 2, "result": &signature }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("getSignatureStatuses");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 3,
                "result": {
                    "context": { "slot": 2 },
                    "value": [{
                        "slot": 2,
                        "confirmations": 1,
                        "status": { "Ok": null },
                        "err": null,
                        "confirmationStatus": "confirmed"
                    }]
                }
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("getTransaction");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 4,
                "result": {
                    "slot": 2,
                    "blockTime": null,
                    "transaction": ["", "base64"],
                    "meta": {
                        "err": null,
                        "status": { "Ok": null },
                        "fee": 5000,
                        "preBalances": [1000000],
                        "postBalances": [995000],
                        "logMessages": [
                            format!("Program {} invoke [1]", PROGRAM),
                            "Program log: Instruction: Decode",
                            "Program log: Decoded: https://a.a",
                            format!("Program {} consumed 1873 of 200000 compute units", PROGRAM),
                            format!("Program {} success", PROGRAM)
                        ]
                    }
                }
            }));
        })
        .await;

    let ledger = RpcLedger::new(&config);
    let results = run_batch(&ledger, &config, &payer, &[case]).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].label, "https://a.a");
    assert_eq!(results[0].compute_units_used(), 1873);
    assert_eq!(results[0].compression_ratio(), "2.75");
    assert_eq!(
        results[0].explorer(),
        format!("https://explorer.solana.com/tx/{}?cluster=devnet", signature)
    );

    let summary = summarize(&results);
    assert_eq!(summary.confirmed, 1);
    assert_eq!(summary.total_compute_units, 1873);
}

#[tokio::test]
async fn test_batch_records_rejected_submissions() {
    let server = MockServer::start_async().await;

    mock_node_basics(&server).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("sendTransaction");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "error": { "code": -32002, "message": "blockhash not found" }
            }));
        })
        .await;

    let config = config_for(&server);
    let ledger = RpcLedger::new(&config);
    let results = run_batch(&ledger, &config, &Keypair::new(), &url_cases()).await;

    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.compute_units_used(), -1);
        assert_eq!(result.compression_ratio(), "Error");
        assert_eq!(result.explorer(), "Failed: blockhash not found");
    }
    assert_eq!(summarize(&results).failed, 2);
}

#[tokio::test]
async fn test_unreachable_node_fails_every_case() {
    let config = config_with(vec![
        ("KEYPAIR_PATH", "/tmp/unused.json".to_string()),
        ("RPC_URL", "http://127.0.0.1:9".to_string()),
        ("COMMITMENT", "finalized".to_string()),
        ("RPC_TIMEOUT_SECS", "5".to_string()),
    ]);
    assert_eq!(config.commitment, CommitmentConfig::finalized());

    let ledger = RpcLedger::new(&config);
    let results = run_batch(&ledger, &config, &Keypair::new(), &url_cases()).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.compute_units_used() == -1));
    assert!(results.iter().all(|r| r.explorer().starts_with("Failed: ")));
}

#[test]
fn test_keypair_file_loading() {
    let keypair = Keypair::new();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let bytes: Vec<u8> = keypair.to_bytes().to_vec();
    write!(file, "{}", serde_json::to_string(&bytes).unwrap()).unwrap();

    let config = config_with(vec![("KEYPAIR_PATH", file.path().display().to_string())]);
    let loaded = config.load_keypair().unwrap();
    assert_eq!(loaded.to_bytes(), keypair.to_bytes());
}

#[test]
fn test_malformed_keypair_file_is_fatal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[1, 2, 3]").unwrap();

    let config = config_with(vec![("KEYPAIR_PATH", file.path().display().to_string())]);
    assert!(matches!(config.load_keypair(), Err(SubmitError::Keypair { .. })));
}

#[test]
fn test_cases_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[case]]\nname = \"https://a.com\"\nhex = \"016103\"").unwrap();

    let config = config_with(vec![
        ("KEYPAIR_PATH", "/tmp/unused.json".to_string()),
        ("CASES_FILE", file.path().display().to_string()),
    ]);

    let cases = load_cases(&config).unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].label, "https://a.com");
    assert_eq!(cases[0].payload, vec![0x01, 0x61, 0x03]);
}

#[test]
fn test_builtin_cases_when_no_file() {
    let config = config_with(vec![("KEYPAIR_PATH", "/tmp/unused.json".to_string())]);
    let cases = load_cases(&config).unwrap();
    assert_eq!(cases.len(), 10);
    assert_eq!(cases[0].label, "http://localhost:3000");
}
