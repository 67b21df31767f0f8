use cubench::errors::Result;
use cubench::ledger::rpc::RpcLedger;
use cubench::{banner, cases, config, report, runner};
use solana_sdk::signature::Signer;

#[tokio::main]
async fn main() -> Result<()> {
    banner::print_banner();

    // Loaded before the logger so RUST_LOG may come from .env
    let dotenv = dotenvy::dotenv();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // A missing .env is fine, every setting has a default
    if let Err(e) = dotenv {
        log::debug!("No .env file loaded: {}", e);
    }

    let app_config = config::AppConfig::from_env()?;
    let payer = app_config.load_keypair()?;
    let test_cases = cases::load_cases(&app_config)?;

    println!("🔑 Payer: {}", payer.pubkey());
    println!("🎯 Program: {}", app_config.program_id);
    println!("📡 RPC: {} ({:?})", app_config.rpc_url, app_config.commitment.commitment);
    println!("🚀 Starting compute unit tests ({} cases)...\n", test_cases.len());

    let ledger = RpcLedger::new(&app_config);

    let results = runner::run_batch(&ledger, &app_config, &payer, &test_cases).await;

    report::print_report(&results);

    Ok(())
}
