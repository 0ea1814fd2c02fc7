//! Example checkout against the PhonePe sandbox.
//!
//! Signs an order, prints the payload, submits it and polls the status once.
//!
//! Run with:
//! ```bash
//! cargo run --example checkout
//! ```
//!
//! Environment variables (a `.env` file is honoured):
//! - PHONEPE_MERCHANT_ID, PHONEPE_SALT: merchant credentials
//! - PHONEPE_REDIRECT_URL, PHONEPE_WEBHOOK_URL: return and callback URLs
//! - PHONEPE_SALT_INDEX, PHONEPE_HOST, PHONEPE_REDIRECT_MODE, PHONEPE_TIMEOUT_SECS: optional
//! - ORDER_AMOUNT: amount in paise (default 10000)

use phonepe_pg::{GatewayConfig, OrderRequest, PhonePeClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("phonepe_pg=debug")),
        )
        .init();

    let config = GatewayConfig::from_env()?;
    config.validate()?;

    let amount: i64 = std::env::var("ORDER_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10_000);

    println!("PhonePe checkout example");
    println!("   Host:     {}", config.host);
    println!("   Merchant: {}", config.merchant_id);
    println!();

    let client = PhonePeClient::new(config);
    let order_id = format!("ORDER{}", std::process::id());
    let order = OrderRequest::new(&order_id, "DEMO-USER", amount)?;

    let signed = client.create_order(&order)?;
    println!("X-VERIFY: {}", signed.checksum);
    println!("request:  {}", signed.request);
    println!();

    match client.submit_order(&signed).await {
        Ok(response) => {
            println!("Pay response ({}): {}", response.status, response.body);
            if let Some(url) = response.redirect_url() {
                println!("Open the pay page: {url}");
            }
        }
        Err(e) => {
            println!("Pay request failed ({:?}): {}", e.kind(), e);
            return Ok(());
        }
    }

    match client.check_txn_status(&order_id).await {
        Ok(response) => println!(
            "Status: {} {}",
            response.code().unwrap_or("-"),
            response.message().unwrap_or("")
        ),
        Err(e) => println!("Status check failed ({:?}): {}", e.kind(), e),
    }

    Ok(())
}
