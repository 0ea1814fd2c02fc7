//! # phonepe-pg
//!
//! A Rust client for the PhonePe Payment Gateway (PG) API.
//!
//! The library builds checksum-authenticated requests for the four PG
//! operations and hands back the gateway's JSON replies:
//!
//! - **Pay**: sign a pay page order and submit it to `/pg/v1/pay`
//! - **Status**: query `/pg/v1/status/{merchantId}/{merchantTransactionId}`
//! - **Refund**: submit a refund to `/pg/v1/refund`
//! - **VPA validation**: check a UPI address via `/pg/v1/vpa/validate`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use phonepe_pg::{GatewayConfig, OrderRequest, PhonePeClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::new(
//!     "PGTESTPAYUAT",
//!     "099eb0cd-02cf-4e2a-8aca-3e6c6aff0399",
//!     "https://api-preprod.phonepe.com/apis/pg-sandbox",
//!     "https://shop.example.com/return",
//!     "https://shop.example.com/phonepe/callback",
//! );
//! let client = PhonePeClient::new(config);
//!
//! let order = OrderRequest::new("ORDER123", "U1", 10000)?;
//! let response = client.pay(&order).await?;
//! println!("pay page: {:?}", response.redirect_url());
//! # Ok(())
//! # }
//! ```
//!
//! ## Request Signing
//!
//! Every request carries an `X-VERIFY` header:
//!
//! ```text
//! X-VERIFY = sha256_hex(message || salt) || "###" || salt_index
//! ```
//!
//! For POST endpoints the message is the Base64 JSON payload followed by the
//! API path; for status queries it is the path alone. POST bodies are always
//! the envelope `{"request": "<base64 payload>"}`.
//!
//! ## Errors
//!
//! Calls return [`Result`]. A network failure, an unparseable reply and a
//! rejected input are distinct [`ErrorKind`]s, and the gateway's own JSON
//! (including `success: false` replies) is returned untouched in a
//! [`GatewayResponse`].
//!
//! ## Logging
//!
//! Diagnostics are emitted through `tracing` at debug level. The salt is never
//! logged.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cancel;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gateway;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use cancel::CancellationToken;
pub use client::PhonePeClient;
pub use config::{Environment, GatewayConfig, RedirectMode};
pub use errors::{ErrorKind, PhonePeError, Result};
pub use gateway::PaymentGateway;
pub use types::{
    Amount, GatewayResponse, OrderRequest, RefundRequest, SignedPayload,
};
