//! The gateway abstraction.
//!
//! [`PaymentGateway`] covers the four remote operations so application code
//! can depend on the trait and swap in a fake for its own tests.
//! [`PhonePeClient`](crate::client::PhonePeClient) is the real implementation.

use crate::errors::Result;
use crate::types::{GatewayResponse, OrderRequest, RefundRequest};
use async_trait::async_trait;

/// Operations offered by a payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Short name of the gateway (e.g. "phonepe").
    fn name(&self) -> &str;

    /// Signs and submits a pay page order.
    ///
    /// # Returns
    ///
    /// The gateway's reply, normally carrying the pay page URL
    async fn pay(&self, order: &OrderRequest) -> Result<GatewayResponse>;

    /// Queries the status of a merchant transaction.
    async fn status(&self, merchant_transaction_id: &str) -> Result<GatewayResponse>;

    /// Submits a refund.
    async fn refund(&self, refund: &RefundRequest) -> Result<GatewayResponse>;

    /// Checks whether a VPA exists.
    async fn validate_vpa(&self, vpa: &str) -> Result<GatewayResponse>;
}
