//! The PhonePe gateway client.
//!
//! [`PhonePeClient`] signs and sends the four PG API calls: pay, status,
//! refund and VPA validation. Each call is a single request/response exchange
//! and is never retried.

use crate::cancel::CancellationToken;
use crate::config::GatewayConfig;
use crate::constants::{
    status_path, APPLICATION_JSON, PAY_PATH, REFUND_PATH, VPA_VALIDATE_PATH, X_MERCHANT_ID,
    X_VERIFY,
};
use crate::errors::{PhonePeError, Result};
use crate::gateway::PaymentGateway;
use crate::types::{
    require_path_segment, GatewayResponse, OrderRequest, PayPagePayload, PaymentInstrument,
    RefundPayload, RefundRequest, SignedPayload, VpaPayload,
};
use crate::utils::{encode_request_payload, path_checksum, payload_checksum};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use std::sync::Arc;

/// Client for the PhonePe PG API.
///
/// Cheap to clone; clones share the configuration and the connection pool.
///
/// # Examples
///
/// ```
/// use phonepe_pg::client::PhonePeClient;
/// use phonepe_pg::config::GatewayConfig;
/// use phonepe_pg::types::OrderRequest;
///
/// let client = PhonePeClient::new(GatewayConfig::new(
///     "M001",
///     "mysalt",
///     "https://api-preprod.phonepe.com/apis/pg-sandbox",
///     "https://shop.example.com/return",
///     "https://shop.example.com/callback",
/// ));
///
/// let order = OrderRequest::new("ORDER123", "U1", 10000).unwrap();
/// let signed = client.create_order(&order).unwrap();
/// assert!(signed.checksum.ends_with("###1"));
/// ```
#[derive(Clone, Debug)]
pub struct PhonePeClient {
    config: Arc<GatewayConfig>,
    http_client: Client,
    cancellation: Option<CancellationToken>,
}

impl PhonePeClient {
    /// Creates a client. Performs no I/O and no validation.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
            http_client: Client::new(),
            cancellation: None,
        }
    }

    /// Sets a custom HTTP client (proxy, TLS roots, pool tuning).
    ///
    /// The configured request timeout is still applied per request.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Binds calls made through this client to a cancellation token.
    ///
    /// Once the token fires, in-flight calls resolve to
    /// [`PhonePeError::Cancelled`] and new calls fail without touching the network.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Builds the signed pay page payload for an order. No I/O.
    ///
    /// The checksum is `sha256(base64 || "/pg/v1/pay" || salt) ### salt_index`.
    pub fn create_order(&self, order: &OrderRequest) -> Result<SignedPayload> {
        let payload = PayPagePayload {
            merchant_id: self.config.merchant_id.clone(),
            merchant_transaction_id: order.order_id.clone(),
            merchant_user_id: order.user_id.clone(),
            amount: order.amount,
            redirect_url: self.config.redirect_url.clone(),
            redirect_mode: self.config.redirect_mode,
            callback_url: self.config.webhook_url.clone(),
            mobile_number: order.mobile_number.clone(),
            payment_instrument: PaymentInstrument::pay_page(),
        };
        self.sign(&payload, PAY_PATH)
    }

    /// Sends a payload produced by [`create_order`](Self::create_order) to `/pg/v1/pay`.
    pub async fn submit_order(&self, signed: &SignedPayload) -> Result<GatewayResponse> {
        let url = self.config.endpoint(PAY_PATH)?;
        let request = self
            .http_client
            .post(url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(X_VERIFY, &signed.checksum)
            .json(&signed.envelope());

        self.execute(request, PAY_PATH).await
    }

    /// Signs and submits an order in one step.
    pub async fn pay(&self, order: &OrderRequest) -> Result<GatewayResponse> {
        let signed = self.create_order(order)?;
        self.submit_order(&signed).await
    }

    /// X-VERIFY value for a status query: signed over the path alone.
    pub fn status_checksum(&self, merchant_transaction_id: &str) -> String {
        let path = status_path(&self.config.merchant_id, merchant_transaction_id);
        path_checksum(&path, &self.config.salt, self.config.salt_index)
    }

    /// `GET /pg/v1/status/{merchantId}/{merchantTransactionId}`.
    ///
    /// The id becomes a path segment, so anything other than ASCII letters,
    /// digits, `-` and `_` is rejected before any I/O.
    pub async fn check_txn_status(&self, merchant_transaction_id: &str) -> Result<GatewayResponse> {
        require_path_segment("merchant_transaction_id", merchant_transaction_id)?;

        let path = status_path(&self.config.merchant_id, merchant_transaction_id);
        let url = self.config.endpoint(&path)?;
        let checksum = self.status_checksum(merchant_transaction_id);

        tracing::debug!(
            path = %path,
            merchant_id = %self.config.merchant_id,
            x_verify = %checksum,
            "checking PhonePe transaction status"
        );

        let request = self
            .http_client
            .get(url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(X_VERIFY, checksum)
            .header(X_MERCHANT_ID, &self.config.merchant_id);

        self.execute(request, &path).await
    }

    /// Builds the signed refund payload. No I/O.
    pub fn create_refund(&self, refund: &RefundRequest) -> Result<SignedPayload> {
        let payload = self.refund_payload(refund);
        self.sign(&payload, REFUND_PATH)
    }

    fn refund_payload(&self, refund: &RefundRequest) -> RefundPayload {
        RefundPayload {
            merchant_id: self.config.merchant_id.clone(),
            merchant_user_id: refund.user_id.clone(),
            original_transaction_id: refund.original_transaction_id.clone(),
            merchant_transaction_id: refund.refund_transaction_id.clone(),
            amount: refund.amount,
            callback_url: self.config.webhook_url.clone(),
        }
    }

    /// `POST /pg/v1/refund`.
    pub async fn refund_txn(&self, refund: &RefundRequest) -> Result<GatewayResponse> {
        let payload = self.refund_payload(refund);
        tracing::debug!(?payload, "submitting PhonePe refund");

        let signed = self.sign(&payload, REFUND_PATH)?;
        let url = self.config.endpoint(REFUND_PATH)?;
        let request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .header(X_VERIFY, &signed.checksum)
            .json(&signed.envelope());

        self.execute(request, REFUND_PATH).await
    }

    /// Builds the signed VPA validation payload. No I/O.
    pub fn create_vpa_validation(&self, vpa: &str) -> Result<SignedPayload> {
        if vpa.trim().is_empty() {
            return Err(PhonePeError::InvalidField {
                field: "vpa",
                reason: "must not be empty".to_string(),
            });
        }

        let payload = VpaPayload {
            merchant_id: self.config.merchant_id.clone(),
            vpa: vpa.to_string(),
        };
        self.sign(&payload, VPA_VALIDATE_PATH)
    }

    /// `POST /pg/v1/vpa/validate`.
    pub async fn verify_vpa(&self, vpa: &str) -> Result<GatewayResponse> {
        let signed = self.create_vpa_validation(vpa)?;
        let url = self.config.endpoint(VPA_VALIDATE_PATH)?;
        let request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(X_VERIFY, &signed.checksum)
            .json(&signed.envelope());

        self.execute(request, VPA_VALIDATE_PATH).await
    }

    fn sign<T: Serialize>(&self, payload: &T, api_path: &str) -> Result<SignedPayload> {
        let request = encode_request_payload(payload)?;
        let checksum = payload_checksum(
            &request,
            api_path,
            &self.config.salt,
            self.config.salt_index,
        );
        Ok(SignedPayload { checksum, request })
    }

    /// Sends a request with the configured timeout, racing it against the
    /// cancellation token when one is bound.
    async fn execute(&self, request: RequestBuilder, api_path: &str) -> Result<GatewayResponse> {
        let request = request.timeout(self.config.request_timeout);

        let result = match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(PhonePeError::Cancelled),
            Some(token) => {
                tokio::select! {
                    result = send_and_parse(request) => result,
                    _ = token.cancelled() => Err(PhonePeError::Cancelled),
                }
            }
            None => send_and_parse(request).await,
        };

        match &result {
            Ok(response) => {
                tracing::debug!(path = api_path, status = %response.status, "PhonePe response received")
            }
            Err(err) => {
                tracing::warn!(path = api_path, kind = ?err.kind(), error = %err, "PhonePe request failed")
            }
        }
        result
    }
}

async fn send_and_parse(request: RequestBuilder) -> Result<GatewayResponse> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    parse_response(status, &body)
}

/// Parses a reply body whatever its status; PhonePe reports business
/// failures as JSON with `success: false`.
fn parse_response(status: StatusCode, body: &[u8]) -> Result<GatewayResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(PhonePeError::EmptyResponse { status });
    }
    Ok(GatewayResponse {
        status,
        body: serde_json::from_slice(body)?,
    })
}

#[async_trait]
impl PaymentGateway for PhonePeClient {
    fn name(&self) -> &str {
        "phonepe"
    }

    async fn pay(&self, order: &OrderRequest) -> Result<GatewayResponse> {
        PhonePeClient::pay(self, order).await
    }

    async fn status(&self, merchant_transaction_id: &str) -> Result<GatewayResponse> {
        self.check_txn_status(merchant_transaction_id).await
    }

    async fn refund(&self, refund: &RefundRequest) -> Result<GatewayResponse> {
        self.refund_txn(refund).await
    }

    async fn validate_vpa(&self, vpa: &str) -> Result<GatewayResponse> {
        self.verify_vpa(vpa).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::utils::{decode_request_payload, sha256_hex};
    use serde_json::{json, Value};

    fn client() -> PhonePeClient {
        PhonePeClient::new(GatewayConfig::new(
            "M001",
            "mysalt",
            "https://api-preprod.phonepe.com/apis/pg-sandbox",
            "https://shop.test/return",
            "https://shop.test/callback",
        ))
    }

    #[test]
    fn test_create_order_end_to_end_example() {
        let order = OrderRequest::new("ORDER123", "U1", 10000).unwrap();
        let signed = client().create_order(&order).unwrap();

        let decoded: Value = decode_request_payload(&signed.request).unwrap();
        assert_eq!(
            decoded,
            json!({
                "merchantId": "M001",
                "merchantTransactionId": "ORDER123",
                "merchantUserId": "U1",
                "amount": 10000,
                "redirectUrl": "https://shop.test/return",
                "redirectMode": "POST",
                "callbackUrl": "https://shop.test/callback",
                "paymentInstrument": {"type": "PAY_PAGE"}
            })
        );
        assert_eq!(
            signed.checksum,
            format!(
                "{}###1",
                sha256_hex(&format!("{}/pg/v1/paymysalt", signed.request))
            )
        );
    }

    #[test]
    fn test_create_order_is_deterministic() {
        let order = OrderRequest::new("ORDER123", "U1", 10000).unwrap();
        let client = client();
        assert_eq!(
            client.create_order(&order).unwrap(),
            client.create_order(&order).unwrap()
        );
    }

    #[test]
    fn test_amount_change_changes_checksum() {
        let client = client();
        let a = client
            .create_order(&OrderRequest::new("ORDER123", "U1", 10000).unwrap())
            .unwrap();
        let b = client
            .create_order(&OrderRequest::new("ORDER123", "U1", 10001).unwrap())
            .unwrap();
        assert_ne!(a.request, b.request);
        assert_ne!(a.checksum, b.checksum);
    }

    #[test]
    fn test_salt_index_is_appended() {
        let client = PhonePeClient::new(client().config().clone().with_salt_index(7));
        let signed = client
            .create_order(&OrderRequest::new("ORDER123", "U1", 100).unwrap())
            .unwrap();
        assert!(signed.checksum.ends_with("###7"));
    }

    #[test]
    fn test_mobile_number_is_optional() {
        let order = OrderRequest::new("ORDER123", "U1", 100)
            .unwrap()
            .with_mobile_number("9999999999");
        let signed = client().create_order(&order).unwrap();
        let decoded: Value = decode_request_payload(&signed.request).unwrap();
        assert_eq!(decoded["mobileNumber"], "9999999999");
    }

    #[test]
    fn test_status_checksum_is_path_only() {
        let checksum = client().status_checksum("ORDER123");
        assert_eq!(
            checksum,
            format!("{}###1", sha256_hex("/pg/v1/status/M001/ORDER123mysalt"))
        );

        // the pay checksum for the same id covers a payload, so it differs
        let signed = client()
            .create_order(&OrderRequest::new("ORDER123", "U1", 100).unwrap())
            .unwrap();
        assert_ne!(signed.checksum, checksum);
    }

    #[test]
    fn test_create_refund_payload() {
        let refund = RefundRequest::new("U1", "ORDER123", "REFUND1", 500).unwrap();
        let signed = client().create_refund(&refund).unwrap();

        let decoded: Value = decode_request_payload(&signed.request).unwrap();
        assert_eq!(
            decoded,
            json!({
                "merchantId": "M001",
                "merchantUserId": "U1",
                "originalTransactionId": "ORDER123",
                "merchantTransactionId": "REFUND1",
                "amount": 500,
                "callbackUrl": "https://shop.test/callback"
            })
        );
        assert_eq!(
            signed.checksum,
            format!(
                "{}###1",
                sha256_hex(&format!("{}/pg/v1/refundmysalt", signed.request))
            )
        );
    }

    #[test]
    fn test_create_vpa_validation() {
        let signed = client().create_vpa_validation("shopper@ybl").unwrap();
        let decoded: Value = decode_request_payload(&signed.request).unwrap();
        assert_eq!(decoded, json!({"merchantId": "M001", "vpa": "shopper@ybl"}));
        assert!(signed.checksum.starts_with(&sha256_hex(&format!(
            "{}/pg/v1/vpa/validatemysalt",
            signed.request
        ))));

        let err = client().create_vpa_validation(" ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_parse_response() {
        let parsed = parse_response(StatusCode::BAD_REQUEST, br#"{"success":false,"code":"BAD_REQUEST"}"#)
            .unwrap();
        assert_eq!(parsed.status, StatusCode::BAD_REQUEST);
        assert_eq!(parsed.code(), Some("BAD_REQUEST"));

        assert!(matches!(
            parse_response(StatusCode::OK, b"  \n"),
            Err(PhonePeError::EmptyResponse { status }) if status == StatusCode::OK
        ));
        assert!(matches!(
            parse_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>"),
            Err(PhonePeError::JsonError(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_client_does_no_io() {
        let token = CancellationToken::new();
        token.cancel();
        // port 9 on localhost would fail with a transport error if contacted
        let mut config = client().config().clone();
        config.host = "http://127.0.0.1:9".to_string();
        let client = PhonePeClient::new(config).with_cancellation(token);

        let err = client.check_txn_status("ORDER123").await.unwrap_err();
        assert!(matches!(err, PhonePeError::Cancelled));
    }

    #[test]
    fn test_gateway_name() {
        assert_eq!(PaymentGateway::name(&client()), "phonepe");
    }
}
