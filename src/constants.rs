//! Endpoint paths, header names and fixed wire values of the PhonePe API.

/// Pay page initiation.
pub const PAY_PATH: &str = "/pg/v1/pay";

/// Prefix of the status endpoint; followed by `/{merchantId}/{merchantTransactionId}`.
pub const STATUS_PATH_PREFIX: &str = "/pg/v1/status";

/// Refund initiation.
pub const REFUND_PATH: &str = "/pg/v1/refund";

/// VPA validation.
pub const VPA_VALIDATE_PATH: &str = "/pg/v1/vpa/validate";

/// Separates the hex digest from the salt index in an X-VERIFY value.
pub const CHECKSUM_SEPARATOR: &str = "###";

/// Payment instrument type for the hosted pay page.
pub const PAY_PAGE: &str = "PAY_PAGE";

/// Content type of every request and response body.
pub const APPLICATION_JSON: &str = "application/json";

/// Checksum header.
pub const X_VERIFY: &str = "X-VERIFY";
/// Merchant header sent with status queries.
pub const X_MERCHANT_ID: &str = "X-MERCHANT-ID";

/// UAT host.
pub const SANDBOX_HOST: &str = "https://api-preprod.phonepe.com/apis/pg-sandbox";
/// Live host.
pub const PRODUCTION_HOST: &str = "https://api.phonepe.com/apis/hermes";

/// Salt index used when none is configured.
pub const DEFAULT_SALT_INDEX: u32 = 1;
/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builds the status path for a merchant transaction.
pub fn status_path(merchant_id: &str, merchant_transaction_id: &str) -> String {
    format!("{STATUS_PATH_PREFIX}/{merchant_id}/{merchant_transaction_id}")
}
