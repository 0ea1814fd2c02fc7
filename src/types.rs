//! Request and response types for the PhonePe PG API.
//!
//! Caller-facing requests ([`OrderRequest`], [`RefundRequest`]) validate their
//! inputs on construction. Wire payloads serialize with the exact camelCase
//! field names and order the gateway expects.

use crate::constants::PAY_PAGE;
use crate::config::RedirectMode;
use crate::errors::{PhonePeError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A strictly positive amount in the smallest currency unit (paise).
///
/// ```
/// use phonepe_pg::types::Amount;
///
/// assert_eq!(Amount::new(10000).unwrap().get(), 10000);
/// assert!(Amount::new(0).is_err());
/// assert!(Amount::new(-5).is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64")]
pub struct Amount(u64);

impl Amount {
    /// Validates and wraps an amount.
    pub fn new(paise: i64) -> Result<Self> {
        Self::for_field("amount", paise)
    }

    pub(crate) fn for_field(field: &'static str, paise: i64) -> Result<Self> {
        if paise <= 0 {
            return Err(PhonePeError::InvalidAmount { field, value: paise });
        }
        Ok(Self(paise as u64))
    }

    /// The amount in paise.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = PhonePeError;

    fn try_from(paise: i64) -> Result<Self> {
        Amount::new(paise)
    }
}

fn require_non_empty(field: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(PhonePeError::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

/// Checks an id that is placed verbatim into a URL path segment.
///
/// Only ASCII letters, digits, `-` and `_` are accepted, so the id can neither
/// add path segments nor start a query or fragment.
pub(crate) fn require_path_segment(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PhonePeError::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(PhonePeError::InvalidField {
            field,
            reason: format!("contains {c:?}; only ASCII letters, digits, '-' and '_' are allowed"),
        });
    }
    Ok(())
}

/// A payment to initiate through the hosted pay page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Merchant transaction id, unique per merchant
    pub order_id: String,
    /// Merchant's identifier for the paying user
    pub user_id: String,
    /// Amount to collect
    pub amount: Amount,
    /// Optional payer mobile number, pre-filled on the pay page
    pub mobile_number: Option<String>,
}

impl OrderRequest {
    /// Creates an order, rejecting empty identifiers and non-positive amounts.
    ///
    /// ```
    /// use phonepe_pg::types::OrderRequest;
    ///
    /// let order = OrderRequest::new("ORDER123", "U1", 10000).unwrap();
    /// assert_eq!(order.amount.get(), 10000);
    /// assert!(OrderRequest::new("ORDER123", "U1", 0).is_err());
    /// ```
    pub fn new(order_id: impl Into<String>, user_id: impl Into<String>, amount: i64) -> Result<Self> {
        Ok(Self {
            order_id: require_non_empty("order_id", order_id.into())?,
            user_id: require_non_empty("user_id", user_id.into())?,
            amount: Amount::for_field("amount", amount)?,
            mobile_number: None,
        })
    }

    /// Pre-fills the payer's mobile number.
    pub fn with_mobile_number(mut self, mobile_number: impl Into<String>) -> Self {
        self.mobile_number = Some(mobile_number.into());
        self
    }
}

/// A refund against a completed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundRequest {
    /// User the original payment belonged to
    pub user_id: String,
    /// Merchant transaction id of the payment being refunded
    pub original_transaction_id: String,
    /// Fresh merchant transaction id for this refund
    pub refund_transaction_id: String,
    /// Amount to refund
    pub amount: Amount,
}

impl RefundRequest {
    /// Creates a refund, applying the same checks as [`OrderRequest::new`].
    pub fn new(
        user_id: impl Into<String>,
        original_transaction_id: impl Into<String>,
        refund_transaction_id: impl Into<String>,
        amount: i64,
    ) -> Result<Self> {
        Ok(Self {
            user_id: require_non_empty("user_id", user_id.into())?,
            original_transaction_id: require_non_empty(
                "original_transaction_id",
                original_transaction_id.into(),
            )?,
            refund_transaction_id: require_non_empty(
                "refund_transaction_id",
                refund_transaction_id.into(),
            )?,
            amount: Amount::for_field("amount", amount)?,
        })
    }
}

/// Payment instrument selector of a pay request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PaymentInstrument {
    /// Instrument type, `PAY_PAGE` for the hosted page
    #[serde(rename = "type")]
    pub instrument_type: String,
}

impl PaymentInstrument {
    /// The hosted pay page instrument.
    pub fn pay_page() -> Self {
        Self {
            instrument_type: PAY_PAGE.to_string(),
        }
    }
}

/// Body of `/pg/v1/pay` before Base64 encoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayPagePayload {
    /// Merchant identifier
    pub merchant_id: String,
    /// Order identifier
    pub merchant_transaction_id: String,
    /// Paying user
    pub merchant_user_id: String,
    /// Amount in paise
    pub amount: Amount,
    /// Customer return URL
    pub redirect_url: String,
    /// Redirect behaviour
    pub redirect_mode: RedirectMode,
    /// Server callback URL
    pub callback_url: String,
    /// Optional payer mobile number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    /// Instrument, always the pay page here
    pub payment_instrument: PaymentInstrument,
}

/// Body of `/pg/v1/refund` before Base64 encoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefundPayload {
    /// Merchant identifier
    pub merchant_id: String,
    /// User of the original payment
    pub merchant_user_id: String,
    /// Transaction being refunded
    pub original_transaction_id: String,
    /// Id of this refund
    pub merchant_transaction_id: String,
    /// Amount in paise
    pub amount: Amount,
    /// Server callback URL
    pub callback_url: String,
}

/// Body of `/pg/v1/vpa/validate` before Base64 encoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpaPayload {
    /// Merchant identifier
    pub merchant_id: String,
    /// Address to validate
    pub vpa: String,
}

/// A checksum and the Base64 payload it signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Value for the X-VERIFY header
    pub checksum: String,
    /// Base64 encoded JSON payload
    pub request: String,
}

/// JSON envelope every POST endpoint expects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope<'a> {
    /// Base64 encoded JSON payload
    pub request: &'a str,
}

impl SignedPayload {
    /// Wraps the payload as `{"request": ...}`.
    pub fn envelope(&self) -> RequestEnvelope<'_> {
        RequestEnvelope {
            request: &self.request,
        }
    }
}

/// The gateway's reply, passed through as parsed JSON.
///
/// The body is whatever the gateway sent, success or not. The accessors read
/// the standard `success`/`code`/`message`/`data` fields when present.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// HTTP status of the reply
    pub status: StatusCode,
    /// Parsed body, unmodified
    pub body: Value,
}

impl GatewayResponse {
    /// The `success` flag, `false` when absent.
    pub fn success(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool).unwrap_or(false)
    }

    /// The response `code`, e.g. `PAYMENT_SUCCESS`.
    pub fn code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }

    /// Human readable `message`.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// The `data` object.
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    /// Pay page URL from a successful pay response.
    pub fn redirect_url(&self) -> Option<&str> {
        self.data()?
            .get("instrumentResponse")?
            .get("redirectInfo")?
            .get("url")?
            .as_str()
    }

    /// Consumes the response, returning the raw JSON.
    pub fn into_inner(self) -> Value {
        self.body
    }
}
