//! Encoding and checksum helpers.
//!
//! Every PhonePe request is authenticated with an `X-VERIFY` header of the form
//! `sha256_hex(message || salt) || "###" || salt_index`. For POST endpoints the
//! message is the Base64 request body followed by the API path; for the status
//! endpoint it is the API path alone.

use crate::constants::CHECKSUM_SEPARATOR;
use crate::errors::{PhonePeError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

/// Serializes a request payload to JSON and Base64 encodes it.
///
/// # Examples
///
/// ```
/// use phonepe_pg::utils::{decode_request_payload, encode_request_payload};
/// use serde_json::{json, Value};
///
/// let encoded = encode_request_payload(&json!({"merchantId": "M001"})).unwrap();
/// let decoded: Value = decode_request_payload(&encoded).unwrap();
/// assert_eq!(decoded["merchantId"], "M001");
/// ```
pub fn encode_request_payload<T: Serialize>(payload: &T) -> Result<String> {
    let json = serde_json::to_string(payload)?;
    Ok(BASE64.encode(json.as_bytes()))
}

/// Decodes a Base64 JSON payload back into `T`.
pub fn decode_request_payload<T: DeserializeOwned>(encoded: &str) -> Result<T> {
    let decoded = BASE64.decode(encoded.as_bytes())?;
    let json_str = String::from_utf8(decoded)?;
    Ok(serde_json::from_str(&json_str)?)
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `input`.
///
/// ```
/// use phonepe_pg::utils::sha256_hex;
///
/// assert_eq!(
///     sha256_hex("abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Computes an X-VERIFY value: `sha256_hex(message || salt) ### salt_index`.
pub fn x_verify(message: &str, salt: &str, salt_index: u32) -> String {
    let digest = sha256_hex(&format!("{message}{salt}"));
    format!("{digest}{CHECKSUM_SEPARATOR}{salt_index}")
}

/// Checksum for endpoints that carry a Base64 body.
pub fn payload_checksum(base64_payload: &str, api_path: &str, salt: &str, salt_index: u32) -> String {
    x_verify(&format!("{base64_payload}{api_path}"), salt, salt_index)
}

/// Checksum for endpoints without a body, signed over the path only.
pub fn path_checksum(api_path: &str, salt: &str, salt_index: u32) -> String {
    x_verify(api_path, salt, salt_index)
}

/// Verifies the X-VERIFY header PhonePe attaches to server-to-server callbacks.
///
/// The callback body is `{"response": "<base64>"}`; the gateway signs the
/// Base64 string alone with the merchant salt.
pub fn verify_callback(
    base64_response: &str,
    x_verify_header: &str,
    salt: &str,
    salt_index: u32,
) -> Result<()> {
    let (_, index) = x_verify_header
        .rsplit_once(CHECKSUM_SEPARATOR)
        .ok_or(PhonePeError::ChecksumMismatch)?;
    if index.parse::<u32>().ok() != Some(salt_index) {
        return Err(PhonePeError::ChecksumMismatch);
    }

    let expected = x_verify(base64_response, salt, salt_index);
    if constant_time_eq(expected.as_bytes(), x_verify_header.as_bytes()) {
        Ok(())
    } else {
        Err(PhonePeError::ChecksumMismatch)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
