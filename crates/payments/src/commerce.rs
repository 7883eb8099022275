//! Crypto-payment gateway client (Coinbase Commerce API).

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::config::PaymentsConfig;
use crate::error::FunctionError;

/// Gateway API version header value.
const API_VERSION: &str = "2018-03-22";

/// Client for the gateway's charge endpoints.
///
/// The API key lives in a default header on the inner client; it is never
/// logged and has no other copy in memory.
#[derive(Clone)]
pub struct CommerceClient {
    client: reqwest::Client,
    base_url: String,
}

impl CommerceClient {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns `internal` if the HTTP client fails to build (malformed key
    /// bytes).
    pub fn new(config: &PaymentsConfig) -> Result<Self, FunctionError> {
        let mut headers = HeaderMap::new();

        let mut key = HeaderValue::from_str(config.commerce_api_key.expose_secret())
            .map_err(|_| FunctionError::Internal("invalid API key format".to_owned()))?;
        key.set_sensitive(true);
        headers.insert("X-CC-Api-Key", key);
        headers.insert("X-CC-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FunctionError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.commerce_api_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Create a charge and return the gateway's charge object verbatim.
    ///
    /// # Errors
    ///
    /// Returns `internal` embedding the gateway's reported message on a
    /// non-success status, or the transport error message if the call
    /// itself failed. No retry; the customer re-initiates checkout.
    pub async fn create_charge(&self, body: &Value) -> Result<Value, FunctionError> {
        let url = format!("{}/charges", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| FunctionError::Internal(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let payload = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(FunctionError::Internal(gateway_error_message(
                status, &payload,
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FunctionError::Internal(e.to_string()))
    }
}

/// Extract the gateway's error message, falling back to the HTTP status.
fn gateway_error_message(status: reqwest::StatusCode, payload: &Value) -> String {
    payload
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map_or_else(
            || {
                status
                    .canonical_reason()
                    .unwrap_or("gateway request failed")
                    .to_owned()
            },
            ToOwned::to_owned,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gateway_error_message_from_body() {
        let payload = json!({"error": {"type": "invalid_request", "message": "bad currency"}});
        let message =
            gateway_error_message(reqwest::StatusCode::UNPROCESSABLE_ENTITY, &payload);
        assert_eq!(message, "bad currency");
    }

    #[test]
    fn test_gateway_error_message_falls_back_to_status() {
        let message = gateway_error_message(reqwest::StatusCode::BAD_GATEWAY, &Value::Null);
        assert_eq!(message, "Bad Gateway");
    }
}
