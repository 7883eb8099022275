//! Charge request validation and gateway payload construction.
//!
//! Input arrives as loose JSON from the crypto checkout client; everything
//! here is pure so the validation matrix and payload shape can be tested
//! without a gateway.

use serde_json::{Map, Value, json};

use silkroots_core::CurrencyCode;

use crate::error::FunctionError;

/// Marker merged into charge metadata identifying the originating system.
const SOURCE_MARKER: &str = "silkroots-storefront";

/// Fallback charge name when the metadata has no usable cart item.
const GENERIC_CHARGE_NAME: &str = "Silkroots order";

/// A validated charge request.
#[derive(Debug, Clone)]
pub struct ChargeParams {
    pub amount: f64,
    pub metadata: Map<String, Value>,
}

impl ChargeParams {
    /// Validate the raw request body.
    ///
    /// # Errors
    ///
    /// Returns `invalid-argument` when `amount` is missing, non-numeric, or
    /// not strictly positive, or when `metadata` is missing or not an
    /// object. No upstream call happens for these.
    pub fn from_request(body: &Value) -> Result<Self, FunctionError> {
        let amount = body
            .get("amount")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                FunctionError::InvalidArgument(
                    "amount must be a positive number".to_owned(),
                )
            })?;
        if amount <= 0.0 || !amount.is_finite() {
            return Err(FunctionError::InvalidArgument(
                "amount must be a positive number".to_owned(),
            ));
        }

        let metadata = body
            .get("metadata")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                FunctionError::InvalidArgument("metadata must be an object".to_owned())
            })?
            .clone();

        Ok(Self { amount, metadata })
    }

    /// Human-readable charge name derived from the first cart item, if any.
    #[must_use]
    pub fn charge_name(&self) -> String {
        self.metadata
            .get("cartItems")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(|item| item.get("name"))
            .and_then(Value::as_str)
            .map_or_else(|| GENERIC_CHARGE_NAME.to_owned(), ToOwned::to_owned)
    }

    /// Build the gateway "create charge" body.
    ///
    /// Fixed-price charge in the settlement currency with two decimal
    /// places; the source marker is merged into the caller's metadata.
    #[must_use]
    pub fn to_gateway_body(&self, settlement_currency: CurrencyCode) -> Value {
        let name = self.charge_name();

        let mut metadata = self.metadata.clone();
        metadata.insert("source".to_owned(), Value::String(SOURCE_MARKER.to_owned()));

        json!({
            "name": name,
            "description": format!("Payment for {name}"),
            "pricing_type": "fixed_price",
            "local_price": {
                "amount": format!("{:.2}", self.amount),
                "currency": settlement_currency.as_str(),
            },
            "metadata": metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_amount() {
        let body = json!({"amount": 0, "metadata": {}});
        let err = ChargeParams::from_request(&body).expect_err("rejected");
        assert_eq!(err.kind(), "invalid-argument");
    }

    #[test]
    fn test_rejects_negative_amount() {
        let body = json!({"amount": -5, "metadata": {}});
        assert!(ChargeParams::from_request(&body).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_amount() {
        let body = json!({"amount": "abc", "metadata": {}});
        assert!(ChargeParams::from_request(&body).is_err());
    }

    #[test]
    fn test_rejects_missing_amount() {
        let body = json!({"metadata": {}});
        assert!(ChargeParams::from_request(&body).is_err());
    }

    #[test]
    fn test_rejects_null_metadata() {
        let body = json!({"amount": 19.99, "metadata": null});
        let err = ChargeParams::from_request(&body).expect_err("rejected");
        assert_eq!(err.kind(), "invalid-argument");
    }

    #[test]
    fn test_rejects_string_metadata() {
        let body = json!({"amount": 19.99, "metadata": "string"});
        assert!(ChargeParams::from_request(&body).is_err());
    }

    #[test]
    fn test_rejects_missing_metadata() {
        let body = json!({"amount": 19.99});
        assert!(ChargeParams::from_request(&body).is_err());
    }

    #[test]
    fn test_accepts_valid_request() {
        let body = json!({"amount": 19.99, "metadata": {"cartItems": [{"name": "Kit"}]}});
        let params = ChargeParams::from_request(&body).expect("accepted");
        assert!((params.amount - 19.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_charge_name_from_first_cart_item() {
        let body = json!({"amount": 19.99, "metadata": {"cartItems": [{"name": "Kit"}]}});
        let params = ChargeParams::from_request(&body).expect("accepted");
        assert_eq!(params.charge_name(), "Kit");
    }

    #[test]
    fn test_charge_name_falls_back_to_generic() {
        let body = json!({"amount": 19.99, "metadata": {}});
        let params = ChargeParams::from_request(&body).expect("accepted");
        assert_eq!(params.charge_name(), GENERIC_CHARGE_NAME);

        let body = json!({"amount": 19.99, "metadata": {"cartItems": []}});
        let params = ChargeParams::from_request(&body).expect("accepted");
        assert_eq!(params.charge_name(), GENERIC_CHARGE_NAME);
    }

    #[test]
    fn test_gateway_body_shape() {
        let body = json!({
            "amount": 19.9,
            "metadata": {"cartItems": [{"name": "Kit"}], "customer": {"email": "a@b.co"}}
        });
        let params = ChargeParams::from_request(&body).expect("accepted");
        let gateway = params.to_gateway_body(CurrencyCode::USD);

        assert_eq!(gateway["pricing_type"], "fixed_price");
        assert_eq!(gateway["local_price"]["amount"], "19.90");
        assert_eq!(gateway["local_price"]["currency"], "USD");
        assert_eq!(gateway["name"], "Kit");
        // source marker merged in alongside existing metadata
        assert_eq!(gateway["metadata"]["source"], SOURCE_MARKER);
        assert_eq!(gateway["metadata"]["customer"]["email"], "a@b.co");
    }
}
