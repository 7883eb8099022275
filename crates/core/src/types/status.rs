//! Status and channel enums shared across order paths.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Card-path orders are written as `Confirmed` the moment the gateway
/// reports success. Crypto-path orders start `Pending` until the hosted
/// charge completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Pickup fulfillment channel.
///
/// The wire strings (`"stores"` / `"collection point"`) are part of the
/// persisted-order compatibility surface and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupChannel {
    #[serde(rename = "stores")]
    Stores,
    #[serde(rename = "collection point")]
    CollectionPoint,
}

impl std::fmt::Display for PickupChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stores => f.write_str("stores"),
            Self::CollectionPoint => f.write_str("collection point"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_channel_wire_format() {
        assert_eq!(
            serde_json::to_string(&PickupChannel::Stores).expect("serialize"),
            "\"stores\""
        );
        assert_eq!(
            serde_json::to_string(&PickupChannel::CollectionPoint).expect("serialize"),
            "\"collection point\""
        );
        let channel: PickupChannel =
            serde_json::from_str("\"collection point\"").expect("deserialize");
        assert_eq!(channel, PickupChannel::CollectionPoint);
    }

    #[test]
    fn test_order_status_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Confirmed).expect("serialize"),
            "\"confirmed\""
        );
    }
}
