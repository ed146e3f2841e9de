//! Stripe webhook event types.
//!
//! Defines the structures for parsing Stripe webhook payloads.
//! Only fields relevant to our processing are captured.

use serde::{Deserialize, Serialize};

/// Stripe webhook event (simplified).
///
/// Contains the essential fields needed for webhook processing.
/// Additional fields from Stripe's full event schema are ignored.
///
/// Values of this type are only ever produced by the webhook verifier;
/// downstream code may assume `event_type` and `data` are exactly as Stripe
/// sent them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "customer.subscription.updated").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    pub livemode: bool,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Returns true if this is a live mode event.
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_str(&self.event_type)
    }
}

/// Known Stripe event types that this service reacts to.
///
/// Event types arrive as an open string enumeration; the closed variant set
/// here covers the handled types with an explicit catch-all for everything
/// else, so routing is a single match rather than string comparisons
/// scattered across handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// A subscription was created.
    SubscriptionCreated,
    /// A subscription was updated.
    SubscriptionUpdated,
    /// A subscription was deleted (canceled).
    SubscriptionDeleted,
    /// A product was created.
    ProductCreated,
    /// A product was updated.
    ProductUpdated,
    /// A price was created.
    PriceCreated,
    /// A price was updated.
    PriceUpdated,
    /// Unknown or unhandled event type.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "customer.subscription.created" => Self::SubscriptionCreated,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            "product.created" => Self::ProductCreated,
            "product.updated" => Self::ProductUpdated,
            "price.created" => Self::PriceCreated,
            "price.updated" => Self::PriceUpdated,
            _ => Self::Unknown,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionDeleted => "customer.subscription.deleted",
            Self::ProductCreated => "product.created",
            Self::ProductUpdated => "product.updated",
            Self::PriceCreated => "price.created",
            Self::PriceUpdated => "price.updated",
            Self::Unknown => "unknown",
        }
    }

    /// True for the subscription lifecycle events handled by the reconciler.
    pub fn is_subscription_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::SubscriptionCreated | Self::SubscriptionUpdated | Self::SubscriptionDeleted
        )
    }

    /// True for the catalog-change events that invalidate the pricing cache.
    pub fn is_catalog_change(&self) -> bool {
        matches!(
            self,
            Self::ProductCreated | Self::ProductUpdated | Self::PriceCreated | Self::PriceUpdated
        )
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "customer.subscription.updated".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: self.livemode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "customer.subscription.created",
            "created": 1704067200,
            "data": {
                "object": {}
            },
            "livemode": false
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.event_type, "customer.subscription.created");
        assert_eq!(event.created, 1704067200);
        assert!(!event.livemode);
    }

    #[test]
    fn deserialize_event_with_previous_attributes() {
        let json = r#"{
            "id": "evt_update_123",
            "type": "customer.subscription.updated",
            "created": 1704067200,
            "data": {
                "object": {"status": "active"},
                "previous_attributes": {"status": "past_due"}
            },
            "livemode": true
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert!(event.is_live());
        let prev = event.data.previous_attributes.unwrap();
        assert_eq!(prev["status"], "past_due");
    }

    #[test]
    fn deserialize_object_to_custom_type() {
        #[derive(Debug, Deserialize)]
        struct Subscription {
            id: String,
            customer: String,
        }

        let event = StripeEventBuilder::new()
            .object(json!({
                "id": "sub_abc123",
                "customer": "cus_xyz789",
                "status": "active"
            }))
            .build();

        let sub: Subscription = event.deserialize_object().unwrap();
        assert_eq!(sub.id, "sub_abc123");
        assert_eq!(sub.customer, "cus_xyz789");
    }

    #[test]
    fn event_type_from_str_subscription_events() {
        assert_eq!(
            StripeEventType::from_str("customer.subscription.created"),
            StripeEventType::SubscriptionCreated
        );
        assert_eq!(
            StripeEventType::from_str("customer.subscription.updated"),
            StripeEventType::SubscriptionUpdated
        );
        assert_eq!(
            StripeEventType::from_str("customer.subscription.deleted"),
            StripeEventType::SubscriptionDeleted
        );
    }

    #[test]
    fn event_type_from_str_catalog_events() {
        assert_eq!(
            StripeEventType::from_str("product.created"),
            StripeEventType::ProductCreated
        );
        assert_eq!(
            StripeEventType::from_str("price.updated"),
            StripeEventType::PriceUpdated
        );
    }

    #[test]
    fn event_type_from_str_unknown() {
        assert_eq!(
            StripeEventType::from_str("invoice.paid"),
            StripeEventType::Unknown
        );
    }

    #[test]
    fn event_type_as_str_roundtrip() {
        let types = [
            StripeEventType::SubscriptionCreated,
            StripeEventType::SubscriptionUpdated,
            StripeEventType::SubscriptionDeleted,
            StripeEventType::ProductCreated,
            StripeEventType::ProductUpdated,
            StripeEventType::PriceCreated,
            StripeEventType::PriceUpdated,
        ];

        for event_type in types {
            assert_eq!(StripeEventType::from_str(event_type.as_str()), event_type);
        }
    }

    #[test]
    fn lifecycle_and_catalog_classification() {
        assert!(StripeEventType::SubscriptionDeleted.is_subscription_lifecycle());
        assert!(!StripeEventType::SubscriptionDeleted.is_catalog_change());

        assert!(StripeEventType::PriceCreated.is_catalog_change());
        assert!(!StripeEventType::PriceCreated.is_subscription_lifecycle());

        assert!(!StripeEventType::Unknown.is_subscription_lifecycle());
        assert!(!StripeEventType::Unknown.is_catalog_change());
    }

    #[test]
    fn parsed_type_returns_correct_variant() {
        let event = StripeEventBuilder::new()
            .event_type("price.updated")
            .build();

        assert_eq!(event.parsed_type(), StripeEventType::PriceUpdated);
    }
}
