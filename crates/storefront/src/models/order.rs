//! Orders and the checkout snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumina_core::{Money, OrderId, OrderStatus, ProductId, UserId};

use super::product::Product;
use super::validation::{ValidationErrors, required_text};

/// Where an order ships to. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl ShippingAddress {
    /// Trim every field and reject blanks.
    ///
    /// # Errors
    ///
    /// Returns every empty field, prefixed `shippingAddress.`.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let address = required_text(&mut errors, "shippingAddress.address", &self.address);
        let city = required_text(&mut errors, "shippingAddress.city", &self.city);
        let state = required_text(&mut errors, "shippingAddress.state", &self.state);
        let zip = required_text(&mut errors, "shippingAddress.zip", &self.zip);
        let country = required_text(&mut errors, "shippingAddress.country", &self.country);

        errors.into_result(Self {
            address,
            city,
            state,
            zip,
            country,
        })
    }
}

/// One line of an order: the product as it was at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    pub product: Product,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// `None` once the customer account has been deleted.
    pub user_id: Option<UserId>,
    pub email: String,
    pub total: Money,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

/// Checkout request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Absent address is reported as a validation error rather than a
    /// malformed body.
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

/// Admin status update request body.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            address: " 12 Rue des Lampes ".to_owned(),
            city: "Lyon".to_owned(),
            state: "Rhône".to_owned(),
            zip: "69001".to_owned(),
            country: "France".to_owned(),
        }
    }

    #[test]
    fn test_address_trimmed() {
        let addr = address().validate().unwrap();
        assert_eq!(addr.address, "12 Rue des Lampes");
    }

    #[test]
    fn test_address_blank_fields() {
        let mut addr = address();
        addr.zip = "  ".to_owned();
        addr.country = String::new();
        let errors = addr.validate().unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["shippingAddress.zip", "shippingAddress.country"]);
    }

    #[test]
    fn test_checkout_request_without_address() {
        let req: CheckoutRequest = serde_json::from_str("{}").unwrap();
        assert!(req.shipping_address.is_none());
    }
}
