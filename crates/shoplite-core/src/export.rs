//! # Export Tagging
//!
//! Maps entities to their interchange representation with a `"type"`
//! discriminant, for consumers that mix entity kinds in one stream.
//!
//! Kept as a capability trait over plain data (composition): the domain
//! structs stay untouched and each kind just declares its tag.

use serde::Serialize;
use serde_json::Value;

use crate::types::{Customer, Product};

/// The "to interchange representation" capability.
///
/// `export` serializes the entity and adds a `"type"` field naming the
/// entity kind.
///
/// ## Example
/// ```rust
/// use shoplite_core::export::Exportable;
/// use shoplite_core::{Customer, Money, Product};
///
/// let product = Product::new("Mouse", Money::from_cents(1290), Some("MS-002".into()));
/// let value = product.export();
/// assert_eq!(value["type"], "product");
/// assert_eq!(value["price"], 1290);
/// ```
pub trait Exportable: Serialize {
    /// The discriminant written into the `"type"` field.
    fn kind(&self) -> &'static str;

    /// Serializes the entity with the `"type"` tag added.
    fn export(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.insert("type".to_string(), Value::String(self.kind().to_string()));
        }
        value
    }
}

impl Exportable for Customer {
    fn kind(&self) -> &'static str {
        "customer"
    }
}

impl Exportable for Product {
    fn kind(&self) -> &'static str {
        "product"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_customer_export_is_tagged() {
        let customer = Customer::new("Ada", Some("ada@example.com".into()), None, None);
        let value = customer.export();
        assert_eq!(value["type"], "customer");
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["email"], "ada@example.com");
    }

    #[test]
    fn test_product_export_is_tagged() {
        let product = Product::new("Mouse", Money::from_cents(1290), Some("MS-002".into()));
        let value = product.export();
        assert_eq!(value["type"], "product");
        assert_eq!(value["sku"], "MS-002");
        assert_eq!(value["price"], 1290);
    }
}
