//! # Validation Module
//!
//! Entity validation for Shoplite.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                          │
//! │                                                                 │
//! │  Layer 1: THIS MODULE - entity invariants                       │
//! │  ├── reject non-correctable violations (ValidationError)        │
//! │  └── silently normalise derived fields (subtotal, total)        │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 2: Database (SQLite)                                     │
//! │  ├── NOT NULL / UNIQUE constraints                              │
//! │  └── Foreign key constraints                                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity is validated before it is persisted. Validation is
//! idempotent: re-validating an already valid (or already corrected)
//! entity changes nothing and succeeds.
//!
//! ## Usage
//! ```rust
//! use shoplite_core::validation::Validate;
//! use shoplite_core::{Customer, Money, Order, OrderItem};
//!
//! let mut customer = Customer::new("Ada", Some("ada@example.com".into()), None, None);
//! customer.validate().unwrap();
//!
//! let mut order = Order::new(1, vec![OrderItem::new(1, 2, Money::from_cents(500))]);
//! order.validate().unwrap();
//! assert_eq!(order.total.cents(), 1000); // total derived from items
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ValidationError, ValidationResult};
use crate::types::{Customer, Order, OrderItem, Product};

/// Standard email pattern: local part, `@`, domain with a TLD of at
/// least two letters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern")
});

/// Loose phone pattern: optional leading `+`, a digit, then at least 7
/// more digits/spaces/hyphens/parens (minimum 8 significant characters).
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d[\d\s\-()]{7,}$").expect("phone pattern"));

// =============================================================================
// Validate Trait
// =============================================================================

/// The per-entity validation capability.
///
/// `validate` may mutate auto-correctable derived fields (item subtotal,
/// order total) to their canonical computed value, and fails with a
/// [`ValidationError`] for everything that cannot be corrected.
pub trait Validate {
    fn validate(&mut self) -> ValidationResult<()>;
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an email address against the standard pattern.
///
/// ## Example
/// ```rust
/// use shoplite_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must be a valid email address",
        });
    }
    Ok(())
}

/// Validates a phone number against the loose phone pattern.
///
/// ## Example
/// ```rust
/// use shoplite_core::validation::validate_phone;
///
/// assert!(validate_phone("+7 495 765-43-21").is_ok());
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if !PHONE_RE.is_match(phone) {
        return Err(ValidationError::InvalidFormat {
            field: "phone",
            reason: "must be a phone number with at least 8 significant characters",
        });
    }
    Ok(())
}

/// Validates a required name field.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    Ok(())
}

// =============================================================================
// Entity Implementations
// =============================================================================

impl Validate for Customer {
    /// ## Rules
    /// - name: required, non-empty
    /// - email: optional, must match the email pattern when present
    /// - phone: optional, must match the phone pattern when present
    fn validate(&mut self) -> ValidationResult<()> {
        validate_name(&self.name)?;

        if let Some(email) = self.email.as_deref() {
            if !email.is_empty() {
                validate_email(email)?;
            }
        }

        if let Some(phone) = self.phone.as_deref() {
            if !phone.is_empty() {
                validate_phone(phone)?;
            }
        }

        Ok(())
    }
}

impl Validate for Product {
    /// ## Rules
    /// - name: required, non-empty
    /// - price: must not be negative (zero is allowed)
    fn validate(&mut self) -> ValidationResult<()> {
        validate_name(&self.name)?;

        if self.price.is_negative() {
            return Err(ValidationError::Negative { field: "price" });
        }

        Ok(())
    }
}

impl Validate for OrderItem {
    /// ## Rules
    /// - quantity: must be > 0
    /// - price: must not be negative
    /// - subtotal: rewritten to `quantity × price` if it disagrees
    fn validate(&mut self) -> ValidationResult<()> {
        if self.quantity <= 0 {
            return Err(ValidationError::MustBePositive { field: "quantity" });
        }

        if self.price.is_negative() {
            return Err(ValidationError::Negative { field: "price" });
        }

        let computed = self.price.multiply_quantity(self.quantity);
        if self.subtotal != computed {
            // Normalisation, not an error.
            self.subtotal = computed;
        }

        Ok(())
    }
}

impl Validate for Order {
    /// ## Rules
    /// - customer_id: required (> 0)
    /// - items: must be non-empty
    /// - each item is validated in turn (item errors surface before the
    ///   total is touched)
    /// - total: rewritten to the sum of item subtotals if it disagrees
    fn validate(&mut self) -> ValidationResult<()> {
        if self.customer_id <= 0 {
            return Err(ValidationError::Required {
                field: "customer_id",
            });
        }

        if self.items.is_empty() {
            return Err(ValidationError::EmptyOrder);
        }

        for item in &mut self.items {
            item.validate()?;
        }

        let computed: crate::Money = self.items.iter().map(|i| i.subtotal).sum();
        if self.total != computed {
            self.total = computed;
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn customer(name: &str, email: Option<&str>, phone: Option<&str>) -> Customer {
        Customer::new(name, email.map(String::from), phone.map(String::from), None)
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.domain.org").is_ok());

        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("89024472231").is_ok());
        assert!(validate_phone("+79211112233").is_ok());
        assert!(validate_phone("+7 495 765-43-21").is_ok());

        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("++790000000").is_err());
    }

    #[test]
    fn test_customer_rules() {
        assert!(customer("Ada", None, None).validate().is_ok());
        // Empty optional fields are fine.
        assert!(customer("Ada", Some(""), Some("")).validate().is_ok());

        assert_eq!(
            customer("", None, None).validate(),
            Err(ValidationError::Required { field: "name" })
        );
        assert!(matches!(
            customer("Ada", Some("bad"), None).validate(),
            Err(ValidationError::InvalidFormat { field: "email", .. })
        ));
        assert!(matches!(
            customer("Ada", None, Some("123")).validate(),
            Err(ValidationError::InvalidFormat { field: "phone", .. })
        ));
    }

    #[test]
    fn test_product_rules() {
        let mut ok = Product::new("Keyboard", Money::from_cents(2490), Some("KB-003".into()));
        assert!(ok.validate().is_ok());

        let mut free = Product::new("Sticker", Money::zero(), None);
        assert!(free.validate().is_ok());

        let mut unnamed = Product::new("", Money::from_cents(100), None);
        assert_eq!(
            unnamed.validate(),
            Err(ValidationError::Required { field: "name" })
        );

        let mut negative = Product::new("Broken", Money::from_cents(-1), None);
        assert_eq!(
            negative.validate(),
            Err(ValidationError::Negative { field: "price" })
        );
    }

    #[test]
    fn test_item_subtotal_auto_corrected() {
        let mut item = OrderItem::new(1, 3, Money::from_cents(299));
        item.subtotal = Money::from_cents(1); // tamper
        assert!(item.validate().is_ok());
        assert_eq!(item.subtotal.cents(), 897);
    }

    #[test]
    fn test_item_rules() {
        let mut zero_qty = OrderItem::new(1, 0, Money::from_cents(100));
        assert_eq!(
            zero_qty.validate(),
            Err(ValidationError::MustBePositive { field: "quantity" })
        );

        let mut negative = OrderItem::new(1, 1, Money::from_cents(-100));
        assert_eq!(
            negative.validate(),
            Err(ValidationError::Negative { field: "price" })
        );
    }

    #[test]
    fn test_order_total_auto_corrected() {
        let items = vec![
            OrderItem::new(1, 2, Money::from_cents(500)),
            OrderItem::new(2, 1, Money::from_cents(250)),
        ];
        let mut order = Order::new(1, items);
        order.total = Money::from_cents(99_999); // tamper
        assert!(order.validate().is_ok());
        assert_eq!(order.total.cents(), 1250);
    }

    #[test]
    fn test_order_rules() {
        let mut no_customer = Order::new(0, vec![OrderItem::new(1, 1, Money::from_cents(100))]);
        assert_eq!(
            no_customer.validate(),
            Err(ValidationError::Required {
                field: "customer_id"
            })
        );

        let mut empty = Order::new(1, vec![]);
        assert_eq!(empty.validate(), Err(ValidationError::EmptyOrder));

        // An item-level error surfaces before the total is recomputed.
        let mut bad_item = Order::new(1, vec![OrderItem::new(1, -1, Money::from_cents(100))]);
        bad_item.total = Money::from_cents(1234);
        assert_eq!(
            bad_item.validate(),
            Err(ValidationError::MustBePositive { field: "quantity" })
        );
        assert_eq!(bad_item.total.cents(), 1234); // untouched
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut order = Order::new(1, vec![OrderItem::new(1, 2, Money::from_cents(500))]);
        assert!(order.validate().is_ok());
        let snapshot = format!("{order:?}");
        assert!(order.validate().is_ok());
        assert_eq!(format!("{order:?}"), snapshot);
    }
}
