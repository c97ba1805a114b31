//! # Domain Types
//!
//! Core domain entities for the shop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                            │
//! │                                                                 │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐      │
//! │  │   Customer    │   │    Product    │   │     Order     │      │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │      │
//! │  │  id (rowid)   │   │  id (rowid)   │   │  id (rowid)   │      │
//! │  │  name         │   │  name         │   │  customer_id  │      │
//! │  │  email?       │   │  price        │   │  date, status │      │
//! │  │  phone? city? │   │  sku? unique  │   │  total        │      │
//! │  └───────────────┘   └───────────────┘   │  items[] ─────┼──┐   │
//! │                                          └───────────────┘  │   │
//! │                                          ┌───────────────┐  │   │
//! │                                          │   OrderItem   │◄─┘   │
//! │                                          │  product_id   │      │
//! │                                          │  quantity     │      │
//! │                                          │  price        │ ← frozen at
//! │                                          │  subtotal     │   purchase time
//! │                                          └───────────────┘      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is `Option<i64>`: `None` until the store assigns a rowid on
//! insert. The order-creation workflow writes ids back only after its
//! transaction commits.
//!
//! ## Timestamps
//! Every constructor comes in a `new` / `new_at` pair. `new` stamps the
//! current time; `new_at` takes an explicit timestamp so tests can
//! inject a fixed clock.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// Well-known order status values.
///
/// Status is deliberately a free-form string: the store round-trips
/// whatever it is given (bulk import must not reject unknown statuses).
/// These constants are the values the presentation layer uses.
pub mod status {
    pub const NEW: &str = "new";
    pub const PAID: &str = "paid";
    pub const SHIPPED: &str = "shipped";
    pub const CANCELLED: &str = "cancelled";
}

// =============================================================================
// Customer
// =============================================================================

/// A shop customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Store-assigned identity (None until inserted).
    pub id: Option<i64>,

    /// Display name (required, non-empty).
    pub name: String,

    /// Contact email; must match the email pattern when present.
    pub email: Option<String>,

    /// Contact phone; must match the loose phone pattern when present.
    pub phone: Option<String>,

    /// Free-text city (also drives the relationship graph report).
    pub city: Option<String>,

    /// When the customer record was created.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a customer stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
        city: Option<String>,
    ) -> Self {
        Self::new_at(name, email, phone, city, Utc::now())
    }

    /// Creates a customer with an explicit creation timestamp.
    pub fn new_at(
        name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
        city: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Customer {
            id: None,
            name: name.into(),
            email,
            phone,
            city,
            created_at,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-assigned identity (None until inserted).
    pub id: Option<i64>,

    /// Display name (required, non-empty).
    pub name: String,

    /// Current price (non-negative). Orders freeze the price they were
    /// created with; changing this later never rewrites history.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,

    /// Stock Keeping Unit - optional, unique across products.
    pub sku: Option<String>,

    /// When the product record was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product stamped with the current time.
    pub fn new(name: impl Into<String>, price: Money, sku: Option<String>) -> Self {
        Self::new_at(name, price, sku, Utc::now())
    }

    /// Creates a product with an explicit creation timestamp.
    pub fn new_at(
        name: impl Into<String>,
        price: Money,
        sku: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Product {
            id: None,
            name: name.into(),
            price,
            sku,
            created_at,
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
///
/// The unit price is "price at time of purchase": it is resolved from
/// the product (or supplied explicitly) when the order is created and
/// never re-derived from later product price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    /// Store-assigned identity (None until inserted).
    pub id: Option<i64>,

    /// Owning order (None until the order is inserted).
    pub order_id: Option<i64>,

    /// Referenced product.
    pub product_id: i64,

    /// Quantity ordered (must be > 0).
    pub quantity: i64,

    /// Unit price frozen at order-creation time. A non-positive value
    /// means "resolve from the product's current price" during order
    /// assembly.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,

    /// Derived: `quantity × price`. Auto-corrected by validation if it
    /// disagrees with the recomputed value.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "subtotal_cents"))]
    pub subtotal: Money,
}

impl OrderItem {
    /// Creates an item with its subtotal already derived.
    pub fn new(product_id: i64, quantity: i64, price: Money) -> Self {
        OrderItem {
            id: None,
            order_id: None,
            product_id,
            quantity,
            price,
            subtotal: price.multiply_quantity(quantity),
        }
    }

    /// Creates an item whose price must be resolved from the product at
    /// order-creation time.
    pub fn for_product(product_id: i64, quantity: i64) -> Self {
        Self::new(product_id, quantity, Money::zero())
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order with its line items.
///
/// Created together with its items as one unit: the persistence layer
/// never stores an order row without its item rows, or vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned identity (None until inserted).
    pub id: Option<i64>,

    /// Referenced customer (required, must exist).
    pub customer_id: i64,

    /// Order date (date-only; defaults to today).
    pub date: NaiveDate,

    /// Free-form status string; see [`status`] for well-known values.
    pub status: String,

    /// Derived: sum of item subtotals. Auto-corrected by validation.
    /// Callers may leave this zero and let `validate` compute it.
    pub total: Money,

    /// Line items (must be non-empty). Exclusively owned by this order.
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Creates a new order dated today with status [`status::NEW`].
    pub fn new(customer_id: i64, items: Vec<OrderItem>) -> Self {
        Self::new_on(customer_id, Utc::now().date_naive(), items)
    }

    /// Creates a new order with an explicit date.
    pub fn new_on(customer_id: i64, date: NaiveDate, items: Vec<OrderItem>) -> Self {
        Order {
            id: None,
            customer_id,
            date,
            status: status::NEW.to_string(),
            total: Money::zero(),
            items,
        }
    }

    /// Sets the status (builder style).
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// An order row joined with customer summary fields, as returned by the
/// order listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub customer_id: i64,
    pub date: NaiveDate,
    pub status: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "total_cents"))]
    pub total: Money,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_city: Option<String>,
}

/// An order item joined with product name/SKU, as returned by the item
/// listing for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "subtotal_cents"))]
    pub subtotal: Money,
    pub product_name: String,
    pub sku: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
