//! # Order Repository
//!
//! Order assembly and listings.
//!
//! ## Order Creation Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 create(&mut Order)                              │
//! │                                                                 │
//! │  BEGIN TRANSACTION                                              │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  1. Resolve prices: any item without an explicit positive       │
//! │     price takes the product's current price                     │
//! │     └── product missing? → NotFound, nothing written            │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  2. Recompute item subtotals (price frozen from here on:        │
//! │     "price at time of purchase")                                │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  3. order.validate() → recomputes the order total               │
//! │     └── invalid? → ValidationError, nothing written             │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  4. INSERT order row + every item row                           │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  COMMIT — only now are ids written back into the order          │
//! │                                                                 │
//! │  Any error on the way out drops the transaction: an order is    │
//! │  never persisted partially.                                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use shoplite_core::{Money, Order, OrderItem, OrderItemDetail, OrderSummary, Validate};

// =============================================================================
// Filters
// =============================================================================

/// Sort orders for the order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSort {
    /// Most recent first (the default listing).
    #[default]
    DateDesc,
    /// Oldest first.
    DateAsc,
    /// Largest total first.
    TotalDesc,
    /// Smallest total first.
    TotalAsc,
}

impl OrderSort {
    fn as_sql(self) -> &'static str {
        match self {
            OrderSort::DateDesc => "o.date DESC",
            OrderSort::DateAsc => "o.date ASC",
            OrderSort::TotalDesc => "o.total_cents DESC",
            OrderSort::TotalAsc => "o.total_cents ASC",
        }
    }
}

/// Filter parameters for the order listing. All fields optional;
/// the default matches everything, newest first.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Inclusive lower bound on the order date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the order date.
    pub date_to: Option<NaiveDate>,
    /// Exact status match.
    pub status: Option<String>,
    /// Substring search over customer name, email and city.
    pub customer_search: Option<String>,
    /// Result ordering.
    pub sort: OrderSort,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Assembles and persists an order as a single atomic unit.
    ///
    /// See the module-level workflow diagram. On success the assigned
    /// ids are written back into `order` and its items, and resolved
    /// prices/subtotals/total are left in place.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - an item references a missing product
    /// * `DbError::Validation` - entity invariant violated
    /// * `DbError::ForeignKeyViolation` - the customer does not exist
    pub async fn create(&self, order: &mut Order) -> DbResult<i64> {
        debug!(
            customer_id = order.customer_id,
            items = order.items.len(),
            "Creating order"
        );

        let mut tx = self.pool.begin().await?;

        // Freeze the price at time of purchase.
        for item in &mut order.items {
            if !item.price.is_positive() {
                let price: Option<i64> =
                    sqlx::query_scalar("SELECT price_cents FROM products WHERE id = ?1")
                        .bind(item.product_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                let price = price.ok_or_else(|| DbError::not_found("Product", item.product_id))?;
                item.price = Money::from_cents(price);
            }
            item.subtotal = item.price.multiply_quantity(item.quantity);
        }

        // Recomputes the total from item subtotals.
        order.validate()?;

        let result = sqlx::query(
            "INSERT INTO orders (customer_id, date, status, total_cents) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(order.customer_id)
        .bind(order.date)
        .bind(&order.status)
        .bind(order.total)
        .execute(&mut *tx)
        .await?;
        let order_id = result.last_insert_rowid();

        let mut item_ids = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let result = sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price_cents, subtotal_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.subtotal)
            .execute(&mut *tx)
            .await?;
            item_ids.push(result.last_insert_rowid());
        }

        tx.commit().await?;

        // Identities become visible only after a successful commit.
        order.id = Some(order_id);
        for (item, id) in order.items.iter_mut().zip(item_ids) {
            item.order_id = Some(order_id);
            item.id = Some(id);
        }

        debug!(id = order_id, total = %order.total, "Order created");
        Ok(order_id)
    }

    /// Lists orders joined with customer summary fields.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<OrderSummary>> {
        debug!(filter = ?filter, "Listing orders");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT o.id, o.customer_id, o.date, o.status, o.total_cents, \
             c.name AS customer_name, c.email AS customer_email, c.city AS customer_city \
             FROM orders o \
             JOIN customers c ON c.id = o.customer_id \
             WHERE 1=1",
        );

        if let Some(from) = filter.date_from {
            qb.push(" AND o.date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            qb.push(" AND o.date <= ").push_bind(to);
        }
        if let Some(status) = filter.status.as_deref() {
            qb.push(" AND o.status = ").push_bind(status.to_string());
        }
        if let Some(term) = filter.customer_search.as_deref() {
            let like = format!("%{term}%");
            qb.push(" AND (c.name LIKE ")
                .push_bind(like.clone())
                .push(" OR c.email LIKE ")
                .push_bind(like.clone())
                .push(" OR c.city LIKE ")
                .push_bind(like)
                .push(")");
        }

        qb.push(" ORDER BY ").push(filter.sort.as_sql());

        let orders = qb
            .build_query_as::<OrderSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists the items of one order joined with product name/SKU.
    pub async fn items(&self, order_id: i64) -> DbResult<Vec<OrderItemDetail>> {
        let items = sqlx::query_as::<_, OrderItemDetail>(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, \
             oi.price_cents, oi.subtotal_cents, \
             p.name AS product_name, p.sku \
             FROM order_items oi \
             JOIN products p ON p.id = oi.product_id \
             WHERE oi.order_id = ?1 \
             ORDER BY oi.id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a full order (row + items) by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        #[derive(sqlx::FromRow)]
        struct OrderRow {
            id: i64,
            customer_id: i64,
            date: NaiveDate,
            status: String,
            total_cents: i64,
        }

        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, date, status, total_cents FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price_cents, subtotal_cents \
             FROM order_items WHERE order_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Order {
            id: Some(row.id),
            customer_id: row.customer_id,
            date: row.date,
            status: row.status,
            total: Money::from_cents(row.total_cents),
            items,
        }))
    }

    /// Deletes an order. The store cascades the delete to its items.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Counts order rows (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts order item rows (for diagnostics).
    pub async fn items_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use crate::Database;
    use shoplite_core::{status, Customer, Product};

    async fn seed_customer(db: &Database, name: &str, city: &str) -> i64 {
        db.customers()
            .insert(&Customer::new(name, None, None, Some(city.to_string())))
            .await
            .unwrap()
    }

    async fn seed_product(db: &Database, name: &str, cents: i64) -> i64 {
        db.products()
            .insert(&Product::new(name, Money::from_cents(cents), None))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_resolves_prices_and_assigns_ids() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Ada", "London").await;
        let mouse = seed_product(&db, "Mouse", 1290).await;
        let keyboard = seed_product(&db, "Keyboard", 2490).await;

        let mut order = Order::new(
            customer_id,
            vec![
                OrderItem::for_product(mouse, 2),
                // Explicit price overrides the catalogue price.
                OrderItem::new(keyboard, 1, Money::from_cents(2000)),
            ],
        );

        let id = db.orders().create(&mut order).await.unwrap();

        assert_eq!(order.id, Some(id));
        assert_eq!(order.items[0].price, Money::from_cents(1290));
        assert_eq!(order.items[0].subtotal, Money::from_cents(2580));
        assert_eq!(order.items[1].price, Money::from_cents(2000));
        assert_eq!(order.total, Money::from_cents(4580));
        assert!(order.items.iter().all(|i| i.id.is_some() && i.order_id == Some(id)));

        let stored = db.orders().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.total, Money::from_cents(4580));
        assert_eq!(stored.items.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_product_leaves_tables_unchanged() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Ada", "London").await;
        let mouse = seed_product(&db, "Mouse", 1290).await;

        let mut order = Order::new(
            customer_id,
            vec![
                OrderItem::for_product(mouse, 1),
                OrderItem::for_product(999, 1), // no such product
            ],
        );

        let err = db.orders().create(&mut order).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(order.id.is_none());

        assert_eq!(db.orders().count().await.unwrap(), 0);
        assert_eq!(db.orders().items_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_order_rolls_back() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Ada", "London").await;
        let mouse = seed_product(&db, "Mouse", 1290).await;

        let mut order = Order::new(
            customer_id,
            vec![OrderItem::new(mouse, 0, Money::from_cents(1290))],
        );

        let err = db.orders().create(&mut order).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.orders().count().await.unwrap(), 0);
        assert_eq!(db.orders().items_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_customer_is_constraint_error() {
        let db = test_db().await;
        let mouse = seed_product(&db, "Mouse", 1290).await;

        let mut order = Order::new(999, vec![OrderItem::for_product(mouse, 1)]);
        let err = db.orders().create(&mut order).await.unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.orders().items_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_price_at_time_of_purchase() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Ada", "London").await;
        let mouse = seed_product(&db, "Mouse", 1290).await;

        let mut order = Order::new(customer_id, vec![OrderItem::for_product(mouse, 1)]);
        let order_id = db.orders().create(&mut order).await.unwrap();

        // Raise the catalogue price after the sale.
        db.products()
            .update_price(mouse, Money::from_cents(9999))
            .await
            .unwrap();

        let stored = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(stored.items[0].price, Money::from_cents(1290));
        assert_eq!(stored.total, Money::from_cents(1290));
    }

    #[tokio::test]
    async fn test_list_filters_and_item_join() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", "London").await;
        let bob = seed_customer(&db, "Bob", "Paris").await;
        let mouse = db
            .products()
            .insert(&Product::new("Mouse", Money::from_cents(1290), Some("MS-002".into())))
            .await
            .unwrap();

        let date = |s: &str| s.parse::<NaiveDate>().unwrap();

        let mut first = Order::new_on(ada, date("2024-01-01"), vec![OrderItem::for_product(mouse, 1)]);
        db.orders().create(&mut first).await.unwrap();

        let mut second =
            Order::new_on(ada, date("2024-02-01"), vec![OrderItem::for_product(mouse, 2)])
                .with_status(status::PAID);
        db.orders().create(&mut second).await.unwrap();

        let mut third = Order::new_on(bob, date("2024-03-01"), vec![OrderItem::for_product(mouse, 3)]);
        db.orders().create(&mut third).await.unwrap();

        // Date range.
        let filter = OrderFilter {
            date_from: Some(date("2024-01-15")),
            date_to: Some(date("2024-02-15")),
            ..Default::default()
        };
        let hits = db.orders().list(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, second.id.unwrap());
        assert_eq!(hits[0].customer_name, "Ada");

        // Status.
        let filter = OrderFilter {
            status: Some(status::PAID.to_string()),
            ..Default::default()
        };
        assert_eq!(db.orders().list(&filter).await.unwrap().len(), 1);

        // Customer search + ascending date sort.
        let filter = OrderFilter {
            customer_search: Some("Ada".to_string()),
            sort: OrderSort::DateAsc,
            ..Default::default()
        };
        let hits = db.orders().list(&filter).await.unwrap();
        let dates: Vec<_> = hits.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date("2024-01-01"), date("2024-02-01")]);

        // Item listing joins product fields.
        let items = db.orders().items(third.id.unwrap()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "Mouse");
        assert_eq!(items[0].sku.as_deref(), Some("MS-002"));
        assert_eq!(items[0].subtotal, Money::from_cents(3870));
    }

    #[tokio::test]
    async fn test_deleting_customer_cascades() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", "London").await;
        let mouse = seed_product(&db, "Mouse", 1290).await;

        let mut order = Order::new(ada, vec![OrderItem::for_product(mouse, 1)]);
        db.orders().create(&mut order).await.unwrap();

        db.customers().delete(ada).await.unwrap();

        assert_eq!(db.orders().count().await.unwrap(), 0);
        assert_eq!(db.orders().items_count().await.unwrap(), 0);
    }
}
