//! # Report Repository
//!
//! Aggregate reporting queries.
//!
//! All reports are computed inside SQLite with GROUP BY / JOIN rather
//! than by loading rows into memory. The shapes returned here are read
//! models; nothing in this module writes.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shoplite_core::Money;

// =============================================================================
// Report Rows
// =============================================================================

/// One customer's order activity: how many orders, and their combined
/// total. Customers with no orders report zero for both.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct CustomerActivity {
    pub id: i64,
    pub name: String,
    pub order_count: i64,
    #[sqlx(rename = "total_cents")]
    pub total: Money,
}

/// Orders placed on a single day.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub count: i64,
}

/// A pair of distinct customers sharing a city.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct CityEdge {
    pub a: i64,
    pub b: i64,
    pub city: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for aggregate reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Ranks customers by order count, ties broken by spend.
    ///
    /// Every customer appears, including those who never ordered; the
    /// LEFT JOIN keeps them in with zero counts.
    pub async fn top_customers(&self, limit: i64) -> DbResult<Vec<CustomerActivity>> {
        debug!(limit = limit, "Running top-customers report");

        let rows = sqlx::query_as::<_, CustomerActivity>(
            "SELECT c.id, c.name, \
             COUNT(o.id) AS order_count, \
             COALESCE(SUM(o.total_cents), 0) AS total_cents \
             FROM customers c \
             LEFT JOIN orders o ON o.customer_id = c.id \
             GROUP BY c.id, c.name \
             ORDER BY order_count DESC, total_cents DESC, c.id ASC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts orders per calendar day, oldest day first. Days with no
    /// orders are absent.
    pub async fn orders_per_day(&self) -> DbResult<Vec<DailyOrders>> {
        debug!("Running orders-per-day report");

        let rows = sqlx::query_as::<_, DailyOrders>(
            "SELECT date, COUNT(*) AS count FROM orders GROUP BY date ORDER BY date ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists every unordered pair of distinct customers who share a
    /// non-empty city. Each pair appears once, with `a < b`.
    pub async fn city_edges(&self) -> DbResult<Vec<CityEdge>> {
        debug!("Running city-edges report");

        let rows = sqlx::query_as::<_, CityEdge>(
            "SELECT c1.id AS a, c2.id AS b, c1.city AS city \
             FROM customers c1 \
             JOIN customers c2 ON c1.city = c2.city AND c1.id < c2.id \
             WHERE c1.city IS NOT NULL AND c1.city != '' \
             ORDER BY c1.city, c1.id, c2.id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
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
    use shoplite_core::{Customer, Order, OrderItem, Product};

    async fn seed_customer(db: &Database, name: &str, city: Option<&str>) -> i64 {
        db.customers()
            .insert(&Customer::new(name, None, None, city.map(String::from)))
            .await
            .unwrap()
    }

    async fn seed_order(db: &Database, customer_id: i64, date: &str, product_id: i64, qty: i64) {
        let mut order = Order::new_on(
            customer_id,
            date.parse().unwrap(),
            vec![OrderItem::for_product(product_id, qty)],
        );
        db.orders().create(&mut order).await.unwrap();
    }

    #[tokio::test]
    async fn test_top_customers_ranking_and_zero_rows() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", None).await;
        let bob = seed_customer(&db, "Bob", None).await;
        let _carol = seed_customer(&db, "Carol", None).await;
        let mouse = db
            .products()
            .insert(&Product::new("Mouse", Money::from_cents(1000), None))
            .await
            .unwrap();

        seed_order(&db, ada, "2024-01-01", mouse, 1).await;
        seed_order(&db, ada, "2024-01-02", mouse, 1).await;
        seed_order(&db, bob, "2024-01-03", mouse, 5).await;

        let top = db.reports().top_customers(10).await.unwrap();
        assert_eq!(top.len(), 3);

        assert_eq!(top[0].name, "Ada");
        assert_eq!(top[0].order_count, 2);
        assert_eq!(top[0].total, Money::from_cents(2000));

        assert_eq!(top[1].name, "Bob");
        assert_eq!(top[1].order_count, 1);
        assert_eq!(top[1].total, Money::from_cents(5000));

        // Never ordered, still listed.
        assert_eq!(top[2].name, "Carol");
        assert_eq!(top[2].order_count, 0);
        assert!(top[2].total.is_zero());

        let top_one = db.reports().top_customers(1).await.unwrap();
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_spend_breaks_order_count_ties() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", None).await;
        let bob = seed_customer(&db, "Bob", None).await;
        let mouse = db
            .products()
            .insert(&Product::new("Mouse", Money::from_cents(1000), None))
            .await
            .unwrap();

        seed_order(&db, ada, "2024-01-01", mouse, 1).await;
        seed_order(&db, bob, "2024-01-01", mouse, 3).await;

        let top = db.reports().top_customers(10).await.unwrap();
        assert_eq!(top[0].name, "Bob");
        assert_eq!(top[1].name, "Ada");
    }

    #[tokio::test]
    async fn test_orders_per_day_groups_and_sorts() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", None).await;
        let mouse = db
            .products()
            .insert(&Product::new("Mouse", Money::from_cents(1000), None))
            .await
            .unwrap();

        seed_order(&db, ada, "2024-02-01", mouse, 1).await;
        seed_order(&db, ada, "2024-01-01", mouse, 1).await;
        seed_order(&db, ada, "2024-02-01", mouse, 1).await;

        let days = db.reports().orders_per_day().await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-01".parse().unwrap());
        assert_eq!(days[0].count, 1);
        assert_eq!(days[1].date, "2024-02-01".parse().unwrap());
        assert_eq!(days[1].count, 2);
    }

    #[tokio::test]
    async fn test_city_edges_pairs_each_once() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", Some("Berlin")).await;
        let bob = seed_customer(&db, "Bob", Some("Berlin")).await;
        let carol = seed_customer(&db, "Carol", Some("Berlin")).await;
        let _dan = seed_customer(&db, "Dan", Some("Munich")).await;
        let _eve = seed_customer(&db, "Eve", None).await;

        let edges = db.reports().city_edges().await.unwrap();

        // Three Berliners pair up three ways; Munich and the city-less
        // customer contribute nothing.
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.city == "Berlin" && e.a < e.b));

        let pairs: Vec<_> = edges.iter().map(|e| (e.a, e.b)).collect();
        assert!(pairs.contains(&(ada, bob)));
        assert!(pairs.contains(&(ada, carol)));
        assert!(pairs.contains(&(bob, carol)));
    }

    #[tokio::test]
    async fn test_empty_database_reports() {
        let db = test_db().await;

        assert!(db.reports().top_customers(10).await.unwrap().is_empty());
        assert!(db.reports().orders_per_day().await.unwrap().is_empty());
        assert!(db.reports().city_edges().await.unwrap().is_empty());
    }
}
