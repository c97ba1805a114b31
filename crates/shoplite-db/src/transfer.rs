//! # Bulk Transfer
//!
//! CSV and JSON import/export for whole-database snapshots.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Bulk Transfer                              │
//! │                                                                 │
//! │  SQLite tables ◄──────────────► Snapshot (flat rows, real ids)  │
//! │                                      │                          │
//! │                     ┌────────────────┼────────────────┐         │
//! │                     ▼                                 ▼         │
//! │          directory of CSV files              single JSON file   │
//! │          customers.csv / products.csv /      {customers: [..],  │
//! │          orders.csv / order_items.csv         products: [..]..} │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Imports run in one transaction and use `INSERT OR REPLACE`, so rows
//! keep the ids they were exported with and re-importing the same
//! snapshot is idempotent. Parents load before children; replacing a
//! parent row cascades its old children away first, and the snapshot's
//! children are reinstated right after.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

// =============================================================================
// Snapshot Rows
// =============================================================================

// Flat row shapes mirroring the table columns exactly. Unlike the
// domain entities these always carry their ids, and monetary columns
// stay raw cents so the files diff cleanly.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub sku: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub customer_id: i64,
    pub date: chrono::NaiveDate,
    pub status: String,
    pub total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price_cents: i64,
    pub subtotal_cents: i64,
}

/// A complete copy of the store's data.
///
/// Every section defaults to empty so partial JSON files (say, just
/// customers and products) import cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub customers: Vec<CustomerRow>,
    #[serde(default)]
    pub products: Vec<ProductRow>,
    #[serde(default)]
    pub orders: Vec<OrderRow>,
    #[serde(default)]
    pub order_items: Vec<OrderItemRow>,
}

/// Row counts written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    pub order_items: usize,
}

// File names inside a CSV export directory.
const CUSTOMERS_CSV: &str = "customers.csv";
const PRODUCTS_CSV: &str = "products.csv";
const ORDERS_CSV: &str = "orders.csv";
const ORDER_ITEMS_CSV: &str = "order_items.csv";

// Column headers, used so empty exports still produce a header line.
const CUSTOMER_HEADERS: [&str; 6] = ["id", "name", "email", "phone", "city", "created_at"];
const PRODUCT_HEADERS: [&str; 5] = ["id", "name", "price_cents", "sku", "created_at"];
const ORDER_HEADERS: [&str; 5] = ["id", "customer_id", "date", "status", "total_cents"];
const ORDER_ITEM_HEADERS: [&str; 6] = [
    "id",
    "order_id",
    "product_id",
    "quantity",
    "price_cents",
    "subtotal_cents",
];

// =============================================================================
// Transfer
// =============================================================================

/// Bulk CSV/JSON import and export.
#[derive(Debug, Clone)]
pub struct Transfer {
    pool: SqlitePool,
}

impl Transfer {
    /// Creates a new Transfer component.
    pub fn new(pool: SqlitePool) -> Self {
        Transfer { pool }
    }

    // -------------------------------------------------------------------------
    // Snapshot <-> database
    // -------------------------------------------------------------------------

    /// Reads the entire database into a snapshot, rows ordered by id.
    pub async fn export_snapshot(&self) -> DbResult<Snapshot> {
        debug!("Exporting database snapshot");

        let customers = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, email, phone, city, created_at FROM customers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let products = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price_cents, sku, created_at FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let orders = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, date, status, total_cents FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let order_items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, quantity, price_cents, subtotal_cents \
             FROM order_items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(Snapshot {
            customers,
            products,
            orders,
            order_items,
        })
    }

    /// Writes a snapshot into the database in one transaction.
    ///
    /// With `clear_before` the existing tables are emptied first
    /// (children before parents). Rows land via `INSERT OR REPLACE`, so
    /// an id collision replaces the existing row instead of failing.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - a child row references a
    ///   parent absent from both the snapshot and the database; nothing
    ///   is written
    pub async fn import_snapshot(
        &self,
        snapshot: &Snapshot,
        clear_before: bool,
    ) -> DbResult<ImportStats> {
        info!(
            customers = snapshot.customers.len(),
            products = snapshot.products.len(),
            orders = snapshot.orders.len(),
            order_items = snapshot.order_items.len(),
            clear_before = clear_before,
            "Importing snapshot"
        );

        let mut tx = self.pool.begin().await?;

        if clear_before {
            sqlx::query("DELETE FROM order_items").execute(&mut *tx).await?;
            sqlx::query("DELETE FROM orders").execute(&mut *tx).await?;
            sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
            sqlx::query("DELETE FROM customers").execute(&mut *tx).await?;
        }

        for row in &snapshot.customers {
            sqlx::query(
                "INSERT OR REPLACE INTO customers (id, name, email, phone, city, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(row.id)
            .bind(&row.name)
            .bind(&row.email)
            .bind(&row.phone)
            .bind(&row.city)
            .bind(row.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for row in &snapshot.products {
            sqlx::query(
                "INSERT OR REPLACE INTO products (id, name, price_cents, sku, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(row.id)
            .bind(&row.name)
            .bind(row.price_cents)
            .bind(&row.sku)
            .bind(row.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for row in &snapshot.orders {
            sqlx::query(
                "INSERT OR REPLACE INTO orders (id, customer_id, date, status, total_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(row.id)
            .bind(row.customer_id)
            .bind(row.date)
            .bind(&row.status)
            .bind(row.total_cents)
            .execute(&mut *tx)
            .await?;
        }

        for row in &snapshot.order_items {
            sqlx::query(
                "INSERT OR REPLACE INTO order_items \
                 (id, order_id, product_id, quantity, price_cents, subtotal_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(row.id)
            .bind(row.order_id)
            .bind(row.product_id)
            .bind(row.quantity)
            .bind(row.price_cents)
            .bind(row.subtotal_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ImportStats {
            customers: snapshot.customers.len(),
            products: snapshot.products.len(),
            orders: snapshot.orders.len(),
            order_items: snapshot.order_items.len(),
        })
    }

    // -------------------------------------------------------------------------
    // CSV
    // -------------------------------------------------------------------------

    /// Exports the database as four CSV files inside `dir`.
    ///
    /// The directory is created if missing. Empty tables still produce
    /// a file with a header line, so the export always yields the same
    /// four files.
    pub async fn export_csv(&self, dir: impl AsRef<Path>) -> DbResult<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let snapshot = self.export_snapshot().await?;

        write_csv(&dir.join(CUSTOMERS_CSV), &snapshot.customers, &CUSTOMER_HEADERS)?;
        write_csv(&dir.join(PRODUCTS_CSV), &snapshot.products, &PRODUCT_HEADERS)?;
        write_csv(&dir.join(ORDERS_CSV), &snapshot.orders, &ORDER_HEADERS)?;
        write_csv(
            &dir.join(ORDER_ITEMS_CSV),
            &snapshot.order_items,
            &ORDER_ITEM_HEADERS,
        )?;

        info!(dir = %dir.display(), "CSV export complete");
        Ok(())
    }

    /// Imports CSV files from `dir`. Missing files are skipped, so a
    /// directory holding only `customers.csv` imports just customers.
    pub async fn import_csv(
        &self,
        dir: impl AsRef<Path>,
        clear_before: bool,
    ) -> DbResult<ImportStats> {
        let dir = dir.as_ref();

        let snapshot = Snapshot {
            customers: read_csv(&dir.join(CUSTOMERS_CSV))?,
            products: read_csv(&dir.join(PRODUCTS_CSV))?,
            orders: read_csv(&dir.join(ORDERS_CSV))?,
            order_items: read_csv(&dir.join(ORDER_ITEMS_CSV))?,
        };

        self.import_snapshot(&snapshot, clear_before).await
    }

    // -------------------------------------------------------------------------
    // JSON
    // -------------------------------------------------------------------------

    /// Exports the database as one pretty-printed JSON file.
    pub async fn export_json(&self, path: impl AsRef<Path>) -> DbResult<()> {
        let path = path.as_ref();
        let snapshot = self.export_snapshot().await?;

        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &snapshot)?;

        info!(path = %path.display(), "JSON export complete");
        Ok(())
    }

    /// Imports a JSON snapshot file. Sections absent from the file are
    /// treated as empty.
    pub async fn import_json(
        &self,
        path: impl AsRef<Path>,
        clear_before: bool,
    ) -> DbResult<ImportStats> {
        let file = std::fs::File::open(path.as_ref())?;
        let snapshot: Snapshot = serde_json::from_reader(std::io::BufReader::new(file))?;

        self.import_snapshot(&snapshot, clear_before).await
    }
}

// =============================================================================
// CSV helpers
// =============================================================================

fn write_csv<T: Serialize>(path: &Path, rows: &[T], headers: &[&str]) -> DbResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    if rows.is_empty() {
        // serialize() only emits headers alongside a first record.
        writer.write_record(headers)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

fn read_csv<T: for<'de> Deserialize<'de>>(path: &Path) -> DbResult<Vec<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "CSV file absent, skipping");
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }

    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::test_support::test_db;
    use crate::Database;
    use shoplite_core::{Customer, Money, Order, OrderItem, Product};

    async fn seed(db: &Database) {
        let ada = db
            .customers()
            .insert(&Customer::new(
                "Ada Lovelace",
                Some("ada@example.com".into()),
                None,
                Some("London".into()),
            ))
            .await
            .unwrap();
        db.customers()
            .insert(&Customer::new("Bob", None, None, None))
            .await
            .unwrap();

        let mouse = db
            .products()
            .insert(&Product::new("Mouse", Money::from_cents(1290), Some("MS-002".into())))
            .await
            .unwrap();

        let mut order = Order::new(ada, vec![OrderItem::for_product(mouse, 2)]);
        db.orders().create(&mut order).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_export_writes_header_only_files() {
        let db = test_db().await;
        let dir = tempfile::tempdir().unwrap();

        db.transfer().export_csv(dir.path()).await.unwrap();

        let customers = std::fs::read_to_string(dir.path().join(CUSTOMERS_CSV)).unwrap();
        assert_eq!(customers.trim(), "id,name,email,phone,city,created_at");

        let items = std::fs::read_to_string(dir.path().join(ORDER_ITEMS_CSV)).unwrap();
        assert_eq!(
            items.trim(),
            "id,order_id,product_id,quantity,price_cents,subtotal_cents"
        );
    }

    #[tokio::test]
    async fn test_csv_round_trip() {
        let db = test_db().await;
        seed(&db).await;

        let before = db.transfer().export_snapshot().await.unwrap();
        assert_eq!(before.customers.len(), 2);
        assert_eq!(before.order_items.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        db.transfer().export_csv(dir.path()).await.unwrap();

        let stats = db.transfer().import_csv(dir.path(), true).await.unwrap();
        assert_eq!(stats.customers, 2);
        assert_eq!(stats.orders, 1);

        let after = db.transfer().export_snapshot().await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_json_round_trip_preserves_ids() {
        let db = test_db().await;
        seed(&db).await;

        let before = db.transfer().export_snapshot().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoplite.json");
        db.transfer().export_json(&path).await.unwrap();
        db.transfer().import_json(&path, true).await.unwrap();

        let after = db.transfer().export_snapshot().await.unwrap();
        assert_eq!(before, after);
        assert_eq!(after.orders[0].customer_id, before.orders[0].customer_id);
    }

    #[tokio::test]
    async fn test_partial_json_imports_missing_sections_as_empty() {
        let db = test_db().await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(
            &path,
            r#"{"customers": [{"id": 1, "name": "Ada", "email": null, "phone": null,
                "city": "London", "created_at": "2024-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();

        let stats = db.transfer().import_json(&path, false).await.unwrap();
        assert_eq!(stats.customers, 1);
        assert_eq!(stats.orders, 0);

        let stored = db.customers().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ada");
    }

    #[tokio::test]
    async fn test_missing_csv_files_are_skipped() {
        let db = test_db().await;
        let dir = tempfile::tempdir().unwrap();

        let stats = db.transfer().import_csv(dir.path(), false).await.unwrap();
        assert_eq!(stats, ImportStats::default());
    }

    #[tokio::test]
    async fn test_orphan_item_rolls_back_whole_import() {
        let db = test_db().await;
        seed(&db).await;

        let mut snapshot = db.transfer().export_snapshot().await.unwrap();
        snapshot.order_items.push(OrderItemRow {
            id: 99,
            order_id: 424242, // no such order
            product_id: snapshot.products[0].id,
            quantity: 1,
            price_cents: 1290,
            subtotal_cents: 1290,
        });

        let err = db.transfer().import_snapshot(&snapshot, true).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // The failed import cleared nothing.
        let after = db.transfer().export_snapshot().await.unwrap();
        assert_eq!(after.customers.len(), 2);
        assert_eq!(after.order_items.len(), 1);
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent() {
        let db = test_db().await;
        seed(&db).await;

        let snapshot = db.transfer().export_snapshot().await.unwrap();
        db.transfer().import_snapshot(&snapshot, false).await.unwrap();
        db.transfer().import_snapshot(&snapshot, false).await.unwrap();

        let after = db.transfer().export_snapshot().await.unwrap();
        assert_eq!(snapshot, after);
    }
}
