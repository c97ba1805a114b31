//! # Shoplite Database Layer
//!
//! SQLite persistence for the Shoplite shop manager.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      shoplite-db                                │
//! │                                                                 │
//! │  Database (pool.rs)                                             │
//! │  ├── customers() → CustomerRepository                           │
//! │  ├── products()  → ProductRepository                            │
//! │  ├── orders()    → OrderRepository   ← transactional assembly   │
//! │  ├── reports()   → ReportRepository  ← GROUP BY aggregates      │
//! │  └── transfer()  → Transfer          ← CSV/JSON snapshots       │
//! │                                                                 │
//! │  migrations.rs ← embedded schema, applied on connect            │
//! │  error.rs      ← DbError taxonomy                               │
//! │                                                                 │
//! │  Domain entities and validation live in shoplite-core; this     │
//! │  crate owns every line of SQL and nothing else does.            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,ignore
//! use shoplite_db::{Database, DbConfig};
//! use shoplite_core::{Order, OrderItem};
//!
//! let db = Database::new(DbConfig::new("./shoplite.db")).await?;
//!
//! let mut order = Order::new(customer_id, vec![OrderItem::for_product(product_id, 2)]);
//! let order_id = db.orders().create(&mut order).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod transfer;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::customer::{CustomerRepository, CustomerSort};
pub use repository::order::{OrderFilter, OrderRepository, OrderSort};
pub use repository::product::{ProductRepository, ProductSort};
pub use repository::report::{CityEdge, CustomerActivity, DailyOrders, ReportRepository};
pub use transfer::{ImportStats, Snapshot, Transfer};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{Database, DbConfig};

    /// Fresh migrated in-memory database for a test.
    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }
}
