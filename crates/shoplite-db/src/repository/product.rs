//! # Product Repository
//!
//! Database operations for products.
//!
//! Product prices are the *current* catalogue prices. Orders copy the
//! price into their items at creation time, so editing a product later
//! never rewrites order history.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shoplite_core::{Product, Validate};

/// Sort orders for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Newest first (the default listing).
    #[default]
    CreatedDesc,
    /// Oldest first.
    CreatedAsc,
    /// Alphabetical by name.
    Name,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

impl ProductSort {
    fn as_sql(self) -> &'static str {
        match self {
            ProductSort::CreatedDesc => "created_at DESC",
            ProductSort::CreatedAsc => "created_at ASC",
            ProductSort::Name => "name ASC",
            ProductSort::PriceAsc => "price_cents ASC",
            ProductSort::PriceDesc => "price_cents DESC",
        }
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Validates and inserts a product, returning the assigned id.
    ///
    /// ## Errors
    /// * `DbError::Validation` - name missing or negative price
    /// * `DbError::UniqueViolation` - SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<i64> {
        let mut product = product.clone();
        product.validate()?;

        debug!(name = %product.name, sku = ?product.sku, "Inserting product");

        let result = sqlx::query(
            "INSERT INTO products (name, price_cents, sku, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.sku)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, sku, created_at FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products with an optional substring search over name and
    /// SKU.
    pub async fn list(&self, search: Option<&str>, sort: ProductSort) -> DbResult<Vec<Product>> {
        debug!(search = ?search, "Listing products");

        let products = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let like = format!("%{term}%");
                let sql = format!(
                    "SELECT id, name, price_cents, sku, created_at FROM products \
                     WHERE name LIKE ?1 OR sku LIKE ?1 ORDER BY {}",
                    sort.as_sql()
                );
                sqlx::query_as::<_, Product>(&sql)
                    .bind(like)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT id, name, price_cents, sku, created_at FROM products ORDER BY {}",
                    sort.as_sql()
                );
                sqlx::query_as::<_, Product>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(products)
    }

    /// Updates a product's current price.
    ///
    /// Existing order items keep the price they were created with.
    pub async fn update_price(&self, id: i64, price: shoplite_core::Money) -> DbResult<()> {
        if price.is_negative() {
            return Err(shoplite_core::ValidationError::Negative { field: "price" }.into());
        }

        debug!(id = id, price = %price, "Updating product price");

        let result = sqlx::query("UPDATE products SET price_cents = ?2 WHERE id = ?1")
            .bind(id)
            .bind(price)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
