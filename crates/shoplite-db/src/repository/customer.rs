//! # Customer Repository
//!
//! Database operations for customers.
//!
//! Inserts validate the entity first: a `ValidationError` aborts the
//! operation before anything touches the database. Deleting a customer
//! cascades to their orders and order items via the schema's foreign
//! keys; nothing here reimplements that.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shoplite_core::{Customer, Validate};

/// Sort orders for the customer listing.
///
/// The original tool accepted raw `ORDER BY` fragments; here the
/// orderings are a closed set rendered to known SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSort {
    /// Newest first (the default listing).
    #[default]
    CreatedDesc,
    /// Oldest first.
    CreatedAsc,
    /// Alphabetical by name.
    Name,
}

impl CustomerSort {
    fn as_sql(self) -> &'static str {
        match self {
            CustomerSort::CreatedDesc => "created_at DESC",
            CustomerSort::CreatedAsc => "created_at ASC",
            CustomerSort::Name => "name ASC",
        }
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Validates and inserts a customer, returning the assigned id.
    ///
    /// ## Errors
    /// * `DbError::Validation` - name missing or malformed email/phone;
    ///   no row is written
    pub async fn insert(&self, customer: &Customer) -> DbResult<i64> {
        let mut customer = customer.clone();
        customer.validate()?;

        debug!(name = %customer.name, "Inserting customer");

        let result = sqlx::query(
            "INSERT INTO customers (name, email, phone, city, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.city)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Gets a customer by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, city, created_at FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists customers with an optional substring search over name,
    /// email, phone and city.
    pub async fn list(&self, search: Option<&str>, sort: CustomerSort) -> DbResult<Vec<Customer>> {
        debug!(search = ?search, "Listing customers");

        let customers = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let like = format!("%{term}%");
                let sql = format!(
                    "SELECT id, name, email, phone, city, created_at FROM customers \
                     WHERE name LIKE ?1 OR email LIKE ?1 OR phone LIKE ?1 OR city LIKE ?1 \
                     ORDER BY {}",
                    sort.as_sql()
                );
                sqlx::query_as::<_, Customer>(&sql)
                    .bind(like)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT id, name, email, phone, city, created_at FROM customers ORDER BY {}",
                    sort.as_sql()
                );
                sqlx::query_as::<_, Customer>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(customers)
    }

    /// Deletes a customer. The store cascades the delete to their
    /// orders and order items.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Counts customers (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
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
    use shoplite_core::ValidationError;

    fn customer(name: &str, email: Option<&str>, city: Option<&str>) -> Customer {
        Customer::new(name, email.map(String::from), None, city.map(String::from))
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.customers();

        let id = repo
            .insert(&customer("Ada Lovelace", Some("ada@example.com"), Some("London")))
            .await
            .unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.name, "Ada Lovelace");
        assert_eq!(stored.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_malformed_email_rejected_and_nothing_persisted() {
        let db = test_db().await;
        let repo = db.customers();

        let err = repo
            .insert(&customer("Bad Email", Some("not-an-email"), None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidFormat { field: "email", .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_and_sort() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert(&customer("Alice", None, Some("Berlin"))).await.unwrap();
        repo.insert(&customer("Bob", None, Some("Munich"))).await.unwrap();
        repo.insert(&customer("Carol", None, Some("Berlin"))).await.unwrap();

        let berliners = repo.list(Some("Berlin"), CustomerSort::Name).await.unwrap();
        let names: Vec<_> = berliners.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);

        let all = repo.list(None, CustomerSort::Name).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_customer() {
        let db = test_db().await;
        let err = db.customers().delete(999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
