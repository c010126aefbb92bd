//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Catalog listing and lookup (by id, by SKU)
//! - Insert/update with validation up front
//! - Delta-based stock adjustments
//!
//! ## Stock Adjustments
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  Absolute writes lose concurrent sales:                                 │
//! │     UPDATE products SET available_stock = 7 WHERE id = ?                │
//! │                                                                         │
//! │  Delta writes compose:                                                  │
//! │     UPDATE products SET available_stock = available_stock - 3           │
//! │                                                                         │
//! │  Checkout A: sells 3 → stock - 3                                        │
//! │  Checkout B: sells 2 → stock - 2                                        │
//! │  Net effect is -5 regardless of interleaving                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::validation::{validate_price_cents, validate_product_name, validate_sku};
use tally_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // List the sellable catalog
/// let products = repo.list_active(50).await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products sorted by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, sku, name, description, price_cents,
                track_inventory, available_stock, is_active,
                created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed active products");
        Ok(products)
    }

    /// Gets a product by ID.
    ///
    /// Returns `Ok(None)` if no product has this ID; callers decide whether
    /// that is an error.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, sku, name, description, price_cents,
                track_inventory, available_stock, is_active,
                created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, sku, name, description, price_cents,
                track_inventory, available_stock, is_active,
                created_at, updated_at
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// Validates SKU, name and price before executing SQL, so a malformed
    /// product surfaces as [`DbError::InvalidData`] rather than a raw
    /// constraint failure.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id should be generated beforehand)
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        validate_sku(&product.sku)?;
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;

        debug!(id = %product.id, sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, description, price_cents,
                track_inventory, available_stock, is_active,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.track_inventory)
        .bind(product.available_stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a product's editable fields by ID.
    ///
    /// The SKU is immutable once inserted; order lines snapshot it anyway.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                track_inventory = ?5,
                available_stock = ?6,
                is_active = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.track_inventory)
        .bind(product.available_stock)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts stock by a delta.
    ///
    /// Only touches products with `track_inventory = 1`; untracked products
    /// have no stock to adjust.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative for sales, positive for restocking)
    pub async fn update_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Updating stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                available_stock = COALESCE(available_stock, 0) + ?2,
                updated_at = ?3
            WHERE id = ?1 AND track_inventory = 1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product (tracked)", id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// ## Why Soft Delete?
    /// - Historical orders still reference this product
    /// - Can be restored if deleted by mistake
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                is_active = 0,
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
///
/// ## Usage
/// ```rust,ignore
/// let id = generate_product_id();
/// let product = Product { id, ... };
/// ```
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tally_core::error::ValidationError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn test_product(sku: &str, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: format!("Product {}", sku),
            description: None,
            price_cents,
            track_inventory: false,
            available_stock: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("WIDGET-1", 1099);
        repo.insert(&product).await.unwrap();

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.sku, "WIDGET-1");
        assert_eq!(found.price_cents, 1099);
        assert!(found.is_active);

        let by_sku = repo.get_by_sku("WIDGET-1").await.unwrap().unwrap();
        assert_eq!(by_sku.id, product.id);

        assert!(repo.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_data() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = test_product("BAD PRICE", -1);
        product.sku = "OK-SKU".to_string();
        let err = repo.insert(&product).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidData(ValidationError::OutOfRange { .. })
        ));

        let mut product = test_product("has spaces", 100);
        product.sku = "has spaces".to_string();
        let err = repo.insert(&product).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&test_product("DUP-1", 100)).await.unwrap();
        let err = repo.insert(&test_product("DUP-1", 200)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_active_excludes_deleted() {
        let db = test_db().await;
        let repo = db.products();

        let keep = test_product("KEEP-1", 100);
        let drop = test_product("DROP-1", 200);
        repo.insert(&keep).await.unwrap();
        repo.insert(&drop).await.unwrap();

        repo.soft_delete(&drop.id).await.unwrap();

        let active = repo.list_active(50).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].sku, "KEEP-1");
        assert_eq!(repo.count().await.unwrap(), 1);

        // Soft-deleted products stay fetchable by id
        let deleted = repo.get_by_id(&drop.id).await.unwrap().unwrap();
        assert!(!deleted.is_active);
    }

    #[tokio::test]
    async fn test_update_stock_applies_delta() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = test_product("STOCK-1", 100);
        product.track_inventory = true;
        product.available_stock = Some(10);
        repo.insert(&product).await.unwrap();

        repo.update_stock(&product.id, -3).await.unwrap();
        repo.update_stock(&product.id, -2).await.unwrap();

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.available_stock, Some(5));
    }

    #[tokio::test]
    async fn test_update_stock_ignores_untracked() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("SERVICE-1", 100);
        repo.insert(&product).await.unwrap();

        let err = repo.update_stock(&product.id, -1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.available_stock, None);
    }

    #[tokio::test]
    async fn test_update_edits_fields() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = test_product("EDIT-1", 100);
        repo.insert(&product).await.unwrap();

        product.name = "Renamed".to_string();
        product.price_cents = 250;
        repo.update(&product).await.unwrap();

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Renamed");
        assert_eq!(found.price_cents, 250);
    }
}
