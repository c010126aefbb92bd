//! # SQLite Port Adapters
//!
//! Default [`CatalogClient`] and [`CouponStore`] implementations backed by
//! the tally-db repositories.

use async_trait::async_trait;

use crate::ports::{CatalogClient, CouponStore, PortError, ProductQuote};
use tally_core::Coupon;
use tally_db::{CouponRepository, Database, DbError, ProductRepository};

/// Folds a repository failure into a port failure.
///
/// Connection-level problems map to `Unavailable` so callers can retry;
/// everything else is `Failed`.
fn port_error(err: DbError) -> PortError {
    match err {
        DbError::ConnectionFailed(msg) => PortError::Unavailable(msg),
        DbError::PoolExhausted => PortError::Unavailable("connection pool exhausted".to_string()),
        other => PortError::Failed(other.to_string()),
    }
}

/// Catalog port backed by the products table.
#[derive(Debug, Clone)]
pub struct DbCatalogClient {
    products: ProductRepository,
}

impl DbCatalogClient {
    pub fn new(db: &Database) -> Self {
        DbCatalogClient {
            products: db.products(),
        }
    }
}

#[async_trait]
impl CatalogClient for DbCatalogClient {
    async fn product_quote(&self, product_id: &str) -> Result<Option<ProductQuote>, PortError> {
        let product = self
            .products
            .get_by_id(product_id)
            .await
            .map_err(port_error)?;

        Ok(product.map(ProductQuote::from))
    }
}

/// Coupon port backed by the coupons table.
#[derive(Debug, Clone)]
pub struct DbCouponStore {
    coupons: CouponRepository,
}

impl DbCouponStore {
    pub fn new(db: &Database) -> Self {
        DbCouponStore {
            coupons: db.coupons(),
        }
    }
}

#[async_trait]
impl CouponStore for DbCouponStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, PortError> {
        self.coupons.find_by_code(code).await.map_err(port_error)
    }
}

// ============================================================================
// Tests
// ============================================================================
