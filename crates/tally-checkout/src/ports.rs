//! # Collaborator Ports
//!
//! Traits the checkout service calls out through.
//!
//! ## Why Ports?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ports and Adapters                                   │
//! │                                                                         │
//! │  CheckoutService<C: CatalogClient, K: CouponStore>                      │
//! │       │                    │                                            │
//! │       │ product_quote()    │ find_by_code()                             │
//! │       ▼                    ▼                                            │
//! │  ┌──────────────┐    ┌──────────────┐                                   │
//! │  │ CatalogClient│    │ CouponStore  │   ← traits (this module)          │
//! │  └──────┬───────┘    └──────┬───────┘                                   │
//! │         │                   │                                           │
//! │  DbCatalogClient      DbCouponStore      ← SQLite adapters (clients.rs) │
//! │  StaticCatalog        StaticCoupons      ← test fakes                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service never touches SQL directly; swapping the catalog for a
//! remote service is a new adapter, not a service change.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tally_core::{Coupon, Product};

/// Errors surfaced by port implementations.
///
/// Adapters fold their backend's failure modes into these two cases;
/// the service doesn't care whether the backend was SQLite or HTTP.
#[derive(Debug, Error)]
pub enum PortError {
    /// The backend could not be reached at all.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a failure.
    #[error("Backend request failed: {0}")]
    Failed(String),
}

/// A sellable product as quoted by the catalog.
///
/// This is the only product shape the checkout service sees. The price
/// here is the price that gets frozen into the cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuote {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub track_inventory: bool,
    pub available_stock: Option<i64>,
    pub is_active: bool,
}

impl ProductQuote {
    /// Whether the catalog can supply this quantity.
    ///
    /// Untracked products always can; tracked products need the stock.
    pub fn can_supply(&self, quantity: i64) -> bool {
        !self.track_inventory || self.available_stock.unwrap_or(0) >= quantity
    }
}

impl From<Product> for ProductQuote {
    fn from(product: Product) -> Self {
        ProductQuote {
            product_id: product.id,
            sku: product.sku,
            name: product.name,
            price_cents: product.price_cents,
            track_inventory: product.track_inventory,
            available_stock: product.available_stock,
            is_active: product.is_active,
        }
    }
}

/// Read access to the product catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Quotes a product by ID. `Ok(None)` means no such product.
    async fn product_quote(&self, product_id: &str) -> Result<Option<ProductQuote>, PortError>;
}

/// Read access to the coupon collection.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Looks up a coupon by exact, case-sensitive code.
    /// `Ok(None)` means the code doesn't exist.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, PortError>;
}

// ============================================================================
// Tests
// ============================================================================
