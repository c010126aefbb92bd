//! # tally-checkout: Checkout Orchestration for Tally
//!
//! Drives a shopper's session from an empty cart to a placed order,
//! composing the pure pricing logic in `tally-core` with the storage
//! layer in `tally-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   ★ tally-checkout (THIS CRATE) ★                       │
//! │                                                                         │
//! │   ┌──────────────────────────────────────────────────────────────┐     │
//! │   │                     CheckoutService                          │     │
//! │   │   add_to_cart ── price_cart ── place_order                   │     │
//! │   └───────┬──────────────┬───────────────┬──────────────────────┘     │
//! │           │              │               │                             │
//! │   ┌───────▼──────┐ ┌─────▼───────┐ ┌─────▼──────────┐                 │
//! │   │ CartSession  │ │   Ports     │ │ OrderRepository │                 │
//! │   │ (in-memory,  │ │ Catalog /   │ │ (tally-db,      │                 │
//! │   │  shared)     │ │ CouponStore │ │  transactional) │                 │
//! │   └──────────────┘ └─────┬───────┘ └────────────────┘                 │
//! │                          │                                             │
//! │               DbCatalogClient / DbCouponStore                          │
//! │               (SQLite adapters; tests use fakes)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pricing is pure**: every discount figure comes from
//!    `tally_core::compute_cart_totals` with one explicit clock reading;
//!    this crate only moves data to and from it
//! 2. **Coupons never fail checkout**: a code that produces no discount
//!    surfaces as a [`CouponOutcome::Rejected`], not an error
//! 3. **Ports at the seams**: the catalog and coupon lookups are traits
//!    so tests run against in-memory fakes
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use tally_checkout::{CheckoutConfig, CheckoutService};
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("tally.db")).await?;
//! let checkout = CheckoutService::with_database(&db, CheckoutConfig::from_env());
//!
//! checkout.add_to_cart("product-uuid", 2).await?;
//! let placed = checkout.place_order(Some("WELCOME10")).await?;
//! println!("{} -> {}", placed.order_number, placed.totals.total_cents);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clients;
pub mod config;
pub mod error;
pub mod ports;
pub mod service;
pub mod session;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clients::{DbCatalogClient, DbCouponStore};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use ports::{CatalogClient, CouponStore, PortError, ProductQuote};
pub use service::{CartView, CheckoutService, CouponOutcome, PlacedOrder, PricedCart};
pub use session::CartSession;
