//! # Checkout Error Type
//!
//! Unified error type for the checkout service.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally Checkout                         │
//! │                                                                         │
//! │  CoreError (tally-core) ──┐                                             │
//! │  DbError   (tally-db)   ──┼──► CheckoutError ──► caller / API surface   │
//! │  PortError (ports.rs)   ──┘                                             │
//! │                                                                         │
//! │  Plus checkout-specific failures: empty cart, unavailable product.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A coupon that doesn't apply is NOT an error at any layer: pricing
//! reports it through [`crate::service::CouponOutcome`] and charges the
//! full subtotal.

use thiserror::Error;

use crate::ports::PortError;
use tally_core::CoreError;
use tally_db::DbError;

/// Errors produced by checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Placing an order requires at least one cart line.
    #[error("Cart is empty")]
    EmptyCart,

    /// The product exists but cannot be sold right now (deactivated).
    #[error("Product {sku} is not available for sale")]
    ProductUnavailable { sku: String },

    /// Domain rule violation from the pricing core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Order persistence failed.
    #[error(transparent)]
    Storage(#[from] DbError),

    /// A collaborator port (catalog, coupon store) failed.
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
