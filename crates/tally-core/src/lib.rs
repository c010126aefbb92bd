//! # tally-core: Pure Pricing Logic for Tally
//!
//! This crate is the **heart** of Tally. It contains all cart and coupon
//! pricing logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Callers (API, UI, jobs)                      │   │
//! │  │    add_to_cart ──► apply coupon ──► price cart ──► place order  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-checkout (Service Layer)                  │   │
//! │  │    CheckoutService, CartSession, catalog/coupon ports           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  coupon   │  │   cart    │  │   │
//! │  │   │  Product  │  │   Money   │  │  Coupon   │  │   Cart    │  │   │
//! │  │   │   Order   │  │  percent  │  │ DiscountK │  │ CartLine  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderLine)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`coupon`] - Coupons, discount kinds and validity windows
//! - [`cart`] - Cart lines and the totals computation
//! - [`error`] - Domain error types
//! - [`validation`] - Fail-fast input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every computation is deterministic - the clock
//!    is always an explicit `now` argument, never read from the ambient
//!    environment
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid
//!    float errors; percentages are basis points
//! 4. **Lenient Coupons**: A stale or unrecognized coupon contributes
//!    zero discount - only malformed input (negative price, zero
//!    quantity) is an error
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use tally_core::cart::{compute_cart_totals, CartLine};
//! use tally_core::coupon::Coupon;
//!
//! let lines = vec![
//!     CartLine::new("p1", "TEA", "Green Tea", 1000, 3).unwrap(),
//!     CartLine::new("p2", "MUG", "Stone Mug", 550, 2).unwrap(),
//! ];
//!
//! // 10% off $41.00 = $4.10; total $36.90
//! let coupon = Coupon::percentage("WELCOME10", 1000);
//! let totals = compute_cart_totals(&lines, Some(&coupon), Utc::now()).unwrap();
//! assert_eq!(totals.total_cents, 3690);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod coupon;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use cart::{compute_cart_totals, Cart, CartLine, CartTotals};
pub use coupon::{Coupon, CouponRejection, DiscountKind};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable order sizes.
/// Can be made configurable per-store in future versions.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in a cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
/// Configurable per-store in future versions.
pub const MAX_LINE_QUANTITY: i64 = 999;
