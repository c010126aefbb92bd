//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  order_number   │   │  order_id (FK)  │       │
//! │  │  name           │   │  status         │   │  sku_snapshot   │       │
//! │  │  price_cents    │   │  total_cents    │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │   OrderStatus   │   Coupon and DiscountKind live in                  │
//! │  │  ─────────────  │   [`crate::coupon`]; Cart and CartLine             │
//! │  │  Draft          │   live in [`crate::cart`].                         │
//! │  │  Completed      │                                                    │
//! │  │  Cancelled      │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, coupon code, order_number) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown in carts and on order lines.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Whether to track inventory for this product.
    pub track_inventory: bool,

    /// Current stock level; None when inventory is untracked.
    pub available_stock: Option<i64>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if the product can cover the requested quantity
    /// (in stock, or doesn't track inventory).
    pub fn can_sell(&self, quantity: i64) -> bool {
        if !self.track_inventory {
            return true;
        }

        self.available_stock.unwrap_or(0) >= quantity
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order captured at checkout, awaiting downstream confirmation.
    Draft,
    /// Order confirmed and handed off.
    Completed,
    /// Order was cancelled before confirmation.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Draft
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order captured at checkout.
///
/// Totals are frozen at the moment the cart was priced; nothing here is
/// recomputed after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    /// Coupon code that produced discount_cents, if one applied.
    pub coupon_code: Option<String>,
    pub currency_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the pre-discount subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the discount as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Returns the payable total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A line in an order.
/// Uses snapshot pattern to freeze product data at time of checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// SKU at time of checkout (frozen).
    pub sku_snapshot: String,
    /// Product name at time of checkout (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of checkout (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered.
    pub quantity: i64,
    /// Line subtotal (unit_price × quantity) from the same snapshot moment.
    pub line_subtotal_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn line_subtotal(&self) -> Money {
        Money::from_cents(self.line_subtotal_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(track_inventory: bool, stock: Option<i64>) -> Product {
        Product {
            id: "p-1".to_string(),
            sku: "COKE-330".to_string(),
            name: "Coca-Cola 330ml".to_string(),
            description: None,
            price_cents: 250,
            track_inventory,
            available_stock: stock,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_sell_untracked() {
        let product = test_product(false, None);
        assert!(product.can_sell(1));
        assert!(product.can_sell(1000));
    }

    #[test]
    fn test_can_sell_tracked_stock() {
        let product = test_product(true, Some(3));
        assert!(product.can_sell(3));
        assert!(!product.can_sell(4));

        let empty = test_product(true, None);
        assert!(!empty.can_sell(1));
    }

    #[test]
    fn test_order_status_default() {
        let status = OrderStatus::default();
        assert_eq!(status, OrderStatus::Draft);
    }

    #[test]
    fn test_product_price_as_money() {
        let product = test_product(false, None);
        assert_eq!(product.price(), Money::from_cents(250));
    }
}
