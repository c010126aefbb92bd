//! # Cart Module
//!
//! The in-memory cart and the totals computation over it.
//!
//! ## Totals Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    compute_cart_totals                                  │
//! │                                                                         │
//! │  lines ──► validate each (price ≥ 0, qty > 0)  ── bad input ──► Err    │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  subtotal = Σ unit_price × quantity        (exact integer cents)        │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  discount = coupon.discount_amount(subtotal, now)   (zero if absent,   │
//! │    │                                                 stale, unknown)   │
//! │    ▼                                                                    │
//! │  total = max(subtotal − discount, 0)                                    │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  CartTotals { subtotal, discount, total } — one consistent snapshot     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The three monetary figures always come from the same pass over the same
//! lines; callers persist or display them together, never recombined from
//! separate computations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coupon::Coupon;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_price_cents, validate_quantity};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart.
///
/// ## Design Notes
/// - `product_id`: Reference to the product (for catalog lookup)
/// - The sku, name and unit price are a frozen copy of product data at
///   the time of adding. If the catalog price changes afterwards, this
///   line keeps pricing at the snapshot value until checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID (UUID)
    pub product_id: String,

    /// SKU at time of adding (frozen)
    pub sku: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Price in cents at time of adding (frozen)
    /// This is critical: we lock in the price when added to cart
    pub unit_price_cents: i64,

    /// Quantity in cart
    pub quantity: i64,

    /// When this line was added to cart
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a cart line, failing fast on malformed numbers.
    ///
    /// A negative unit price or a non-positive quantity is a caller bug
    /// and is rejected before it can reach any totals arithmetic.
    pub fn new(
        product_id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price_cents: i64,
        quantity: i64,
    ) -> CoreResult<Self> {
        validate_price_cents(unit_price_cents)?;
        validate_quantity(quantity)?;

        Ok(CartLine {
            product_id: product_id.into(),
            sku: sku.into(),
            name: name.into(),
            unit_price_cents,
            quantity,
            added_at: Utc::now(),
        })
    }

    /// Creates a cart line from a product and quantity.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. If the product price
    /// changes in the catalog, this cart line retains the original price.
    pub fn from_product(product: &Product, quantity: i64) -> CoreResult<Self> {
        CartLine::new(
            product.id.clone(),
            product.sku.clone(),
            product.name.clone(),
            product.price_cents,
            quantity,
        )
    }

    /// Calculates the line subtotal (unit price × quantity).
    ///
    /// Always derived from the frozen inputs, never stored separately.
    pub fn line_subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// The line subtotal as Money.
    pub fn line_subtotal(&self) -> Money {
        Money::from_cents(self.line_subtotal_cents())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart being assembled for checkout.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding same product increases quantity)
/// - Quantity must be > 0 (updating to 0 removes the line)
/// - Maximum lines: 100
/// - Maximum quantity per line: 999
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart
    pub lines: Vec<CartLine>,

    /// When the cart was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a line to the cart, merging with an existing line for the
    /// same product.
    ///
    /// ## Behavior
    /// - If product already in cart: increases quantity, KEEPS the
    ///   original price snapshot (first add wins)
    /// - If product not in cart: appends the line
    pub fn add_line(&mut self, line: CartLine) -> CoreResult<()> {
        // Check if product already in cart
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            let new_qty = existing.quantity + line.quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        // Check max lines
        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(line);
        Ok(())
    }

    /// Adds a product to the cart, snapshotting its price.
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        self.add_line(CartLine::from_product(product, quantity)?)
    }

    /// Updates the quantity of a line in the cart.
    ///
    /// ## Behavior
    /// - If quantity is 0: removes the line
    /// - If product not found: returns error
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_line(product_id);
        }

        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
            Ok(())
        } else {
            Err(CoreError::ProductNotFound(product_id.to_string()))
        }
    }

    /// Removes a line from the cart by product ID.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::ProductNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Returns the number of distinct lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the subtotal (before any discount).
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_subtotal_cents()).sum()
    }

    /// The subtotal as Money.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents())
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Computes the cart's totals with an optional coupon.
    ///
    /// See [`compute_cart_totals`] for the full semantics.
    pub fn totals(&self, coupon: Option<&Coupon>, now: DateTime<Utc>) -> CoreResult<CartTotals> {
        compute_cart_totals(&self.lines, coupon, now)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Cart totals summary.
///
/// The three monetary figures come from one pass over one set of lines;
/// persist and display them as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Computes subtotal, discount and total for a set of cart lines.
///
/// ## Semantics
/// - Every line is validated first; a negative price or non-positive
///   quantity fails the whole computation (caller bug, fail fast)
/// - `subtotal` is the exact integer sum of line subtotals
/// - `discount` is zero when no coupon is given, when the coupon is
///   outside its window or inactive, or when its kind is unrecognized -
///   none of those are errors
/// - `total` is `subtotal − discount`, floored at zero so an
///   over-100-percent coupon can never produce a negative charge
/// - Deterministic: same lines, coupon and `now` always produce the
///   same totals
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use tally_core::cart::{compute_cart_totals, CartLine};
/// use tally_core::coupon::Coupon;
///
/// let lines = vec![
///     CartLine::new("p1", "TEA", "Green Tea", 1000, 3).unwrap(),
///     CartLine::new("p2", "MUG", "Stone Mug", 550, 2).unwrap(),
/// ];
/// let coupon = Coupon::percentage("TEN", 1000);
///
/// let totals = compute_cart_totals(&lines, Some(&coupon), Utc::now()).unwrap();
/// assert_eq!(totals.subtotal_cents, 4100); // $41.00
/// assert_eq!(totals.discount_cents, 410);  // $4.10
/// assert_eq!(totals.total_cents, 3690);    // $36.90
/// ```
pub fn compute_cart_totals(
    lines: &[CartLine],
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> CoreResult<CartTotals> {
    // Fail fast on malformed lines before any arithmetic
    let mut subtotal = Money::zero();
    let mut total_quantity = 0i64;
    for line in lines {
        validate_price_cents(line.unit_price_cents)?;
        validate_quantity(line.quantity)?;
        subtotal += line.line_subtotal();
        total_quantity += line.quantity;
    }

    let discount = match coupon {
        Some(coupon) => coupon.discount_amount(subtotal, now),
        None => Money::zero(),
    };

    // An over-100% percentage coupon discounts more than the subtotal;
    // the charge itself still floors at zero
    let total = (subtotal - discount).max(Money::zero());

    Ok(CartTotals {
        line_count: lines.len(),
        total_quantity,
        subtotal_cents: subtotal.cents(),
        discount_cents: discount.cents(),
        total_cents: total.cents(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            description: None,
            price_cents,
            track_inventory: false,
            available_stock: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_add_product() {
        let mut cart = Cart::new();
        let product = test_product("1", 999); // $9.99

        cart.add_product(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal_cents(), 1998); // $19.98
    }

    #[test]
    fn test_cart_add_same_product_merges_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_product(&product, 2).unwrap();
        cart.add_product(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1); // Still one line
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_price_snapshot_survives_catalog_change() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 1000);

        cart.add_product(&product, 2).unwrap();

        // Catalog price changes after the add; the line keeps its snapshot
        product.price_cents = 9999;
        cart.add_product(&product, 1).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.subtotal_cents(), 3000); // 3 × $10.00, first add wins
    }

    #[test]
    fn test_cart_line_new_rejects_malformed_numbers() {
        assert!(CartLine::new("p1", "SKU", "Thing", -100, 1).is_err());
        assert!(CartLine::new("p1", "SKU", "Thing", 100, 0).is_err());
        assert!(CartLine::new("p1", "SKU", "Thing", 100, -2).is_err());
    }

    #[test]
    fn test_cart_quantity_cap_on_merge() {
        let mut cart = Cart::new();
        let product = test_product("1", 100);

        cart.add_product(&product, 999).unwrap();
        let err = cart.add_product(&product, 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_cart_update_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 500);
        cart.add_product(&product, 2).unwrap();

        cart.update_quantity("1", 5).unwrap();
        assert_eq!(cart.total_quantity(), 5);

        // Zero removes the line
        cart.update_quantity("1", 0).unwrap();
        assert!(cart.is_empty());

        // Unknown product errors
        let err = cart.update_quantity("missing", 1).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));
    }

    #[test]
    fn test_cart_remove_line() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("1", 500), 1).unwrap();

        cart.remove_line("1").unwrap();
        assert!(cart.is_empty());

        assert!(cart.remove_line("1").is_err());
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_product(&test_product("1", 999), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_empty_cart() {
        let totals = compute_cart_totals(&[], None, Utc::now()).unwrap();
        assert_eq!(totals.subtotal_cents, 0);
        assert_eq!(totals.discount_cents, 0);
        assert_eq!(totals.total_cents, 0);

        // A coupon on an empty cart discounts nothing, and is not an error
        let coupon = Coupon::percentage("TEN", 1000);
        let totals = compute_cart_totals(&[], Some(&coupon), Utc::now()).unwrap();
        assert_eq!(totals.discount_cents, 0);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_totals_without_coupon() {
        let lines = vec![
            CartLine::new("p1", "TEA", "Green Tea", 1000, 3).unwrap(),
            CartLine::new("p2", "MUG", "Stone Mug", 550, 2).unwrap(),
        ];
        let totals = compute_cart_totals(&lines, None, Utc::now()).unwrap();

        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.subtotal_cents, 4100);
        assert_eq!(totals.discount_cents, 0);
        assert_eq!(totals.total_cents, 4100);
    }

    #[test]
    fn test_totals_with_percentage_coupon() {
        // 3 × $10.00 + 2 × $5.50 = $41.00; 10% off = $4.10; total $36.90
        let lines = vec![
            CartLine::new("p1", "TEA", "Green Tea", 1000, 3).unwrap(),
            CartLine::new("p2", "MUG", "Stone Mug", 550, 2).unwrap(),
        ];
        let coupon = Coupon::percentage("TEN", 1000);
        let totals = compute_cart_totals(&lines, Some(&coupon), Utc::now()).unwrap();

        assert_eq!(totals.subtotal_cents, 4100);
        assert_eq!(totals.discount_cents, 410);
        assert_eq!(totals.total_cents, 3690);
    }

    #[test]
    fn test_totals_with_fixed_coupon_clamped() {
        // $30.00 off a $20.00 cart: discount clamps to $20.00, total $0.00
        let lines = vec![CartLine::new("p1", "BOOK", "Paperback", 2000, 1).unwrap()];
        let coupon = Coupon::fixed("THIRTY", 3000);
        let totals = compute_cart_totals(&lines, Some(&coupon), Utc::now()).unwrap();

        assert_eq!(totals.subtotal_cents, 2000);
        assert_eq!(totals.discount_cents, 2000);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_totals_with_stale_coupon_charge_full_price() {
        let mut coupon = Coupon::percentage("LASTYEAR", 2000);
        coupon.is_active = false;

        let lines = vec![CartLine::new("p1", "TEA", "Green Tea", 1000, 1).unwrap()];
        let totals = compute_cart_totals(&lines, Some(&coupon), Utc::now()).unwrap();

        assert_eq!(totals.discount_cents, 0);
        assert_eq!(totals.total_cents, 1000);
    }

    #[test]
    fn test_totals_over_one_hundred_percent_floors_total() {
        // 150% coupon: discount exceeds subtotal, total floors at zero
        let lines = vec![CartLine::new("p1", "TEA", "Green Tea", 1000, 1).unwrap()];
        let coupon = Coupon::percentage("MEGA", 15000);
        let totals = compute_cart_totals(&lines, Some(&coupon), Utc::now()).unwrap();

        assert_eq!(totals.subtotal_cents, 1000);
        assert_eq!(totals.discount_cents, 1500);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_totals_rejects_malformed_lines() {
        // Lines built by hand can carry bad numbers; the computation
        // refuses them instead of producing garbage totals
        let bad_price = CartLine {
            product_id: "p1".to_string(),
            sku: "BAD".to_string(),
            name: "Bad Price".to_string(),
            unit_price_cents: -500,
            quantity: 1,
            added_at: Utc::now(),
        };
        assert!(compute_cart_totals(&[bad_price], None, Utc::now()).is_err());

        let bad_qty = CartLine {
            product_id: "p2".to_string(),
            sku: "BAD2".to_string(),
            name: "Bad Quantity".to_string(),
            unit_price_cents: 500,
            quantity: 0,
            added_at: Utc::now(),
        };
        assert!(compute_cart_totals(&[bad_qty], None, Utc::now()).is_err());
    }

    #[test]
    fn test_totals_bounds_hold_across_coupons() {
        let lines = vec![
            CartLine::new("p1", "TEA", "Green Tea", 1000, 3).unwrap(),
            CartLine::new("p2", "MUG", "Stone Mug", 550, 2).unwrap(),
        ];
        let now = Utc::now();

        let coupons = [
            Coupon::percentage("ZERO", 0),
            Coupon::percentage("TEN", 1000),
            Coupon::percentage("ALL", 10000),
            Coupon::fixed("SMALL", 1),
            Coupon::fixed("HUGE", 1_000_000),
        ];

        for coupon in &coupons {
            let totals = compute_cart_totals(&lines, Some(coupon), now).unwrap();
            assert!(totals.discount_cents >= 0, "{}", coupon.code);
            assert!(totals.total_cents >= 0, "{}", coupon.code);
            assert!(totals.total_cents <= totals.subtotal_cents, "{}", coupon.code);
            assert_eq!(
                totals.subtotal_cents - totals.discount_cents.min(totals.subtotal_cents),
                totals.total_cents,
                "{}",
                coupon.code
            );
        }
    }

    #[test]
    fn test_totals_are_deterministic() {
        let lines = vec![
            CartLine::new("p1", "TEA", "Green Tea", 1000, 3).unwrap(),
            CartLine::new("p2", "MUG", "Stone Mug", 550, 2).unwrap(),
        ];
        let coupon = Coupon::percentage("TEN", 1000);
        let now = Utc::now();

        let first = compute_cart_totals(&lines, Some(&coupon), now).unwrap();
        let second = compute_cart_totals(&lines, Some(&coupon), now).unwrap();
        assert_eq!(first, second);
    }
}
