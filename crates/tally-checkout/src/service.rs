//! # Checkout Service
//!
//! Orchestrates the checkout flow over the cart session and the ports.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Lifecycle                                   │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐        │
//! │  │  Empty   │────►│ In Cart  │────►│  Priced  │────►│  Placed  │        │
//! │  │  Cart    │     │          │     │  Cart    │     │  Order   │        │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘        │
//! │                        │                 │                              │
//! │                   add_to_cart       price_cart(code)                    │
//! │                   update_quantity   place_order(code)                   │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                    │
//! │                                                      (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Coupon Handling
//! A coupon code that doesn't produce a discount never fails the flow.
//! Pricing reports what happened through [`CouponOutcome`] and the cart
//! is charged the full subtotal. Only malformed carts, unavailable
//! products and infrastructure failures are errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clients::{DbCatalogClient, DbCouponStore};
use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::ports::{CatalogClient, CouponStore};
use crate::session::CartSession;
use tally_core::{
    compute_cart_totals, Cart, CartLine, CartTotals, CoreError, CouponRejection, Order, OrderLine,
    OrderStatus,
};
use tally_db::repository::order::{
    generate_order_id, generate_order_line_id, generate_order_number,
};
use tally_db::{Database, OrderRepository};

// =============================================================================
// Response Types
// =============================================================================

/// Cart contents and un-discounted totals.
///
/// Returned by the cart mutation methods. Discounts only appear once the
/// cart is priced with a code, so `discount_cents` is always zero here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            lines: cart.lines.clone(),
            totals: CartTotals {
                line_count: cart.line_count(),
                total_quantity: cart.total_quantity(),
                subtotal_cents: cart.subtotal_cents(),
                discount_cents: 0,
                total_cents: cart.subtotal_cents(),
            },
        }
    }
}

/// What happened to the coupon code during pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CouponOutcome {
    /// No code was supplied.
    None,

    /// The code matched a usable coupon; its discount is in the totals.
    Applied { code: String },

    /// The code produced no discount. The cart still priced at full
    /// subtotal; `reason` says why.
    Rejected {
        code: String,
        reason: CouponRejection,
    },
}

impl CouponOutcome {
    /// Whether a discount was actually applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, CouponOutcome::Applied { .. })
    }

    /// The applied code, if any.
    pub fn applied_code(&self) -> Option<&str> {
        match self {
            CouponOutcome::Applied { code } => Some(code),
            _ => None,
        }
    }
}

/// A cart priced at one instant.
///
/// The lines, the totals and the coupon outcome were all computed against
/// the same `priced_at` clock reading, so they cannot disagree with each
/// other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedCart {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub coupon: CouponOutcome,
    pub priced_at: DateTime<Utc>,
}

/// Confirmation of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: String,
    pub order_number: String,
    pub totals: CartTotals,
    pub coupon: CouponOutcome,
}

// =============================================================================
// Checkout Service
// =============================================================================

/// The checkout orchestrator.
///
/// Generic over its collaborators so tests can substitute fakes:
/// - `C`: where product quotes come from
/// - `K`: where coupons come from
///
/// Order persistence always goes through [`OrderRepository`]; placing an
/// order is the one step that must hit real storage.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("tally.db")).await?;
/// let checkout = CheckoutService::with_database(&db, CheckoutConfig::from_env());
///
/// checkout.add_to_cart("product-uuid", 2).await?;
/// let priced = checkout.price_cart(Some("WELCOME10")).await?;
/// let placed = checkout.place_order(Some("WELCOME10")).await?;
/// ```
pub struct CheckoutService<C, K> {
    catalog: C,
    coupons: K,
    orders: OrderRepository,
    session: CartSession,
    config: CheckoutConfig,
}

impl CheckoutService<DbCatalogClient, DbCouponStore> {
    /// Builds a service with all ports backed by the given database.
    pub fn with_database(db: &Database, config: CheckoutConfig) -> Self {
        CheckoutService::new(
            DbCatalogClient::new(db),
            DbCouponStore::new(db),
            db.orders(),
            config,
        )
    }
}

impl<C, K> CheckoutService<C, K>
where
    C: CatalogClient,
    K: CouponStore,
{
    /// Creates a service with explicit collaborators and a fresh session.
    pub fn new(catalog: C, coupons: K, orders: OrderRepository, config: CheckoutConfig) -> Self {
        CheckoutService {
            catalog,
            coupons,
            orders,
            session: CartSession::new(),
            config,
        }
    }

    /// The cart session handle (clones share the cart).
    pub fn session(&self) -> &CartSession {
        &self.session
    }

    /// The active configuration.
    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// The current cart contents.
    pub fn cart_view(&self) -> CartView {
        self.session.with_cart(|cart| CartView::from(cart))
    }

    /// Adds a product to the cart.
    ///
    /// ## Behavior
    /// - Quotes the product from the catalog; the quoted price is frozen
    ///   into the cart line
    /// - If the product is already in the cart, its quantity increases
    ///   (the original frozen price wins)
    /// - Inactive products and quantities the stock can't cover are
    ///   rejected up front
    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> CheckoutResult<CartView> {
        debug!(product_id = %product_id, quantity = %quantity, "add_to_cart");

        let quote = self
            .catalog
            .product_quote(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if !quote.is_active {
            return Err(CheckoutError::ProductUnavailable { sku: quote.sku });
        }

        // Stock must cover what's already in the cart plus this add
        let already_in_cart = self.session.with_cart(|c| {
            c.lines
                .iter()
                .find(|l| l.product_id == product_id)
                .map(|l| l.quantity)
                .unwrap_or(0)
        });
        let wanted = already_in_cart + quantity;
        if !quote.can_supply(wanted) {
            return Err(CoreError::InsufficientStock {
                sku: quote.sku,
                available: quote.available_stock.unwrap_or(0),
                requested: wanted,
            }
            .into());
        }

        let line = CartLine::new(
            quote.product_id,
            quote.sku,
            quote.name,
            quote.price_cents,
            quantity,
        )?;

        self.session.with_cart_mut(|c| c.add_line(line))?;

        Ok(self.cart_view())
    }

    /// Updates the quantity of a cart line (0 removes it).
    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> CheckoutResult<CartView> {
        debug!(product_id = %product_id, quantity = %quantity, "update_quantity");

        self.session
            .with_cart_mut(|c| c.update_quantity(product_id, quantity))?;

        Ok(self.cart_view())
    }

    /// Removes a cart line.
    pub fn remove_from_cart(&self, product_id: &str) -> CheckoutResult<CartView> {
        debug!(product_id = %product_id, "remove_from_cart");

        self.session.with_cart_mut(|c| c.remove_line(product_id))?;

        Ok(self.cart_view())
    }

    /// Clears the cart.
    pub fn clear_cart(&self) -> CartView {
        debug!("clear_cart");

        self.session.with_cart_mut(|c| {
            c.clear();
            CartView::from(&*c)
        })
    }

    /// Prices the current cart, optionally with a coupon code.
    ///
    /// Never fails because of the coupon: an unknown, inactive, stale or
    /// unrecognized-kind coupon prices the cart at full subtotal and is
    /// reported in [`PricedCart::coupon`].
    pub async fn price_cart(&self, coupon_code: Option<&str>) -> CheckoutResult<PricedCart> {
        debug!(code = coupon_code.unwrap_or("-"), "price_cart");

        let lines = self.session.with_cart(|c| c.lines.clone());
        self.price_lines(lines, coupon_code, Utc::now()).await
    }

    /// Prices a snapshot of lines against one clock reading.
    async fn price_lines(
        &self,
        lines: Vec<CartLine>,
        coupon_code: Option<&str>,
        now: DateTime<Utc>,
    ) -> CheckoutResult<PricedCart> {
        let (coupon, outcome) = match coupon_code {
            None => (None, CouponOutcome::None),
            Some(code) => match self.coupons.find_by_code(code).await? {
                None => (
                    None,
                    CouponOutcome::Rejected {
                        code: code.to_string(),
                        reason: CouponRejection::NotFound,
                    },
                ),
                Some(coupon) => match coupon.check_usable(now) {
                    Ok(()) => (
                        Some(coupon),
                        CouponOutcome::Applied {
                            code: code.to_string(),
                        },
                    ),
                    Err(reason) => (
                        None,
                        CouponOutcome::Rejected {
                            code: code.to_string(),
                            reason,
                        },
                    ),
                },
            },
        };

        let totals = compute_cart_totals(&lines, coupon.as_ref(), now)?;

        Ok(PricedCart {
            lines,
            totals,
            coupon: outcome,
            priced_at: now,
        })
    }

    /// Places an order from the current cart.
    ///
    /// ## What This Does
    /// 1. Snapshots the cart lines (empty cart is an error)
    /// 2. Prices them, applying the coupon if it is usable
    /// 3. Persists the order and its lines in one transaction
    /// 4. Clears the cart session
    ///
    /// The order stores the priced totals verbatim; nothing downstream
    /// recomputes them.
    pub async fn place_order(&self, coupon_code: Option<&str>) -> CheckoutResult<PlacedOrder> {
        let lines = self.session.with_cart(|c| c.lines.clone());
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let priced = self.price_lines(lines, coupon_code, Utc::now()).await?;

        let order_id = generate_order_id();
        let order_number = generate_order_number();
        let now = priced.priced_at;

        let order = Order {
            id: order_id.clone(),
            order_number: order_number.clone(),
            status: OrderStatus::Draft,
            subtotal_cents: priced.totals.subtotal_cents,
            discount_cents: priced.totals.discount_cents,
            total_cents: priced.totals.total_cents,
            coupon_code: priced.coupon.applied_code().map(String::from),
            currency_code: self.config.currency_code.clone(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        let order_lines: Vec<OrderLine> = priced
            .lines
            .iter()
            .map(|line| OrderLine {
                id: generate_order_line_id(),
                order_id: order_id.clone(),
                product_id: line.product_id.clone(),
                sku_snapshot: line.sku.clone(),
                name_snapshot: line.name.clone(),
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                line_subtotal_cents: line.line_subtotal_cents(),
                created_at: now,
            })
            .collect();

        self.orders.insert_order(&order, &order_lines).await?;

        self.session.with_cart_mut(|c| c.clear());

        info!(
            order_id = %order_id,
            order_number = %order_number,
            total = %self.config.format_currency(priced.totals.total_cents),
            lines = order_lines.len(),
            coupon_applied = priced.coupon.is_applied(),
            "Order placed"
        );

        Ok(PlacedOrder {
            order_id,
            order_number,
            totals: priced.totals,
            coupon: priced.coupon,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use tally_core::{Coupon, Product};
    use tally_db::DbConfig;

    use crate::ports::{PortError, ProductQuote};

    /// Catalog fake serving a fixed set of quotes.
    struct StaticCatalog {
        quotes: Vec<ProductQuote>,
    }

    #[async_trait]
    impl CatalogClient for StaticCatalog {
        async fn product_quote(
            &self,
            product_id: &str,
        ) -> Result<Option<ProductQuote>, PortError> {
            Ok(self
                .quotes
                .iter()
                .find(|q| q.product_id == product_id)
                .cloned())
        }
    }

    /// Coupon store fake serving a fixed set of coupons.
    struct StaticCoupons {
        coupons: Vec<Coupon>,
    }

    #[async_trait]
    impl CouponStore for StaticCoupons {
        async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, PortError> {
            Ok(self.coupons.iter().find(|c| c.code == code).cloned())
        }
    }

    fn quote(product_id: &str, price_cents: i64) -> ProductQuote {
        ProductQuote {
            product_id: product_id.to_string(),
            sku: format!("SKU-{}", product_id),
            name: format!("Product {}", product_id),
            price_cents,
            track_inventory: false,
            available_stock: None,
            is_active: true,
        }
    }

    fn tracked_quote(product_id: &str, price_cents: i64, stock: i64) -> ProductQuote {
        ProductQuote {
            track_inventory: true,
            available_stock: Some(stock),
            ..quote(product_id, price_cents)
        }
    }

    async fn service(
        quotes: Vec<ProductQuote>,
        coupons: Vec<Coupon>,
    ) -> CheckoutService<StaticCatalog, StaticCoupons> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CheckoutService::new(
            StaticCatalog { quotes },
            StaticCoupons { coupons },
            db.orders(),
            CheckoutConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_add_to_cart_merges_lines() {
        let checkout = service(vec![quote("p1", 1000)], vec![]).await;

        checkout.add_to_cart("p1", 2).await.unwrap();
        let view = checkout.add_to_cart("p1", 1).await.unwrap();

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 3);
        assert_eq!(view.totals.subtotal_cents, 3000);
        assert_eq!(view.totals.discount_cents, 0);
        assert_eq!(view.totals.total_cents, 3000);
    }

    #[tokio::test]
    async fn test_add_missing_product() {
        let checkout = service(vec![], vec![]).await;

        let err = checkout.add_to_cart("ghost", 1).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_inactive_product() {
        let mut q = quote("p1", 500);
        q.is_active = false;
        let checkout = service(vec![q], vec![]).await;

        let err = checkout.add_to_cart("p1", 1).await.unwrap_err();
        assert!(matches!(err, CheckoutError::ProductUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_add_respects_stock_across_adds() {
        let checkout = service(vec![tracked_quote("p1", 500, 3)], vec![]).await;

        checkout.add_to_cart("p1", 2).await.unwrap();

        // 2 in cart + 2 more = 4 > 3 in stock
        let err = checkout.add_to_cart("p1", 2).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            })
        ));

        // The cart is unchanged
        assert_eq!(checkout.cart_view().totals.total_quantity, 2);
    }

    #[tokio::test]
    async fn test_update_and_remove_lines() {
        let checkout = service(vec![quote("p1", 1000)], vec![]).await;
        checkout.add_to_cart("p1", 2).await.unwrap();

        let view = checkout.update_quantity("p1", 5).unwrap();
        assert_eq!(view.totals.total_quantity, 5);

        // Quantity 0 removes the line
        let view = checkout.update_quantity("p1", 0).unwrap();
        assert!(view.lines.is_empty());

        let err = checkout.remove_from_cart("p1").unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_price_cart_without_code() {
        let checkout = service(vec![quote("p1", 2500)], vec![]).await;
        checkout.add_to_cart("p1", 1).await.unwrap();

        let priced = checkout.price_cart(None).await.unwrap();
        assert_eq!(priced.coupon, CouponOutcome::None);
        assert_eq!(priced.totals.subtotal_cents, 2500);
        assert_eq!(priced.totals.discount_cents, 0);
        assert_eq!(priced.totals.total_cents, 2500);
    }

    #[tokio::test]
    async fn test_price_cart_applies_percentage() {
        let checkout = service(
            vec![quote("p1", 1000), quote("p2", 550)],
            vec![Coupon::percentage("SAVE10", 1000)],
        )
        .await;

        checkout.add_to_cart("p1", 3).await.unwrap();
        checkout.add_to_cart("p2", 2).await.unwrap();

        let priced = checkout.price_cart(Some("SAVE10")).await.unwrap();

        assert_eq!(priced.totals.subtotal_cents, 4100);
        assert_eq!(priced.totals.discount_cents, 410);
        assert_eq!(priced.totals.total_cents, 3690);
        assert_eq!(
            priced.coupon,
            CouponOutcome::Applied {
                code: "SAVE10".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_price_cart_clamps_fixed_discount() {
        let checkout = service(
            vec![quote("p1", 2000)],
            vec![Coupon::fixed("TAKE30", 3000)],
        )
        .await;

        checkout.add_to_cart("p1", 1).await.unwrap();

        let priced = checkout.price_cart(Some("TAKE30")).await.unwrap();
        assert_eq!(priced.totals.discount_cents, 2000);
        assert_eq!(priced.totals.total_cents, 0);
        assert!(priced.coupon.is_applied());
    }

    #[tokio::test]
    async fn test_price_cart_unknown_code() {
        let checkout = service(vec![quote("p1", 1000)], vec![]).await;
        checkout.add_to_cart("p1", 1).await.unwrap();

        let priced = checkout.price_cart(Some("NOPE")).await.unwrap();
        assert_eq!(
            priced.coupon,
            CouponOutcome::Rejected {
                code: "NOPE".to_string(),
                reason: CouponRejection::NotFound,
            }
        );
        assert_eq!(priced.totals.discount_cents, 0);
        assert_eq!(priced.totals.total_cents, 1000);
    }

    #[tokio::test]
    async fn test_price_cart_expired_code() {
        let mut expired = Coupon::percentage("OLD20", 2000);
        expired.valid_to = Some(Utc::now() - Duration::days(1));

        let checkout = service(vec![quote("p1", 1000)], vec![expired]).await;
        checkout.add_to_cart("p1", 1).await.unwrap();

        let priced = checkout.price_cart(Some("OLD20")).await.unwrap();
        assert!(matches!(
            priced.coupon,
            CouponOutcome::Rejected {
                reason: CouponRejection::Expired { .. },
                ..
            }
        ));
        assert_eq!(priced.totals.total_cents, 1000);
    }

    #[tokio::test]
    async fn test_place_order_persists_and_clears_cart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let checkout = CheckoutService::new(
            StaticCatalog {
                quotes: vec![quote("p1", 1000), quote("p2", 550)],
            },
            StaticCoupons {
                coupons: vec![Coupon::percentage("SAVE10", 1000)],
            },
            db.orders(),
            CheckoutConfig::default(),
        );

        checkout.add_to_cart("p1", 3).await.unwrap();
        checkout.add_to_cart("p2", 2).await.unwrap();

        let placed = checkout.place_order(Some("SAVE10")).await.unwrap();
        assert_eq!(placed.totals.subtotal_cents, 4100);
        assert_eq!(placed.totals.discount_cents, 410);
        assert_eq!(placed.totals.total_cents, 3690);
        assert!(placed.coupon.is_applied());

        // Cart is ready for the next shopper
        assert!(checkout.cart_view().lines.is_empty());

        // The stored order matches what was returned
        let order = db
            .orders()
            .get_by_id(&placed.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status, OrderStatus::Draft);
        assert_eq!(order.subtotal_cents, 4100);
        assert_eq!(order.discount_cents, 410);
        assert_eq!(order.total_cents, 3690);
        assert_eq!(order.coupon_code.as_deref(), Some("SAVE10"));
        assert_eq!(order.currency_code, "USD");

        let lines = db.orders().get_lines(&placed.order_id).await.unwrap();
        assert_eq!(lines.len(), 2);
        let p1_line = lines.iter().find(|l| l.product_id == "p1").unwrap();
        assert_eq!(p1_line.sku_snapshot, "SKU-p1");
        assert_eq!(p1_line.unit_price_cents, 1000);
        assert_eq!(p1_line.quantity, 3);
        assert_eq!(p1_line.line_subtotal_cents, 3000);
    }

    #[tokio::test]
    async fn test_place_order_empty_cart() {
        let checkout = service(vec![], vec![]).await;

        let err = checkout.place_order(None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_place_order_with_rejected_coupon_charges_full() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let checkout = CheckoutService::new(
            StaticCatalog {
                quotes: vec![quote("p1", 1500)],
            },
            StaticCoupons { coupons: vec![] },
            db.orders(),
            CheckoutConfig::default(),
        );

        checkout.add_to_cart("p1", 2).await.unwrap();
        let placed = checkout.place_order(Some("GHOST")).await.unwrap();

        assert_eq!(placed.totals.discount_cents, 0);
        assert_eq!(placed.totals.total_cents, 3000);
        assert!(!placed.coupon.is_applied());

        let order = db
            .orders()
            .get_by_id(&placed.order_id)
            .await
            .unwrap()
            .unwrap();
        // A rejected code is not recorded on the order
        assert_eq!(order.coupon_code, None);
        assert_eq!(order.discount_cents, 0);
    }

    #[tokio::test]
    async fn test_place_order_with_database_decrements_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let now = Utc::now();
        let product = Product {
            id: "prod-1".to_string(),
            sku: "MUG-CLASSIC".to_string(),
            name: "Classic Mug".to_string(),
            description: None,
            price_cents: 1200,
            track_inventory: true,
            available_stock: Some(10),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        db.coupons()
            .insert(&Coupon::percentage("WELCOME10", 1000))
            .await
            .unwrap();

        let checkout = CheckoutService::with_database(&db, CheckoutConfig::default());

        checkout.add_to_cart("prod-1", 4).await.unwrap();
        let placed = checkout.place_order(Some("WELCOME10")).await.unwrap();

        assert_eq!(placed.totals.subtotal_cents, 4800);
        assert_eq!(placed.totals.discount_cents, 480);
        assert_eq!(placed.totals.total_cents, 4320);

        let after = db.products().get_by_id("prod-1").await.unwrap().unwrap();
        assert_eq!(after.available_stock, Some(6));
    }
}
