//! # Order Repository
//!
//! Database operations for orders and their lines.
//!
//! ## Placement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    insert_order(order, lines)                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO orders ...                                               │
//! │    for each line:                                                       │
//! │      INSERT INTO order_lines ...                                        │
//! │      UPDATE products SET available_stock = available_stock - qty        │
//! │        WHERE id = ? AND track_inventory = 1                             │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls the whole placement back: no order without its       │
//! │  lines, no stock movement without its order.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Transitions
//! Updates are guarded by the current status in the WHERE clause, so a
//! lost race surfaces as `NotFound` instead of silently rewriting an
//! order that already moved on.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{Order, OrderLine};

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = OrderRepository::new(pool);
///
/// repo.insert_order(&order, &lines).await?;
/// repo.complete_order(&order.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order with its lines in one transaction.
    ///
    /// ## Snapshot Pattern
    /// Lines carry their own sku/name/price copies. Nothing here re-reads
    /// the catalog; the order records what the shopper was actually charged.
    ///
    /// ## Stock
    /// Each line decrements `available_stock` for its product, but only
    /// where `track_inventory = 1`. Zero rows touched is fine there:
    /// untracked products have no stock to move.
    pub async fn insert_order(&self, order: &Order, lines: &[OrderLine]) -> DbResult<()> {
        debug!(
            id = %order.id,
            order_number = %order.order_number,
            lines = lines.len(),
            "Inserting order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, status,
                subtotal_cents, discount_cents, total_cents,
                coupon_code, currency_code,
                created_at, updated_at, completed_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6,
                ?7, ?8,
                ?9, ?10, ?11
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(order.status)
        .bind(order.subtotal_cents)
        .bind(order.discount_cents)
        .bind(order.total_cents)
        .bind(&order.coupon_code)
        .bind(&order.currency_code)
        .bind(order.created_at)
        .bind(order.updated_at)
        .bind(order.completed_at)
        .execute(&mut *tx)
        .await?;

        let now = Utc::now();

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, product_id,
                    sku_snapshot, name_snapshot, unit_price_cents,
                    quantity, line_subtotal_cents, created_at
                ) VALUES (
                    ?1, ?2, ?3,
                    ?4, ?5, ?6,
                    ?7, ?8, ?9
                )
                "#,
            )
            .bind(&line.id)
            .bind(&line.order_id)
            .bind(&line.product_id)
            .bind(&line.sku_snapshot)
            .bind(&line.name_snapshot)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.line_subtotal_cents)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                UPDATE products
                SET
                    available_stock = COALESCE(available_stock, 0) - ?2,
                    updated_at = ?3
                WHERE id = ?1 AND track_inventory = 1
                "#,
            )
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT
                id, order_number, status,
                subtotal_cents, discount_cents, total_cents,
                coupon_code, currency_code,
                created_at, updated_at, completed_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all lines for an order, in insertion order.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT
                id, order_id, product_id,
                sku_snapshot, name_snapshot, unit_price_cents,
                quantity, line_subtotal_cents, created_at
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Marks a draft order as completed.
    ///
    /// ## What This Does
    /// 1. Updates status to Completed
    /// 2. Sets completed_at
    ///
    /// Only draft orders complete; anything else reports `NotFound`.
    pub async fn complete_order(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET
                status = 'completed',
                completed_at = ?2,
                updated_at = ?2
            WHERE id = ?1 AND status = 'draft'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order (draft)", id));
        }

        Ok(())
    }

    /// Cancels an order.
    ///
    /// Draft and completed orders can cancel; a cancelled order stays
    /// cancelled.
    pub async fn cancel_order(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET
                status = 'cancelled',
                updated_at = ?2
            WHERE id = ?1 AND status IN ('draft', 'completed')
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Counts all orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new order line ID.
pub fn generate_order_line_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates an order number in format: ORD-YYYYMMDD-NNNN
///
/// ## Format
/// - YYYYMMDD: Date
/// - NNNN: Sequential number (padded to 4 digits)
///
/// ## Example
/// `ORD-20260825-0042`
pub fn generate_order_number() -> String {
    let now = Utc::now();
    let date_part = now.format("%Y%m%d");

    // For now, use timestamp milliseconds as sequence
    // TODO: In production, this should be a proper daily counter
    let seq = (now.timestamp_millis() % 10000) as u32;

    format!("ORD-{}-{:04}", date_part, seq)
}

// ============================================================================
// Tests
// ============================================================================
