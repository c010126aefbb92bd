//! # Coupon Repository
//!
//! Database operations for coupons.
//!
//! ## Decoding Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Lenient Kind Decoding                                │
//! │                                                                         │
//! │  coupons row: discount_type TEXT, discount_value INTEGER                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "percentage" / 1000  →  DiscountKind::Percentage { bps: 1000 }         │
//! │  "fixed"      / 500   →  DiscountKind::Fixed { amount_cents: 500 }      │
//! │  "bogo"       / 1     →  DiscountKind::Unknown  (discounts zero)        │
//! │                                                                         │
//! │  Reads never fail on an unrecognized type tag; writes refuse one.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Case Sensitivity
//! Coupon codes match exactly. SQLite TEXT comparisons use BINARY collation
//! unless told otherwise, so `WHERE code = ?1` already distinguishes
//! "SAVE10" from "save10". Don't add COLLATE NOCASE here.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::validation::{validate_coupon_code, validate_discount_kind};
use tally_core::{Coupon, DiscountKind};

/// Raw coupon row, pre-decoding.
///
/// The discount kind lives in two columns; [`Coupon`] carries it as one
/// enum. This row type is the seam where the lenient decode happens.
#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: String,
    code: String,
    discount_type: String,
    discount_value: i64,
    valid_from: Option<DateTime<Utc>>,
    valid_to: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Coupon {
            id: row.id,
            code: row.code,
            kind: DiscountKind::from_stored(&row.discount_type, row.discount_value),
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, code, discount_type, discount_value,
        valid_from, valid_to, is_active,
        created_at, updated_at
    FROM coupons
"#;

/// Repository for coupon database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CouponRepository::new(pool);
///
/// let coupon = repo.find_by_code("WELCOME10").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Looks up a coupon by its exact code.
    ///
    /// Returns `Ok(None)` when the code doesn't exist; an absent coupon is
    /// not a database failure. Matching is case-sensitive.
    pub async fn find_by_code(&self, code: &str) -> DbResult<Option<Coupon>> {
        let row = sqlx::query_as::<_, CouponRow>(&format!("{} WHERE code = ?1", SELECT_COLUMNS))
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Coupon::from))
    }

    /// Gets a coupon by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Coupon>> {
        let row = sqlx::query_as::<_, CouponRow>(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Coupon::from))
    }

    /// Lists coupons, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Coupon>> {
        let rows = sqlx::query_as::<_, CouponRow>(&format!(
            "{} ORDER BY created_at DESC LIMIT ?1",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Coupon::from).collect())
    }

    /// Inserts a new coupon.
    ///
    /// Validates the code and kind first: writes refuse what reads tolerate,
    /// so an `Unknown` kind can enter this table only through another writer.
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<()> {
        validate_coupon_code(&coupon.code)?;
        validate_discount_kind(&coupon.kind)?;

        debug!(id = %coupon.id, code = %coupon.code, "Inserting coupon");

        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, code, discount_type, discount_value,
                valid_from, valid_to, is_active,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9
            )
            "#,
        )
        .bind(&coupon.id)
        .bind(&coupon.code)
        .bind(coupon.kind.storage_type())
        .bind(coupon.kind.storage_value())
        .bind(coupon.valid_from)
        .bind(coupon.valid_to)
        .bind(coupon.is_active)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deactivates a coupon by code.
    ///
    /// The row stays for order history; [`Coupon::is_valid_at`] returns
    /// false for it from now on.
    pub async fn deactivate(&self, code: &str) -> DbResult<()> {
        debug!(code = %code, "Deactivating coupon");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET
                is_active = 0,
                updated_at = ?2
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", code));
        }

        Ok(())
    }

    /// Counts all coupons (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupons")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new coupon ID.
pub fn generate_coupon_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tally_core::Money;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find_by_code() {
        let db = test_db().await;
        let repo = db.coupons();

        let coupon = Coupon::percentage("WELCOME10", 1000);
        repo.insert(&coupon).await.unwrap();

        let found = repo.find_by_code("WELCOME10").await.unwrap().unwrap();
        assert_eq!(found.code, "WELCOME10");
        assert_eq!(found.kind, DiscountKind::Percentage { bps: 1000 });
        assert!(found.is_active);

        assert!(repo.find_by_code("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_code_matching_is_case_sensitive() {
        let db = test_db().await;
        let repo = db.coupons();

        repo.insert(&Coupon::fixed("SAVE10", 1000)).await.unwrap();

        assert!(repo.find_by_code("SAVE10").await.unwrap().is_some());
        assert!(repo.find_by_code("save10").await.unwrap().is_none());
        assert!(repo.find_by_code("Save10").await.unwrap().is_none());

        // Differently-cased codes are distinct rows, not duplicates
        repo.insert(&Coupon::fixed("save10", 500)).await.unwrap();
        let lower = repo.find_by_code("save10").await.unwrap().unwrap();
        assert_eq!(lower.kind, DiscountKind::Fixed { amount_cents: 500 });
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = test_db().await;
        let repo = db.coupons();

        repo.insert(&Coupon::percentage("ONCE", 500)).await.unwrap();
        let err = repo
            .insert(&Coupon::percentage("ONCE", 1500))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_creation_data() {
        let db = test_db().await;
        let repo = db.coupons();

        let err = repo
            .insert(&Coupon::percentage("HAS SPACE", 500))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidData(_)));

        let err = repo
            .insert(&Coupon::fixed("NEG-FIXED", -100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidData(_)));

        let mut unknown = Coupon::percentage("MYSTERY", 0);
        unknown.kind = DiscountKind::Unknown;
        let err = repo.insert(&unknown).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_type_reads_as_unknown() {
        let db = test_db().await;
        let repo = db.coupons();

        // Simulate a row written by a newer schema version.
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, code, discount_type, discount_value,
                valid_from, valid_to, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, NULL, NULL, 1, ?5, ?5)
            "#,
        )
        .bind(generate_coupon_id())
        .bind("BOGO-LAUNCH")
        .bind("buy_one_get_one")
        .bind(1i64)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let found = repo.find_by_code("BOGO-LAUNCH").await.unwrap().unwrap();
        assert_eq!(found.kind, DiscountKind::Unknown);
        // Unknown kinds price as zero discount
        assert_eq!(
            found.discount_amount(Money::from_cents(10_000), now),
            Money::zero()
        );
    }

    #[tokio::test]
    async fn test_deactivate() {
        let db = test_db().await;
        let repo = db.coupons();

        repo.insert(&Coupon::percentage("RETIRED", 1000))
            .await
            .unwrap();
        repo.deactivate("RETIRED").await.unwrap();

        let found = repo.find_by_code("RETIRED").await.unwrap().unwrap();
        assert!(!found.is_active);

        let err = repo.deactivate("MISSING").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let db = test_db().await;
        let repo = db.coupons();

        repo.insert(&Coupon::percentage("A-10", 1000))
            .await
            .unwrap();
        repo.insert(&Coupon::fixed("B-5", 500)).await.unwrap();

        let all = repo.list(10).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_validity_window_roundtrip() {
        let db = test_db().await;
        let repo = db.coupons();

        let mut coupon = Coupon::percentage("MARCH", 1500);
        coupon.valid_from = Some(Utc::now());
        coupon.valid_to = Some(Utc::now() + chrono::Duration::days(30));
        repo.insert(&coupon).await.unwrap();

        let found = repo.find_by_code("MARCH").await.unwrap().unwrap();
        assert_eq!(
            found.valid_from.map(|d| d.timestamp()),
            coupon.valid_from.map(|d| d.timestamp())
        );
        assert_eq!(
            found.valid_to.map(|d| d.timestamp()),
            coupon.valid_to.map(|d| d.timestamp())
        );
    }
}
