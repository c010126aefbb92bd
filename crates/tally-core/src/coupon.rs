//! # Coupon Module
//!
//! Coupon values and the discount arithmetic they drive.
//!
//! ## Discount Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Coupon Application                                │
//! │                                                                         │
//! │  Cart subtotal ($41.00)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Coupon.is_valid_at(now)? ──── no ───► discount = $0.00                 │
//! │       │ yes                            (stale coupon is NOT an error)   │
//! │       ▼                                                                 │
//! │  DiscountKind                                                           │
//! │   ├── Percentage { bps } ──► subtotal × bps, rounded half up ONCE       │
//! │   ├── Fixed { cents }    ──► min(cents, subtotal)                       │
//! │   └── Unknown            ──► $0.00 (unrecognized type from storage)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total = max(subtotal − discount, 0)   (applied by the cart math)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Leniency Rules
//! - An expired, not-yet-started, or inactive coupon contributes **zero
//!   discount**. It never fails the computation; promotions losing their
//!   window mid-session must not break checkout.
//! - A discount type this version doesn't recognize decodes as
//!   [`DiscountKind::Unknown`] and also contributes zero.
//! - Percentage rates above 100% are applied literally, not clamped.
//!   The cart math floors the resulting total at zero.
//!
//! Callers that need to tell a shopper WHY their code did nothing use
//! [`Coupon::check_usable`], which reports a [`CouponRejection`] without
//! ever turning it into an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Discount Kind
// =============================================================================

/// How a coupon discounts a subtotal.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2000 bps = 20%. Integer bps keep percentage math exact until the one
/// final rounding step in [`Money::percent_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the subtotal, in basis points (2000 = 20%).
    Percentage { bps: u32 },
    /// Fixed amount in cents, clamped to the subtotal.
    Fixed { amount_cents: i64 },
    /// A discount type stored by a newer (or buggy) writer.
    /// Applies as zero rather than failing the cart.
    Unknown,
}

impl DiscountKind {
    /// Decodes a kind from its stored representation.
    ///
    /// Anything other than the two known type tags maps to `Unknown`;
    /// rows written by future versions must keep pricing today's carts.
    pub fn from_stored(discount_type: &str, discount_value: i64) -> Self {
        match discount_type {
            "percentage" => DiscountKind::Percentage {
                bps: discount_value.max(0) as u32,
            },
            "fixed" => DiscountKind::Fixed {
                amount_cents: discount_value,
            },
            _ => DiscountKind::Unknown,
        }
    }

    /// The type tag used in storage.
    pub const fn storage_type(&self) -> &'static str {
        match self {
            DiscountKind::Percentage { .. } => "percentage",
            DiscountKind::Fixed { .. } => "fixed",
            DiscountKind::Unknown => "unknown",
        }
    }

    /// The numeric value used in storage (bps or cents).
    pub const fn storage_value(&self) -> i64 {
        match self {
            DiscountKind::Percentage { bps } => *bps as i64,
            DiscountKind::Fixed { amount_cents } => *amount_cents,
            DiscountKind::Unknown => 0,
        }
    }

    /// Computes the discount this kind takes off a subtotal.
    ///
    /// Percentage rates apply literally, even above 100%; fixed amounts
    /// are clamped so they never exceed the subtotal.
    pub fn discount_on(&self, subtotal: Money) -> Money {
        match self {
            DiscountKind::Percentage { bps } => subtotal.percent_of(*bps),
            DiscountKind::Fixed { amount_cents } => {
                Money::from_cents(*amount_cents).min(subtotal)
            }
            DiscountKind::Unknown => Money::zero(),
        }
    }
}

// =============================================================================
// Coupon Rejection
// =============================================================================

/// Why a coupon code produced no discount.
///
/// This is a reporting value, not an error: every rejection still prices
/// the cart at full subtotal. Surfaces (UI, API) use it to explain the
/// zero to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CouponRejection {
    /// No coupon with this code exists. Produced by lookup layers;
    /// the engine itself never sees an absent coupon.
    NotFound,
    /// Coupon was deactivated.
    Inactive,
    /// Coupon's validity window hasn't opened yet.
    NotYetStarted { starts_at: DateTime<Utc> },
    /// Coupon's validity window has closed.
    Expired { ended_at: DateTime<Utc> },
    /// Stored discount type is not recognized by this version.
    UnrecognizedKind,
}

impl CouponRejection {
    /// A message suitable for showing to the shopper.
    pub fn user_message(&self) -> String {
        match self {
            CouponRejection::NotFound => "This code is not recognized.".to_string(),
            CouponRejection::Inactive => "This code is no longer active.".to_string(),
            CouponRejection::NotYetStarted { starts_at } => {
                format!(
                    "This code is not active yet. It starts on {}.",
                    starts_at.format("%Y-%m-%d")
                )
            }
            CouponRejection::Expired { ended_at } => {
                format!("This code expired on {}.", ended_at.format("%Y-%m-%d"))
            }
            CouponRejection::UnrecognizedKind => {
                "This code cannot be applied to your order.".to_string()
            }
        }
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A discount coupon.
///
/// Codes are matched **case-sensitively**: `SAVE10` and `save10` are
/// different coupons. The validity window is optional on both ends and
/// inclusive on both ends; a coupon with neither bound is valid whenever
/// it is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Redemption code, matched exactly (case-sensitive).
    pub code: String,

    /// How this coupon discounts a subtotal.
    pub kind: DiscountKind,

    /// Inclusive start of the validity window; None = no lower bound.
    pub valid_from: Option<DateTime<Utc>>,

    /// Inclusive end of the validity window; None = no upper bound.
    pub valid_to: Option<DateTime<Utc>>,

    /// Whether the coupon is active (kill switch independent of window).
    pub is_active: bool,

    /// When the coupon was created.
    pub created_at: DateTime<Utc>,

    /// When the coupon was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Creates an active coupon with an unbounded validity window.
    ///
    /// Window bounds and the active flag are plain public fields;
    /// adjust them directly after construction.
    pub fn new(code: impl Into<String>, kind: DiscountKind) -> Self {
        let now = Utc::now();
        Coupon {
            id: Uuid::new_v4().to_string(),
            code: code.into(),
            kind,
            valid_from: None,
            valid_to: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a percentage coupon (bps: 1000 = 10%).
    pub fn percentage(code: impl Into<String>, bps: u32) -> Self {
        Coupon::new(code, DiscountKind::Percentage { bps })
    }

    /// Creates a fixed-amount coupon.
    pub fn fixed(code: impl Into<String>, amount_cents: i64) -> Self {
        Coupon::new(code, DiscountKind::Fixed { amount_cents })
    }

    /// Whether the coupon can discount anything at the given instant.
    ///
    /// True when the coupon is active and `now` falls inside the validity
    /// window. Both window bounds are inclusive: a coupon is still valid
    /// at the exact `valid_to` instant.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use tally_core::coupon::Coupon;
    ///
    /// let coupon = Coupon::percentage("WELCOME10", 1000);
    /// assert!(coupon.is_valid_at(Utc::now()));
    /// ```
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }

        if let Some(from) = self.valid_from {
            if now < from {
                return false;
            }
        }

        if let Some(to) = self.valid_to {
            if now > to {
                return false;
            }
        }

        true
    }

    /// Reports why this coupon would produce no discount, if it would.
    ///
    /// `Ok(())` means the coupon applies. The `Err` side carries a
    /// [`CouponRejection`] for display; it is never a failure of the
    /// pricing computation itself.
    pub fn check_usable(&self, now: DateTime<Utc>) -> Result<(), CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }

        if let Some(from) = self.valid_from {
            if now < from {
                return Err(CouponRejection::NotYetStarted { starts_at: from });
            }
        }

        if let Some(to) = self.valid_to {
            if now > to {
                return Err(CouponRejection::Expired { ended_at: to });
            }
        }

        if matches!(self.kind, DiscountKind::Unknown) {
            return Err(CouponRejection::UnrecognizedKind);
        }

        Ok(())
    }

    /// The discount this coupon takes off `subtotal` at instant `now`.
    ///
    /// Returns zero (never an error) when the coupon is inactive, outside
    /// its window, or of an unrecognized kind. The result is produced by
    /// exactly one rounding step; see [`Money::percent_of`].
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use tally_core::coupon::Coupon;
    /// use tally_core::money::Money;
    ///
    /// let coupon = Coupon::percentage("SAVE20", 2000);
    /// let discount = coupon.discount_amount(Money::from_cents(10000), Utc::now());
    /// assert_eq!(discount.cents(), 2000); // $20.00 off $100.00
    /// ```
    pub fn discount_amount(&self, subtotal: Money, now: DateTime<Utc>) -> Money {
        if !self.is_valid_at(now) {
            return Money::zero();
        }

        self.kind.discount_on(subtotal)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
