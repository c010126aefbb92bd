//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Checkout Service                                                       │
//! │       │                                                                 │
//! │       │  db.coupons().find_by_code("WELCOME10")                         │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CouponRepository                                                       │
//! │  ├── find_by_code(&self, code)                                          │
//! │  ├── insert(&self, coupon)                                              │
//! │  └── deactivate(&self, code)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • Easy to test (mock the repository)                                   │
//! │  • SQL is isolated in one place                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and stock adjustments
//! - [`coupon::CouponRepository`] - Coupon CRUD with lenient kind decoding
//! - [`order::OrderRepository`] - Transactional order placement and transitions
//!
//! Repositories validate creation data with `tally_core::validation` before
//! executing SQL, so malformed rows never reach the database.

pub mod coupon;
pub mod order;
pub mod product;
