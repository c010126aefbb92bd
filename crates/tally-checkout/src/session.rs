//! # Cart Session
//!
//! Holds the cart being assembled, shared across concurrent callers.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple tasks may access/modify the cart
//! 2. Only one should modify the cart at a time
//! 3. Cloning the session clones the handle, not the cart
//!
//! ## Why Not RwLock?
//! Cart operations are quick, and most of them modify state.
//! A RwLock would add complexity with minimal benefit.

use std::sync::{Arc, Mutex};

use tally_core::Cart;

/// Shared handle to the active cart.
///
/// ## Usage
/// ```rust,ignore
/// let session = CartSession::new();
///
/// session.with_cart_mut(|cart| cart.add_line(line))?;
/// let subtotal = session.with_cart(|cart| cart.subtotal_cents());
/// ```
#[derive(Debug, Clone)]
pub struct CartSession {
    cart: Arc<Mutex<Cart>>,
}

impl CartSession {
    /// Creates a session with an empty cart.
    pub fn new() -> Self {
        CartSession {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

impl Default for CartSession {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
