//! # Checkout Configuration
//!
//! Store-level settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TALLY_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};

/// Checkout configuration.
///
/// Most fields have sensible defaults for development.
/// Production deployments should configure these properly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
    /// Store name (displayed on order confirmations)
    pub store_name: String,

    /// Currency code (ISO 4217), stamped onto orders
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,
}

impl Default for CheckoutConfig {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Tally Dev Store"
    /// - Currency: USD ($), 2 decimals
    fn default() -> Self {
        CheckoutConfig {
            store_name: "Tally Dev Store".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl CheckoutConfig {
    /// Creates a CheckoutConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TALLY_STORE_NAME`: Override store name
    /// - `TALLY_CURRENCY_CODE`: Override currency code
    /// - `TALLY_CURRENCY_SYMBOL`: Override currency symbol
    pub fn from_env() -> Self {
        let mut config = CheckoutConfig::default();

        if let Ok(store_name) = std::env::var("TALLY_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(code) = std::env::var("TALLY_CURRENCY_CODE") {
            config.currency_code = code;
        }

        if let Ok(symbol) = std::env::var("TALLY_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = CheckoutConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let config = CheckoutConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = CheckoutConfig::default();
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_format_currency_zero_decimals() {
        let config = CheckoutConfig {
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..CheckoutConfig::default()
        };
        assert_eq!(config.format_currency(1234), "¥1234");
    }
}
