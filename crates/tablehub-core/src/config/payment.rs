//! Payment gateway configuration.

use serde::{Deserialize, Serialize};

/// Stripe payment gateway configuration.
///
/// When `secret_key` is empty the gateway runs in mock mode and returns
/// synthetic payment intents, so development and test environments work
/// without a Stripe account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key. Empty = mock mode.
    #[serde(default)]
    pub secret_key: String,
    /// Base URL of the Stripe API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// ISO currency code used for deposits.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            api_base: default_api_base(),
            currency: default_currency(),
        }
    }
}

impl PaymentConfig {
    /// Whether a real Stripe key is configured.
    pub fn is_live(&self) -> bool {
        !self.secret_key.is_empty()
    }
}

fn default_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}
