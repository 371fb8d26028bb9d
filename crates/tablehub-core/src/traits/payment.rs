//! Payment gateway trait for deposit collection and refunds.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::result::AppResult;

/// A created payment intent, returned by the gateway.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PaymentIntent {
    /// Gateway-side identifier of the intent.
    pub payment_intent_id: String,
    /// Client secret handed to the caller to complete the payment.
    pub client_secret: Option<String>,
}

/// Trait for payment providers.
///
/// The admission controller treats both operations as possibly-failing
/// remote calls with no side effects assumed on failure. Failures map to
/// [`ErrorKind::PaymentFailed`](crate::error::ErrorKind::PaymentFailed).
#[async_trait]
pub trait PaymentGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Create a payment intent for `amount` in `currency`.
    ///
    /// `metadata` is attached to the intent for later reconciliation
    /// (e.g. the booking reference).
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
        description: &str,
        metadata: &HashMap<String, String>,
    ) -> AppResult<PaymentIntent>;

    /// Refund a previously created payment intent.
    ///
    /// `amount = None` refunds the full amount.
    async fn refund_payment(
        &self,
        payment_intent_id: &str,
        amount: Option<Decimal>,
    ) -> AppResult<()>;
}
