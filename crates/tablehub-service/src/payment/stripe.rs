//! Stripe payment gateway.
//!
//! Talks to the Stripe REST API over `reqwest`. When no secret key is
//! configured the gateway runs in mock mode and fabricates intents
//! locally, so development and test environments never need a Stripe
//! account.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use tablehub_core::config::PaymentConfig;
use tablehub_core::error::{AppError, ErrorKind};
use tablehub_core::result::AppResult;
use tablehub_core::traits::{PaymentGateway, PaymentIntent};

/// Stripe implementation of [`PaymentGateway`].
#[derive(Debug, Clone)]
pub struct StripeGateway {
    config: PaymentConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeIntentResponse {
    id: String,
    client_secret: Option<String>,
}

impl StripeGateway {
    /// Creates a new gateway from payment configuration.
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Converts a decimal amount to the smallest currency unit.
    fn to_minor_units(amount: Decimal) -> AppResult<i64> {
        (amount * Decimal::from(100))
            .round()
            .to_i64()
            .ok_or_else(|| AppError::payment_failed("Deposit amount out of range"))
    }

    fn mock_intent() -> PaymentIntent {
        let id = format!("pi_mock_{}", Uuid::new_v4().simple());
        let secret = format!("{id}_secret_{}", Uuid::new_v4().simple());
        PaymentIntent {
            payment_intent_id: id,
            client_secret: Some(secret),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
        description: &str,
        metadata: &HashMap<String, String>,
    ) -> AppResult<PaymentIntent> {
        if !self.config.is_live() {
            debug!(amount = %amount, "No payment key configured, issuing mock intent");
            return Ok(Self::mock_intent());
        }

        let minor_units = Self::to_minor_units(amount)?;
        let mut form: Vec<(String, String)> = vec![
            ("amount".into(), minor_units.to_string()),
            ("currency".into(), currency.to_string()),
            ("description".into(), description.to_string()),
        ];
        for (key, value) in metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.config.api_base))
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::PaymentFailed,
                    "Payment gateway unreachable",
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::payment_failed(format!(
                "Payment intent creation failed ({status}): {body}"
            )));
        }

        let intent: StripeIntentResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::PaymentFailed,
                "Malformed payment gateway response",
                e,
            )
        })?;

        info!(intent = %intent.id, "Payment intent created");
        Ok(PaymentIntent {
            payment_intent_id: intent.id,
            client_secret: intent.client_secret,
        })
    }

    async fn refund_payment(
        &self,
        payment_intent_id: &str,
        amount: Option<Decimal>,
    ) -> AppResult<()> {
        if !self.config.is_live() {
            debug!(intent = %payment_intent_id, "No payment key configured, mock refund");
            return Ok(());
        }

        let mut form: Vec<(String, String)> =
            vec![("payment_intent".into(), payment_intent_id.to_string())];
        if let Some(amount) = amount {
            form.push(("amount".into(), Self::to_minor_units(amount)?.to_string()));
        }

        let response = self
            .client
            .post(format!("{}/v1/refunds", self.config.api_base))
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::PaymentFailed,
                    "Payment gateway unreachable",
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::payment_failed(format!(
                "Refund failed ({status}): {body}"
            )));
        }

        info!(intent = %payment_intent_id, "Payment refunded");
        Ok(())
    }
}
