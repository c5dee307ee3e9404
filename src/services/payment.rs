//! Payment gateway seam.
//!
//! Checkout goes through Stripe Checkout sessions; refunds go through the
//! Refunds API. The secret key lives in the gateway value, handed to it at
//! construction.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::StripeConfig;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("payment gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    /// Minor units.
    pub unit_amount: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub success_url: String,
    pub cancel_url: String,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Refund {
    pub id: String,
    pub status: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    async fn retrieve_checkout_session(&self, session_id: &str)
    -> Result<CheckoutSession, PaymentError>;

    async fn refund(&self, payment_intent_id: &str) -> Result<Refund, PaymentError>;
}

pub struct StripeGateway {
    client: Client,
    config: StripeConfig,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.api_base, path)
    }

    async fn read<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let message = response
            .json::<StripeErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| status.to_string());
        Err(PaymentError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Stripe's form encoding for a checkout session.
pub fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];
    for (i, item) in request.line_items.iter().enumerate() {
        let key = |field: &str| format!("line_items[{i}][{field}]");
        form.push((key("price_data][currency"), "usd".to_string()));
        form.push((key("price_data][unit_amount"), item.unit_amount.to_string()));
        form.push((key("price_data][product_data][name"), item.name.clone()));
        form.push((key("quantity"), item.quantity.to_string()));
    }
    form
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .post(self.url("checkout/sessions"))
            .bearer_auth(self.config.secret_key.expose_secret())
            .form(&checkout_form(&request))
            .send()
            .await?;
        let session: CheckoutSession = Self::read(response).await?;
        tracing::info!(session_id = %session.id, "checkout session created");
        Ok(session)
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .get(self.url(&format!("checkout/sessions/{session_id}")))
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await?;
        Self::read(response).await
    }

    async fn refund(&self, payment_intent_id: &str) -> Result<Refund, PaymentError> {
        let form = [
            ("payment_intent", payment_intent_id),
            ("reason", "requested_by_customer"),
        ];
        let response = self
            .client
            .post(self.url("refunds"))
            .bearer_auth(self.config.secret_key.expose_secret())
            .form(&form[..])
            .send()
            .await?;
        let refund: Refund = Self::read(response).await?;
        tracing::info!(refund_id = %refund.id, payment_intent_id, "refund issued");
        Ok(refund)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_form_indexes_line_items() {
        let form = checkout_form(&CheckoutRequest {
            success_url: "https://shop.test/ok".into(),
            cancel_url: "https://shop.test/cart".into(),
            line_items: vec![
                LineItem {
                    name: "Dark Skies".into(),
                    unit_amount: 3000,
                    quantity: 2,
                },
                LineItem {
                    name: "Rock in the Ocean".into(),
                    unit_amount: 2000,
                    quantity: 60,
                },
            ],
        });

        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("3000"));
        assert_eq!(get("line_items[1][price_data][product_data][name]"), Some("Rock in the Ocean"));
        assert_eq!(get("line_items[1][quantity]"), Some("60"));
    }
}
