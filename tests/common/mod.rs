#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use bulky_book::{
    app::build_app,
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        categories::ActiveModel as CategoryActive, products::ActiveModel as ProductActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    models::Role,
    services::{
        auth_service::issue_token,
        email::LogEmailSender,
        payment::{CheckoutRequest, CheckoutSession, PaymentError, PaymentGateway, Refund},
    },
    state::AppState,
};

pub const JWT_SECRET: &str = "test-secret";

pub fn test_env() -> HashMap<&'static str, String> {
    HashMap::from([
        ("DATABASE_URL", "sqlite::memory:".to_string()),
        ("JWT_SECRET", JWT_SECRET.to_string()),
        ("STRIPE_SECRET_KEY", "sk_test_123".to_string()),
        ("STRIPE_PUBLISHABLE_KEY", "pk_test_123".to_string()),
        ("APP_ENV", "development".to_string()),
        ("APP_BASE_URL", "http://books.test".to_string()),
        ("ADMIN_EMAIL", "admin@books.test".to_string()),
        ("ADMIN_PASSWORD", "Admin123*".to_string()),
    ])
}

pub fn test_config() -> AppConfig {
    let env = test_env();
    AppConfig::from_lookup(|key| env.get(key).cloned()).expect("test config")
}

/// Stands in for Stripe: every checkout session comes back paid.
#[derive(Default)]
pub struct FakeGateway {
    pub sessions: Mutex<Vec<CheckoutRequest>>,
    pub refunds: Mutex<Vec<String>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(request);
        let id = format!("cs_test_{}", sessions.len());
        Ok(CheckoutSession {
            url: Some(format!("https://checkout.stripe.test/{id}")),
            id,
            payment_status: Some("unpaid".into()),
            payment_intent: None,
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        Ok(CheckoutSession {
            id: session_id.to_string(),
            url: None,
            payment_status: Some("paid".into()),
            payment_intent: Some(format!("pi_{session_id}")),
        })
    }

    async fn refund(&self, payment_intent_id: &str) -> Result<Refund, PaymentError> {
        self.refunds
            .lock()
            .unwrap()
            .push(payment_intent_id.to_string());
        Ok(Refund {
            id: "re_test_1".into(),
            status: Some("succeeded".into()),
        })
    }
}

pub struct TestApp {
    pub state: AppState,
    pub gateway: Arc<FakeGateway>,
    pub router: Router,
}

pub async fn test_state() -> anyhow::Result<(AppState, Arc<FakeGateway>)> {
    let config = test_config();
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let gateway = Arc::new(FakeGateway::default());
    let state = AppState {
        orm,
        config: Arc::new(config),
        payments: gateway.clone(),
        mailer: Arc::new(LogEmailSender),
    };
    Ok((state, gateway))
}

pub async fn test_app() -> anyhow::Result<TestApp> {
    let (state, gateway) = test_state().await?;
    let router = build_app(state.clone());
    Ok(TestApp {
        state,
        gateway,
        router,
    })
}

/// Inserts a user directly; tests authenticate with [`bearer`].
pub async fn create_user(state: &AppState, email: &str, role: Role) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        name: Set(format!("{role} user")),
        phone_number: Set(Some("555-0100".into())),
        street_address: Set(Some("1 Main St".into())),
        city: Set(Some("Springfield".into())),
        state: Set(Some("IL".into())),
        postal_code: Set(Some("62701".into())),
        role: Set(role.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        role,
    })
}

pub async fn create_category(state: &AppState, name: &str, display_order: i32) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        display_order: Set(display_order),
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

/// A product priced 10.00 / 9.00 / 8.00 with list price 12.00.
pub async fn create_product(state: &AppState, title: &str, category_id: Uuid) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        isbn: Set(format!("ISBN-{title}")),
        author: Set("Test Author".to_string()),
        description: Set(Some("A book for testing".into())),
        list_price: Set(1200),
        price: Set(1000),
        price50: Set(900),
        price100: Set(800),
        category_id: Set(category_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

pub fn bearer(user: &AuthUser) -> String {
    let token = issue_token(JWT_SECRET, user).expect("token");
    format!("Bearer {token}")
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    auth: Option<&AuthUser>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = auth {
        builder = builder.header(header::AUTHORIZATION, bearer(user));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Ok((status, json))
}
