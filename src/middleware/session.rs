use tower_sessions::{
    Expiry, MemoryStore, Session, SessionManagerLayer,
    cookie::{SameSite, time::Duration},
};

use crate::error::AppResult;

pub const SESSION_COOKIE_NAME: &str = "bulkybook_session";

/// Sessions expire after this many minutes without a request.
pub const SESSION_IDLE_MINUTES: i64 = 100;

/// Session key holding the number of lines in the signed-in user's cart.
pub const SESSION_CART_KEY: &str = "cart.count";

/// In-process session store shared by every request.
pub fn create_session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(SESSION_IDLE_MINUTES)))
        .with_http_only(true)
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_path("/")
}

pub async fn set_cart_count(session: &Session, count: u64) -> AppResult<()> {
    session.insert(SESSION_CART_KEY, count).await?;
    Ok(())
}

pub async fn cart_count(session: &Session) -> AppResult<u64> {
    Ok(session.get::<u64>(SESSION_CART_KEY).await?.unwrap_or(0))
}
