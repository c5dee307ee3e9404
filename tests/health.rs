mod common;

use axum::http::StatusCode;
use common::{send, test_app};

#[tokio::test]
async fn health_check_returns_ok() -> anyhow::Result<()> {
    let app = test_app().await?;
    let (status, body) = send(&app.router, "GET", "/health", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Health check");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "up");
    Ok(())
}

#[tokio::test]
async fn unknown_path_is_not_found() -> anyhow::Result<()> {
    let app = test_app().await?;
    let (status, _) = send(&app.router, "GET", "/no/such/page", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
