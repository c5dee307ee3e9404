use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::{
    dto::auth::{LoginForm, LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    services::auth_service::{login_user, logout_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
        .route("/accessdenied", get(access_denied))
}

#[utoipa::path(
    post,
    path = "/identity/account/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<User>),
        (status = 400, description = "Invalid or duplicate account")
    ),
    tag = "Identity"
)]
pub async fn register(
    State(state): State<AppState>,
    actor: Option<AuthUser>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = register_user(&state, actor.as_ref(), &session, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/identity/account/login",
    responses((status = 200, description = "Sign-in form", body = ApiResponse<LoginForm>)),
    tag = "Identity"
)]
pub async fn login_form() -> Json<ApiResponse<LoginForm>> {
    Json(ApiResponse::success(
        "Login",
        LoginForm {
            action: "/identity/account/login".to_string(),
            method: "POST".to_string(),
            fields: vec!["email".to_string(), "password".to_string()],
        },
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    post,
    path = "/identity/account/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Identity"
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, &session, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/identity/account/logout",
    responses((status = 200, description = "Session ended")),
    tag = "Identity"
)]
pub async fn logout(session: Session) -> AppResult<Json<ApiResponse<()>>> {
    let resp = logout_user(&session).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/identity/account/accessDenied",
    responses((status = 403, description = "Role does not allow the requested page")),
    tag = "Identity"
)]
pub async fn access_denied() -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Access Denied",
        serde_json::json!({ "error": "You do not have access to this resource" }),
        Some(Meta::empty()),
    );
    (StatusCode::FORBIDDEN, Json(body))
}
