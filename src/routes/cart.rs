use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use tower_sessions::Session;

use crate::{
    dto::cart::{
        CartCount, CartLineQuery, CartSummary, CartView, OrderConfirmation, PlaceOrderResponse,
        ShippingDetails,
    },
    error::AppResult,
    middleware::{auth::AuthUser, session},
    response::{ApiResponse, Meta},
    routes::params::IdQuery,
    services::{
        cart_service::{self, LineChange},
        order_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_index))
        .route("/index", get(cart_index))
        .route("/count", get(cart_count))
        .route("/plus", post(plus))
        .route("/minus", post(minus))
        .route("/remove", post(remove))
        .route("/summary", get(summary).post(place_order))
        .route("/orderconfirmation", get(order_confirmation))
}

#[utoipa::path(
    get,
    path = "/customer/cart/index",
    responses(
        (status = 200, description = "Cart lines with tier prices", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_index(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, &user).await?;
    Ok(Json(resp))
}

/// Cart badge: lines in the signed-in user's cart, read from the session.
#[utoipa::path(
    get,
    path = "/customer/cart/count",
    responses((status = 200, description = "Distinct cart lines", body = ApiResponse<CartCount>)),
    tag = "Cart"
)]
pub async fn cart_count(session: Session) -> AppResult<Json<ApiResponse<CartCount>>> {
    let count = session::cart_count(&session).await?;
    Ok(Json(ApiResponse::success(
        "Cart count",
        CartCount { count },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/customer/cart/plus",
    params(CartLineQuery),
    responses((status = 200, description = "Cart updated", body = ApiResponse<CartView>)),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn plus(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Query(query): Query<CartLineQuery>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp =
        cart_service::change_line(&state, &user, &session, query.cart_id, LineChange::Plus).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/customer/cart/minus",
    params(CartLineQuery),
    responses((status = 200, description = "Cart updated", body = ApiResponse<CartView>)),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn minus(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Query(query): Query<CartLineQuery>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp =
        cart_service::change_line(&state, &user, &session, query.cart_id, LineChange::Minus).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/customer/cart/remove",
    params(CartLineQuery),
    responses((status = 200, description = "Cart updated", body = ApiResponse<CartView>)),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Query(query): Query<CartLineQuery>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp =
        cart_service::change_line(&state, &user, &session, query.cart_id, LineChange::Remove)
            .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/customer/cart/summary",
    responses((status = 200, description = "Cart with shipping details", body = ApiResponse<CartSummary>)),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::summary(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/customer/cart/summary",
    request_body = ShippingDetails,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<PlaceOrderResponse>),
        (status = 400, description = "Empty cart or incomplete shipping details")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ShippingDetails>,
) -> AppResult<Json<ApiResponse<PlaceOrderResponse>>> {
    let resp = order_service::place_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/customer/cart/orderConfirmation",
    params(IdQuery),
    responses(
        (status = 200, description = "Order confirmed", body = ApiResponse<OrderConfirmation>),
        (status = 404, description = "No such order")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn order_confirmation(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Query(query): Query<IdQuery>,
) -> AppResult<Json<ApiResponse<OrderConfirmation>>> {
    let resp = order_service::order_confirmation(&state, &user, &session, query.id).await?;
    Ok(Json(resp))
}
