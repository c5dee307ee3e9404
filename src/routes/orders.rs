use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::orders::{
        OrderActionRequest, OrderIdQuery, OrderRowList, OrderStatusFilter, OrderWithDetails,
        ShipOrderRequest, UpdateOrderDetailRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::OrderHeader,
    response::ApiResponse,
    routes::pages,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::order_index))
        .route("/index", get(pages::order_index))
        .route("/getall", get(list_orders))
        .route("/details", get(order_details))
        .route("/updateorderdetail", post(update_order_detail))
        .route("/startprocessing", post(start_processing))
        .route("/shiporder", post(ship_order))
        .route("/cancelorder", post(cancel_order))
}

#[utoipa::path(
    get,
    path = "/admin/order/getAll",
    params(OrderStatusFilter),
    responses(
        (status = 200, description = "Order grid rows", body = ApiResponse<OrderRowList>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<OrderStatusFilter>,
) -> AppResult<Json<ApiResponse<OrderRowList>>> {
    let resp = admin_service::list_orders(&state, &user, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/order/details",
    params(OrderIdQuery),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderWithDetails>),
        (status = 404, description = "No such order")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn order_details(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderIdQuery>,
) -> AppResult<Json<ApiResponse<OrderWithDetails>>> {
    let resp = admin_service::order_details(&state, &user, query.order_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/order/updateOrderDetail",
    request_body = UpdateOrderDetailRequest,
    responses((status = 200, description = "Order updated", body = ApiResponse<OrderHeader>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateOrderDetailRequest>,
) -> AppResult<Json<ApiResponse<OrderHeader>>> {
    let resp = admin_service::update_order_detail(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/order/startProcessing",
    request_body = OrderActionRequest,
    responses((status = 200, description = "Order in process", body = ApiResponse<OrderHeader>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn start_processing(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<OrderActionRequest>,
) -> AppResult<Json<ApiResponse<OrderHeader>>> {
    let resp = admin_service::start_processing(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/order/shipOrder",
    request_body = ShipOrderRequest,
    responses((status = 200, description = "Order shipped", body = ApiResponse<OrderHeader>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn ship_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ShipOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderHeader>>> {
    let resp = admin_service::ship_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/order/cancelOrder",
    request_body = OrderActionRequest,
    responses((status = 200, description = "Order cancelled", body = ApiResponse<OrderHeader>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<OrderActionRequest>,
) -> AppResult<Json<ApiResponse<OrderHeader>>> {
    let resp = admin_service::cancel_order(&state, &user, payload).await?;
    Ok(Json(resp))
}
