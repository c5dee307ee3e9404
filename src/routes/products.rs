use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::products::{ProductForm, ProductList, UpsertProductRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    routes::params::OptionalIdQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/getall", get(list_products))
        .route("/upsert", get(product_form).post(upsert_product))
        .route("/delete/{id}", delete(delete_product))
        .route("/deleteimage/{image_id}", delete(delete_image))
}

#[utoipa::path(
    get,
    path = "/admin/product/getAll",
    responses(
        (status = 200, description = "Every product", body = ApiResponse<ProductList>),
        (status = 403, description = "Not staff")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/product/upsert",
    params(OptionalIdQuery),
    responses(
        (status = 200, description = "Form data", body = ApiResponse<ProductForm>),
        (status = 404, description = "No such product")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn product_form(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OptionalIdQuery>,
) -> AppResult<Json<ApiResponse<ProductForm>>> {
    let resp = product_service::product_form(&state, &user, query.id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/product/upsert",
    request_body = UpsertProductRequest,
    responses(
        (status = 200, description = "Product saved", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
        (status = 404, description = "No product with that id")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upsert_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpsertProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::upsert_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/product/delete/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such product")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Uuid>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/product/deleteImage/{image_id}",
    params(("image_id" = Uuid, Path, description = "Image id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such image")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(image_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Uuid>>> {
    let resp = product_service::delete_image(&state, &user, image_id).await?;
    Ok(Json(resp))
}
