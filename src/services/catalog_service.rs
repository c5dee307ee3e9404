use sea_orm::{ColumnTrait, Condition};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    dto::{
        cart::{AddToCartRequest, CartCount},
        products::ProductList,
    },
    entity::products::Column as ProdCol,
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, session::set_cart_count},
    models::Product,
    repository::UnitOfWork,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

/// Largest quantity accepted for one cart line.
pub const MAX_CART_COUNT: i32 = 1000;

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all();
    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(ProdCol::Title.contains(search))
                .add(ProdCol::Author.contains(search)),
        );
    }
    if let Some(category_id) = query.category_id {
        condition = condition.add(ProdCol::CategoryId.eq(category_id));
    }

    let uow = UnitOfWork::begin(&state.orm).await?;
    let items = uow.products().list(condition).await?;
    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let uow = UnitOfWork::begin(&state.orm).await?;
    let product = match uow.products().find(id).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    session: &Session,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartCount>> {
    if !(1..=MAX_CART_COUNT).contains(&payload.count) {
        return Err(AppError::BadRequest(format!(
            "count must be between 1 and {MAX_CART_COUNT}"
        )));
    }

    let uow = UnitOfWork::begin(&state.orm).await?;
    let exists = uow
        .products()
        .base()
        .count(Condition::all().add(ProdCol::Id.eq(payload.product_id)))
        .await?;
    if exists == 0 {
        return Err(AppError::BadRequest("product not found".to_string()));
    }

    let carts = uow.shopping_carts();
    let merged = match carts.line_for_product(user.user_id, payload.product_id).await? {
        Some(existing) => existing.count.checked_add(payload.count),
        None => Some(payload.count),
    };
    if merged.is_none_or(|total| total > MAX_CART_COUNT) {
        return Err(AppError::BadRequest(format!(
            "a cart line holds at most {MAX_CART_COUNT} units"
        )));
    }
    let line = carts
        .add_units(user.user_id, payload.product_id, payload.count)
        .await?;
    let count = carts.line_count(user.user_id).await?;
    uow.commit().await?;

    set_cart_count(session, count).await?;
    tracing::debug!(user_id = %user.user_id, cart_id = %line.id, count = line.count, "cart updated");

    Ok(ApiResponse::success(
        "Cart updated successfully",
        CartCount { count },
        Some(Meta::empty()),
    ))
}
