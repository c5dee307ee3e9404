use sea_orm::{ColumnTrait, Condition};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    dto::cart::{CartLine, CartSummary, CartView, ShippingDetails},
    entity::users::Column as UserCol,
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, session::set_cart_count},
    models::{Product, price_for_quantity},
    repository::UnitOfWork,
    response::{ApiResponse, Meta},
    services::catalog_service::MAX_CART_COUNT,
    state::AppState,
};

/// The user's cart with tier prices applied.
pub async fn load_cart(uow: &UnitOfWork, user_id: Uuid) -> AppResult<CartView> {
    let rows = uow.shopping_carts().for_user(user_id).await?;
    let mut order_total = 0_i64;
    let items = rows
        .into_iter()
        .map(|(line, product)| {
            let price =
                price_for_quantity(product.price, product.price50, product.price100, line.count);
            order_total += price * i64::from(line.count);
            CartLine {
                id: line.id,
                product: Product::from_parts(product, None, Vec::new()),
                count: line.count,
                price,
            }
        })
        .collect();
    Ok(CartView { items, order_total })
}

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let uow = UnitOfWork::begin(&state.orm).await?;
    let cart = load_cart(&uow, user.user_id).await?;
    Ok(ApiResponse::success("Cart", cart, Some(Meta::empty())))
}

#[derive(Debug, Clone, Copy)]
pub enum LineChange {
    Plus,
    Minus,
    Remove,
}

/// Applies `change` to one of the caller's cart lines.
pub async fn change_line(
    state: &AppState,
    user: &AuthUser,
    session: &Session,
    cart_id: Uuid,
    change: LineChange,
) -> AppResult<ApiResponse<CartView>> {
    let uow = UnitOfWork::begin(&state.orm).await?;
    let carts = uow.shopping_carts();
    let line = match carts.line_of(user.user_id, cart_id).await? {
        Some(line) => line,
        None => return Err(AppError::NotFound),
    };

    match change {
        LineChange::Plus => {
            if line.count.checked_add(1).is_none_or(|total| total > MAX_CART_COUNT) {
                return Err(AppError::BadRequest(format!(
                    "a cart line holds at most {MAX_CART_COUNT} units"
                )));
            }
            carts.increment(line, 1).await?;
        }
        LineChange::Minus => {
            carts.decrement(line).await?;
        }
        LineChange::Remove => {
            carts.remove_line(line.id).await?;
        }
    }

    let count = carts.line_count(user.user_id).await?;
    let cart = load_cart(&uow, user.user_id).await?;
    uow.commit().await?;
    set_cart_count(session, count).await?;

    Ok(ApiResponse::success("Cart updated", cart, Some(Meta::empty())))
}

pub async fn summary(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartSummary>> {
    let uow = UnitOfWork::begin(&state.orm).await?;
    let cart = load_cart(&uow, user.user_id).await?;
    let profile = match uow.users().get(user_condition(user.user_id)).await? {
        Some(u) => u,
        None => return Err(AppError::Unauthorized),
    };

    let shipping = ShippingDetails {
        name: profile.name,
        phone_number: profile.phone_number.unwrap_or_default(),
        street_address: profile.street_address.unwrap_or_default(),
        city: profile.city.unwrap_or_default(),
        state: profile.state.unwrap_or_default(),
        postal_code: profile.postal_code.unwrap_or_default(),
    };
    Ok(ApiResponse::success(
        "Summary",
        CartSummary { cart, shipping },
        Some(Meta::empty()),
    ))
}

pub(crate) fn user_condition(user_id: Uuid) -> Condition {
    Condition::all().add(UserCol::Id.eq(user_id))
}
