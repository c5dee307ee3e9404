use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::categories::{CategoryList, CategoryRequest},
    entity::{
        Categories,
        categories::{ActiveModel as CategoryActive, Column as CategoryCol},
        products::Column as ProductCol,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::Category,
    repository::{CategoryUpdate, UnitOfWork, UpdateOutcome},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MAX_NAME_LEN: usize = 30;
pub const DISPLAY_ORDER_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

pub async fn list_categories(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CategoryList>> {
    ensure_staff(user)?;
    let uow = UnitOfWork::begin(&state.orm).await?;
    let items: Vec<Category> = Categories::find()
        .order_by_asc(CategoryCol::DisplayOrder)
        .all(uow.categories().base().txn())
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    uow.commit().await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::total(total)),
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_staff(user)?;
    validate_category(&payload)?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    let created = uow
        .categories()
        .base()
        .add(CategoryActive {
            id: Set(Uuid::new_v4()),
            name: Set(payload.name.trim().to_string()),
            display_order: Set(payload.display_order),
        })
        .await?;
    audit::record(
        &uow,
        user.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": created.id }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Category created successfully",
        Category::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_staff(user)?;
    validate_category(&payload)?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    let outcome = uow
        .categories()
        .update(CategoryUpdate {
            id,
            name: payload.name.trim().to_string(),
            display_order: payload.display_order,
        })
        .await?;
    let UpdateOutcome::Updated(updated) = outcome else {
        return Err(AppError::NotFound);
    };
    audit::record(
        &uow,
        user.user_id,
        "category_update",
        "categories",
        serde_json::json!({ "category_id": updated.id }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Category updated successfully",
        Category::from(updated),
        Some(Meta::empty()),
    ))
}

/// Categories still holding products are kept.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Uuid>> {
    ensure_staff(user)?;
    let uow = UnitOfWork::begin(&state.orm).await?;
    let in_use = uow
        .products()
        .base()
        .count(Condition::all().add(ProductCol::CategoryId.eq(id)))
        .await?;
    if in_use > 0 {
        return Err(AppError::BadRequest(
            "Category still has products and cannot be deleted".into(),
        ));
    }
    let removed = uow
        .categories()
        .base()
        .remove_where(Condition::all().add(CategoryCol::Id.eq(id)))
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound);
    }
    audit::record(
        &uow,
        user.user_id,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Category deleted successfully",
        id,
        Some(Meta::empty()),
    ))
}

fn validate_category(payload: &CategoryRequest) -> AppResult<()> {
    let name = payload.name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "name must be 1 to {MAX_NAME_LEN} characters"
        )));
    }
    if !DISPLAY_ORDER_RANGE.contains(&payload.display_order) {
        return Err(AppError::BadRequest(
            "Display Order must be between 1-100".into(),
        ));
    }
    if name == payload.display_order.to_string() {
        return Err(AppError::BadRequest(
            "The Display Order cannot exactly match the Name.".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, display_order: i32) -> CategoryRequest {
        CategoryRequest {
            name: name.into(),
            display_order,
        }
    }

    #[test]
    fn category_rules() {
        assert!(validate_category(&request("Action", 1)).is_ok());
        assert!(validate_category(&request("", 1)).is_err());
        assert!(validate_category(&request(&"x".repeat(31), 1)).is_err());
        assert!(validate_category(&request("Action", 0)).is_err());
        assert!(validate_category(&request("Action", 101)).is_err());
        assert!(validate_category(&request("7", 7)).is_err());
    }
}
