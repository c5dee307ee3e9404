use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{ProductForm, ProductList, UpsertProductRequest},
    entity::{
        Categories, ProductImages, ShoppingCarts,
        categories::Column as CategoryCol,
        order_details::Column as DetailCol,
        product_images::Column as ImageCol,
        products::{ActiveModel as ProductActive, Column as ProductCol},
        shopping_carts::Column as CartCol,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{Category, Product},
    repository::{ProductUpdate, Repository, UnitOfWork, UpdateOutcome},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_products(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ProductList>> {
    ensure_staff(user)?;
    let uow = UnitOfWork::begin(&state.orm).await?;
    let items = uow.products().list(Condition::all()).await?;
    uow.commit().await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::total(total)),
    ))
}

/// The upsert form: the product when `id` is given, plus category choices.
pub async fn product_form(
    state: &AppState,
    user: &AuthUser,
    id: Option<Uuid>,
) -> AppResult<ApiResponse<ProductForm>> {
    ensure_staff(user)?;
    let uow = UnitOfWork::begin(&state.orm).await?;
    let product = match id {
        Some(id) => Some(uow.products().find(id).await?.ok_or(AppError::NotFound)?),
        None => None,
    };
    let categories = Categories::find()
        .order_by_asc(CategoryCol::DisplayOrder)
        .all(uow.categories().base().txn())
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Product form",
        ProductForm {
            product,
            categories,
        },
        Some(Meta::empty()),
    ))
}

/// Creates a product when the payload has no id, otherwise updates it.
pub async fn upsert_product(
    state: &AppState,
    user: &AuthUser,
    payload: UpsertProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_staff(user)?;
    validate_product(&payload)?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    let categories = uow.categories();
    if categories
        .base()
        .get(Condition::all().add(CategoryCol::Id.eq(payload.category_id)))
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest("category_id does not exist".into()));
    }

    let products = uow.products();
    let (product, action, message) = match payload.id {
        Some(id) => {
            let outcome = products
                .update(ProductUpdate {
                    id,
                    title: payload.title,
                    isbn: payload.isbn,
                    price: payload.price,
                    price50: payload.price50,
                    price100: payload.price100,
                    list_price: payload.list_price,
                    description: payload.description,
                    category_id: payload.category_id,
                    author: payload.author,
                    image_urls: payload.image_urls,
                })
                .await?;
            match outcome {
                UpdateOutcome::Updated(product) => {
                    (product, "product_update", "Product updated successfully")
                }
                UpdateOutcome::NotFound => return Err(AppError::NotFound),
            }
        }
        None => {
            let created = products
                .base()
                .add(ProductActive {
                    id: Set(Uuid::new_v4()),
                    title: Set(payload.title),
                    isbn: Set(payload.isbn),
                    author: Set(payload.author),
                    description: Set(payload.description),
                    list_price: Set(payload.list_price),
                    price: Set(payload.price),
                    price50: Set(payload.price50),
                    price100: Set(payload.price100),
                    category_id: Set(payload.category_id),
                    created_at: Set(Utc::now().into()),
                })
                .await?;
            products.add_images(created.id, &payload.image_urls).await?;
            let product = products.find(created.id).await?.ok_or(AppError::NotFound)?;
            (product, "product_create", "Product created successfully")
        }
    };

    audit::record(
        &uow,
        user.user_id,
        action,
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success(message, product, Some(Meta::empty())))
}

/// Deletes a product with its images and cart lines.
///
/// Products that appear on an order are kept.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Uuid>> {
    ensure_staff(user)?;
    let uow = UnitOfWork::begin(&state.orm).await?;
    let products = uow.products();
    if products.find(id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    if uow
        .order_details()
        .count(Condition::all().add(DetailCol::ProductId.eq(id)))
        .await?
        > 0
    {
        return Err(AppError::BadRequest(
            "Product is referenced by orders and cannot be deleted".into(),
        ));
    }

    let txn = products.base().txn();
    Repository::<ProductImages>::new(txn)
        .remove_where(Condition::all().add(ImageCol::ProductId.eq(id)))
        .await?;
    Repository::<ShoppingCarts>::new(txn)
        .remove_where(Condition::all().add(CartCol::ProductId.eq(id)))
        .await?;
    products
        .base()
        .remove_where(Condition::all().add(ProductCol::Id.eq(id)))
        .await?;
    audit::record(
        &uow,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success("Delete Successful", id, Some(Meta::empty())))
}

pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    image_id: Uuid,
) -> AppResult<ApiResponse<Uuid>> {
    ensure_staff(user)?;
    let uow = UnitOfWork::begin(&state.orm).await?;
    let images = Repository::<ProductImages>::new(uow.products().base().txn());
    let removed = images
        .remove_where(Condition::all().add(ImageCol::Id.eq(image_id)))
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound);
    }
    audit::record(
        &uow,
        user.user_id,
        "product_image_delete",
        "product_images",
        serde_json::json!({ "image_id": image_id }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success("Image deleted", image_id, Some(Meta::empty())))
}

fn validate_product(payload: &UpsertProductRequest) -> AppResult<()> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".into()));
    }
    if payload.isbn.trim().is_empty() {
        return Err(AppError::BadRequest("isbn is required".into()));
    }
    if payload.author.trim().is_empty() {
        return Err(AppError::BadRequest("author is required".into()));
    }
    let prices = [
        ("list_price", payload.list_price),
        ("price", payload.price),
        ("price50", payload.price50),
        ("price100", payload.price100),
    ];
    if let Some((field, _)) = prices.iter().find(|(_, cents)| *cents <= 0) {
        return Err(AppError::BadRequest(format!("{field} must be positive")));
    }
    if payload.image_urls.iter().any(|url| url.trim().is_empty()) {
        return Err(AppError::BadRequest("image urls must not be blank".into()));
    }
    Ok(())
}
