use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, Product};

/// Create (no `id`) or update (with `id`) a product.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertProductRequest {
    pub id: Option<Uuid>,
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub description: Option<String>,
    pub list_price: i64,
    pub price: i64,
    pub price50: i64,
    pub price100: i64,
    pub category_id: Uuid,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// What the upsert form needs: the product (when editing) and the category choices.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductForm {
    pub product: Option<Product>,
    pub categories: Vec<Category>,
}
