use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    categories::Model as CategoryModel, order_details::Model as OrderDetailModel,
    order_headers::Model as OrderHeaderModel, product_images::Model as ProductImageModel,
    products::Model as ProductModel, users::Model as UserModel,
};

/// Units up to this count are charged `price`.
pub const PRICE_TIER_50: i32 = 50;
/// Units up to this count (and above [`PRICE_TIER_50`]) are charged `price50`.
pub const PRICE_TIER_100: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Customer,
    Company,
    Admin,
    Employee,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Customer, Role::Company, Role::Admin, Role::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Company => "Company",
            Role::Admin => "Admin",
            Role::Employee => "Employee",
        }
    }

    /// Roles allowed into the admin area.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown role {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    Pending,
    Approved,
    Processing,
    Shipped,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Pending,
    Approved,
    ApprovedForDelayedPayment,
    Rejected,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Approved => "Approved",
            PaymentStatus::ApprovedForDelayedPayment => "ApprovedForDelayedPayment",
            PaymentStatus::Rejected => "Rejected",
            PaymentStatus::Refunded => "Refunded",
            PaymentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            phone_number: model.phone_number,
            street_address: model.street_address,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
}

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            display_order: model.display_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: Uuid,
    pub image_url: String,
    pub position: i32,
}

impl From<ProductImageModel> for ProductImage {
    fn from(model: ProductImageModel) -> Self {
        Self {
            id: model.id,
            image_url: model.image_url,
            position: model.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub description: Option<String>,
    pub list_price: i64,
    pub price: i64,
    pub price50: i64,
    pub price100: i64,
    pub category_id: Uuid,
    pub category: Option<Category>,
    pub images: Vec<ProductImage>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Builds the API view from a stored row, its category and its images.
    pub fn from_parts(
        model: ProductModel,
        category: Option<CategoryModel>,
        mut images: Vec<ProductImageModel>,
    ) -> Self {
        images.sort_by_key(|image| image.position);
        Self {
            id: model.id,
            title: model.title,
            isbn: model.isbn,
            author: model.author,
            description: model.description,
            list_price: model.list_price,
            price: model.price,
            price50: model.price50,
            price100: model.price100,
            category_id: model.category_id,
            category: category.map(Category::from),
            images: images.into_iter().map(ProductImage::from).collect(),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Unit price for a cart line of `count` units.
pub fn price_for_quantity(price: i64, price50: i64, price100: i64, count: i32) -> i64 {
    if count <= PRICE_TIER_50 {
        price
    } else if count <= PRICE_TIER_100 {
        price50
    } else {
        price100
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderHeader {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub shipping_date: Option<DateTime<Utc>>,
    pub order_total: i64,
    pub order_status: String,
    pub payment_status: String,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_due_date: Option<DateTime<Utc>>,
    pub session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub name: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl From<OrderHeaderModel> for OrderHeader {
    fn from(model: OrderHeaderModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            order_date: model.order_date.with_timezone(&Utc),
            shipping_date: model.shipping_date.map(|dt| dt.with_timezone(&Utc)),
            order_total: model.order_total,
            order_status: model.order_status,
            payment_status: model.payment_status,
            tracking_number: model.tracking_number,
            carrier: model.carrier,
            payment_date: model.payment_date.map(|dt| dt.with_timezone(&Utc)),
            payment_due_date: model.payment_due_date.map(|dt| dt.with_timezone(&Utc)),
            session_id: model.session_id,
            payment_intent_id: model.payment_intent_id,
            name: model.name,
            phone_number: model.phone_number,
            street_address: model.street_address,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_header_id: Uuid,
    pub product_id: Uuid,
    pub product_title: Option<String>,
    pub count: i32,
    pub price: i64,
}

impl OrderDetail {
    pub fn from_parts(model: OrderDetailModel, product: Option<ProductModel>) -> Self {
        Self {
            id: model.id,
            order_header_id: model.order_header_id,
            product_id: model.product_id,
            product_title: product.map(|p| p.title),
            count: model.count,
            price: model.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_tiers_switch_at_fifty_and_hundred() {
        assert_eq!(price_for_quantity(900, 850, 800, 1), 900);
        assert_eq!(price_for_quantity(900, 850, 800, 50), 900);
        assert_eq!(price_for_quantity(900, 850, 800, 51), 850);
        assert_eq!(price_for_quantity(900, 850, 800, 100), 850);
        assert_eq!(price_for_quantity(900, 850, 800, 101), 800);
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("Employee".parse::<Role>(), Ok(Role::Employee));
        assert!("root".parse::<Role>().is_err());
        assert!(Role::Employee.is_staff());
        assert!(!Role::Company.is_staff());
    }
}
