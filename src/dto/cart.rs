use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{OrderHeader, Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub count: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub product: Product,
    pub count: i32,
    /// Unit price after applying the quantity tier.
    pub price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub order_total: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShippingDetails {
    pub name: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartSummary {
    pub cart: CartView,
    pub shipping: ShippingDetails,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceOrderResponse {
    pub order_id: Uuid,
    /// Where the browser goes next: the payment page, or the confirmation
    /// page for delayed-payment accounts.
    pub redirect_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderConfirmation {
    pub order: OrderHeader,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CartLineQuery {
    #[serde(rename = "cartId")]
    pub cart_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartCount {
    /// Distinct lines in the cart, as shown on the cart badge.
    pub count: u64,
}
