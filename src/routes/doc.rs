use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginForm, LoginRequest, LoginResponse, RegisterRequest},
        cart::{
            AddToCartRequest, CartCount, CartLine, CartSummary, CartView, OrderConfirmation,
            PlaceOrderResponse, ShippingDetails,
        },
        categories::{CategoryList, CategoryRequest},
        orders::{
            OrderActionRequest, OrderRow, OrderRowList, OrderRowUser, OrderWithDetails, ShipOrderRequest,
            UpdateOrderDetailRequest,
        },
        products::{ProductForm, ProductList, UpsertProductRequest},
    },
    models::{Category, OrderDetail, OrderHeader, Product, ProductImage, User},
    response::{ApiResponse, Meta},
    routes::{auth, cart, categories, health, home, orders, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        home::index,
        home::details,
        home::add_to_cart,
        cart::cart_index,
        cart::cart_count,
        cart::plus,
        cart::minus,
        cart::remove,
        cart::summary,
        cart::place_order,
        cart::order_confirmation,
        products::list_products,
        products::product_form,
        products::upsert_product,
        products::delete_product,
        products::delete_image,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        orders::list_orders,
        orders::order_details,
        orders::update_order_detail,
        orders::start_processing,
        orders::ship_order,
        orders::cancel_order,
        auth::register,
        auth::login_form,
        auth::login,
        auth::logout,
        auth::access_denied
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            ProductImage,
            OrderHeader,
            OrderDetail,
            ProductList,
            ProductForm,
            UpsertProductRequest,
            CategoryList,
            CategoryRequest,
            AddToCartRequest,
            CartCount,
            CartLine,
            CartView,
            CartSummary,
            ShippingDetails,
            PlaceOrderResponse,
            OrderConfirmation,
            OrderRow,
            OrderRowUser,
            OrderRowList,
            OrderWithDetails,
            UpdateOrderDetailRequest,
            OrderActionRequest,
            ShipOrderRequest,
            RegisterRequest,
            LoginForm,
            LoginRequest,
            LoginResponse,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithDetails>,
            ApiResponse<OrderHeader>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Home", description = "Customer catalog"),
        (name = "Cart", description = "Customer cart and checkout"),
        (name = "Admin", description = "Product and category management"),
        (name = "Orders", description = "Order management"),
        (name = "Identity", description = "Accounts and sign-in"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
