pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod category_service;
pub mod db_initializer;
pub mod email;
pub mod order_service;
pub mod payment;
pub mod product_service;
