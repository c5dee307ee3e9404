//! Data access over SeaORM entities.
//!
//! Repositories never own a connection. They borrow the transaction of a
//! [`UnitOfWork`], so every write they make becomes durable only when the
//! unit of work is committed.

mod category;
mod generic;
mod order_header;
mod product;
mod shopping_cart;
mod unit_of_work;

pub use category::{CategoryRepository, CategoryUpdate};
pub use generic::Repository;
pub use order_header::{OrderDetailsUpdate, OrderHeaderRepository, Shipment};
pub use product::{ProductRepository, ProductUpdate};
pub use shopping_cart::ShoppingCartRepository;
pub use unit_of_work::UnitOfWork;

/// Result of an update addressed by identifier.
///
/// A missing row is not an error: nothing is written and the caller decides
/// whether that matters.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum UpdateOutcome<T> {
    Updated(T),
    NotFound,
}

impl<T> UpdateOutcome<T> {
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            UpdateOutcome::Updated(value) => Some(value),
            UpdateOutcome::NotFound => None,
        }
    }
}
