use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, Set,
};
use uuid::Uuid;

use super::Repository;
use crate::entity::{
    products::{Entity as Products, Model as ProductModel},
    shopping_carts::{ActiveModel as CartActive, Column as CartCol, Entity as ShoppingCarts, Model as CartModel},
};

pub struct ShoppingCartRepository<'t> {
    base: Repository<'t, ShoppingCarts>,
}

impl<'t> ShoppingCartRepository<'t> {
    pub fn new(txn: &'t DatabaseTransaction) -> Self {
        Self {
            base: Repository::new(txn),
        }
    }

    pub fn base(&self) -> &Repository<'t, ShoppingCarts> {
        &self.base
    }

    /// The user's cart lines joined with their products.
    pub async fn for_user(&self, user_id: Uuid) -> Result<Vec<(CartModel, ProductModel)>, DbErr> {
        let rows = ShoppingCarts::find()
            .filter(CartCol::UserId.eq(user_id))
            .find_also_related(Products)
            .all(self.base.txn())
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(line, product)| product.map(|p| (line, p)))
            .collect())
    }

    /// One line, only if it belongs to `user_id`.
    pub async fn line_of(&self, user_id: Uuid, cart_id: Uuid) -> Result<Option<CartModel>, DbErr> {
        self.base
            .get(
                Condition::all()
                    .add(CartCol::Id.eq(cart_id))
                    .add(CartCol::UserId.eq(user_id)),
            )
            .await
    }

    pub async fn line_count(&self, user_id: Uuid) -> Result<u64, DbErr> {
        self.base
            .count(Condition::all().add(CartCol::UserId.eq(user_id)))
            .await
    }

    /// The user's line for `product_id`, if the product is already in the cart.
    pub async fn line_for_product(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartModel>, DbErr> {
        self.base
            .get(
                Condition::all()
                    .add(CartCol::UserId.eq(user_id))
                    .add(CartCol::ProductId.eq(product_id)),
            )
            .await
    }

    /// Adds `count` units of a product, merging into an existing line.
    pub async fn add_units(&self, user_id: Uuid, product_id: Uuid, count: i32) -> Result<CartModel, DbErr> {
        match self.line_for_product(user_id, product_id).await? {
            Some(line) => self.increment(line, count).await,
            None => {
                self.base
                    .add(CartActive {
                        id: Set(Uuid::new_v4()),
                        user_id: Set(user_id),
                        product_id: Set(product_id),
                        count: Set(count),
                    })
                    .await
            }
        }
    }

    pub async fn increment(&self, line: CartModel, by: i32) -> Result<CartModel, DbErr> {
        let count = line
            .count
            .checked_add(by)
            .ok_or_else(|| DbErr::Custom(format!("cart line {} count overflow", line.id)))?;
        let mut active = line.into_active_model();
        active.count = Set(count);
        active.update(self.base.txn()).await
    }

    /// Takes one unit off; a line at one unit is removed. Returns the line if it survives.
    pub async fn decrement(&self, line: CartModel) -> Result<Option<CartModel>, DbErr> {
        if line.count <= 1 {
            self.remove_line(line.id).await?;
            return Ok(None);
        }
        self.increment(line, -1).await.map(Some)
    }

    pub async fn remove_line(&self, cart_id: Uuid) -> Result<u64, DbErr> {
        self.base
            .remove_where(Condition::all().add(CartCol::Id.eq(cart_id)))
            .await
    }

    pub async fn clear_for_user(&self, user_id: Uuid) -> Result<u64, DbErr> {
        self.base
            .remove_where(Condition::all().add(CartCol::UserId.eq(user_id)))
            .await
    }
}
