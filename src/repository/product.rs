use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{Repository, UpdateOutcome};
use crate::entity::{
    categories::{self, Entity as Categories},
    product_images::{self, Entity as ProductImages},
    products::{self, Entity as Products},
};
use crate::models::Product;

/// The fields an admin may change on an existing product.
///
/// Anything not named here (the identifier, the creation timestamp) is kept
/// as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
    pub price: i64,
    pub price50: i64,
    pub price100: i64,
    pub list_price: i64,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub author: String,
    /// Replaces the stored image collection, in this order.
    pub image_urls: Vec<String>,
}

pub struct ProductRepository<'t> {
    base: Repository<'t, Products>,
}

impl<'t> ProductRepository<'t> {
    pub fn new(txn: &'t DatabaseTransaction) -> Self {
        Self {
            base: Repository::new(txn),
        }
    }

    pub fn base(&self) -> &Repository<'t, Products> {
        &self.base
    }

    /// Loads one product together with its category and images.
    pub async fn find(&self, id: Uuid) -> Result<Option<Product>, DbErr> {
        let txn = self.base.txn();
        let found = Products::find_by_id(id)
            .find_also_related(Categories)
            .one(txn)
            .await?;
        let Some((product, category)) = found else {
            return Ok(None);
        };
        let images = self.images_of(product.id).await?;
        Ok(Some(Product::from_parts(product, category, images)))
    }

    /// All products matching `filter`, newest first, with categories and images.
    pub async fn list(&self, filter: Condition) -> Result<Vec<Product>, DbErr> {
        let txn = self.base.txn();
        let rows: Vec<(products::Model, Option<categories::Model>)> = Products::find()
            .filter(filter)
            .find_also_related(Categories)
            .order_by_desc(products::Column::CreatedAt)
            .all(txn)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|(p, _)| p.id).collect();
        let mut images_by_product: HashMap<Uuid, Vec<product_images::Model>> = HashMap::new();
        if !ids.is_empty() {
            let images = ProductImages::find()
                .filter(product_images::Column::ProductId.is_in(ids))
                .all(txn)
                .await?;
            for image in images {
                images_by_product
                    .entry(image.product_id)
                    .or_default()
                    .push(image);
            }
        }

        Ok(rows
            .into_iter()
            .map(|(product, category)| {
                let images = images_by_product.remove(&product.id).unwrap_or_default();
                Product::from_parts(product, category, images)
            })
            .collect())
    }

    pub async fn images_of(&self, product_id: Uuid) -> Result<Vec<product_images::Model>, DbErr> {
        ProductImages::find()
            .filter(product_images::Column::ProductId.eq(product_id))
            .order_by_asc(product_images::Column::Position)
            .all(self.base.txn())
            .await
    }

    /// Appends `urls` after the images already attached to `product_id`.
    pub async fn add_images(
        &self,
        product_id: Uuid,
        urls: &[String],
    ) -> Result<Vec<product_images::Model>, DbErr> {
        let start = self.images_of(product_id).await?.len() as i32;
        let images = Repository::<ProductImages>::new(self.base.txn());
        let mut added = Vec::with_capacity(urls.len());
        for (offset, url) in urls.iter().enumerate() {
            let image = images
                .add(product_images::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    product_id: Set(product_id),
                    image_url: Set(url.clone()),
                    position: Set(start + offset as i32),
                })
                .await?;
            added.push(image);
        }
        Ok(added)
    }

    /// Overwrites the allowlisted fields of the stored product with `update`.
    ///
    /// The image collection is replaced wholesale. When no product has
    /// `update.id` nothing is written and [`UpdateOutcome::NotFound`] comes
    /// back instead of an error.
    pub async fn update(&self, update: ProductUpdate) -> Result<UpdateOutcome<Product>, DbErr> {
        let txn = self.base.txn();
        let Some(stored) = Products::find_by_id(update.id).one(txn).await? else {
            tracing::debug!(product_id = %update.id, "product update skipped, no such product");
            return Ok(UpdateOutcome::NotFound);
        };

        let ProductUpdate {
            id,
            title,
            isbn,
            price,
            price50,
            price100,
            list_price,
            description,
            category_id,
            author,
            image_urls,
        } = update;

        let mut active = stored.into_active_model();
        active.title = Set(title);
        active.isbn = Set(isbn);
        active.price = Set(price);
        active.price50 = Set(price50);
        active.price100 = Set(price100);
        active.list_price = Set(list_price);
        active.description = Set(description);
        active.category_id = Set(category_id);
        active.author = Set(author);
        let saved = active.update(txn).await?;

        Repository::<ProductImages>::new(txn)
            .remove_where(Condition::all().add(product_images::Column::ProductId.eq(id)))
            .await?;
        let images = self.add_images(id, &image_urls).await?;

        let category = Categories::find_by_id(saved.category_id).one(txn).await?;
        Ok(UpdateOutcome::Updated(Product::from_parts(
            saved, category, images,
        )))
    }
}
