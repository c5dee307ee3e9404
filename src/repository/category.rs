use sea_orm::{ActiveModelTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

use super::{Repository, UpdateOutcome};
use crate::entity::categories::{Entity as Categories, Model as CategoryModel};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryUpdate {
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
}

pub struct CategoryRepository<'t> {
    base: Repository<'t, Categories>,
}

impl<'t> CategoryRepository<'t> {
    pub fn new(txn: &'t DatabaseTransaction) -> Self {
        Self {
            base: Repository::new(txn),
        }
    }

    pub fn base(&self) -> &Repository<'t, Categories> {
        &self.base
    }

    pub async fn update(&self, update: CategoryUpdate) -> Result<UpdateOutcome<CategoryModel>, DbErr> {
        let txn = self.base.txn();
        let Some(stored) = Categories::find_by_id(update.id).one(txn).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        let mut active = stored.into_active_model();
        active.name = Set(update.name);
        active.display_order = Set(update.display_order);
        Ok(UpdateOutcome::Updated(active.update(txn).await?))
    }
}
