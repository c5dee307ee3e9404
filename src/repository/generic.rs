use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter,
};

/// CRUD operations shared by every entity.
pub struct Repository<'t, E> {
    txn: &'t DatabaseTransaction,
    _entity: PhantomData<E>,
}

impl<'t, E> Repository<'t, E>
where
    E: EntityTrait,
    E::Model: Sync,
{
    pub fn new(txn: &'t DatabaseTransaction) -> Self {
        Self {
            txn,
            _entity: PhantomData,
        }
    }

    pub fn txn(&self) -> &'t DatabaseTransaction {
        self.txn
    }

    /// First row matching `filter`.
    pub async fn get(&self, filter: Condition) -> Result<Option<E::Model>, DbErr> {
        E::find().filter(filter).one(self.txn).await
    }

    pub async fn count(&self, filter: Condition) -> Result<u64, DbErr> {
        E::find().filter(filter).count(self.txn).await
    }

    pub async fn add<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(self.txn).await
    }

    /// Deletes every row matching `filter`, returning how many went.
    pub async fn remove_where(&self, filter: Condition) -> Result<u64, DbErr> {
        let result = E::delete_many().filter(filter).exec(self.txn).await?;
        Ok(result.rows_affected)
    }
}
