use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use super::{
    CategoryRepository, OrderHeaderRepository, ProductRepository, Repository,
    ShoppingCartRepository,
};
use crate::entity::{OrderDetails, Roles, Users};

/// One transaction per request.
///
/// Repositories borrow the transaction; [`UnitOfWork::commit`] makes their
/// writes durable. Dropping the unit of work uncommitted rolls back.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    pub async fn begin(conn: &DatabaseConnection) -> Result<Self, DbErr> {
        Ok(Self {
            txn: conn.begin().await?,
        })
    }

    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(&self.txn)
    }

    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(&self.txn)
    }

    pub fn shopping_carts(&self) -> ShoppingCartRepository<'_> {
        ShoppingCartRepository::new(&self.txn)
    }

    pub fn order_headers(&self) -> OrderHeaderRepository<'_> {
        OrderHeaderRepository::new(&self.txn)
    }

    pub fn order_details(&self) -> Repository<'_, OrderDetails> {
        Repository::new(&self.txn)
    }

    pub fn users(&self) -> Repository<'_, Users> {
        Repository::new(&self.txn)
    }

    pub fn roles(&self) -> Repository<'_, Roles> {
        Repository::new(&self.txn)
    }

    /// Nested transaction. Work done on it can be discarded without
    /// aborting the enclosing unit of work.
    pub async fn savepoint(&self) -> Result<DatabaseTransaction, DbErr> {
        self.txn.begin().await
    }

    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }
}
