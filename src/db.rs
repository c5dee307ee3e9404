use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};

use crate::entity::{
    AuditLogs, Categories, OrderDetails, OrderHeaders, ProductImages, Products, Roles,
    ShoppingCarts, Users,
};

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    // Every pooled connection to `sqlite::memory:` would be its own database.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Creates any missing table, parents before children so foreign keys resolve.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    create_table(conn, Roles).await?;
    create_table(conn, Users).await?;
    create_table(conn, Categories).await?;
    create_table(conn, Products).await?;
    create_table(conn, ProductImages).await?;
    create_table(conn, ShoppingCarts).await?;
    create_table(conn, OrderHeaders).await?;
    create_table(conn, OrderDetails).await?;
    create_table(conn, AuditLogs).await?;
    Ok(())
}

async fn create_table<E>(conn: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    conn.execute(backend.build(&stmt)).await?;
    tracing::debug!(table = entity.table_name(), "table ensured");
    Ok(())
}
