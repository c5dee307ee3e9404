use bulky_book::{
    config::AppConfig, db::create_orm_conn, services::db_initializer::DbInitializer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    let report = DbInitializer::new(&orm, &config).initialize().await?;

    println!(
        "Seed completed: {} roles, admin {}, {} categories, {} products",
        report.roles_created,
        if report.admin_created { "created" } else { "kept" },
        report.categories_created,
        report.products_created,
    );
    Ok(())
}
