mod common;

use bulky_book::{
    entity::{Categories, Products, Roles, Users},
    models::Role,
    services::db_initializer::DbInitializer,
};
use common::test_state;
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn seeding_twice_does_not_duplicate_anything() -> anyhow::Result<()> {
    let (state, _) = test_state().await?;
    let initializer = DbInitializer::new(&state.orm, &state.config);

    let first = initializer.initialize().await?;
    assert_eq!(first.roles_created, Role::ALL.len());
    assert!(first.admin_created);
    assert_eq!(first.categories_created, 3);
    assert_eq!(first.products_created, 6);

    let second = initializer.initialize().await?;
    assert!(second.is_empty());

    assert_eq!(Roles::find().count(&state.orm).await?, 4);
    assert_eq!(Users::find().count(&state.orm).await?, 1);
    assert_eq!(Categories::find().count(&state.orm).await?, 3);
    assert_eq!(Products::find().count(&state.orm).await?, 6);
    Ok(())
}

#[tokio::test]
async fn seeded_prices_are_stored_in_cents() -> anyhow::Result<()> {
    let (state, _) = test_state().await?;
    DbInitializer::new(&state.orm, &state.config).initialize().await?;

    let products = Products::find().all(&state.orm).await?;
    let dark_skies = products
        .iter()
        .find(|p| p.title == "Dark Skies")
        .expect("seeded product");
    assert_eq!(dark_skies.list_price, 4000);
    assert_eq!(
        (dark_skies.price, dark_skies.price50, dark_skies.price100),
        (3000, 2500, 2000)
    );
    Ok(())
}
