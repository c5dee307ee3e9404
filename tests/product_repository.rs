mod common;

use bulky_book::repository::{ProductUpdate, UnitOfWork, UpdateOutcome};
use common::{create_category, create_product, test_state};
use uuid::Uuid;

fn update_for(id: Uuid, category_id: Uuid, title: &str, price: i64) -> ProductUpdate {
    ProductUpdate {
        id,
        title: title.to_string(),
        isbn: "978-0000000002".to_string(),
        price,
        price50: price - 100,
        price100: price - 200,
        list_price: price + 500,
        description: Some("Revised edition".to_string()),
        category_id,
        author: "Second Author".to_string(),
        image_urls: vec!["/images/b.jpg".into(), "/images/c.jpg".into()],
    }
}

#[tokio::test]
async fn update_overwrites_allowlisted_fields_only() -> anyhow::Result<()> {
    let (state, _) = test_state().await?;
    let action = create_category(&state, "Action", 1).await?;
    let history = create_category(&state, "History", 2).await?;
    let id = create_product(&state, "First", action).await?;

    let before = {
        let uow = UnitOfWork::begin(&state.orm).await?;
        uow.products().add_images(id, &["/images/a.jpg".to_string()]).await?;
        let product = uow.products().find(id).await?.expect("product");
        uow.commit().await?;
        product
    };

    let uow = UnitOfWork::begin(&state.orm).await?;
    let outcome = uow
        .products()
        .update(update_for(id, history, "Second", 2000))
        .await?;
    assert!(outcome.is_updated());
    uow.commit().await?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    let after = uow.products().find(id).await?.expect("product");
    uow.commit().await?;

    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.title, "Second");
    assert_eq!(after.isbn, "978-0000000002");
    assert_eq!(after.author, "Second Author");
    assert_eq!(after.description.as_deref(), Some("Revised edition"));
    assert_eq!(
        (after.list_price, after.price, after.price50, after.price100),
        (2500, 2000, 1900, 1800)
    );
    assert_eq!(after.category_id, history);
    assert_eq!(after.category.map(|c| c.name).as_deref(), Some("History"));
    let urls: Vec<_> = after.images.iter().map(|i| i.image_url.as_str()).collect();
    assert_eq!(urls, ["/images/b.jpg", "/images/c.jpg"]);
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_product_is_a_silent_no_op() -> anyhow::Result<()> {
    let (state, _) = test_state().await?;
    let category = create_category(&state, "Action", 1).await?;
    let id = create_product(&state, "Untouched", category).await?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    let outcome = uow
        .products()
        .update(update_for(Uuid::new_v4(), category, "Ghost", 5000))
        .await?;
    assert!(matches!(outcome, UpdateOutcome::NotFound));
    uow.commit().await?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    let all = uow.products().list(sea_orm::Condition::all()).await?;
    uow.commit().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].title, "Untouched");
    Ok(())
}

#[tokio::test]
async fn dropped_unit_of_work_persists_nothing() -> anyhow::Result<()> {
    let (state, _) = test_state().await?;
    let category = create_category(&state, "Action", 1).await?;
    let id = create_product(&state, "Original", category).await?;

    {
        let uow = UnitOfWork::begin(&state.orm).await?;
        let outcome = uow
            .products()
            .update(update_for(id, category, "Draft", 3000))
            .await?;
        assert!(outcome.is_updated());
        let seen_inside = uow.products().find(id).await?.expect("product");
        assert_eq!(seen_inside.title, "Draft");
    }

    let uow = UnitOfWork::begin(&state.orm).await?;
    let stored = uow.products().find(id).await?.expect("product");
    uow.commit().await?;
    assert_eq!(stored.title, "Original");
    assert_eq!(stored.price, 1000);
    Ok(())
}

#[tokio::test]
async fn last_committed_update_wins() -> anyhow::Result<()> {
    let (state, _) = test_state().await?;
    let category = create_category(&state, "Action", 1).await?;
    let id = create_product(&state, "Original", category).await?;

    for (title, price) in [("First writer", 1500), ("Second writer", 1700)] {
        let uow = UnitOfWork::begin(&state.orm).await?;
        let _ = uow
            .products()
            .update(update_for(id, category, title, price))
            .await?;
        uow.commit().await?;
    }

    let uow = UnitOfWork::begin(&state.orm).await?;
    let stored = uow.products().find(id).await?.expect("product");
    uow.commit().await?;
    assert_eq!(stored.title, "Second writer");
    assert_eq!(stored.price, 1700);
    assert_eq!(stored.images.len(), 2);
    Ok(())
}
