mod common;

use axum::http::StatusCode;
use bulky_book::{middleware::auth::AuthUser, models::Role};
use common::{TestApp, create_category, create_product, create_user, send, test_app};
use serde_json::json;
use uuid::Uuid;

/// Buys two units and walks through the confirmation page, which empties the cart.
async fn place_order(app: &TestApp, user: &AuthUser, product_id: Uuid) -> anyhow::Result<String> {
    let (status, _) = send(
        &app.router,
        "POST",
        "/customer/home/details",
        Some(user),
        Some(json!({ "product_id": product_id, "count": 2 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app.router,
        "POST",
        "/customer/cart/summary",
        Some(user),
        Some(json!({
            "name": "Jane Reader",
            "phone_number": "555-0101",
            "street_address": "2 Elm St",
            "city": "Springfield",
            "state": "IL",
            "postal_code": "62701"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = body["data"]["order_id"].as_str().expect("order id").to_string();

    let uri = format!("/customer/cart/orderConfirmation?id={order_id}");
    let (status, _) = send(&app.router, "GET", &uri, Some(user), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(order_id)
}

#[tokio::test]
async fn get_all_returns_every_order_for_admins() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Grid Book", category).await?;
    let admin = create_user(&app.state, "admin@books.test", Role::Admin).await?;
    let alice = create_user(&app.state, "alice@books.test", Role::Customer).await?;
    let bob = create_user(&app.state, "bob@books.test", Role::Customer).await?;

    let mut placed = vec![
        place_order(&app, &alice, product).await?,
        place_order(&app, &bob, product).await?,
        place_order(&app, &alice, product).await?,
    ];

    let (status, body) = send(&app.router, "GET", "/admin/order/getAll", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(body["meta"]["total"], 3);

    let mut ids: Vec<String> = rows
        .iter()
        .map(|row| row["id"].as_str().expect("id").to_string())
        .collect();
    ids.sort();
    placed.sort();
    assert_eq!(ids, placed);

    let first = &rows[0];
    assert!(first["phoneNumber"].is_string());
    assert!(first["applicationUser"]["email"].is_string());
    assert_eq!(first["orderStatus"], "Approved");
    assert_eq!(first["orderTotal"], 2000);

    for id in &ids {
        let uri = format!("/admin/order/details?orderId={id}");
        let (status, body) = send(&app.router, "GET", &uri, Some(&admin), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["order"]["id"], id.as_str());
        assert_eq!(body["data"]["details"].as_array().map(Vec::len), Some(1));
    }
    Ok(())
}

#[tokio::test]
async fn customers_only_see_their_own_orders() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Mine", category).await?;
    let alice = create_user(&app.state, "alice@books.test", Role::Customer).await?;
    let bob = create_user(&app.state, "bob@books.test", Role::Customer).await?;

    let alice_order = place_order(&app, &alice, product).await?;
    place_order(&app, &bob, product).await?;

    let (status, body) = send(&app.router, "GET", "/admin/order/getAll", Some(&alice), None).await?;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], alice_order.as_str());
    assert_eq!(rows[0]["applicationUser"]["email"], "alice@books.test");
    Ok(())
}

#[tokio::test]
async fn routes_match_case_insensitively_and_require_sign_in() -> anyhow::Result<()> {
    let app = test_app().await?;
    let admin = create_user(&app.state, "admin@books.test", Role::Admin).await?;

    let (status, body) = send(&app.router, "GET", "/admin/order/getAll", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["redirect"], "/identity/Account/Login");

    let (status, body) = send(&app.router, "GET", "/Admin/Order/GetAll?status=all", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn login_redirect_target_answers_get() -> anyhow::Result<()> {
    let app = test_app().await?;

    let (_, body) = send(&app.router, "GET", "/admin/order/getAll", None, None).await?;
    let login = body["data"]["redirect"].as_str().expect("redirect").to_string();

    let (status, body) = send(&app.router, "GET", &login, None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["action"], "/identity/account/login");
    assert_eq!(body["data"]["method"], "POST");
    Ok(())
}

#[tokio::test]
async fn missing_actions_fall_back_to_index() -> anyhow::Result<()> {
    let app = test_app().await?;
    let admin = create_user(&app.state, "admin@books.test", Role::Admin).await?;

    for uri in ["/customer", "/customer/home", "/Customer/Home", "/customer/cart", "/admin/product", "/admin/category"] {
        let (status, _) = send(&app.router, "GET", uri, Some(&admin), None).await?;
        assert_eq!(status, StatusCode::OK, "GET {uri}");
    }

    let (status, _) = send(&app.router, "GET", "/admin/order", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app.router, "GET", "/admin/order", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app.router, "GET", "/admin/order/index.html", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn status_filters_narrow_the_grid() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Filtered", category).await?;
    let admin = create_user(&app.state, "admin@books.test", Role::Admin).await?;
    let alice = create_user(&app.state, "alice@books.test", Role::Customer).await?;
    let acme = create_user(&app.state, "buyer@acme.test", Role::Company).await?;

    let processing = place_order(&app, &alice, product).await?;
    let paid = place_order(&app, &alice, product).await?;
    let delayed = place_order(&app, &acme, product).await?;

    let (status, _) = send(
        &app.router,
        "POST",
        "/admin/order/startProcessing",
        Some(&admin),
        Some(json!({ "id": processing })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let ids_for = |body: serde_json::Value| -> Vec<String> {
        body["data"]
            .as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|r| r["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    let (_, body) = send(&app.router, "GET", "/admin/order/getAll?status=inprocess", Some(&admin), None).await?;
    assert_eq!(ids_for(body), vec![processing]);

    let (_, body) = send(&app.router, "GET", "/admin/order/getAll?status=pending", Some(&admin), None).await?;
    assert_eq!(ids_for(body), vec![delayed.clone()]);

    let (_, body) = send(&app.router, "GET", "/admin/order/getAll?status=approved", Some(&admin), None).await?;
    let mut approved = ids_for(body);
    approved.sort();
    let mut expected = vec![paid, delayed];
    expected.sort();
    assert_eq!(approved, expected);

    let (_, body) = send(&app.router, "GET", "/admin/order/getAll?status=all", Some(&admin), None).await?;
    assert_eq!(ids_for(body).len(), 3);
    Ok(())
}

#[tokio::test]
async fn order_actions_are_staff_only() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Guarded", category).await?;
    let alice = create_user(&app.state, "alice@books.test", Role::Customer).await?;
    let order = place_order(&app, &alice, product).await?;

    let (status, body) = send(
        &app.router,
        "POST",
        "/admin/order/startProcessing",
        Some(&alice),
        Some(json!({ "id": order })),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["data"]["redirect"], "/identity/Account/AccessDenied");
    Ok(())
}
