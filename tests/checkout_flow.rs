mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use bulky_book::{models::Role, services::db_initializer::DbInitializer};
use common::{create_category, create_product, create_user, send, test_app};
use serde_json::json;
use tower::ServiceExt;

fn shipping() -> serde_json::Value {
    json!({
        "name": "Jane Reader",
        "phone_number": "555-0101",
        "street_address": "2 Elm St",
        "city": "Springfield",
        "state": "IL",
        "postal_code": "62701"
    })
}

#[tokio::test]
async fn cart_lines_merge_and_follow_price_tiers() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Tiered", category).await?;
    let user = create_user(&app.state, "reader@books.test", Role::Customer).await?;

    for count in [30, 21] {
        let (status, body) = send(
            &app.router,
            "POST",
            "/customer/home/details",
            Some(&user),
            Some(json!({ "product_id": product, "count": count })),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 1);
    }

    let (status, body) = send(&app.router, "GET", "/customer/cart/index", Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    let line = &body["data"]["items"][0];
    assert_eq!(line["count"], 51);
    assert_eq!(line["price"], 900);
    assert_eq!(body["data"]["order_total"], 51 * 900);

    let cart_id = line["id"].as_str().expect("cart id").to_string();
    let (_, body) = send(&app.router, "POST", &format!("/customer/cart/minus?cartId={cart_id}"), Some(&user), None).await?;
    assert_eq!(body["data"]["items"][0]["count"], 50);
    assert_eq!(body["data"]["items"][0]["price"], 1000);

    let (_, body) = send(&app.router, "POST", &format!("/customer/cart/plus?cartId={cart_id}"), Some(&user), None).await?;
    assert_eq!(body["data"]["items"][0]["count"], 51);

    let (status, body) = send(&app.router, "POST", &format!("/customer/cart/remove?cartId={cart_id}"), Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["data"]["order_total"], 0);
    Ok(())
}

#[tokio::test]
async fn merged_cart_lines_stay_within_the_unit_limit() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Bulk", category).await?;
    let user = create_user(&app.state, "reader@books.test", Role::Customer).await?;

    let mut statuses = Vec::new();
    for count in [600, 600, 400] {
        let (status, _) = send(
            &app.router,
            "POST",
            "/customer/home/details",
            Some(&user),
            Some(json!({ "product_id": product, "count": count })),
        )
        .await?;
        statuses.push(status);
    }
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST, StatusCode::OK]);

    let (_, body) = send(&app.router, "GET", "/customer/cart/index", Some(&user), None).await?;
    let line = &body["data"]["items"][0];
    assert_eq!(line["count"], 1000);

    let cart_id = line["id"].as_str().expect("cart id").to_string();
    let (status, _) = send(&app.router, "POST", &format!("/customer/cart/plus?cartId={cart_id}"), Some(&user), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app.router, "GET", "/customer/cart/index", Some(&user), None).await?;
    assert_eq!(body["data"]["items"][0]["count"], 1000);
    Ok(())
}

#[tokio::test]
async fn paid_checkout_is_confirmed_then_shipped_and_refunded_on_cancel() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Paid", category).await?;
    let user = create_user(&app.state, "reader@books.test", Role::Customer).await?;
    let admin = create_user(&app.state, "staff@books.test", Role::Employee).await?;

    send(
        &app.router,
        "POST",
        "/customer/home/details",
        Some(&user),
        Some(json!({ "product_id": product, "count": 3 })),
    )
    .await?;

    let (status, body) = send(&app.router, "GET", "/customer/cart/summary", Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shipping"]["city"], "Springfield");

    let (status, body) = send(&app.router, "POST", "/customer/cart/summary", Some(&user), Some(shipping())).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["redirect_url"], "https://checkout.stripe.test/cs_test_1");
    let order_id = body["data"]["order_id"].as_str().expect("order id").to_string();
    {
        let sessions = app.gateway.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].line_items[0].quantity, 3);
        assert_eq!(sessions[0].line_items[0].unit_amount, 1000);
        assert!(sessions[0].success_url.ends_with(&format!("orderConfirmation?id={order_id}")));
    }

    let uri = format!("/customer/cart/orderConfirmation?id={order_id}");
    let (status, body) = send(&app.router, "GET", &uri, Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    let order = &body["data"]["order"];
    assert_eq!(order["order_status"], "Approved");
    assert_eq!(order["payment_status"], "Approved");
    assert_eq!(order["order_total"], 3000);
    assert_eq!(order["payment_intent_id"], "pi_cs_test_1");

    let (_, body) = send(&app.router, "GET", "/customer/cart/index", Some(&user), None).await?;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));

    let (status, body) = send(
        &app.router,
        "POST",
        "/admin/order/shipOrder",
        Some(&admin),
        Some(json!({ "id": order_id, "carrier": "UPS", "tracking_number": "1Z999" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_status"], "Shipped");
    assert_eq!(body["data"]["carrier"], "UPS");
    assert!(body["data"]["payment_due_date"].is_null());

    let (status, body) = send(
        &app.router,
        "POST",
        "/admin/order/cancelOrder",
        Some(&admin),
        Some(json!({ "id": order_id })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_status"], "Cancelled");
    assert_eq!(body["data"]["payment_status"], "Refunded");
    assert_eq!(*app.gateway.refunds.lock().unwrap(), vec!["pi_cs_test_1".to_string()]);
    Ok(())
}

#[tokio::test]
async fn revisiting_confirmation_keeps_a_cancelled_order_cancelled() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Refunded", category).await?;
    let user = create_user(&app.state, "reader@books.test", Role::Customer).await?;
    let admin = create_user(&app.state, "staff@books.test", Role::Admin).await?;

    send(
        &app.router,
        "POST",
        "/customer/home/details",
        Some(&user),
        Some(json!({ "product_id": product, "count": 1 })),
    )
    .await?;
    let (_, body) = send(&app.router, "POST", "/customer/cart/summary", Some(&user), Some(shipping())).await?;
    let order_id = body["data"]["order_id"].as_str().expect("order id").to_string();

    let uri = format!("/customer/cart/orderConfirmation?id={order_id}");
    let (status, _) = send(&app.router, "GET", &uri, Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app.router,
        "POST",
        "/admin/order/cancelOrder",
        Some(&admin),
        Some(json!({ "id": order_id })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app.router, "GET", &uri, Some(&user), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["order_status"], "Cancelled");
    assert_eq!(body["data"]["order"]["payment_status"], "Refunded");

    let (_, body) = send(&app.router, "GET", &format!("/admin/order/details?orderId={order_id}"), Some(&admin), None).await?;
    assert_eq!(body["data"]["order"]["order_status"], "Cancelled");
    Ok(())
}

#[tokio::test]
async fn company_orders_skip_payment_and_get_due_dates() -> anyhow::Result<()> {
    let app = test_app().await?;
    let category = create_category(&app.state, "Action", 1).await?;
    let product = create_product(&app.state, "Invoiced", category).await?;
    let company = create_user(&app.state, "buyer@acme.test", Role::Company).await?;
    let admin = create_user(&app.state, "admin@books.test", Role::Admin).await?;

    send(
        &app.router,
        "POST",
        "/customer/home/details",
        Some(&company),
        Some(json!({ "product_id": product, "count": 1 })),
    )
    .await?;
    let (status, body) = send(&app.router, "POST", "/customer/cart/summary", Some(&company), Some(shipping())).await?;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["data"]["order_id"].as_str().expect("order id").to_string();
    assert_eq!(
        body["data"]["redirect_url"],
        format!("http://books.test/customer/cart/orderConfirmation?id={order_id}").as_str()
    );
    assert!(app.gateway.sessions.lock().unwrap().is_empty());

    let uri = format!("/admin/order/details?orderId={order_id}");
    let (_, body) = send(&app.router, "GET", &uri, Some(&admin), None).await?;
    assert_eq!(body["data"]["order"]["order_status"], "Approved");
    assert_eq!(body["data"]["order"]["payment_status"], "ApprovedForDelayedPayment");

    let (_, body) = send(
        &app.router,
        "POST",
        "/admin/order/shipOrder",
        Some(&admin),
        Some(json!({ "id": order_id, "carrier": "FedEx", "tracking_number": "7777" })),
    )
    .await?;
    assert_eq!(body["data"]["order_status"], "Shipped");
    assert!(body["data"]["payment_due_date"].is_string());

    let (_, body) = send(
        &app.router,
        "POST",
        "/admin/order/cancelOrder",
        Some(&admin),
        Some(json!({ "id": order_id })),
    )
    .await?;
    assert_eq!(body["data"]["payment_status"], "Cancelled");
    assert!(app.gateway.refunds.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_cart_cannot_be_ordered() -> anyhow::Result<()> {
    let app = test_app().await?;
    let user = create_user(&app.state, "reader@books.test", Role::Customer).await?;
    let (status, _) = send(&app.router, "POST", "/customer/cart/summary", Some(&user), Some(shipping())).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn cookie_session_login_reaches_admin_pages() -> anyhow::Result<()> {
    let app = test_app().await?;
    DbInitializer::new(&app.state.orm, &app.state.config)
        .initialize()
        .await?;

    let login = Request::builder()
        .method("POST")
        .uri("/Identity/Account/Login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "admin@books.test", "password": "Admin123*" }).to_string(),
        ))?;
    let response = app.router.clone().oneshot(login).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string();

    let (status, body) = with_cookie(&app.router, "GET", "/admin/product/getAll", &cookie, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(6));

    let product_id = body["data"][0]["id"].clone();
    let (status, _) = with_cookie(
        &app.router,
        "POST",
        "/customer/home/details",
        &cookie,
        Some(json!({ "product_id": product_id, "count": 2 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = with_cookie(&app.router, "GET", "/customer/cart/count", &cookie, None).await?;
    assert_eq!(body["data"]["count"], 1);
    Ok(())
}

async fn with_cookie(
    router: &axum::Router,
    method: &str,
    uri: &str,
    cookie: &str,
    body: Option<serde_json::Value>,
) -> anyhow::Result<(StatusCode, serde_json::Value)> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json");
    let request = builder.body(match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    })?;
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}
