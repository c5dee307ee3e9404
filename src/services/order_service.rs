use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, Condition, Set};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    dto::cart::{OrderConfirmation, PlaceOrderResponse, ShippingDetails},
    entity::{
        order_details::ActiveModel as OrderDetailActive,
        order_headers::{ActiveModel as OrderHeaderActive, Column as OrderCol, Model as OrderHeaderModel},
    },
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, session::set_cart_count},
    models::{OrderHeader, OrderStatus, PaymentStatus, Role, price_for_quantity},
    repository::{UnitOfWork, UpdateOutcome},
    response::{ApiResponse, Meta},
    services::payment::{CheckoutRequest, LineItem},
    state::AppState,
};

/// Company accounts pay within this many days of shipping.
pub const DELAYED_PAYMENT_DAYS: i64 = 30;

/// Turns the caller's cart into an order.
///
/// Regular customers are sent to a payment page; company accounts skip
/// payment and go straight to the confirmation page.
pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    shipping: ShippingDetails,
) -> AppResult<ApiResponse<PlaceOrderResponse>> {
    validate_shipping(&shipping)?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    let lines = uow.shopping_carts().for_user(user.user_id).await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let delayed = user.role == Role::Company;
    let (order_status, payment_status) = if delayed {
        (OrderStatus::Approved, PaymentStatus::ApprovedForDelayedPayment)
    } else {
        (OrderStatus::Pending, PaymentStatus::Pending)
    };

    let priced: Vec<_> = lines
        .into_iter()
        .map(|(line, product)| {
            let price =
                price_for_quantity(product.price, product.price50, product.price100, line.count);
            (line, product, price)
        })
        .collect();
    let order_total: i64 = priced
        .iter()
        .map(|(line, _, price)| price * i64::from(line.count))
        .sum();

    let order_id = Uuid::new_v4();
    let ShippingDetails {
        name,
        phone_number,
        street_address,
        city,
        state: region,
        postal_code,
    } = shipping;
    let header = uow
        .order_headers()
        .base()
        .add(OrderHeaderActive {
            id: Set(order_id),
            user_id: Set(user.user_id),
            order_date: Set(Utc::now().into()),
            shipping_date: Set(None),
            order_total: Set(order_total),
            order_status: Set(order_status.to_string()),
            payment_status: Set(payment_status.to_string()),
            tracking_number: Set(None),
            carrier: Set(None),
            payment_date: Set(None),
            payment_due_date: Set(None),
            session_id: Set(None),
            payment_intent_id: Set(None),
            name: Set(name),
            phone_number: Set(phone_number),
            street_address: Set(street_address),
            city: Set(city),
            state: Set(region),
            postal_code: Set(postal_code),
        })
        .await?;

    let details = uow.order_details();
    let mut line_items = Vec::with_capacity(priced.len());
    for (line, product, price) in priced {
        details
            .add(OrderDetailActive {
                id: Set(Uuid::new_v4()),
                order_header_id: Set(header.id),
                product_id: Set(product.id),
                count: Set(line.count),
                price: Set(price),
            })
            .await?;
        line_items.push(LineItem {
            name: product.title,
            unit_amount: price,
            quantity: line.count,
        });
    }
    uow.commit().await?;
    tracing::info!(order_id = %order_id, order_total, delayed, "order placed");

    let confirmation_url = format!(
        "{}/customer/cart/orderConfirmation?id={}",
        state.config.base_url, order_id
    );
    if delayed {
        return Ok(ApiResponse::success(
            "Order placed",
            PlaceOrderResponse {
                order_id,
                redirect_url: confirmation_url,
            },
            Some(Meta::empty()),
        ));
    }

    let checkout = state
        .payments
        .create_checkout_session(CheckoutRequest {
            success_url: confirmation_url,
            cancel_url: format!("{}/customer/cart/index", state.config.base_url),
            line_items,
        })
        .await?;

    let uow = UnitOfWork::begin(&state.orm).await?;
    expect_order(
        uow.order_headers()
            .update_stripe_payment_id(order_id, &checkout.id, checkout.payment_intent.as_deref())
            .await?,
    )?;
    uow.commit().await?;

    let redirect_url = checkout
        .url
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("checkout session has no url")))?;
    Ok(ApiResponse::success(
        "Order placed",
        PlaceOrderResponse {
            order_id,
            redirect_url,
        },
        Some(Meta::empty()),
    ))
}

/// Landing page after payment: records the payment, empties the cart and
/// mails the customer.
pub async fn order_confirmation(
    state: &AppState,
    user: &AuthUser,
    session: &Session,
    order_id: Uuid,
) -> AppResult<ApiResponse<OrderConfirmation>> {
    let header = load_own_order(state, user, order_id).await?;

    // Only an order still waiting on Stripe is settled here; later states belong to staff.
    let paid = if header.payment_status == PaymentStatus::Pending.as_str() {
        let session_id = header
            .session_id
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Order has no payment session".into()))?;
        let checkout = state.payments.retrieve_checkout_session(session_id).await?;
        checkout.is_paid().then_some(checkout)
    } else {
        None
    };

    let uow = UnitOfWork::begin(&state.orm).await?;
    let orders = uow.order_headers();
    if let Some(checkout) = paid {
        expect_order(
            orders
                .update_stripe_payment_id(order_id, &checkout.id, checkout.payment_intent.as_deref())
                .await?,
        )?;
        expect_order(
            orders
                .update_status(order_id, OrderStatus::Approved, Some(PaymentStatus::Approved))
                .await?,
        )?;
    }
    uow.shopping_carts().clear_for_user(header.user_id).await?;
    let header = match orders.base().get(order_condition(order_id)).await? {
        Some(h) => h,
        None => return Err(AppError::NotFound),
    };
    uow.commit().await?;

    set_cart_count(session, 0).await?;

    if let Err(err) = state
        .mailer
        .send_email(
            &user.email,
            "New Order - Bulky Book",
            &format!("<p>New Order Created - {}</p>", header.id),
        )
        .await
    {
        tracing::warn!(error = %err, order_id = %header.id, "order email failed");
    }

    Ok(ApiResponse::success(
        "Order confirmed",
        OrderConfirmation {
            order: OrderHeader::from(header),
        },
        Some(Meta::empty()),
    ))
}

/// Payment terms for an order shipped now.
pub fn payment_due_date(header: &OrderHeaderModel) -> Option<chrono::DateTime<Utc>> {
    (header.payment_status == PaymentStatus::ApprovedForDelayedPayment.as_str())
        .then(|| Utc::now() + Duration::days(DELAYED_PAYMENT_DAYS))
}

pub(crate) fn order_condition(order_id: Uuid) -> Condition {
    Condition::all().add(OrderCol::Id.eq(order_id))
}

/// Loads an order the caller may see: their own, or any order for staff.
pub(crate) async fn load_own_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<OrderHeaderModel> {
    let mut condition = order_condition(order_id);
    if !user.role.is_staff() {
        condition = condition.add(OrderCol::UserId.eq(user.user_id));
    }
    let uow = UnitOfWork::begin(&state.orm).await?;
    match uow.order_headers().base().get(condition).await? {
        Some(header) => Ok(header),
        None => Err(AppError::NotFound),
    }
}

fn validate_shipping(shipping: &ShippingDetails) -> AppResult<()> {
    let fields = [
        ("name", &shipping.name),
        ("phone_number", &shipping.phone_number),
        ("street_address", &shipping.street_address),
        ("city", &shipping.city),
        ("state", &shipping.state),
        ("postal_code", &shipping.postal_code),
    ];
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(AppError::BadRequest(format!("{field} is required"))),
        None => Ok(()),
    }
}

/// Unwraps an update addressed to an order that was just loaded.
pub(crate) fn expect_order(outcome: UpdateOutcome<OrderHeaderModel>) -> AppResult<OrderHeaderModel> {
    outcome.into_option().ok_or(AppError::NotFound)
}
