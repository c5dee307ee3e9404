use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{
        OrderActionRequest, OrderRow, OrderRowList, OrderRowUser, OrderStatusFilter, OrderWithDetails,
        ShipOrderRequest, UpdateOrderDetailRequest,
    },
    entity::{
        OrderDetails, OrderHeaders, Users,
        order_details::Column as DetailCol,
        order_headers::{Column as OrderCol, Model as OrderHeaderModel},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{OrderDetail, OrderHeader, OrderStatus, PaymentStatus},
    repository::{OrderDetailsUpdate, Shipment, UnitOfWork},
    response::{ApiResponse, Meta},
    services::order_service::{expect_order, order_condition, payment_due_date},
    state::AppState,
};

/// Which orders the admin grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Pending,
    InProcess,
    Completed,
    Approved,
    All,
}

impl StatusFilter {
    /// Unknown or missing values show everything.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("pending") => StatusFilter::Pending,
            Some("inprocess") => StatusFilter::InProcess,
            Some("completed") => StatusFilter::Completed,
            Some("approved") => StatusFilter::Approved,
            _ => StatusFilter::All,
        }
    }

    fn condition(self) -> Condition {
        let condition = Condition::all();
        match self {
            StatusFilter::Pending => condition.add(
                OrderCol::PaymentStatus.eq(PaymentStatus::ApprovedForDelayedPayment.as_str()),
            ),
            StatusFilter::InProcess => {
                condition.add(OrderCol::OrderStatus.eq(OrderStatus::Processing.as_str()))
            }
            StatusFilter::Completed => {
                condition.add(OrderCol::OrderStatus.eq(OrderStatus::Shipped.as_str()))
            }
            StatusFilter::Approved => {
                condition.add(OrderCol::OrderStatus.eq(OrderStatus::Approved.as_str()))
            }
            StatusFilter::All => condition,
        }
    }
}

/// Data source of the admin order grid.
///
/// Staff see every order; everyone else sees only their own.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    filter: OrderStatusFilter,
) -> AppResult<ApiResponse<OrderRowList>> {
    let mut condition = StatusFilter::parse(filter.status.as_deref()).condition();
    if !user.role.is_staff() {
        condition = condition.add(OrderCol::UserId.eq(user.user_id));
    }

    let uow = UnitOfWork::begin(&state.orm).await?;
    let rows: Vec<OrderRow> = OrderHeaders::find()
        .filter(condition)
        .find_also_related(Users)
        .order_by_desc(OrderCol::OrderDate)
        .all(uow.order_headers().base().txn())
        .await?
        .into_iter()
        .map(|(header, owner)| OrderRow {
            id: header.id,
            name: header.name,
            phone_number: header.phone_number,
            application_user: OrderRowUser {
                email: owner.map(|u| u.email).unwrap_or_default(),
            },
            order_status: header.order_status,
            order_total: header.order_total,
        })
        .collect();
    uow.commit().await?;

    let total = rows.len() as i64;
    Ok(ApiResponse::success(
        "Orders",
        OrderRowList { items: rows },
        Some(Meta::total(total)),
    ))
}

pub async fn order_details(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<OrderWithDetails>> {
    let mut condition = order_condition(order_id);
    if !user.role.is_staff() {
        condition = condition.add(OrderCol::UserId.eq(user.user_id));
    }

    let uow = UnitOfWork::begin(&state.orm).await?;
    let orders = uow.order_headers();
    let Some(header) = orders.base().get(condition).await? else {
        return Err(AppError::NotFound);
    };
    let details = OrderDetails::find()
        .filter(DetailCol::OrderHeaderId.eq(header.id))
        .find_also_related(Products)
        .all(orders.base().txn())
        .await?
        .into_iter()
        .map(|(detail, product)| OrderDetail::from_parts(detail, product))
        .collect();
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Order found",
        OrderWithDetails {
            order: OrderHeader::from(header),
            details,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_detail(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateOrderDetailRequest,
) -> AppResult<ApiResponse<OrderHeader>> {
    ensure_staff(user)?;
    let uow = UnitOfWork::begin(&state.orm).await?;
    let outcome = uow
        .order_headers()
        .update_details(OrderDetailsUpdate {
            id: payload.id,
            name: payload.name,
            phone_number: payload.phone_number,
            street_address: payload.street_address,
            city: payload.city,
            state: payload.state,
            postal_code: payload.postal_code,
            carrier: payload.carrier,
            tracking_number: payload.tracking_number,
        })
        .await?;
    let header = expect_order(outcome)?;
    audit::record(
        &uow,
        user.user_id,
        "order_details_update",
        "order_headers",
        serde_json::json!({ "order_id": header.id }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Order Details Updated Successfully.",
        OrderHeader::from(header),
        Some(Meta::empty()),
    ))
}

pub async fn start_processing(
    state: &AppState,
    user: &AuthUser,
    payload: OrderActionRequest,
) -> AppResult<ApiResponse<OrderHeader>> {
    ensure_staff(user)?;
    let uow = UnitOfWork::begin(&state.orm).await?;
    let outcome = uow
        .order_headers()
        .update_status(payload.id, OrderStatus::Processing, None)
        .await?;
    let header = expect_order(outcome)?;
    audit::record(
        &uow,
        user.user_id,
        "order_start_processing",
        "order_headers",
        serde_json::json!({ "order_id": header.id }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Order Status Updated Successfully.",
        OrderHeader::from(header),
        Some(Meta::empty()),
    ))
}

pub async fn ship_order(
    state: &AppState,
    user: &AuthUser,
    payload: ShipOrderRequest,
) -> AppResult<ApiResponse<OrderHeader>> {
    ensure_staff(user)?;
    if payload.carrier.trim().is_empty() || payload.tracking_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "carrier and tracking_number are required".into(),
        ));
    }

    let uow = UnitOfWork::begin(&state.orm).await?;
    let orders = uow.order_headers();
    let Some(stored) = orders.base().get(order_condition(payload.id)).await? else {
        return Err(AppError::NotFound);
    };
    let outcome = orders
        .ship(Shipment {
            id: stored.id,
            carrier: payload.carrier,
            tracking_number: payload.tracking_number,
            shipped_at: Utc::now(),
            payment_due_date: payment_due_date(&stored),
        })
        .await?;
    let header = expect_order(outcome)?;
    audit::record(
        &uow,
        user.user_id,
        "order_ship",
        "order_headers",
        serde_json::json!({ "order_id": header.id, "carrier": header.carrier }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Order Shipped Successfully.",
        OrderHeader::from(header),
        Some(Meta::empty()),
    ))
}

/// Cancels an order, refunding it first when it was already paid.
pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    payload: OrderActionRequest,
) -> AppResult<ApiResponse<OrderHeader>> {
    ensure_staff(user)?;

    let stored = {
        let uow = UnitOfWork::begin(&state.orm).await?;
        let found = uow.order_headers().base().get(order_condition(payload.id)).await?;
        uow.commit().await?;
        found.ok_or(AppError::NotFound)?
    };

    let payment_status = match refundable_intent(&stored) {
        Some(intent) => {
            let refund = state.payments.refund(intent).await?;
            tracing::info!(order_id = %stored.id, refund_id = %refund.id, "order refunded");
            PaymentStatus::Refunded
        }
        None => PaymentStatus::Cancelled,
    };

    let uow = UnitOfWork::begin(&state.orm).await?;
    let outcome = uow
        .order_headers()
        .update_status(stored.id, OrderStatus::Cancelled, Some(payment_status))
        .await?;
    let header = expect_order(outcome)?;
    audit::record(
        &uow,
        user.user_id,
        "order_cancel",
        "order_headers",
        serde_json::json!({ "order_id": header.id, "payment_status": header.payment_status }),
    )
    .await;
    uow.commit().await?;

    Ok(ApiResponse::success(
        "Order Cancelled Successfully.",
        OrderHeader::from(header),
        Some(Meta::empty()),
    ))
}

fn refundable_intent(header: &OrderHeaderModel) -> Option<&str> {
    if header.payment_status != PaymentStatus::Approved.as_str() {
        return None;
    }
    header.payment_intent_id.as_deref().filter(|i| !i.is_empty())
}

#[cfg(test)]
mod tests {
    use super::StatusFilter;

    #[test]
    fn status_filter_parses_known_values_and_defaults_to_all() {
        assert_eq!(StatusFilter::parse(Some("pending")), StatusFilter::Pending);
        assert_eq!(StatusFilter::parse(Some("InProcess")), StatusFilter::InProcess);
        assert_eq!(StatusFilter::parse(Some("completed")), StatusFilter::Completed);
        assert_eq!(StatusFilter::parse(Some("approved")), StatusFilter::Approved);
        assert_eq!(StatusFilter::parse(Some("bogus")), StatusFilter::All);
        assert_eq!(StatusFilter::parse(None), StatusFilter::All);
    }
}
