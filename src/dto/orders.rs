use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{OrderDetail, OrderHeader};

/// One row of the admin order grid.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub application_user: OrderRowUser,
    pub order_status: String,
    pub order_total: i64,
}

/// Serialises as a bare array, the shape the DataTables grid reads.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderRowList {
    #[schema(value_type = Vec<OrderRow>)]
    pub items: Vec<OrderRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderRowUser {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithDetails {
    pub order: OrderHeader,
    pub details: Vec<OrderDetail>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderStatusFilter {
    /// `pending`, `inprocess`, `completed`, `approved` or `all`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderIdQuery {
    #[serde(rename = "orderId")]
    pub order_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderDetailRequest {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderActionRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShipOrderRequest {
    pub id: Uuid,
    pub carrier: String,
    pub tracking_number: String,
}
