use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

use super::{Repository, UpdateOutcome};
use crate::{
    entity::order_headers::{Entity as OrderHeaders, Model as OrderHeaderModel},
    models::{OrderStatus, PaymentStatus},
};

/// Customer-facing order fields an admin may correct.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetailsUpdate {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Left untouched when `None`.
    pub carrier: Option<String>,
    /// Left untouched when `None`.
    pub tracking_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub id: Uuid,
    pub carrier: String,
    pub tracking_number: String,
    pub shipped_at: DateTime<Utc>,
    /// Set for orders on delayed payment terms.
    pub payment_due_date: Option<DateTime<Utc>>,
}

pub struct OrderHeaderRepository<'t> {
    base: Repository<'t, OrderHeaders>,
}

impl<'t> OrderHeaderRepository<'t> {
    pub fn new(txn: &'t DatabaseTransaction) -> Self {
        Self {
            base: Repository::new(txn),
        }
    }

    pub fn base(&self) -> &Repository<'t, OrderHeaders> {
        &self.base
    }

    async fn load(&self, id: Uuid) -> Result<Option<OrderHeaderModel>, DbErr> {
        OrderHeaders::find_by_id(id).one(self.base.txn()).await
    }

    /// Sets the order status, and the payment status when given.
    pub async fn update_status(
        &self,
        id: Uuid,
        order_status: OrderStatus,
        payment_status: Option<PaymentStatus>,
    ) -> Result<UpdateOutcome<OrderHeaderModel>, DbErr> {
        let Some(stored) = self.load(id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        let mut active = stored.into_active_model();
        active.order_status = Set(order_status.to_string());
        if let Some(payment_status) = payment_status {
            active.payment_status = Set(payment_status.to_string());
        }
        Ok(UpdateOutcome::Updated(active.update(self.base.txn()).await?))
    }

    /// Records the checkout session id and, once known, the payment intent.
    pub async fn update_stripe_payment_id(
        &self,
        id: Uuid,
        session_id: &str,
        payment_intent_id: Option<&str>,
    ) -> Result<UpdateOutcome<OrderHeaderModel>, DbErr> {
        let Some(stored) = self.load(id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        let mut active = stored.into_active_model();
        if !session_id.is_empty() {
            active.session_id = Set(Some(session_id.to_string()));
        }
        if let Some(intent) = payment_intent_id.filter(|i| !i.is_empty()) {
            active.payment_intent_id = Set(Some(intent.to_string()));
            active.payment_date = Set(Some(Utc::now().into()));
        }
        Ok(UpdateOutcome::Updated(active.update(self.base.txn()).await?))
    }

    pub async fn update_details(
        &self,
        update: OrderDetailsUpdate,
    ) -> Result<UpdateOutcome<OrderHeaderModel>, DbErr> {
        let Some(stored) = self.load(update.id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        let mut active = stored.into_active_model();
        active.name = Set(update.name);
        active.phone_number = Set(update.phone_number);
        active.street_address = Set(update.street_address);
        active.city = Set(update.city);
        active.state = Set(update.state);
        active.postal_code = Set(update.postal_code);
        if let Some(carrier) = update.carrier.filter(|c| !c.is_empty()) {
            active.carrier = Set(Some(carrier));
        }
        if let Some(tracking) = update.tracking_number.filter(|t| !t.is_empty()) {
            active.tracking_number = Set(Some(tracking));
        }
        Ok(UpdateOutcome::Updated(active.update(self.base.txn()).await?))
    }

    pub async fn ship(&self, shipment: Shipment) -> Result<UpdateOutcome<OrderHeaderModel>, DbErr> {
        let Some(stored) = self.load(shipment.id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        let mut active = stored.into_active_model();
        active.carrier = Set(Some(shipment.carrier));
        active.tracking_number = Set(Some(shipment.tracking_number));
        active.order_status = Set(OrderStatus::Shipped.to_string());
        active.shipping_date = Set(Some(shipment.shipped_at.into()));
        if let Some(due) = shipment.payment_due_date {
            active.payment_due_date = Set(Some(due.into()));
        }
        Ok(UpdateOutcome::Updated(active.update(self.base.txn()).await?))
    }
}
