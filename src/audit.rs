//! Audit trail of staff actions.

use chrono::Utc;
use sea_orm::{DbErr, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    entity::{AuditLogs, audit_logs::ActiveModel as AuditActive},
    repository::{Repository, UnitOfWork},
};

async fn log_audit(
    uow: &UnitOfWork,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> Result<(), DbErr> {
    let savepoint = uow.savepoint().await?;
    Repository::<AuditLogs>::new(&savepoint)
        .add(AuditActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            action: Set(action.to_string()),
            resource: Set(resource.map(str::to_string)),
            metadata: Set(metadata),
            created_at: Set(Utc::now().into()),
        })
        .await?;
    savepoint.commit().await
}

/// Writes an audit row inside `uow`. Failures are logged and swallowed.
pub async fn record(uow: &UnitOfWork, user_id: Uuid, action: &str, resource: &str, metadata: Value) {
    if let Err(err) = log_audit(uow, Some(user_id), action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
