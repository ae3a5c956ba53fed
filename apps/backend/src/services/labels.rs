//! Tag and ingredient maintenance.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::errors::domain::DomainError;
use crate::repos::labels::{self, Label, LabelKind};

/// Tag/ingredient domain service.
#[derive(Debug, Default)]
pub struct LabelService;

impl LabelService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: LabelKind,
        user_id: i64,
        assigned_only: bool,
    ) -> Result<Vec<Label>, DomainError> {
        labels::list_for_user(conn, kind, user_id, assigned_only).await
    }

    /// Rename an owned label. Taking a name the owner already uses for
    /// another label of the same kind is a conflict.
    pub async fn rename<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: LabelKind,
        user_id: i64,
        id: i64,
        name: &str,
    ) -> Result<Label, DomainError> {
        let current = labels::find_for_user(conn, kind, user_id, id)
            .await?
            .ok_or_else(|| kind.not_found(id))?;

        if current.name == name {
            return Ok(current);
        }

        if let Some(other) = labels::find_by_name(conn, kind, user_id, name).await? {
            if other.id != current.id {
                return Err(kind.duplicate(name));
            }
        }

        let renamed = labels::rename(conn, kind, current.id, name).await?;
        info!(kind = kind.noun(), label_id = renamed.id, user_id, "label renamed");
        Ok(renamed)
    }

    pub async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: LabelKind,
        user_id: i64,
        id: i64,
    ) -> Result<(), DomainError> {
        let current = labels::find_for_user(conn, kind, user_id, id)
            .await?
            .ok_or_else(|| kind.not_found(id))?;

        labels::delete(conn, kind, current.id).await?;
        info!(kind = kind.noun(), label_id = id, user_id, "label deleted");
        Ok(())
    }
}
