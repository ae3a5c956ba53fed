use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::warn;

use super::require_db;
use super::txn_policy::{self, TxnPolicy};
use crate::error::AppError;
use crate::state::app_state::AppState;

/// A transaction shared through request extensions.
///
/// When present, `with_txn` and the auth extractor run on it instead of
/// opening their own, and never commit or roll it back.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub fn new(txn: DatabaseTransaction) -> Self {
        Self(Arc::new(txn))
    }

    /// Begin a transaction on `db` and wrap it for sharing.
    pub async fn open(db: &DatabaseConnection) -> Result<Self, AppError> {
        Ok(Self::new(db.begin().await?))
    }

    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    /// Fetch a shared transaction from request extensions, if any.
    pub fn from_req(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<SharedTxn>().cloned()
    }

    /// Roll back if this is the last handle; otherwise dropping it is enough,
    /// because an uncommitted `DatabaseTransaction` rolls back on drop.
    pub async fn rollback(self) -> Result<(), AppError> {
        match Arc::try_unwrap(self.0) {
            Ok(txn) => Ok(txn.rollback().await?),
            Err(_) => Ok(()),
        }
    }
}

/// Boxed future returned by `with_txn` closures, borrowing the transaction.
pub type TxnFuture<'a, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'a>>;

/// Run `f` inside a database transaction.
///
/// 1) A `SharedTxn` in request extensions is used as-is (no commit/rollback here).
/// 2) Otherwise begin a transaction, run `f`, then apply the policy on `Ok`
///    and roll back on `Err`.
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R>,
{
    // Clone out of extensions before awaiting; never hold the RefCell borrow
    if let Some(shared) = req.and_then(SharedTxn::from_req) {
        return f(shared.transaction()).await;
    }

    let txn = require_db(state)?.begin().await?;

    match f(&txn).await {
        Ok(val) => {
            match txn_policy::current() {
                TxnPolicy::CommitOnOk => txn.commit().await?,
                TxnPolicy::RollbackOnOk => txn.rollback().await?,
            }
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; the original error wins
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback after failed closure also failed");
            }
            Err(err)
        }
    }
}
