use futures::future::BoxFuture;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::warn;

use super::{require_db, txn_policy};
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Run `f` inside one database transaction.
///
/// On `Ok` the transaction is committed (or rolled back under
/// `TxnPolicy::RollbackOnOk`); on `Err` it is rolled back and the original
/// error is returned.
///
/// ```ignore
/// let lifecycle = state.lifecycle();
/// let started = with_txn(&state, move |txn| {
///     Box::pin(async move { Ok(lifecycle.start_round(txn, now).await?) })
/// })
/// .await?;
/// ```
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    R: Send,
    F: for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<R, AppError>> + Send,
{
    let db = require_db(state)?;
    let txn = db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            match txn_policy::current() {
                txn_policy::TxnPolicy::CommitOnOk => txn.commit().await?,
                txn_policy::TxnPolicy::RollbackOnOk => txn.rollback().await?,
            }
            Ok(val)
        }
        Err(err) => {
            // keep the original error even if rollback fails
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback after failed operation also failed");
            }
            Err(err)
        }
    }
}
