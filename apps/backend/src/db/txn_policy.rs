use once_cell::sync::OnceCell;

/// What `with_txn` does with a transaction whose closure returned `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnPolicy {
    /// Commit (default)
    CommitOnOk,
    /// Roll back, so test binaries leave no rows behind
    RollbackOnOk,
}

static POLICY: OnceCell<TxnPolicy> = OnceCell::new();

/// Current process-wide policy; `CommitOnOk` until set.
pub fn current() -> TxnPolicy {
    POLICY.get().copied().unwrap_or(TxnPolicy::CommitOnOk)
}

/// Set the policy once per process. Later calls are ignored.
pub fn set_txn_policy(policy: TxnPolicy) {
    let _ = POLICY.set(policy);
}
