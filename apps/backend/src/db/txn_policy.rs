use std::sync::OnceLock;

/// What `with_txn` does with a transaction whose closure returned `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnPolicy {
    /// Commit (production behavior)
    CommitOnOk,
    /// Roll back anyway; lets test binaries leave the database untouched
    RollbackOnOk,
}

static POLICY: OnceLock<TxnPolicy> = OnceLock::new();

/// The process-wide policy; `CommitOnOk` until something sets it.
pub fn current() -> TxnPolicy {
    POLICY.get().copied().unwrap_or(TxnPolicy::CommitOnOk)
}

/// Set the process-wide policy. Only the first call has any effect.
pub fn set_txn_policy(policy: TxnPolicy) {
    let _ = POLICY.set(policy);
}
