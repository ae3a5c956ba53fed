pub mod labels;
pub mod with_txn;
