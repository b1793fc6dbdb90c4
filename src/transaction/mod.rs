mod core;
pub(crate) mod db;
mod split;

pub use core::Transaction;
pub use split::{ReconcileState, Split, TransactionType};
