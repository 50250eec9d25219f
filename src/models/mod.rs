mod filters;
mod transaction;

pub use filters::{FilterConfig, StatusFilter, TypeFilter};
pub use transaction::{Transaction, TxStatus, TxType};
