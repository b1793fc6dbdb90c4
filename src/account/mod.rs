mod core;
pub(crate) mod db;

pub use core::{ACCOUNT_NAME_SEPARATOR, Account, AccountType, ROOT_ACCOUNT_NAME};
pub(crate) use core::validate_account_name;
