//! Ledger domain models shared by every job handler.

pub mod account;
pub mod budget;
pub mod transaction;
pub mod user;

pub use account::Account;
pub use budget::Budget;
pub use transaction::{RecurringInterval, Transaction, TransactionStatus, TransactionType};
pub use user::User;
