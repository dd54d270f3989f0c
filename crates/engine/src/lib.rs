//! Reconciliation engine.
//!
//! Clients submit batches of desired-state records. Each record is classified
//! against the store as new, modified or unchanged and only the difference is
//! written. New transfer operations are paired into shared transaction
//! numbers on the way in.

pub use accounts::Account;
pub use batch::{BatchMode, BatchSummary};
pub use categories::Category;
pub use currencies::Currency;
pub use diff::{Change, compare};
pub use error::{EngineError, RollbackOutcome};
pub use operations::{Operation, OperationKind};
pub use ops::{AccountStatistic, BatchPolicy, Engine, EngineBuilder};
pub use pairing::TransferPairing;

mod accounts;
mod batch;
mod categories;
mod currencies;
mod diff;
mod error;
mod operations;
mod ops;
mod pairing;
mod store;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
