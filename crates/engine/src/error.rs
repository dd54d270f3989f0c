//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`StoreUnavailable`] thrown when the store cannot be reached or a deadline elapsed.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`ConstraintViolation`] thrown when a record breaks a domain or referential invariant.
//! - [`PartialBatchFailure`] thrown when one record of an atomic batch fails.
//!
//!  [`StoreUnavailable`]: EngineError::StoreUnavailable
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ConstraintViolation`]: EngineError::ConstraintViolation
//!  [`PartialBatchFailure`]: EngineError::PartialBatchFailure
use core::fmt;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Outcome of the rollback issued after a failed atomic batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// Every effect of the batch was reverted.
    RolledBack,
    /// The rollback itself failed; the store decides what survived.
    Failed(String),
}

impl RollbackOutcome {
    pub fn is_rolled_back(&self) -> bool {
        matches!(self, Self::RolledBack)
    }
}

impl fmt::Display for RollbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RolledBack => f.write_str("batch rolled back"),
            Self::Failed(reason) => write!(f, "rollback failed: {reason}"),
        }
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("{entity} batch failed at record {index}: {source}; {rollback}")]
    PartialBatchFailure {
        entity: &'static str,
        index: usize,
        source: Box<EngineError>,
        rollback: RollbackOutcome,
    },
    #[error(transparent)]
    Database(DbErr),
}

impl EngineError {
    /// The error that triggered a failure, looking through batch wrappers.
    pub fn root(&self) -> &EngineError {
        match self {
            Self::PartialBatchFailure { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<DbErr> for EngineError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                return Self::ConstraintViolation(format!("duplicate key: {msg}"));
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return Self::ConstraintViolation(format!("missing reference: {msg}"));
            }
            _ => {}
        }
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::StoreUnavailable(err.to_string()),
            DbErr::RecordNotFound(key) => Self::KeyNotFound(key),
            DbErr::RecordNotUpdated => Self::KeyNotFound("record vanished before update".to_string()),
            other => Self::Database(other),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::StoreUnavailable(a), Self::StoreUnavailable(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ConstraintViolation(a), Self::ConstraintViolation(b)) => a == b,
            (
                Self::PartialBatchFailure {
                    entity: entity_a,
                    index: index_a,
                    source: source_a,
                    rollback: rollback_a,
                },
                Self::PartialBatchFailure {
                    entity: entity_b,
                    index: index_b,
                    source: source_b,
                    rollback: rollback_b,
                },
            ) => {
                entity_a == entity_b
                    && index_a == index_b
                    && source_a == source_b
                    && rollback_a == rollback_b
            }
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_reports_both_outcomes() {
        let err = EngineError::PartialBatchFailure {
            entity: "currency",
            index: 1,
            source: Box::new(EngineError::ConstraintViolation("empty code".to_string())),
            rollback: RollbackOutcome::RolledBack,
        };
        let message = err.to_string();
        assert!(message.contains("record 1"));
        assert!(message.contains("empty code"));
        assert!(message.contains("batch rolled back"));
    }

    #[test]
    fn root_looks_through_batch_wrapper() {
        let err = EngineError::PartialBatchFailure {
            entity: "currency",
            index: 0,
            source: Box::new(EngineError::StoreUnavailable("down".to_string())),
            rollback: RollbackOutcome::Failed("down".to_string()),
        };
        assert_eq!(
            err.root(),
            &EngineError::StoreUnavailable("down".to_string())
        );
    }

    #[test]
    fn connection_errors_map_to_store_unavailable() {
        let err = EngineError::from(DbErr::Conn(sea_orm::RuntimeErr::Internal(
            "refused".to_string(),
        )));
        assert!(matches!(err, EngineError::StoreUnavailable(_)));
    }
}
