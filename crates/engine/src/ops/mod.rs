use std::{future::Future, time::Duration};

use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::{BatchMode, EngineError, ResultEngine};

mod accounts;
mod categories;
mod currencies;
mod operations;
mod statistics;

pub use statistics::AccountStatistic;

/// Batch mode per entity. Currencies are always atomic and are not listed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchPolicy {
    pub accounts: BatchMode,
    pub categories: BatchMode,
    pub operations: BatchMode,
}

impl BatchPolicy {
    /// Every entity applies its batches atomically.
    pub fn atomic() -> Self {
        Self {
            accounts: BatchMode::Atomic,
            categories: BatchMode::Atomic,
            operations: BatchMode::Atomic,
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    policy: BatchPolicy,
    store_timeout: Option<Duration>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn batch_policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Run `work` under the configured store deadline.
    ///
    /// When the deadline elapses the future is dropped, which also drops any
    /// open transaction and rolls it back.
    async fn within_deadline<T, F>(&self, work: F) -> ResultEngine<T>
    where
        F: Future<Output = ResultEngine<T>>,
    {
        match self.store_timeout {
            Some(limit) => tokio::time::timeout(limit, work).await.map_err(|_| {
                EngineError::StoreUnavailable(format!(
                    "store did not answer within {} ms",
                    limit.as_millis()
                ))
            })?,
            None => work.await,
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    policy: BatchPolicy,
    store_timeout: Option<Duration>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub fn batch_policy(mut self, policy: BatchPolicy) -> EngineBuilder {
        self.policy = policy;
        self
    }

    /// Deadline applied to every engine call. `None` waits forever.
    pub fn store_timeout(mut self, timeout: Option<Duration>) -> EngineBuilder {
        self.store_timeout = timeout;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        tracing::debug!(policy = ?self.policy, timeout = ?self.store_timeout, "engine ready");
        Ok(Engine {
            database: self.database,
            policy: self.policy,
            store_timeout: self.store_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn elapsed_deadline_is_store_unavailable() {
        let engine = Engine::builder()
            .store_timeout(Some(Duration::from_millis(10)))
            .build()
            .await
            .unwrap();
        let result = engine
            .within_deadline(std::future::pending::<ResultEngine<()>>())
            .await;
        assert!(matches!(result, Err(EngineError::StoreUnavailable(_))));
    }

    #[test]
    fn policy_fields_default_to_per_record() {
        let policy: BatchPolicy = serde_json::from_str(r#"{"operations":"atomic"}"#).unwrap();
        assert_eq!(policy.accounts, BatchMode::PerRecord);
        assert_eq!(policy.operations, BatchMode::Atomic);
    }
}
