//! Batch apply.
//!
//! A batch is a list of items applied one at a time by a [`BatchStep`]. The
//! [`BatchMode`] decides whether the whole batch shares one database
//! transaction or every item is written on its own.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, RollbackOutcome,
    diff::{self, Change},
    store::StoreRecord,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// One transaction for the whole batch; a failure reverts every item.
    Atomic,
    /// Items commit one by one; a failure stops the batch and keeps what was
    /// written before it.
    #[default]
    PerRecord,
}

/// Counters reported for every applied batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub absent: usize,
}

/// Applies one item of a batch.
#[async_trait]
pub(crate) trait BatchStep<I: Send + 'static>: Send {
    async fn apply<C>(&mut self, conn: &C, item: I, summary: &mut BatchSummary) -> ResultEngine<()>
    where
        C: ConnectionTrait;
}

/// Called for every record classified as new, right before validation.
#[async_trait]
pub(crate) trait InsertHook<R: Send + 'static>: Send {
    async fn before_insert<C>(&mut self, conn: &C, record: &mut R) -> ResultEngine<()>
    where
        C: ConnectionTrait;
}

pub(crate) struct NoHook;

#[async_trait]
impl<R: Send + 'static> InsertHook<R> for NoHook {
    async fn before_insert<C>(&mut self, _conn: &C, _record: &mut R) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        Ok(())
    }
}

/// Normalize, classify and write one desired-state record.
pub(crate) struct Reconcile<H> {
    pub hook: H,
}

#[async_trait]
impl<R, H> BatchStep<R> for Reconcile<H>
where
    R: StoreRecord,
    H: InsertHook<R>,
{
    async fn apply<C>(
        &mut self,
        conn: &C,
        mut record: R,
        summary: &mut BatchSummary,
    ) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        record.normalize();
        match diff::classify(conn, &mut record).await? {
            Change::Unchanged => {
                tracing::debug!(entity = R::LABEL, key = %record.key(), "unchanged");
                summary.unchanged += 1;
            }
            Change::Modified => {
                record.validate()?;
                record.update(conn).await?;
                tracing::debug!(entity = R::LABEL, key = %record.key(), "updated");
                summary.updated += 1;
            }
            Change::New => {
                self.hook.before_insert(conn, &mut record).await?;
                record.validate()?;
                let key = record.insert(conn).await?;
                tracing::debug!(entity = R::LABEL, %key, "inserted");
                summary.inserted += 1;
            }
        }
        Ok(())
    }
}

/// Delete by key. With `check_existence` a missing key is counted as absent
/// before any delete is issued.
pub(crate) struct Remove<R> {
    check_existence: bool,
    record: PhantomData<fn() -> R>,
}

impl<R> Remove<R> {
    pub(crate) fn checked() -> Self {
        Self {
            check_existence: true,
            record: PhantomData,
        }
    }

    pub(crate) fn unconditional() -> Self {
        Self {
            check_existence: false,
            record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: StoreRecord> BatchStep<R::Key> for Remove<R>
where
    R::Key: 'static,
{
    async fn apply<C>(
        &mut self,
        conn: &C,
        key: R::Key,
        summary: &mut BatchSummary,
    ) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        let key = R::normalize_key(key);
        if self.check_existence && R::fetch(conn, &key).await?.is_none() {
            tracing::debug!(entity = R::LABEL, %key, "absent, nothing to delete");
            summary.absent += 1;
            return Ok(());
        }
        match R::delete(conn, &key).await? {
            0 => summary.absent += 1,
            removed => summary.deleted += removed as usize,
        }
        tracing::debug!(entity = R::LABEL, %key, "deleted");
        Ok(())
    }
}

/// Run `items` through `step` under `mode`.
pub(crate) async fn run_batch<I, S>(
    db: &DatabaseConnection,
    entity: &'static str,
    mode: BatchMode,
    items: Vec<I>,
    mut step: S,
) -> ResultEngine<BatchSummary>
where
    I: Send + 'static,
    S: BatchStep<I>,
{
    let mut summary = BatchSummary::default();
    match mode {
        BatchMode::Atomic => {
            let db_tx = db.begin().await?;
            for (index, item) in items.into_iter().enumerate() {
                if let Err(source) = step.apply(&db_tx, item, &mut summary).await {
                    let rollback = match db_tx.rollback().await {
                        Ok(()) => RollbackOutcome::RolledBack,
                        Err(err) => RollbackOutcome::Failed(err.to_string()),
                    };
                    tracing::warn!(entity, index, %source, %rollback, "atomic batch failed");
                    return Err(EngineError::PartialBatchFailure {
                        entity,
                        index,
                        source: Box::new(source),
                        rollback,
                    });
                }
            }
            db_tx.commit().await?;
        }
        BatchMode::PerRecord => {
            for (index, item) in items.into_iter().enumerate() {
                if let Err(err) = step.apply(db, item, &mut summary).await {
                    tracing::warn!(
                        entity,
                        index,
                        committed = index,
                        %err,
                        "batch stopped, earlier records stay committed"
                    );
                    return Err(err);
                }
            }
        }
    }
    tracing::info!(
        entity,
        ?mode,
        inserted = summary.inserted,
        updated = summary.updated,
        unchanged = summary.unchanged,
        deleted = summary.deleted,
        absent = summary.absent,
        "batch applied"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_record_is_the_default_mode() {
        assert_eq!(BatchMode::default(), BatchMode::PerRecord);
    }

    #[test]
    fn mode_reads_from_snake_case() {
        let mode: BatchMode = serde_json::from_str("\"atomic\"").unwrap();
        assert_eq!(mode, BatchMode::Atomic);
    }
}
