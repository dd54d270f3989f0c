use async_trait::async_trait;
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};

use crate::{
    BatchSummary, EngineError, Operation, OperationKind, ResultEngine, TransferPairing,
    batch::{InsertHook, Reconcile, Remove, run_batch},
    operations,
    pairing::{max_transaction_no, next_transaction_no},
};

use super::Engine;

/// Numbers new transfer legs as they are inserted.
#[derive(Default)]
struct PairTransfers {
    pairing: TransferPairing,
}

#[async_trait]
impl InsertHook<Operation> for PairTransfers {
    async fn before_insert<C>(&mut self, conn: &C, operation: &mut Operation) -> ResultEngine<()>
    where
        C: ConnectionTrait,
    {
        if operation.kind != OperationKind::Transfer {
            return Ok(());
        }
        if self.pairing.is_idle() {
            let next = next_transaction_no(conn).await?;
            self.pairing.start_pair(next);
        }
        let number = self.pairing.place_leg(operation).ok_or_else(|| {
            EngineError::ConstraintViolation("transfer leg without an open pair".to_string())
        })?;
        operation.transaction_no = number;
        Ok(())
    }
}

impl Engine {
    /// Reconcile a batch of operations.
    ///
    /// New transfers are paired in submission order: the first leg of a pair
    /// opens transaction number `MAX(transaction_no) + 1`, and the next leg of
    /// the opposite sign closes it. Existing transfer legs keep their stored
    /// number.
    pub async fn reconcile_operations(
        &self,
        operations: Vec<Operation>,
    ) -> ResultEngine<BatchSummary> {
        self.within_deadline(run_batch(
            &self.database,
            "operation",
            self.policy.operations,
            operations,
            Reconcile {
                hook: PairTransfers::default(),
            },
        ))
        .await
    }

    pub async fn delete_operations(&self, entry_nos: Vec<i64>) -> ResultEngine<BatchSummary> {
        self.within_deadline(run_batch(
            &self.database,
            "operation",
            self.policy.operations,
            entry_nos,
            Remove::<Operation>::unconditional(),
        ))
        .await
    }

    /// All operations, newest first.
    pub async fn operations(&self) -> ResultEngine<Vec<Operation>> {
        self.within_deadline(async {
            operations::Entity::find()
                .order_by_desc(operations::Column::DateTime)
                .order_by_asc(operations::Column::EntryNo)
                .all(&self.database)
                .await?
                .into_iter()
                .map(Operation::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
        .await
    }

    /// Highest transaction number in use, 0 when there are no operations.
    pub async fn max_transaction_no(&self) -> ResultEngine<i64> {
        self.within_deadline(max_transaction_no(&self.database)).await
    }
}
