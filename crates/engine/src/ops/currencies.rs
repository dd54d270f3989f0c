use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    BatchMode, BatchSummary, Currency, ResultEngine,
    batch::{NoHook, Reconcile, Remove, run_batch},
    currencies,
};

use super::Engine;

impl Engine {
    /// Reconcile a batch of currencies.
    ///
    /// Currency batches are always atomic: either every record is applied or
    /// the batch is rolled back and `PartialBatchFailure` names the failing
    /// record and whether the rollback succeeded.
    pub async fn reconcile_currencies(
        &self,
        currencies: Vec<Currency>,
    ) -> ResultEngine<BatchSummary> {
        self.within_deadline(run_batch(
            &self.database,
            "currency",
            BatchMode::Atomic,
            currencies,
            Reconcile { hook: NoHook },
        ))
        .await
    }

    /// Delete currencies by code inside one transaction.
    ///
    /// Codes are normalized first. Unknown codes are counted as absent and do
    /// not fail the batch.
    pub async fn delete_currencies(&self, codes: Vec<String>) -> ResultEngine<BatchSummary> {
        self.within_deadline(run_batch(
            &self.database,
            "currency",
            BatchMode::Atomic,
            codes,
            Remove::<Currency>::checked(),
        ))
        .await
    }

    /// All currencies ordered by code.
    pub async fn currencies(&self) -> ResultEngine<Vec<Currency>> {
        self.within_deadline(async {
            let models = currencies::Entity::find()
                .order_by_asc(currencies::Column::Code)
                .all(&self.database)
                .await?;
            Ok(models.into_iter().map(Currency::from).collect())
        })
        .await
    }
}
