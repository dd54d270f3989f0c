use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    Account, BatchSummary, ResultEngine,
    batch::{NoHook, Reconcile, Remove, run_batch},
    accounts,
};

use super::Engine;

impl Engine {
    /// Reconcile a batch of accounts. Records with an unknown id are inserted
    /// under a store-assigned id.
    pub async fn reconcile_accounts(&self, accounts: Vec<Account>) -> ResultEngine<BatchSummary> {
        self.within_deadline(run_batch(
            &self.database,
            "account",
            self.policy.accounts,
            accounts,
            Reconcile { hook: NoHook },
        ))
        .await
    }

    pub async fn delete_accounts(&self, ids: Vec<i32>) -> ResultEngine<BatchSummary> {
        self.within_deadline(run_batch(
            &self.database,
            "account",
            self.policy.accounts,
            ids,
            Remove::<Account>::unconditional(),
        ))
        .await
    }

    pub async fn accounts(&self) -> ResultEngine<Vec<Account>> {
        self.within_deadline(async {
            let models = accounts::Entity::find()
                .order_by_asc(accounts::Column::Id)
                .all(&self.database)
                .await?;
            Ok(models.into_iter().map(Account::from).collect())
        })
        .await
    }
}
