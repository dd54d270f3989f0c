use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    BatchSummary, Category, ResultEngine,
    batch::{NoHook, Reconcile, Remove, run_batch},
    categories,
};

use super::Engine;

impl Engine {
    pub async fn reconcile_categories(
        &self,
        categories: Vec<Category>,
    ) -> ResultEngine<BatchSummary> {
        self.within_deadline(run_batch(
            &self.database,
            "category",
            self.policy.categories,
            categories,
            Reconcile { hook: NoHook },
        ))
        .await
    }

    pub async fn delete_categories(&self, ids: Vec<i32>) -> ResultEngine<BatchSummary> {
        self.within_deadline(run_batch(
            &self.database,
            "category",
            self.policy.categories,
            ids,
            Remove::<Category>::unconditional(),
        ))
        .await
    }

    /// All categories ordered by id.
    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        self.within_deadline(async {
            categories::Entity::find()
                .order_by_asc(categories::Column::Id)
                .all(&self.database)
                .await?
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
        .await
    }
}
