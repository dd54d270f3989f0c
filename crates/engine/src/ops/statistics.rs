use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::{Operation, ResultEngine, accounts, operations};

use super::Engine;

/// Sum of operation amounts booked against one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatistic {
    pub account_id: i32,
    pub name: String,
    pub total: Decimal,
    pub currency_code: String,
}

impl Engine {
    /// Totals per account, ordered by account name. Accounts without
    /// operations are left out.
    ///
    /// Amounts are stored as decimal text, so the sum is taken here rather
    /// than in SQL to keep full precision.
    pub async fn account_statistics(&self) -> ResultEngine<Vec<AccountStatistic>> {
        self.within_deadline(async {
            let mut totals: BTreeMap<i32, Decimal> = BTreeMap::new();
            for model in operations::Entity::find().all(&self.database).await? {
                let operation = Operation::try_from(model)?;
                *totals.entry(operation.source_id).or_default() += operation.amount;
            }

            let accounts = accounts::Entity::find()
                .order_by_asc(accounts::Column::Name)
                .order_by_asc(accounts::Column::Id)
                .all(&self.database)
                .await?;
            Ok(accounts
                .into_iter()
                .filter_map(|account| {
                    totals.get(&account.id).map(|total| AccountStatistic {
                        account_id: account.id,
                        name: account.name,
                        total: total.normalize(),
                        currency_code: account.currency_code,
                    })
                })
                .collect())
        })
        .await
    }
}
