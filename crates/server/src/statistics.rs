//! Statistics API endpoints

use api_types::account::AccountStatistic;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Handle requests for per-account totals
pub async fn accounts(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountStatistic>>, ServerError> {
    let statistics = state
        .engine
        .account_statistics()
        .await?
        .into_iter()
        .map(|stat| AccountStatistic {
            account_id: stat.account_id,
            name: stat.name,
            total: stat.total,
            currency_code: stat.currency_code,
        })
        .collect();
    Ok(Json(statistics))
}
