//! Accounts API endpoints.

use api_types::{
    BatchReport,
    account::{Account, AccountKey},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{ServerError, report, server::ServerState};

fn to_engine(account: Account) -> engine::Account {
    engine::Account {
        id: account.id,
        name: account.name,
        currency_code: account.currency_code,
    }
}

fn map_account(account: engine::Account) -> Account {
    Account {
        id: account.id,
        name: account.name,
        currency_code: account.currency_code,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Account>>, ServerError> {
    let accounts = state
        .engine
        .accounts()
        .await?
        .into_iter()
        .map(map_account)
        .collect();
    Ok(Json(accounts))
}

pub async fn reconcile(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<Account>>, JsonRejection>,
) -> Result<Json<BatchReport>, ServerError> {
    let Json(payload) = payload?;
    let accounts = payload.into_iter().map(to_engine).collect();
    let summary = state.engine.reconcile_accounts(accounts).await?;
    Ok(Json(report(summary)))
}

pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<AccountKey>>, JsonRejection>,
) -> Result<Json<BatchReport>, ServerError> {
    let Json(payload) = payload?;
    let ids = payload.into_iter().map(|key| key.id).collect();
    let summary = state.engine.delete_accounts(ids).await?;
    Ok(Json(report(summary)))
}
