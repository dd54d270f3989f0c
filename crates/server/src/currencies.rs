//! Currencies API endpoints.

use api_types::{
    BatchReport,
    currency::{Currency, CurrencyKey},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{ServerError, report, server::ServerState};

fn to_engine(currency: Currency) -> engine::Currency {
    engine::Currency {
        code: currency.code,
        description: currency.description,
    }
}

fn map_currency(currency: engine::Currency) -> Currency {
    Currency {
        code: currency.code,
        description: currency.description,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Currency>>, ServerError> {
    let currencies = state
        .engine
        .currencies()
        .await?
        .into_iter()
        .map(map_currency)
        .collect();
    Ok(Json(currencies))
}

/// Apply the submitted currencies as one atomic batch.
pub async fn reconcile(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<Currency>>, JsonRejection>,
) -> Result<Json<BatchReport>, ServerError> {
    let Json(payload) = payload?;
    let currencies = payload.into_iter().map(to_engine).collect();
    let summary = state.engine.reconcile_currencies(currencies).await?;
    Ok(Json(report(summary)))
}

pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<CurrencyKey>>, JsonRejection>,
) -> Result<Json<BatchReport>, ServerError> {
    let Json(payload) = payload?;
    let codes = payload.into_iter().map(|key| key.code).collect();
    let summary = state.engine.delete_currencies(codes).await?;
    Ok(Json(report(summary)))
}
