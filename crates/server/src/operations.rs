//! Operations API endpoints.

use api_types::{
    BatchReport,
    operation::{Operation, OperationKey},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{ServerError, kind_from_engine, kind_to_engine, report, server::ServerState};

fn to_engine(operation: Operation) -> engine::Operation {
    engine::Operation {
        entry_no: operation.entry_no,
        date_time: operation.date_time,
        kind: kind_to_engine(operation.kind),
        amount: operation.amount,
        source_id: operation.source_id,
        currency_code: operation.currency_code,
        category_id: operation.category_id,
        transaction_no: operation.transaction_no,
        description: operation.description,
    }
}

fn map_operation(operation: engine::Operation) -> Operation {
    Operation {
        entry_no: operation.entry_no,
        date_time: operation.date_time,
        kind: kind_from_engine(operation.kind),
        amount: operation.amount,
        source_id: operation.source_id,
        currency_code: operation.currency_code,
        category_id: operation.category_id,
        transaction_no: operation.transaction_no,
        description: operation.description,
    }
}

/// All operations, newest first.
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Operation>>, ServerError> {
    let operations = state
        .engine
        .operations()
        .await?
        .into_iter()
        .map(map_operation)
        .collect();
    Ok(Json(operations))
}

/// Reconcile submitted operations. Transfer legs are paired in the order they
/// appear in the payload.
pub async fn reconcile(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<Operation>>, JsonRejection>,
) -> Result<Json<BatchReport>, ServerError> {
    let Json(payload) = payload?;
    let operations = payload.into_iter().map(to_engine).collect();
    let summary = state.engine.reconcile_operations(operations).await?;
    Ok(Json(report(summary)))
}

pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<OperationKey>>, JsonRejection>,
) -> Result<Json<BatchReport>, ServerError> {
    let Json(payload) = payload?;
    let entry_nos = payload.into_iter().map(|key| key.entry_no).collect();
    let summary = state.engine.delete_operations(entry_nos).await?;
    Ok(Json(report(summary)))
}
