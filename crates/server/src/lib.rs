use api_types::{BatchReport, OperationType};
use axum::{
    Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse,
};
use engine::{BatchSummary, EngineError, OperationKind};

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener};

mod accounts;
mod categories;
mod currencies;
mod operations;
mod server;
mod statistics;

pub mod types {
    pub mod currency {
        pub use api_types::currency::{Currency, CurrencyKey};
    }

    pub mod account {
        pub use api_types::account::{Account, AccountKey, AccountStatistic};
    }

    pub mod category {
        pub use api_types::category::{Category, CategoryKey};
    }

    pub mod operation {
        pub use api_types::operation::{Operation, OperationKey};
    }

    pub use api_types::{BatchReport, OperationType};
}

pub enum ServerError {
    Engine(EngineError),
    /// Request body that did not parse into the expected payload.
    Payload(JsonRejection),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ConstraintViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::PartialBatchFailure {
            source, rollback, ..
        } => {
            if rollback.is_rolled_back() {
                status_for_engine_error(source)
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err.root() {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        _ => err.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Payload(rejection) => (rejection.status(), rejection.body_text()),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Payload(value)
    }
}

fn report(summary: BatchSummary) -> BatchReport {
    BatchReport {
        inserted: summary.inserted,
        updated: summary.updated,
        unchanged: summary.unchanged,
        deleted: summary.deleted,
        absent: summary.absent,
    }
}

fn kind_to_engine(kind: OperationType) -> OperationKind {
    match kind {
        OperationType::Income => OperationKind::Income,
        OperationType::Expense => OperationKind::Expense,
        OperationType::Transfer => OperationKind::Transfer,
    }
}

fn kind_from_engine(kind: OperationKind) -> OperationType {
    match kind {
        OperationKind::Income => OperationType::Income,
        OperationKind::Expense => OperationType::Expense,
        OperationKind::Transfer => OperationType::Transfer,
    }
}
