//! Categories API endpoints.

use api_types::{
    BatchReport,
    category::{Category, CategoryKey},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{ServerError, kind_from_engine, kind_to_engine, report, server::ServerState};

fn to_engine(category: Category) -> engine::Category {
    engine::Category {
        id: category.id,
        kind: kind_to_engine(category.kind),
        name: category.name,
        description: category.description,
    }
}

fn map_category(category: engine::Category) -> Category {
    Category {
        id: category.id,
        kind: kind_from_engine(category.kind),
        name: category.name,
        description: category.description,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Category>>, ServerError> {
    let categories = state
        .engine
        .categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn reconcile(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<Category>>, JsonRejection>,
) -> Result<Json<BatchReport>, ServerError> {
    let Json(payload) = payload?;
    let categories = payload.into_iter().map(to_engine).collect();
    let summary = state.engine.reconcile_categories(categories).await?;
    Ok(Json(report(summary)))
}

pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<Vec<CategoryKey>>, JsonRejection>,
) -> Result<Json<BatchReport>, ServerError> {
    let Json(payload) = payload?;
    let ids = payload.into_iter().map(|key| key.id).collect();
    let summary = state.engine.delete_categories(ids).await?;
    Ok(Json(report(summary)))
}
