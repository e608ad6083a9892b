use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    pkg::{
        internal::{
            adaptors::applications::spec::ApplicationEntry,
            service::{self, CreateApplicationInput, PatchApplicationInput},
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListQuery>, AppError>,
) -> Result<Json<Vec<ApplicationEntry>>> {
    let apps = service::list(state.store.as_ref(), params.status.as_deref()).await?;
    Ok(Json(apps))
}

pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreateApplicationInput>, AppError>,
) -> Result<(StatusCode, Json<ApplicationEntry>)> {
    let created = service::create(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<PatchApplicationInput>, AppError>,
) -> Result<Json<ApplicationEntry>> {
    let updated = service::update(state.store.as_ref(), &id, input).await?;
    Ok(Json(updated))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    service::delete(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
