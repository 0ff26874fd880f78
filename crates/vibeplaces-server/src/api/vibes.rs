use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use vibeplaces_core::VibeDefinition;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct VibeListResponse {
    success: bool,
    count: usize,
    vibes: Vec<VibeDefinition>,
}

#[derive(Debug, Serialize)]
pub(super) struct VibeResponse {
    success: bool,
    vibe: VibeDefinition,
}

pub(super) async fn list_vibes(State(state): State<AppState>) -> Json<VibeListResponse> {
    let vibes = state.catalog.list_all().to_vec();
    Json(VibeListResponse {
        success: true,
        count: vibes.len(),
        vibes,
    })
}

pub(super) async fn get_vibe(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<VibeResponse>, ApiError> {
    let vibe = state
        .catalog
        .get_by_id(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(&req_id.0, format!("vibe '{id}' not found")))?;

    Ok(Json(VibeResponse {
        success: true,
        vibe,
    }))
}
