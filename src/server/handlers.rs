use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderName};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::core::error::Error;
use crate::export::{build_pack, ExportRequest};
use crate::llm::InlineImage;
use crate::matching::{match_image, MatchResponse};

const IMAGE_COUNT_HEADER: &str = "x-image-count";
const PACK_FILE_NAME: &str = "reference-pack.zip";

#[derive(Debug, Default, Deserialize)]
pub struct MatchRequest {
    /// `data:<mime>;base64,<data>`
    #[serde(default)]
    pub image: Option<String>,
}

/// POST /api/match
pub(super) async fn match_reference(
    State(state): State<AppState>,
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
    let Json(req) = body?;
    let data_url = req
        .image
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::BadRequest("No image provided".to_string()))?;
    let model = state.model()?;
    let image = InlineImage::from_data_url(&data_url)?;
    let index = state.paths.load_index()?;

    let response = match_image(model, &index, image).await?;
    tracing::info!(
        "Matched {} of {} blocks",
        response.matches.len(),
        response.total_indexed
    );
    Ok(Json(response))
}

/// POST /api/export-pack
pub(super) async fn export_pack(
    State(state): State<AppState>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let guide = req.primary_id.and_then(|id| state.guides().read_body(id));
    let pack = build_pack(state.images.as_ref(), &req, guide.as_deref()).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", PACK_FILE_NAME),
        ),
        (
            HeaderName::from_static(IMAGE_COUNT_HEADER),
            pack.image_count.to_string(),
        ),
    ];
    Ok((headers, pack.bytes).into_response())
}
