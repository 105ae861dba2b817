// API handlers

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use skinscan_core::{
    DiseaseInfo, HealthStatus, PredictResponse, SymptomCatalog, SymptomCatalogResponse,
};

use crate::analysis::{self, parse_symptoms};
use crate::error::AppError;
use crate::image_check::check_upload;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let (model_loaded, num_classes) = match state.classifier.model_info().await {
        Ok(info) => (info.loaded, info.num_classes),
        Err(e) => {
            tracing::warn!(error = %e, "Model service health check failed");
            (false, 0)
        }
    };

    Json(HealthStatus {
        status: "ok".to_string(),
        model_loaded,
        num_classes,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/diseases
pub async fn diseases() -> Json<Vec<DiseaseInfo>> {
    Json(analysis::disease_catalog())
}

/// GET /api/symptoms
pub async fn symptoms() -> Json<SymptomCatalogResponse> {
    let catalog = SymptomCatalog::builtin();
    Json(SymptomCatalogResponse {
        categories: catalog.categories().to_vec(),
        all: catalog.all().into_iter().map(str::to_string).collect(),
    })
}

struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
    }
}

/// POST /api/predict - Classify an uploaded image and analyze symptoms
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Request is not multipart");
        AppError::BadRequest("Missing file field 'image'".to_string())
    })?;

    let mut upload: Option<Upload> = None;
    let mut symptoms_field: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                upload = Some(Upload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            Some("symptoms") => {
                symptoms_field = Some(field.text().await.map_err(multipart_error)?);
            }
            other => tracing::debug!(field = ?other, "Ignoring unknown multipart field"),
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::BadRequest("Missing file field 'image'".to_string()))?;
    let image = check_upload(
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
        upload.data,
        state.config.max_content_length,
    )?;
    let symptoms = parse_symptoms(symptoms_field.as_deref());

    tracing::info!(
        file = %image.file_name,
        bytes = image.data.len(),
        width = image.width,
        height = image.height,
        symptoms = symptoms.len(),
        "Analyzing image"
    );

    let classification = state
        .classifier
        .classify(&image.data, image.mime_type)
        .await?;

    let response = analysis::analyze(&classification, &symptoms)
        .ok_or_else(|| AppError::Internal("classifier returned no predictions".to_string()))?;

    tracing::info!(
        disease = %response.prediction.disease,
        confidence = response.prediction.confidence,
        severity = response.severity.level.as_str(),
        needs_review = response.prediction.needs_review,
        "Prediction complete"
    );

    Ok(Json(response))
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound
}
