//! Axum route handlers for the CV CRUD API.

use std::sync::MutexGuard;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::cv::photos::{content_type_for, ACCEPTED_PHOTO_TYPES, MAX_PHOTO_BYTES};
use crate::errors::AppError;
use crate::models::cv::{CvPayload, CvRecord};
use crate::state::AppState;
use crate::store::CvStore;

/// A parsed multipart submission: the `cvData` JSON part plus the optional
/// photo binary and the optional existing-photo reference.
struct Submission {
    payload: CvPayload,
    photo: Option<PhotoPart>,
    existing_photo: Option<String>,
}

struct PhotoPart {
    content_type: String,
    bytes: Bytes,
}

/// Drains the multipart body. The upload gate (size and MIME type) runs
/// here, before anything touches the filesystem.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut payload = None;
    let mut photo = None;
    let mut existing_photo = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(|name| name.to_string());
        match name.as_deref() {
            Some("cvData") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable cvData part: {e}")))?;
                let parsed: CvPayload = serde_json::from_str(&text)
                    .map_err(|e| AppError::Validation(format!("cvData is not valid JSON: {e}")))?;
                payload = Some(parsed);
            }
            Some("photo") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !ACCEPTED_PHOTO_TYPES.contains(&content_type.as_str()) {
                    return Err(AppError::Validation(
                        "Photo must be image/jpeg or image/png".to_string(),
                    ));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable photo part: {e}")))?;
                if bytes.len() > MAX_PHOTO_BYTES {
                    return Err(AppError::Validation(
                        "Photo exceeds the 5MB limit".to_string(),
                    ));
                }
                photo = Some(PhotoPart {
                    content_type,
                    bytes,
                });
            }
            Some("existingPhoto") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Unreadable existingPhoto part: {e}"))
                })?;
                existing_photo = Some(text);
            }
            _ => {}
        }
    }

    let payload =
        payload.ok_or_else(|| AppError::Validation("Missing cvData part".to_string()))?;
    Ok(Submission {
        payload,
        photo,
        existing_photo,
    })
}

fn lock_store(state: &AppState) -> Result<MutexGuard<'_, CvStore>, AppError> {
    state
        .store
        .lock()
        .map_err(|_| AppError::Storage(anyhow::anyhow!("store mutex poisoned")))
}

fn cv_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("CV {id} not found"))
}

/// GET /api/cvs
pub async fn handle_list_cvs(
    State(state): State<AppState>,
) -> Result<Json<Vec<CvRecord>>, AppError> {
    let store = lock_store(&state)?;
    Ok(Json(store.list()))
}

/// GET /api/cv/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CvRecord>, AppError> {
    let store = lock_store(&state)?;
    store.get(&id).map(Json).ok_or_else(|| cv_not_found(&id))
}

/// POST /api/cv
///
/// Multipart: `cvData` (JSON string) plus an optional `photo` binary. The
/// store assigns id and timestamps; a stored photo lands on
/// `personalInfo.photo` as a serving reference.
pub async fn handle_create_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CvRecord>), AppError> {
    let Submission {
        mut payload, photo, ..
    } = read_submission(multipart).await?;

    if let Some(part) = photo {
        let reference = state.photos.save(&part.bytes, &part.content_type)?;
        payload
            .personal_info
            .get_or_insert_with(Default::default)
            .photo = Some(reference);
    }

    let mut store = lock_store(&state)?;
    let record = store.create(payload)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/cv/:id
///
/// Multipart: `cvData`, optional `photo` binary, optional `existingPhoto`
/// reference. Top-level fields shallow-merge over the stored record; a new
/// binary replaces the stored photo file, a kept reference passes through,
/// and a payload that drops the photo releases the old file.
pub async fn handle_update_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<CvRecord>, AppError> {
    let Submission {
        mut payload,
        photo,
        existing_photo,
    } = read_submission(multipart).await?;

    let mut store = lock_store(&state)?;
    let current = store.get(&id).ok_or_else(|| cv_not_found(&id))?;
    let old_reference = current.personal_info.photo.clone();

    // Resolve the photo field once, before the merge.
    let new_reference = match photo {
        Some(part) => Some(state.photos.save(&part.bytes, &part.content_type)?),
        None => None,
    };
    let kept_reference = existing_photo.filter(|_| new_reference.is_none());
    if new_reference.is_some() || kept_reference.is_some() {
        let info = payload
            .personal_info
            .get_or_insert_with(|| current.personal_info.clone());
        info.photo = new_reference.or(kept_reference);
    }

    let updated = store.update(&id, payload)?.ok_or_else(|| cv_not_found(&id))?;

    // Release the superseded file after the collection write.
    if let Some(old) = old_reference {
        if updated.personal_info.photo.as_deref() != Some(old.as_str()) {
            state.photos.remove(&old);
        }
    }

    Ok(Json(updated))
}

/// DELETE /api/cv/:id
pub async fn handle_delete_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let mut store = lock_store(&state)?;
    let removed = store.delete(&id)?.ok_or_else(|| cv_not_found(&id))?;
    if let Some(reference) = removed.personal_info.photo {
        state.photos.remove(&reference);
    }
    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/cv/:id/photo
///
/// Removes only the photo association and file, leaving the record in place.
pub async fn handle_delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let mut store = lock_store(&state)?;
    let current = store.get(&id).ok_or_else(|| cv_not_found(&id))?;
    let Some(reference) = current.personal_info.photo else {
        return Err(AppError::Validation(format!("CV {id} has no photo to delete")));
    };

    store.set_photo(&id, None)?.ok_or_else(|| cv_not_found(&id))?;
    state.photos.remove(&reference);
    Ok(Json(json!({ "success": true })))
}

/// GET /api/image/:filename
///
/// Serves a stored photo binary with a content type derived from its file
/// extension. Traversal attempts resolve to NotFound before any file I/O.
pub async fn handle_get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let image_not_found = || AppError::NotFound(format!("Image {filename} not found"));
    let path = state.photos.resolve(&filename).ok_or_else(image_not_found)?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(image_not_found()),
        Err(e) => return Err(AppError::Storage(e.into())),
    };

    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], bytes).into_response())
}
