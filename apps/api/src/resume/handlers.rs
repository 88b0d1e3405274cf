use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::resume::mapping::ResumeSnapshot;
use crate::resume::models::{PhotoState, PhotoUpload, ResumeValues};
use crate::resume::persistence::{
    delete_resume, list_resumes, load_resume, save_resume, ResumeListResponse,
};
use crate::resume::preview::{preview_page, print_page, render};
use crate::resume::validation::{parse_resume, ValidationErrors};
use crate::state::AppState;

fn invalid(field: &str, message: impl Into<String>) -> AppError {
    let mut errors = ValidationErrors::default();
    errors.push(field, message);
    AppError::Validation(errors)
}

/// A body over the route's size limit can only be an oversized photo, so it is
/// reported against that field.
fn unreadable(field: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return invalid("photo", "File must be less than 4mb");
    }
    invalid(field, format!("Unreadable multipart body: {}", e.body_text()))
}

/// Reads the `resume` JSON part and the optional `photo` file part.
/// An empty `photo` part (no file chosen) is ignored.
async fn read_save_form(mut multipart: Multipart) -> Result<ResumeValues, AppError> {
    let mut values: Option<ResumeValues> = None;
    let mut upload: Option<PhotoUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| unreadable("body", e))?
    {
        match field.name() {
            Some("resume") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| unreadable("resume", e))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| invalid("resume", format!("Invalid resume document: {e}")))?;
                values = Some(parsed);
            }
            Some("photo") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let filename = field.file_name().unwrap_or("photo").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| unreadable("photo", e))?;
                if !bytes.is_empty() {
                    upload = Some(PhotoUpload {
                        bytes,
                        content_type,
                        filename,
                    });
                }
            }
            other => debug!("Ignoring multipart field {other:?}"),
        }
    }

    let mut values = values.ok_or_else(|| invalid("resume", "Required"))?;
    if let Some(upload) = upload {
        values.photo = PhotoState::Upload(upload);
    }
    Ok(values)
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ResumeListResponse>, AppError> {
    let list = list_resumes(state.store.as_ref(), state.cache.as_ref(), &user.user_id).await?;
    Ok(Json(list))
}

/// POST /api/v1/resumes
pub async fn handle_save(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeSnapshot>), AppError> {
    let values = read_save_form(multipart).await?;
    let status = if values.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let saved = save_resume(
        state.store.as_ref(),
        state.blobs.as_ref(),
        state.cache.as_ref(),
        &user.user_id,
        values,
    )
    .await?;
    Ok((status, Json(saved)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeValues>, AppError> {
    let values = load_resume(state.store.as_ref(), &user.user_id, id).await?;
    Ok(Json(values))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_resume(
        state.store.as_ref(),
        state.blobs.as_ref(),
        state.cache.as_ref(),
        &user.user_id,
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes/:id/print
pub async fn handle_print(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let values = load_resume(state.store.as_ref(), &user.user_id, id).await?;
    Ok(Html(print_page(&render(&values))))
}

/// POST /api/v1/resumes/preview
pub async fn handle_preview(
    _user: AuthUser,
    Json(values): Json<ResumeValues>,
) -> Result<Html<String>, AppError> {
    let values = parse_resume(values)?;
    Ok(Html(preview_page(&render(&values))))
}
