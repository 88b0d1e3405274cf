use axum::{extract::State, Json};

use crate::assist::parser::ParsedCompletion;
use crate::assist::{
    generate_project, generate_summary, generate_work_experience, DescriptionInput, SummaryInput,
    SummaryResponse,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::resume::models::{Project, WorkExperience};
use crate::state::AppState;

/// POST /api/v1/assist/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<SummaryInput>,
) -> Json<SummaryResponse> {
    Json(generate_summary(state.completion.as_ref(), &input).await)
}

/// POST /api/v1/assist/work-experience
pub async fn handle_work_experience(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<DescriptionInput>,
) -> Result<Json<ParsedCompletion<WorkExperience>>, AppError> {
    let parsed = generate_work_experience(state.completion.as_ref(), &input).await?;
    Ok(Json(parsed))
}

/// POST /api/v1/assist/project
pub async fn handle_project(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<DescriptionInput>,
) -> Result<Json<ParsedCompletion<Project>>, AppError> {
    let parsed = generate_project(state.completion.as_ref(), &input).await?;
    Ok(Json(parsed))
}
