//! AI assist actions: summary, work experience and project drafts.
//!
//! Upstream failures never surface to the caller. A failed completion reads
//! exactly like one the parser could not use: empty fields, all listed as
//! missing.

pub mod handlers;
pub mod parser;
pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::CompletionClient;
use crate::resume::models::{CustomSection, Education, Project, SkillGroup, WorkExperience};
use crate::resume::validation::{check_assist_description, ValidationErrors};

use parser::{empty_project, empty_work_experience, parse_project, parse_work_experience, ParsedCompletion};
use prompts::{
    project_user_message, summary_user_message, work_experience_user_message, PROJECT_MAX_TOKENS,
    PROJECT_SYSTEM, SUMMARY_MAX_TOKENS, SUMMARY_SYSTEM, WORK_EXPERIENCE_MAX_TOKENS,
    WORK_EXPERIENCE_SYSTEM,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummaryInput {
    pub job_title: Option<String>,
    pub work_experiences: Vec<WorkExperience>,
    pub educations: Vec<Education>,
    pub skill_set: Vec<SkillGroup>,
    pub custom: Vec<CustomSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionInput {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

fn require_description(input: &DescriptionInput) -> Result<&str, AppError> {
    let mut errors = ValidationErrors::default();
    check_assist_description(&input.description, &mut errors);
    errors.into_result(input.description.trim()).map_err(AppError::from)
}

/// Summary text, trimmed. Empty on upstream failure.
pub async fn generate_summary(client: &dyn CompletionClient, input: &SummaryInput) -> SummaryResponse {
    let user = summary_user_message(input);
    let summary = match client.complete(SUMMARY_SYSTEM, &user, SUMMARY_MAX_TOKENS).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(upstream_failed = true, "Summary completion failed: {e}");
            String::new()
        }
    };
    SummaryResponse { summary }
}

pub async fn generate_work_experience(
    client: &dyn CompletionClient,
    input: &DescriptionInput,
) -> Result<ParsedCompletion<WorkExperience>, AppError> {
    let description = require_description(input)?;
    let user = work_experience_user_message(description);

    let parsed = match client
        .complete(WORK_EXPERIENCE_SYSTEM, &user, WORK_EXPERIENCE_MAX_TOKENS)
        .await
    {
        Ok(text) => parse_work_experience(&text),
        Err(e) => {
            warn!(upstream_failed = true, "Work experience completion failed: {e}");
            empty_work_experience()
        }
    };
    info!(outcome = ?parsed.outcome(), missing = ?parsed.missing, "Work experience draft generated");
    Ok(parsed)
}

pub async fn generate_project(
    client: &dyn CompletionClient,
    input: &DescriptionInput,
) -> Result<ParsedCompletion<Project>, AppError> {
    let description = require_description(input)?;
    let user = project_user_message(description);

    let parsed = match client.complete(PROJECT_SYSTEM, &user, PROJECT_MAX_TOKENS).await {
        Ok(text) => parse_project(&text),
        Err(e) => {
            warn!(upstream_failed = true, "Project completion failed: {e}");
            empty_project()
        }
    };
    info!(outcome = ?parsed.outcome(), missing = ?parsed.missing, "Project draft generated");
    Ok(parsed)
}
