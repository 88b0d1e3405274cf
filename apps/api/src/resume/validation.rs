//! Shape and constraint checks for every resume section.
//!
//! `check_*` functions only report. `parse_resume` reports and, on success,
//! returns the normalized document: strings trimmed, blank strings dropped.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::resume::models::{PhotoState, RepeatingItem, ResumeValues};

pub const MAX_PHOTO_BYTES: usize = 4 * 1024 * 1024;
pub const MIN_ASSIST_DESCRIPTION_CHARS: usize = 20;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Dotted path, e.g. `workExperiences.1.startDate`.
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Error)]
#[error("{}", join_fields(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Trims in place; a blank string becomes `None`.
pub fn normalize(slot: &mut Option<String>) {
    if let Some(value) = slot.take() {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            *slot = Some(trimmed.to_string());
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Checks every item of one collection, reporting paths as `collection.index.field`.
pub fn check_items<T: RepeatingItem>(collection: &str, items: &[T], errors: &mut ValidationErrors) {
    for (index, item) in items.iter().enumerate() {
        for (name, value) in item.fields() {
            let Some(value) = value.map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            if T::DATE_FIELDS.contains(&name) && parse_date(value).is_none() {
                errors.push(
                    format!("{collection}.{index}.{name}"),
                    "Must be a date in YYYY-MM-DD format",
                );
            }
        }
    }
}

pub fn check_photo(photo: &PhotoState, errors: &mut ValidationErrors) {
    if let PhotoState::Upload(upload) = photo {
        if !upload.content_type.starts_with("image/") {
            errors.push("photo", "Must be an image file");
        }
        if upload.bytes.len() > MAX_PHOTO_BYTES {
            errors.push("photo", "File must be less than 4mb");
        }
    }
}

pub fn check_color_hex(color: &Option<String>, errors: &mut ValidationErrors) {
    let Some(color) = non_blank(color) else {
        return;
    };
    let valid = color
        .strip_prefix('#')
        .map(|hex| (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);
    if !valid {
        errors.push("colorHex", "Must be a hex color such as #1f2937");
    }
}

/// Required free-text context for the structured assist actions.
pub fn check_assist_description(description: &str, errors: &mut ValidationErrors) {
    let length = description.trim().chars().count();
    if length == 0 {
        errors.push("description", "Required");
    } else if length < MIN_ASSIST_DESCRIPTION_CHARS {
        errors.push("description", "Must be at least 20 characters");
    }
}

/// Runs every check on a full document.
pub fn check_resume(values: &ResumeValues) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    check_photo(&values.photo, &mut errors);
    check_color_hex(&values.color_hex, &mut errors);
    check_items("workExperiences", &values.work_experiences, &mut errors);
    check_items("educations", &values.educations, &mut errors);
    check_items("projects", &values.projects, &mut errors);
    check_items("skillSet", &values.skill_set, &mut errors);
    check_items("courses", &values.courses, &mut errors);
    check_items("codingProfiles", &values.coding_profiles, &mut errors);
    check_items("custom", &values.custom, &mut errors);
    errors
}

fn normalize_items<T: RepeatingItem>(items: &mut [T]) {
    for item in items {
        for (_, slot) in item.fields_mut() {
            normalize(slot);
        }
    }
}

/// Validates and normalizes an incoming document.
pub fn parse_resume(mut values: ResumeValues) -> Result<ResumeValues, ValidationErrors> {
    let errors = check_resume(&values);
    if !errors.is_empty() {
        return Err(errors);
    }

    for slot in [
        &mut values.title,
        &mut values.description,
        &mut values.first_name,
        &mut values.last_name,
        &mut values.job_title,
        &mut values.city,
        &mut values.country,
        &mut values.phone,
        &mut values.email,
        &mut values.github_profile,
        &mut values.linkedin_profile,
        &mut values.summary,
        &mut values.color_hex,
    ] {
        normalize(slot);
    }
    normalize_items(&mut values.work_experiences);
    normalize_items(&mut values.educations);
    normalize_items(&mut values.projects);
    normalize_items(&mut values.skill_set);
    normalize_items(&mut values.courses);
    normalize_items(&mut values.coding_profiles);
    normalize_items(&mut values.custom);

    Ok(values)
}
