//! The resume aggregate in its editable (wire) form.
//!
//! Every field is optional. Repeating collections are ordered by array index;
//! an item whose fields are all blank is kept here and skipped at render time.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Shape shared by every repeating item: a flat record of optional strings.
pub trait RepeatingItem: Clone + Default {
    /// Date-only (`YYYY-MM-DD`) fields, by wire name.
    const DATE_FIELDS: &'static [&'static str] = &[];

    /// `(wire name, value)` pairs in declaration order.
    fn fields(&self) -> Vec<(&'static str, Option<&str>)>;

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)>;

    /// True when every field is absent or whitespace.
    fn is_blank(&self) -> bool {
        self.fields()
            .iter()
            .all(|(_, v)| v.map_or(true, |s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Square,
    Circle,
    Rounded,
}

impl BorderStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Square => "square",
            BorderStyle::Circle => "circle",
            BorderStyle::Rounded => "rounded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Some(BorderStyle::Square),
            "circle" => Some(BorderStyle::Circle),
            "rounded" => Some(BorderStyle::Rounded),
            _ => None,
        }
    }
}

/// A photo that has been picked in the editor but not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub bytes: Bytes,
    pub content_type: String,
    pub filename: String,
}

/// The photo field across an editing session. Resolved exactly once at save.
///
/// Wire form: field absent → `Unset`, `null` → `Removed`, string → `Existing`.
/// `Upload` only arrives through the multipart `photo` part.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PhotoState {
    #[default]
    Unset,
    Upload(PhotoUpload),
    Existing(String),
    Removed,
}

impl PhotoState {
    /// Absent and pending-upload photos are left off the wire.
    pub fn skip_on_wire(&self) -> bool {
        matches!(self, PhotoState::Unset | PhotoState::Upload(_))
    }

    fn deserialize_present<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => PhotoState::Removed,
            Some(url) if url.trim().is_empty() => PhotoState::Unset,
            Some(url) => PhotoState::Existing(url),
        })
    }
}

impl Serialize for PhotoState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PhotoState::Existing(url) => serializer.serialize_str(url),
            _ => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkExperience {
    pub position: Option<String>,
    pub company: Option<String>,
    pub company_location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

impl RepeatingItem for WorkExperience {
    const DATE_FIELDS: &'static [&'static str] = &["startDate", "endDate"];

    fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("position", self.position.as_deref()),
            ("company", self.company.as_deref()),
            ("companyLocation", self.company_location.as_deref()),
            ("startDate", self.start_date.as_deref()),
            ("endDate", self.end_date.as_deref()),
            ("description", self.description.as_deref()),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)> {
        vec![
            ("position", &mut self.position),
            ("company", &mut self.company),
            ("companyLocation", &mut self.company_location),
            ("startDate", &mut self.start_date),
            ("endDate", &mut self.end_date),
            ("description", &mut self.description),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub degree: Option<String>,
    pub school: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub cgpa: Option<String>,
}

impl RepeatingItem for Education {
    const DATE_FIELDS: &'static [&'static str] = &["startDate", "endDate"];

    fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("degree", self.degree.as_deref()),
            ("school", self.school.as_deref()),
            ("startDate", self.start_date.as_deref()),
            ("endDate", self.end_date.as_deref()),
            ("cgpa", self.cgpa.as_deref()),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)> {
        vec![
            ("degree", &mut self.degree),
            ("school", &mut self.school),
            ("startDate", &mut self.start_date),
            ("endDate", &mut self.end_date),
            ("cgpa", &mut self.cgpa),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub project_name: Option<String>,
    pub link: Option<String>,
    pub tech_stack: Option<String>,
    pub description: Option<String>,
}

impl RepeatingItem for Project {
    fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("projectName", self.project_name.as_deref()),
            ("link", self.link.as_deref()),
            ("techStack", self.tech_stack.as_deref()),
            ("description", self.description.as_deref()),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)> {
        vec![
            ("projectName", &mut self.project_name),
            ("link", &mut self.link),
            ("techStack", &mut self.tech_stack),
            ("description", &mut self.description),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillGroup {
    pub languages: Option<String>,
    pub frameworks: Option<String>,
    pub tools: Option<String>,
    pub libraries: Option<String>,
}

impl RepeatingItem for SkillGroup {
    fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("languages", self.languages.as_deref()),
            ("frameworks", self.frameworks.as_deref()),
            ("tools", self.tools.as_deref()),
            ("libraries", self.libraries.as_deref()),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)> {
        vec![
            ("languages", &mut self.languages),
            ("frameworks", &mut self.frameworks),
            ("tools", &mut self.tools),
            ("libraries", &mut self.libraries),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    pub course: Option<String>,
    pub learning_platform: Option<String>,
    pub course_link: Option<String>,
    pub description: Option<String>,
}

impl RepeatingItem for Course {
    fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("course", self.course.as_deref()),
            ("learningPlatform", self.learning_platform.as_deref()),
            ("courseLink", self.course_link.as_deref()),
            ("description", self.description.as_deref()),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)> {
        vec![
            ("course", &mut self.course),
            ("learningPlatform", &mut self.learning_platform),
            ("courseLink", &mut self.course_link),
            ("description", &mut self.description),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodingProfile {
    pub coding_profile: Option<String>,
    pub coding_profile_link: Option<String>,
    pub description: Option<String>,
}

impl RepeatingItem for CodingProfile {
    fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("codingProfile", self.coding_profile.as_deref()),
            ("codingProfileLink", self.coding_profile_link.as_deref()),
            ("description", self.description.as_deref()),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)> {
        vec![
            ("codingProfile", &mut self.coding_profile),
            ("codingProfileLink", &mut self.coding_profile_link),
            ("description", &mut self.description),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomSection {
    pub heading: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl RepeatingItem for CustomSection {
    fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("heading", self.heading.as_deref()),
            ("description", self.description.as_deref()),
            ("link", self.link.as_deref()),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)> {
        vec![
            ("heading", &mut self.heading),
            ("description", &mut self.description),
            ("link", &mut self.link),
        ]
    }
}

/// The root aggregate: one resume document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    // General info
    pub title: Option<String>,
    pub description: Option<String>,

    // Personal info
    #[serde(
        skip_serializing_if = "PhotoState::skip_on_wire",
        deserialize_with = "PhotoState::deserialize_present"
    )]
    pub photo: PhotoState,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub github_profile: Option<String>,
    pub linkedin_profile: Option<String>,

    pub summary: Option<String>,
    pub color_hex: Option<String>,
    pub border_style: Option<BorderStyle>,

    pub work_experiences: Vec<WorkExperience>,
    pub educations: Vec<Education>,
    pub projects: Vec<Project>,
    pub skill_set: Vec<SkillGroup>,
    pub courses: Vec<Course>,
    pub coding_profiles: Vec<CodingProfile>,
    pub custom: Vec<CustomSection>,
}
