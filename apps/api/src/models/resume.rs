use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::resume::models::ResumeValues;
use crate::resume::validation::parse_date;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
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
    pub border_style: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Scalar columns for a normalized document. `photo_url` is the already
    /// resolved photo reference.
    pub fn from_values(
        id: Uuid,
        user_id: &str,
        values: &ResumeValues,
        photo_url: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        ResumeRow {
            id,
            user_id: user_id.to_string(),
            title: values.title.clone(),
            description: values.description.clone(),
            photo_url: photo_url.map(str::to_string),
            first_name: values.first_name.clone(),
            last_name: values.last_name.clone(),
            job_title: values.job_title.clone(),
            city: values.city.clone(),
            country: values.country.clone(),
            phone: values.phone.clone(),
            email: values.email.clone(),
            github_profile: values.github_profile.clone(),
            linkedin_profile: values.linkedin_profile.clone(),
            summary: values.summary.clone(),
            color_hex: values.color_hex.clone(),
            border_style: values.border_style.map(|b| b.as_str().to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkExperienceRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub sort_order: i32,
    pub position: Option<String>,
    pub company: Option<String>,
    pub company_location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub sort_order: i32,
    pub degree: Option<String>,
    pub school: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cgpa: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub sort_order: i32,
    pub project_name: Option<String>,
    pub link: Option<String>,
    pub tech_stack: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillSetRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub sort_order: i32,
    pub languages: Option<String>,
    pub frameworks: Option<String>,
    pub tools: Option<String>,
    pub libraries: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub sort_order: i32,
    pub course: Option<String>,
    pub learning_platform: Option<String>,
    pub course_link: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CodingProfileRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub sort_order: i32,
    pub coding_profile: Option<String>,
    pub coding_profile_link: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomSectionRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub sort_order: i32,
    pub heading: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// The seven child collections of one resume, each ordered by `sort_order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildRows {
    pub work_experiences: Vec<WorkExperienceRow>,
    pub educations: Vec<EducationRow>,
    pub projects: Vec<ProjectRow>,
    pub skill_set: Vec<SkillSetRow>,
    pub courses: Vec<CourseRow>,
    pub coding_profiles: Vec<CodingProfileRow>,
    pub custom: Vec<CustomSectionRow>,
}

fn date(value: &Option<String>) -> Option<NaiveDate> {
    value.as_deref().and_then(parse_date)
}

impl ChildRows {
    /// Fresh rows for every item, with `sort_order` taken from the array index.
    /// Child ids are regenerated on every save.
    pub fn from_values(resume_id: Uuid, values: &ResumeValues) -> Self {
        let order = |index: usize| index as i32;
        ChildRows {
            work_experiences: values
                .work_experiences
                .iter()
                .enumerate()
                .map(|(i, w)| WorkExperienceRow {
                    id: Uuid::new_v4(),
                    resume_id,
                    sort_order: order(i),
                    position: w.position.clone(),
                    company: w.company.clone(),
                    company_location: w.company_location.clone(),
                    start_date: date(&w.start_date),
                    end_date: date(&w.end_date),
                    description: w.description.clone(),
                })
                .collect(),
            educations: values
                .educations
                .iter()
                .enumerate()
                .map(|(i, e)| EducationRow {
                    id: Uuid::new_v4(),
                    resume_id,
                    sort_order: order(i),
                    degree: e.degree.clone(),
                    school: e.school.clone(),
                    start_date: date(&e.start_date),
                    end_date: date(&e.end_date),
                    cgpa: e.cgpa.clone(),
                })
                .collect(),
            projects: values
                .projects
                .iter()
                .enumerate()
                .map(|(i, p)| ProjectRow {
                    id: Uuid::new_v4(),
                    resume_id,
                    sort_order: order(i),
                    project_name: p.project_name.clone(),
                    link: p.link.clone(),
                    tech_stack: p.tech_stack.clone(),
                    description: p.description.clone(),
                })
                .collect(),
            skill_set: values
                .skill_set
                .iter()
                .enumerate()
                .map(|(i, s)| SkillSetRow {
                    id: Uuid::new_v4(),
                    resume_id,
                    sort_order: order(i),
                    languages: s.languages.clone(),
                    frameworks: s.frameworks.clone(),
                    tools: s.tools.clone(),
                    libraries: s.libraries.clone(),
                })
                .collect(),
            courses: values
                .courses
                .iter()
                .enumerate()
                .map(|(i, c)| CourseRow {
                    id: Uuid::new_v4(),
                    resume_id,
                    sort_order: order(i),
                    course: c.course.clone(),
                    learning_platform: c.learning_platform.clone(),
                    course_link: c.course_link.clone(),
                    description: c.description.clone(),
                })
                .collect(),
            coding_profiles: values
                .coding_profiles
                .iter()
                .enumerate()
                .map(|(i, c)| CodingProfileRow {
                    id: Uuid::new_v4(),
                    resume_id,
                    sort_order: order(i),
                    coding_profile: c.coding_profile.clone(),
                    coding_profile_link: c.coding_profile_link.clone(),
                    description: c.description.clone(),
                })
                .collect(),
            custom: values
                .custom
                .iter()
                .enumerate()
                .map(|(i, c)| CustomSectionRow {
                    id: Uuid::new_v4(),
                    resume_id,
                    sort_order: order(i),
                    heading: c.heading.clone(),
                    description: c.description.clone(),
                    link: c.link.clone(),
                })
                .collect(),
        }
    }
}

/// A persisted resume with all of its child collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(flatten)]
    pub resume: ResumeRow,
    #[serde(flatten)]
    pub children: ChildRows,
}
