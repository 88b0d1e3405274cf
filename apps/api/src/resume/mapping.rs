//! Persisted record → editable document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;
use crate::resume::models::{
    BorderStyle, CodingProfile, Course, CustomSection, Education, PhotoState, Project,
    ResumeValues, SkillGroup, WorkExperience,
};
use crate::resume::validation::DATE_FORMAT;

/// Editable values plus the store's timestamps, as returned by save and list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSnapshot {
    #[serde(flatten)]
    pub values: ResumeValues,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn present(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

fn date_only(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format(DATE_FORMAT).to_string())
}

pub fn to_resume_values(record: &ResumeRecord) -> ResumeValues {
    let row = &record.resume;
    let children = &record.children;

    ResumeValues {
        id: Some(row.id),
        title: present(&row.title),
        description: present(&row.description),
        photo: match present(&row.photo_url) {
            Some(url) => PhotoState::Existing(url),
            None => PhotoState::Unset,
        },
        first_name: present(&row.first_name),
        last_name: present(&row.last_name),
        job_title: present(&row.job_title),
        city: present(&row.city),
        country: present(&row.country),
        phone: present(&row.phone),
        email: present(&row.email),
        github_profile: present(&row.github_profile),
        linkedin_profile: present(&row.linkedin_profile),
        summary: present(&row.summary),
        color_hex: present(&row.color_hex),
        border_style: row.border_style.as_deref().and_then(BorderStyle::parse),
        work_experiences: children
            .work_experiences
            .iter()
            .map(|w| WorkExperience {
                position: present(&w.position),
                company: present(&w.company),
                company_location: present(&w.company_location),
                start_date: date_only(w.start_date),
                end_date: date_only(w.end_date),
                description: present(&w.description),
            })
            .collect(),
        educations: children
            .educations
            .iter()
            .map(|e| Education {
                degree: present(&e.degree),
                school: present(&e.school),
                start_date: date_only(e.start_date),
                end_date: date_only(e.end_date),
                cgpa: present(&e.cgpa),
            })
            .collect(),
        projects: children
            .projects
            .iter()
            .map(|p| Project {
                project_name: present(&p.project_name),
                link: present(&p.link),
                tech_stack: present(&p.tech_stack),
                description: present(&p.description),
            })
            .collect(),
        skill_set: children
            .skill_set
            .iter()
            .map(|s| SkillGroup {
                languages: present(&s.languages),
                frameworks: present(&s.frameworks),
                tools: present(&s.tools),
                libraries: present(&s.libraries),
            })
            .collect(),
        courses: children
            .courses
            .iter()
            .map(|c| Course {
                course: present(&c.course),
                learning_platform: present(&c.learning_platform),
                course_link: present(&c.course_link),
                description: present(&c.description),
            })
            .collect(),
        coding_profiles: children
            .coding_profiles
            .iter()
            .map(|c| CodingProfile {
                coding_profile: present(&c.coding_profile),
                coding_profile_link: present(&c.coding_profile_link),
                description: present(&c.description),
            })
            .collect(),
        custom: children
            .custom
            .iter()
            .map(|c| CustomSection {
                heading: present(&c.heading),
                description: present(&c.description),
                link: present(&c.link),
            })
            .collect(),
    }
}

pub fn to_snapshot(record: &ResumeRecord) -> ResumeSnapshot {
    ResumeSnapshot {
        values: to_resume_values(record),
        created_at: record.resume.created_at,
        updated_at: record.resume.updated_at,
    }
}
