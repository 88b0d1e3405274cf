//! Relational storage for resumes and their child collections.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{
    ChildRows, CodingProfileRow, CourseRow, CustomSectionRow, EducationRow, ProjectRow,
    ResumeRecord, ResumeRow, SkillSetRow, WorkExperienceRow,
};
use crate::resume::models::ResumeValues;

/// A normalized document plus the photo reference resolved for this save.
#[derive(Debug, Clone, Copy)]
pub struct ResumeWrite<'a> {
    pub values: &'a ResumeValues,
    pub photo_url: Option<&'a str>,
}

/// Every query is scoped by the owning user. A resume owned by someone else
/// is indistinguishable from one that does not exist.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn find_owned(&self, user_id: &str, id: Uuid) -> Result<Option<ResumeRecord>, AppError>;

    /// Newest first by `updated_at`.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ResumeRecord>, AppError>;

    async fn insert(&self, user_id: &str, write: ResumeWrite<'_>) -> Result<ResumeRecord, AppError>;

    /// Overwrites the scalars and recreates every child row.
    /// `NotFound` when the resume is missing or not owned.
    async fn replace(
        &self,
        user_id: &str,
        id: Uuid,
        write: ResumeWrite<'_>,
    ) -> Result<ResumeRecord, AppError>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, AppError>;
}

const CHILD_TABLES: [&str; 7] = [
    "resume_work_experiences",
    "resume_educations",
    "resume_projects",
    "resume_skill_sets",
    "resume_courses",
    "resume_coding_profiles",
    "resume_custom_sections",
];

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_children(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, ChildRows>, sqlx::Error> {
        let mut by_resume: HashMap<Uuid, ChildRows> = HashMap::new();
        if ids.is_empty() {
            return Ok(by_resume);
        }

        for row in fetch_children::<WorkExperienceRow>(&self.pool, CHILD_TABLES[0], ids).await? {
            by_resume.entry(row.resume_id).or_default().work_experiences.push(row);
        }
        for row in fetch_children::<EducationRow>(&self.pool, CHILD_TABLES[1], ids).await? {
            by_resume.entry(row.resume_id).or_default().educations.push(row);
        }
        for row in fetch_children::<ProjectRow>(&self.pool, CHILD_TABLES[2], ids).await? {
            by_resume.entry(row.resume_id).or_default().projects.push(row);
        }
        for row in fetch_children::<SkillSetRow>(&self.pool, CHILD_TABLES[3], ids).await? {
            by_resume.entry(row.resume_id).or_default().skill_set.push(row);
        }
        for row in fetch_children::<CourseRow>(&self.pool, CHILD_TABLES[4], ids).await? {
            by_resume.entry(row.resume_id).or_default().courses.push(row);
        }
        for row in fetch_children::<CodingProfileRow>(&self.pool, CHILD_TABLES[5], ids).await? {
            by_resume.entry(row.resume_id).or_default().coding_profiles.push(row);
        }
        for row in fetch_children::<CustomSectionRow>(&self.pool, CHILD_TABLES[6], ids).await? {
            by_resume.entry(row.resume_id).or_default().custom.push(row);
        }

        Ok(by_resume)
    }
}

async fn fetch_children<T>(pool: &PgPool, table: &str, ids: &[Uuid]) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT * FROM {table} WHERE resume_id = ANY($1) ORDER BY resume_id, sort_order"
    );
    sqlx::query_as::<_, T>(&sql)
        .bind(ids.to_vec())
        .fetch_all(pool)
        .await
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn find_owned(&self, user_id: &str, id: Uuid) -> Result<Option<ResumeRecord>, AppError> {
        let row: Option<ResumeRow> =
            sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(resume) = row else {
            return Ok(None);
        };
        let children = self
            .load_children(&[resume.id])
            .await?
            .remove(&resume.id)
            .unwrap_or_default();
        Ok(Some(ResumeRecord { resume, children }))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ResumeRecord>, AppError> {
        let rows: Vec<ResumeRow> =
            sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut children = self.load_children(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|resume| {
                let children = children.remove(&resume.id).unwrap_or_default();
                ResumeRecord { resume, children }
            })
            .collect())
    }

    async fn insert(&self, user_id: &str, write: ResumeWrite<'_>) -> Result<ResumeRecord, AppError> {
        let id = Uuid::new_v4();
        let draft = ResumeRow::from_values(id, user_id, write.values, write.photo_url, Utc::now());
        let children = ChildRows::from_values(id, write.values);

        let mut tx = self.pool.begin().await?;

        let resume: ResumeRow = sqlx::query_as(
            r#"
            INSERT INTO resumes
                (id, user_id, title, description, photo_url, first_name, last_name,
                 job_title, city, country, phone, email, github_profile, linkedin_profile,
                 summary, color_hex, border_style)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(draft.id)
        .bind(draft.user_id)
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.photo_url)
        .bind(draft.first_name)
        .bind(draft.last_name)
        .bind(draft.job_title)
        .bind(draft.city)
        .bind(draft.country)
        .bind(draft.phone)
        .bind(draft.email)
        .bind(draft.github_profile)
        .bind(draft.linkedin_profile)
        .bind(draft.summary)
        .bind(draft.color_hex)
        .bind(draft.border_style)
        .fetch_one(&mut *tx)
        .await?;

        insert_children(&mut tx, &children).await?;
        tx.commit().await?;

        info!("Created resume {id} for user {user_id}");
        Ok(ResumeRecord { resume, children })
    }

    async fn replace(
        &self,
        user_id: &str,
        id: Uuid,
        write: ResumeWrite<'_>,
    ) -> Result<ResumeRecord, AppError> {
        let draft = ResumeRow::from_values(id, user_id, write.values, write.photo_url, Utc::now());
        let children = ChildRows::from_values(id, write.values);

        let mut tx = self.pool.begin().await?;

        let resume: Option<ResumeRow> = sqlx::query_as(
            r#"
            UPDATE resumes SET
                title = $3, description = $4, photo_url = $5, first_name = $6,
                last_name = $7, job_title = $8, city = $9, country = $10, phone = $11,
                email = $12, github_profile = $13, linkedin_profile = $14, summary = $15,
                color_hex = $16, border_style = $17, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(draft.id)
        .bind(draft.user_id)
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.photo_url)
        .bind(draft.first_name)
        .bind(draft.last_name)
        .bind(draft.job_title)
        .bind(draft.city)
        .bind(draft.country)
        .bind(draft.phone)
        .bind(draft.email)
        .bind(draft.github_profile)
        .bind(draft.linkedin_profile)
        .bind(draft.summary)
        .bind(draft.color_hex)
        .bind(draft.border_style)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back.
        let resume = resume.ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

        for table in CHILD_TABLES {
            sqlx::query(&format!("DELETE FROM {table} WHERE resume_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        insert_children(&mut tx, &children).await?;
        tx.commit().await?;

        info!("Updated resume {id} for user {user_id}");
        Ok(ResumeRecord { resume, children })
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_children(
    tx: &mut Transaction<'_, Postgres>,
    children: &ChildRows,
) -> Result<(), sqlx::Error> {
    for row in &children.work_experiences {
        sqlx::query(
            r#"
            INSERT INTO resume_work_experiences
                (id, resume_id, sort_order, position, company, company_location,
                 start_date, end_date, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(row.sort_order)
        .bind(&row.position)
        .bind(&row.company)
        .bind(&row.company_location)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.description)
        .execute(&mut **tx)
        .await?;
    }

    for row in &children.educations {
        sqlx::query(
            r#"
            INSERT INTO resume_educations
                (id, resume_id, sort_order, degree, school, start_date, end_date, cgpa)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(row.sort_order)
        .bind(&row.degree)
        .bind(&row.school)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.cgpa)
        .execute(&mut **tx)
        .await?;
    }

    for row in &children.projects {
        sqlx::query(
            r#"
            INSERT INTO resume_projects
                (id, resume_id, sort_order, project_name, link, tech_stack, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(row.sort_order)
        .bind(&row.project_name)
        .bind(&row.link)
        .bind(&row.tech_stack)
        .bind(&row.description)
        .execute(&mut **tx)
        .await?;
    }

    for row in &children.skill_set {
        sqlx::query(
            r#"
            INSERT INTO resume_skill_sets
                (id, resume_id, sort_order, languages, frameworks, tools, libraries)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(row.sort_order)
        .bind(&row.languages)
        .bind(&row.frameworks)
        .bind(&row.tools)
        .bind(&row.libraries)
        .execute(&mut **tx)
        .await?;
    }

    for row in &children.courses {
        sqlx::query(
            r#"
            INSERT INTO resume_courses
                (id, resume_id, sort_order, course, learning_platform, course_link, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(row.sort_order)
        .bind(&row.course)
        .bind(&row.learning_platform)
        .bind(&row.course_link)
        .bind(&row.description)
        .execute(&mut **tx)
        .await?;
    }

    for row in &children.coding_profiles {
        sqlx::query(
            r#"
            INSERT INTO resume_coding_profiles
                (id, resume_id, sort_order, coding_profile, coding_profile_link, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(row.sort_order)
        .bind(&row.coding_profile)
        .bind(&row.coding_profile_link)
        .bind(&row.description)
        .execute(&mut **tx)
        .await?;
    }

    for row in &children.custom {
        sqlx::query(
            r#"
            INSERT INTO resume_custom_sections
                (id, resume_id, sort_order, heading, description, link)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(row.sort_order)
        .bind(&row.heading)
        .bind(&row.description)
        .bind(&row.link)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
