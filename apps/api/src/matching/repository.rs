//! Read-side queries against the recruitment tables. Schema is owned elsewhere.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::matching::ranking::{ApplicantProfile, JobPosting};
use crate::matching::scoring::{CandidateProfile, ExperienceInterval, JobRequirements};
use crate::models::candidate::{CandidateRow, ExperienceRow};
use crate::models::job::{ApplicationRow, JobRow};

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        "SELECT id, recruiter_id, title, company, description, required_skills, is_active, created_at
         FROM jobs WHERE id = $1",
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_active_jobs(pool: &PgPool) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        "SELECT id, recruiter_id, title, company, description, required_skills, is_active, created_at
         FROM jobs WHERE is_active = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        "SELECT id, full_name, email, skills, education_count, created_at
         FROM candidates WHERE id = $1",
    )
    .bind(candidate_id)
    .fetch_optional(pool)
    .await
}

async fn list_applications(pool: &PgPool, job_id: Uuid) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT id, job_id, candidate_id, status, created_at
         FROM applications WHERE job_id = $1 ORDER BY created_at ASC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

async fn list_candidates(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        "SELECT id, full_name, email, skills, education_count, created_at
         FROM candidates WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

async fn list_experience(
    pool: &PgPool,
    candidate_ids: &[Uuid],
) -> Result<Vec<ExperienceRow>, sqlx::Error> {
    sqlx::query_as::<_, ExperienceRow>(
        "SELECT id, candidate_id, title, company, start_date, end_date
         FROM candidate_experiences WHERE candidate_id = ANY($1) ORDER BY start_date ASC",
    )
    .bind(candidate_ids)
    .fetch_all(pool)
    .await
}

/// Loads the scoring profile of a single candidate.
pub async fn load_candidate_profile(
    pool: &PgPool,
    candidate: &CandidateRow,
) -> Result<CandidateProfile, sqlx::Error> {
    let experience = list_experience(pool, &[candidate.id]).await?;
    Ok(to_profile(candidate, experience.iter()))
}

/// Loads every applicant of `job_id` with their scoring profile.
/// Applications pointing at missing candidates are skipped.
pub async fn load_applicants(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<ApplicantProfile>, sqlx::Error> {
    let applications = list_applications(pool, job_id).await?;
    if applications.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<Uuid> = applications.iter().map(|a| a.candidate_id).collect();
    let candidates: HashMap<Uuid, CandidateRow> = list_candidates(pool, &ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut experience_by_candidate: HashMap<Uuid, Vec<ExperienceRow>> = HashMap::new();
    for row in list_experience(pool, &ids).await? {
        experience_by_candidate
            .entry(row.candidate_id)
            .or_default()
            .push(row);
    }

    debug!(
        job_id = %job_id,
        applications = applications.len(),
        candidates = candidates.len(),
        "Loaded applicants"
    );

    Ok(applications
        .into_iter()
        .filter_map(|app| {
            let candidate = candidates.get(&app.candidate_id)?;
            let experience = experience_by_candidate
                .get(&app.candidate_id)
                .map(|rows| rows.as_slice())
                .unwrap_or_default();
            Some(ApplicantProfile {
                candidate_id: candidate.id,
                full_name: candidate.full_name.clone(),
                application_status: app.status,
                applied_at: app.created_at,
                profile: to_profile(candidate, experience.iter()),
            })
        })
        .collect())
}

pub fn job_requirements(job: &JobRow) -> JobRequirements {
    JobRequirements {
        required_skills: job.required_skills.clone(),
    }
}

pub fn to_posting(job: JobRow) -> JobPosting {
    JobPosting {
        requirements: job_requirements(&job),
        job_id: job.id,
        title: job.title,
        company: job.company,
    }
}

fn to_profile<'a>(
    candidate: &CandidateRow,
    experience: impl Iterator<Item = &'a ExperienceRow>,
) -> CandidateProfile {
    CandidateProfile {
        skills: candidate.skills.clone(),
        experience: experience
            .map(|e| ExperienceInterval {
                start: e.start_date,
                end: e.end_date,
            })
            .collect(),
        education_count: candidate.education_count.max(0) as u32,
    }
}
