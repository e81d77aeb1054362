//! Ranking: orders applicants for a job, or open jobs for a candidate, by match score.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::matching::scoring::{CandidateProfile, JobRequirements, MatchReport, MatchScorer};

/// A candidate's scoring inputs together with the identity fields shown to recruiters.
#[derive(Debug, Clone)]
pub struct ApplicantProfile {
    pub candidate_id: Uuid,
    pub full_name: String,
    pub application_status: String,
    pub applied_at: DateTime<Utc>,
    pub profile: CandidateProfile,
}

#[derive(Debug, Clone)]
pub struct JobPosting {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub requirements: JobRequirements,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedApplicant {
    pub candidate_id: Uuid,
    pub full_name: String,
    pub application_status: String,
    pub applied_at: DateTime<Utc>,
    pub report: MatchReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedJob {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub report: MatchReport,
}

/// Scores every applicant against `job`. Highest score first; ties by name, then id.
pub fn rank_applicants(
    scorer: &dyn MatchScorer,
    job: &JobRequirements,
    applicants: Vec<ApplicantProfile>,
    today: NaiveDate,
) -> Vec<RankedApplicant> {
    let mut ranked: Vec<RankedApplicant> = applicants
        .into_iter()
        .map(|a| RankedApplicant {
            report: scorer.score(&a.profile, job, today),
            candidate_id: a.candidate_id,
            full_name: a.full_name,
            application_status: a.application_status,
            applied_at: a.applied_at,
        })
        .collect();

    ranked.sort_by(|a, b| {
        by_score_desc(&a.report, &b.report)
            .then_with(|| a.full_name.cmp(&b.full_name))
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
    ranked
}

/// Scores `candidate` against every posting, dropping those below `min_score`.
/// Highest score first; ties by title, then id.
pub fn rank_jobs(
    scorer: &dyn MatchScorer,
    candidate: &CandidateProfile,
    jobs: Vec<JobPosting>,
    today: NaiveDate,
    min_score: u32,
) -> Vec<RankedJob> {
    let mut ranked: Vec<RankedJob> = jobs
        .into_iter()
        .map(|j| RankedJob {
            report: scorer.score(candidate, &j.requirements, today),
            job_id: j.job_id,
            title: j.title,
            company: j.company,
        })
        .filter(|r| r.report.score >= min_score)
        .collect();

    ranked.sort_by(|a, b| {
        by_score_desc(&a.report, &b.report)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.job_id.cmp(&b.job_id))
    });
    ranked
}

fn by_score_desc(a: &MatchReport, b: &MatchReport) -> Ordering {
    b.score.cmp(&a.score)
}
