//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::ranking::{rank_applicants, rank_jobs, RankedApplicant, RankedJob};
use crate::matching::repository::{
    get_candidate, get_job, job_requirements, list_active_jobs, load_applicants,
    load_candidate_profile, to_posting,
};
use crate::matching::scoring::{CandidateProfile, JobRequirements, MatchReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchScoreRequest {
    #[serde(default)]
    pub candidate: CandidateProfile,
    #[serde(default)]
    pub job: JobRequirements,
}

#[derive(Debug, Deserialize)]
pub struct JobMatchesQuery {
    #[serde(default)]
    pub min_score: Option<u32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/score
///
/// Stateless: scores the supplied candidate profile against the supplied requirements.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<MatchScoreRequest>,
) -> Result<Json<MatchReport>, AppError> {
    let today = Utc::now().date_naive();
    let report = state
        .match_scorer
        .score(&request.candidate, &request.job, today);
    Ok(Json(report))
}

/// GET /api/v1/jobs/:id/applicants
pub async fn handle_job_applicants(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<RankedApplicant>>, AppError> {
    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let applicants = load_applicants(&state.db, job_id).await?;
    let ranked = rank_applicants(
        state.match_scorer.as_ref(),
        &job_requirements(&job),
        applicants,
        Utc::now().date_naive(),
    );

    info!(job_id = %job_id, applicants = ranked.len(), "Ranked applicants");
    Ok(Json(ranked))
}

/// GET /api/v1/candidates/:id/job-matches?min_score=N
pub async fn handle_candidate_job_matches(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(params): Query<JobMatchesQuery>,
) -> Result<Json<Vec<RankedJob>>, AppError> {
    let min_score = params.min_score.unwrap_or(0);
    if min_score > 100 {
        return Err(AppError::Validation(
            "min_score must be between 0 and 100".to_string(),
        ));
    }

    let candidate = get_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let profile = load_candidate_profile(&state.db, &candidate).await?;
    let postings = list_active_jobs(&state.db)
        .await?
        .into_iter()
        .map(to_posting)
        .collect();

    let ranked = rank_jobs(
        state.match_scorer.as_ref(),
        &profile,
        postings,
        Utc::now().date_naive(),
        min_score,
    );

    info!(candidate_id = %candidate_id, matches = ranked.len(), "Ranked job matches");
    Ok(Json(ranked))
}
