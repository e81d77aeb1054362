//! Axum route handlers for the Resume API. Bodies are the raw document bytes.

use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::repository::{get_job, job_requirements};
use crate::matching::scoring::MatchReport;
use crate::resume::{parse_resume, ParsedResume};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeScoreResponse {
    pub job_id: Uuid,
    pub parsed: ParsedResume,
    pub report: MatchReport,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(body: Bytes) -> Result<Json<ParsedResume>, AppError> {
    let parsed = parse_in_background(body).await?;
    Ok(Json(parsed))
}

/// POST /api/v1/jobs/:id/resume-score
///
/// Extracts the resume and scores it against the job's required skills.
pub async fn handle_score_resume(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ResumeScoreResponse>, AppError> {
    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let parsed = parse_in_background(body).await?;
    let report = state.match_scorer.score(
        &parsed.to_profile(),
        &job_requirements(&job),
        Utc::now().date_naive(),
    );

    info!(job_id = %job_id, score = report.score, "Scored resume against job");
    Ok(Json(ResumeScoreResponse {
        job_id,
        parsed,
        report,
    }))
}

/// PDF parsing is CPU-bound; keep it off the async workers.
async fn parse_in_background(body: Bytes) -> Result<ParsedResume, AppError> {
    let size = body.len();
    let today = Utc::now().date_naive();
    let parsed = tokio::task::spawn_blocking(move || parse_resume(&body, today))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("resume parsing task failed: {e}")))??;

    info!(
        bytes = size,
        source = ?parsed.text_source,
        skills = parsed.skills.len(),
        intervals = parsed.experience.len(),
        "Parsed resume"
    );
    Ok(parsed)
}
