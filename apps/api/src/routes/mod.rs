pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_resume_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/match/score", post(matching::handle_score))
        .route(
            "/api/v1/jobs/:id/applicants",
            get(matching::handle_job_applicants),
        )
        .route(
            "/api/v1/candidates/:id/job-matches",
            get(matching::handle_candidate_job_matches),
        )
        // Resume API
        .route("/api/v1/resumes/parse", post(resume::handle_parse_resume))
        .route(
            "/api/v1/jobs/:id/resume-score",
            post(resume::handle_score_resume),
        )
        .layer(body_limit)
        .with_state(state)
}
