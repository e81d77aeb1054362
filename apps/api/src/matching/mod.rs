// Candidate/job matching: the heuristic match scorer, ranking on top of it,
// and the read queries that feed it.

pub mod handlers;
pub mod ranking;
pub mod repository;
pub mod scoring;
