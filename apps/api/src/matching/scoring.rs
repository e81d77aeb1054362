//! Match Scoring: heuristic 0–100 compatibility rating between a candidate and a job.
//!
//! The score is derived, never stored as authoritative: callers recompute it on demand.
//! `AppState` holds an `Arc<dyn MatchScorer>`, so the backend can be swapped at startup.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

const BASE_SCORE: f64 = 50.0;
const SKILL_MATCH_FACTOR: f64 = 0.3;
const SKILL_MATCH_CAP: f64 = 30.0;
const SKILL_BREADTH_PER_SKILL: f64 = 2.0;
const SKILL_BREADTH_CAP: f64 = 15.0;
const EXPERIENCE_PER_YEAR: f64 = 3.0;
const EXPERIENCE_CAP: f64 = 15.0;
const EDUCATION_BONUS: f64 = 5.0;
const DAYS_PER_YEAR: f64 = 365.25;

// ────────────────────────────────────────────────────────────────────────────
// Input data models
// ────────────────────────────────────────────────────────────────────────────

/// A single period of employment. `end = None` means the position is ongoing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceInterval {
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl ExperienceInterval {
    /// Length of the interval in years, measured up to `today` when ongoing.
    /// Reversed intervals count as zero.
    pub fn years(&self, today: NaiveDate) -> f64 {
        let end = self.end.unwrap_or(today);
        let days = (end - self.start).num_days();
        if days <= 0 {
            return 0.0;
        }
        days as f64 / DAYS_PER_YEAR
    }
}

/// Everything the scorer needs to know about a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub experience: Vec<ExperienceInterval>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub education_count: u32,
}

/// Everything the scorer needs to know about a job posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub required_skills: Vec<String>,
}

/// Accepts an explicit JSON `null` wherever a missing key would be accepted.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Unrounded contribution of each scoring dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl ScoreBreakdown {
    fn total(&self) -> f64 {
        self.base + self.skills + self.experience + self.education
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub score: u32, // 0 – 100
    pub breakdown: ScoreBreakdown,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_years: f64,
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers or ranking.
pub trait MatchScorer: Send + Sync {
    fn score(
        &self,
        candidate: &CandidateProfile,
        job: &JobRequirements,
        today: NaiveDate,
    ) -> MatchReport;
}

/// Default keyword/experience/education heuristic. Pure and deterministic for a given `today`.
pub struct HeuristicMatchScorer;

impl MatchScorer for HeuristicMatchScorer {
    fn score(
        &self,
        candidate: &CandidateProfile,
        job: &JobRequirements,
        today: NaiveDate,
    ) -> MatchReport {
        compute_match_score(candidate, job, today)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Canonical form used for every skill comparison.
pub fn normalize_skill(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes, drops blanks and removes duplicates while keeping first-seen order.
fn normalized_unique(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|n| normalize_skill(n))
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

pub fn compute_match_score(
    candidate: &CandidateProfile,
    job: &JobRequirements,
    today: NaiveDate,
) -> MatchReport {
    let candidate_skills = normalized_unique(&candidate.skills);
    let required_skills = normalized_unique(&job.required_skills);
    let candidate_set: HashSet<&str> = candidate_skills.iter().map(String::as_str).collect();

    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = required_skills
        .iter()
        .cloned()
        .partition(|s| candidate_set.contains(s.as_str()));

    let skills = if required_skills.is_empty() {
        (candidate_skills.len() as f64 * SKILL_BREADTH_PER_SKILL).min(SKILL_BREADTH_CAP)
    } else {
        let skill_pct = matched_skills.len() as f64 / required_skills.len() as f64 * 100.0;
        (skill_pct * SKILL_MATCH_FACTOR).min(SKILL_MATCH_CAP)
    };

    let experience_years: f64 = candidate.experience.iter().map(|i| i.years(today)).sum();
    let experience = (experience_years * EXPERIENCE_PER_YEAR).min(EXPERIENCE_CAP);

    let education = if candidate.education_count > 0 {
        EDUCATION_BONUS
    } else {
        0.0
    };

    let breakdown = ScoreBreakdown {
        base: BASE_SCORE,
        skills,
        experience,
        education,
    };
    let score = breakdown.total().clamp(0.0, 100.0).round() as u32;

    MatchReport {
        score,
        breakdown,
        matched_skills,
        missing_skills,
        experience_years,
        scorer_backend: "heuristic".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 1, 1)
    }

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn job(names: &[&str]) -> JobRequirements {
        JobRequirements {
            required_skills: skills(names),
        }
    }

    #[test]
    fn test_empty_inputs_degrade_to_base_score() {
        let report = compute_match_score(&CandidateProfile::default(), &job(&[]), today());
        assert_eq!(report.score, 50);
        assert_eq!(report.breakdown.skills, 0.0);
        assert_eq!(report.breakdown.experience, 0.0);
        assert_eq!(report.breakdown.education, 0.0);
    }

    #[test]
    fn test_empty_skills_adds_only_experience_and_education() {
        let candidate = CandidateProfile {
            skills: vec![],
            experience: vec![ExperienceInterval {
                start: date(2022, 1, 1),
                end: Some(date(2023, 1, 1)),
            }],
            education_count: 1,
        };
        let report = compute_match_score(&candidate, &job(&[]), today());
        // 50 + 0 + 365/365.25*3 + 5 = 57.997...
        assert_eq!(report.score, 58);
        assert_eq!(report.breakdown.skills, 0.0);
        assert_eq!(report.breakdown.education, 5.0);
    }

    #[test]
    fn test_all_required_skills_matched_contributes_30() {
        let candidate = CandidateProfile {
            skills: skills(&["Rust", "SQL", "Docker", "Kafka"]),
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&["rust", "sql", "docker"]), today());
        assert!((report.breakdown.skills - 30.0).abs() < 1e-9);
        assert_eq!(report.score, 80);
        assert_eq!(report.matched_skills, skills(&["rust", "sql", "docker"]));
        assert!(report.missing_skills.is_empty());
    }

    #[test]
    fn test_no_skills_matched_contributes_zero() {
        let candidate = CandidateProfile {
            skills: skills(&["Java"]),
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&["rust", "go", "sql"]), today());
        assert_eq!(report.breakdown.skills, 0.0);
        assert_eq!(report.score, 50);
        assert_eq!(report.missing_skills.len(), 3);
    }

    #[test]
    fn test_partial_skill_match_is_proportional() {
        let candidate = CandidateProfile {
            skills: skills(&["python"]),
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&["Python", "AWS", "SQL", "Git"]), today());
        // 25% * 0.3 = 7.5 → 57.5 rounds half away from zero
        assert!((report.breakdown.skills - 7.5).abs() < 1e-9);
        assert_eq!(report.score, 58);
    }

    #[test]
    fn test_skill_matching_is_case_and_whitespace_insensitive() {
        let candidate = CandidateProfile {
            skills: skills(&["  Machine   Learning ", "NODE.JS"]),
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&["machine learning", "Node.js"]), today());
        assert_eq!(report.matched_skills.len(), 2);
    }

    #[test]
    fn test_duplicate_required_skills_count_once() {
        let candidate = CandidateProfile {
            skills: skills(&["rust"]),
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&["Rust", "rust", "go"]), today());
        // 1 of 2 distinct skills matched → 15
        assert!((report.breakdown.skills - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_blank_required_skills_fall_back_to_breadth() {
        let candidate = CandidateProfile {
            skills: skills(&["a", "b", "c"]),
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&["", "   "]), today());
        assert_eq!(report.breakdown.skills, 6.0);
    }

    #[test]
    fn test_skill_breadth_is_capped_at_15() {
        let many: Vec<String> = (0..20).map(|i| format!("skill-{i}")).collect();
        let candidate = CandidateProfile {
            skills: many,
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&[]), today());
        assert_eq!(report.breakdown.skills, 15.0);
    }

    #[test]
    fn test_experience_is_capped_at_15() {
        let candidate = CandidateProfile {
            experience: vec![ExperienceInterval {
                start: date(2000, 1, 1),
                end: Some(date(2020, 1, 1)),
            }],
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&[]), today());
        assert_eq!(report.breakdown.experience, 15.0);
        assert!(report.experience_years > 19.9);
    }

    #[test]
    fn test_ongoing_interval_runs_until_today() {
        let interval = ExperienceInterval {
            start: date(2022, 1, 1),
            end: None,
        };
        let years = interval.years(today());
        assert!((years - 730.0 / DAYS_PER_YEAR).abs() < 1e-9);
    }

    #[test]
    fn test_reversed_interval_contributes_nothing() {
        let interval = ExperienceInterval {
            start: date(2023, 6, 1),
            end: Some(date(2021, 6, 1)),
        };
        assert_eq!(interval.years(today()), 0.0);
    }

    #[test]
    fn test_intervals_are_summed() {
        let candidate = CandidateProfile {
            experience: vec![
                ExperienceInterval {
                    start: date(2019, 1, 1),
                    end: Some(date(2020, 1, 1)),
                },
                ExperienceInterval {
                    start: date(2021, 1, 1),
                    end: Some(date(2022, 1, 1)),
                },
            ],
            ..Default::default()
        };
        let report = compute_match_score(&candidate, &job(&[]), today());
        assert!((report.experience_years - 730.0 / DAYS_PER_YEAR).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounded_0_to_100() {
        let candidate = CandidateProfile {
            skills: skills(&["rust"]),
            experience: vec![ExperienceInterval {
                start: date(1990, 1, 1),
                end: None,
            }],
            education_count: 4,
        };
        let report = compute_match_score(&candidate, &job(&["rust"]), today());
        assert_eq!(report.score, 100);
        assert!(report.score <= 100);
    }

    #[test]
    fn test_null_collections_deserialize_as_empty() {
        let json = r#"{"skills": null, "experience": null, "education_count": null}"#;
        let candidate: CandidateProfile = serde_json::from_str(json).unwrap();
        assert!(candidate.skills.is_empty());
        assert!(candidate.experience.is_empty());
        assert_eq!(candidate.education_count, 0);

        let job: JobRequirements = serde_json::from_str(r#"{"required_skills": null}"#).unwrap();
        assert!(job.required_skills.is_empty());
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let candidate: CandidateProfile = serde_json::from_str("{}").unwrap();
        let job: JobRequirements = serde_json::from_str("{}").unwrap();
        assert_eq!(compute_match_score(&candidate, &job, today()).score, 50);
    }

    #[test]
    fn test_heuristic_scorer_reports_backend() {
        let report = HeuristicMatchScorer.score(&CandidateProfile::default(), &job(&[]), today());
        assert_eq!(report.scorer_backend, "heuristic");
    }

    #[test]
    fn test_normalize_skill_collapses_whitespace() {
        assert_eq!(normalize_skill("  Spring   Boot "), "spring boot");
    }
}
