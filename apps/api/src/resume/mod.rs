// Resume field extraction: text recovery, then keyword/regex passes for
// skills, employment intervals and education entries.

pub mod education;
pub mod experience;
pub mod handlers;
pub mod pdf;
pub mod skills;

use chrono::NaiveDate;
use serde::Serialize;

use crate::matching::scoring::{CandidateProfile, ExperienceInterval};
use crate::resume::pdf::{extract_resume_text, ExtractionError, TextSource};

/// Everything extracted from one resume document.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedResume {
    pub text_source: TextSource,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceInterval>,
    pub education_count: u32,
    pub experience_years: f64,
}

impl ParsedResume {
    pub fn to_profile(&self) -> CandidateProfile {
        CandidateProfile {
            skills: self.skills.clone(),
            experience: self.experience.clone(),
            education_count: self.education_count,
        }
    }
}

/// Runs the full extraction pipeline over raw resume bytes (PDF or UTF-8 text).
pub fn parse_resume(bytes: &[u8], today: NaiveDate) -> Result<ParsedResume, ExtractionError> {
    let extracted = extract_resume_text(bytes)?;
    let text = extracted.text.as_str();

    let experience = experience::extract_experience(text, today);
    let experience_years = experience.iter().map(|i| i.years(today)).sum();

    Ok(ParsedResume {
        text_source: extracted.source,
        skills: skills::extract_skills(text),
        experience,
        education_count: education::count_education(text),
        experience_years,
    })
}
