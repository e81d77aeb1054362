use once_cell::sync::Lazy;
use regex::Regex;

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:bachelor|doctorate|phd|mba|bsc|msc|btech|mtech|diploma)(?:'?s)?\b|\bmaster(?:'?s\b|\s+(?:of|in)\b)|\b(?:ph|b|m)\.\s?(?:d|sc|a|s|e|tech)\b|\bassociate(?:'?s)?\s+degree\b)",
    )
    .expect("valid degree regex")
});

static EDUCATION_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:education|academic background|qualifications)[ \t]*:?[ \t]*$")
        .expect("valid education heading regex")
});

static INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:university|college|institute|school|academy)\b")
        .expect("valid institution regex")
});

/// Number of education entries: one per line naming a degree.
/// Falls back to 1 when an education heading is followed by an institution line, else 0.
pub fn count_education(text: &str) -> u32 {
    let degree_lines = text.lines().filter(|l| DEGREE_RE.is_match(l)).count() as u32;
    if degree_lines > 0 {
        return degree_lines;
    }

    match EDUCATION_HEADING_RE.find(text) {
        Some(heading) if has_institution_line(&text[heading.end()..]) => 1,
        _ => 0,
    }
}

fn has_institution_line(section: &str) -> bool {
    section
        .lines()
        .skip_while(|l| l.trim().is_empty())
        .take_while(|l| !l.trim().is_empty())
        .any(|l| INSTITUTION_RE.is_match(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_one_per_degree_line() {
        let text = "EDUCATION\nMaster of Science, Stanford\nBachelor's in Physics, UCLA\n";
        assert_eq!(count_education(text), 2);
    }

    #[test]
    fn test_abbreviated_degrees() {
        assert_eq!(count_education("B.Sc Computer Science"), 1);
        assert_eq!(count_education("Ph.D. in Chemistry"), 1);
        assert_eq!(count_education("MBA, Wharton"), 1);
        assert_eq!(count_education("Associate degree in Nursing"), 1);
    }

    #[test]
    fn test_verbs_are_not_degrees() {
        assert_eq!(count_education("Mastered distributed tracing"), 0);
    }

    #[test]
    fn test_job_titles_with_master_are_not_degrees() {
        assert_eq!(count_education("Certified Scrum Master at Initech"), 0);
        assert_eq!(count_education("Masters in Data Science, UCL"), 1);
        assert_eq!(count_education("Master's degree in Economics"), 1);
    }

    #[test]
    fn test_heading_with_institution_falls_back_to_one() {
        let text = "Education\n\nState University of New York, 2012\n\nExperience\n";
        assert_eq!(count_education(text), 1);
    }

    #[test]
    fn test_heading_without_institution_is_zero() {
        let text = "Education\nSelf-taught\n";
        assert_eq!(count_education(text), 0);
    }

    #[test]
    fn test_no_education_is_zero() {
        assert_eq!(count_education("Ten years at sea."), 0);
    }
}
