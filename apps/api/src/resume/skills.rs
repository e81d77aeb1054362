//! Keyword-based skill extraction from resume text.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::scoring::normalize_skill;

/// Vocabulary matched anywhere in the resume. Display form is what gets reported.
const SKILL_VOCABULARY: &[&str] = &[
    // languages
    "Python", "Java", "JavaScript", "TypeScript", "C", "C++", "C#", "Go", "Rust", "Ruby",
    "PHP", "Kotlin", "Swift", "Scala", "R", "SQL", "Bash", "HTML", "CSS",
    // frameworks & libraries
    "React", "Angular", "Vue", "Node.js", "Express", "Django", "Flask", "FastAPI",
    "Spring", "Spring Boot", ".NET", "Rails", "Laravel", "TensorFlow", "PyTorch",
    "Pandas", "NumPy", "scikit-learn",
    // data & infrastructure
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch", "Kafka", "Spark",
    "Hadoop", "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform", "Ansible",
    "Jenkins", "Git", "Linux", "GraphQL", "REST", "Microservices", "CI/CD",
    // disciplines
    "Machine Learning", "Deep Learning", "Data Analysis", "Data Science", "NLP",
    "Computer Vision", "DevOps", "Agile", "Scrum", "Excel", "Tableau", "Power BI",
    "Figma", "Project Management",
    // soft skills
    "Communication", "Leadership", "Teamwork", "Problem Solving",
];

/// Entries that are also ordinary English words; these only match with their exact casing.
const CASE_SENSITIVE_SKILLS: &[&str] = &[
    "C", "Go", "R", "Swift", "Express", "Spring", "Spring Boot", "Rails", "REST", "Excel",
];

const MAX_SECTION_ITEM_WORDS: usize = 4;
const MAX_SECTION_ITEM_CHARS: usize = 40;

/// Characters that continue a skill token, so `go` never matches inside `going`
/// and `c` never matches inside `c++`.
const TOKEN_CHARS: &str = r"A-Za-z0-9+#";

static SKILL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SKILL_VOCABULARY
        .iter()
        .filter_map(|skill| {
            let flags = if CASE_SENSITIVE_SKILLS.contains(skill) {
                ""
            } else {
                "(?i)"
            };
            let pattern = format!(
                r"{flags}(?:^|[^{TOKEN_CHARS}]){}(?:$|[^{TOKEN_CHARS}])",
                regex::escape(skill)
            );
            Regex::new(&pattern).ok().map(|re| (*skill, re))
        })
        .collect()
});

/// `Skills:` / `Technical Skills` heading, capturing any items on the same line.
static SKILLS_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:technical[ \t]+|core[ \t]+|key[ \t]+)?skills(?:[ \t]*&[ \t]*\w+)?[ \t]*:?[ \t]*(.*)$")
        .expect("valid skills heading regex")
});

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^,;|•·\t]+").expect("valid section item regex"));

/// Extracts skills from vocabulary hits and from any explicit skills section.
/// Deduplicated case-insensitively, in order of first appearance in the text.
pub fn extract_skills(text: &str) -> Vec<String> {
    // (offset, rank, name): vocabulary display names win ties with section items
    let mut found: Vec<(usize, u8, &str)> = SKILL_PATTERNS
        .iter()
        .filter_map(|(skill, re)| re.find(text).map(|m| (m.start(), 0, *skill)))
        .collect();
    found.extend(
        skills_section_items(text)
            .into_iter()
            .map(|(offset, item)| (offset, 1, item)),
    );
    found.sort_by_key(|&(offset, rank, _)| (offset, rank));

    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|(_, _, skill)| seen.insert(normalize_skill(skill)))
        .map(|(_, _, skill)| skill.to_string())
        .collect()
}

/// Items listed under a skills heading with their byte offsets.
///
/// Items on the heading line itself end the section at the next blank line.
/// A bare heading may be separated from its list by blank lines.
fn skills_section_items(text: &str) -> Vec<(usize, &str)> {
    let Some(caps) = SKILLS_HEADING_RE.captures(text) else {
        return vec![];
    };
    let (Some(heading), Some(inline)) = (caps.get(0), caps.get(1)) else {
        return vec![];
    };

    let inline_empty = inline.as_str().trim().is_empty();
    let mut lines: Vec<(usize, &str)> = vec![(inline.start(), inline.as_str())];

    let mut offset = heading.end();
    if text[offset..].starts_with('\n') {
        offset += 1;
    }
    let mut started = false;
    for line in text[offset..].split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let content = line.trim_end_matches(['\r', '\n']);
        if content.trim().is_empty() {
            if inline_empty && !started {
                continue;
            }
            break;
        }
        started = true;
        lines.push((line_start, content));
    }

    lines
        .into_iter()
        .flat_map(|(line_start, line)| {
            ITEM_RE
                .find_iter(line)
                .map(move |m| (line_start + m.start(), m.as_str()))
        })
        .map(|(offset, item)| (offset, item.trim().trim_start_matches(['-', '*']).trim()))
        .filter(|(_, item)| is_plausible_skill(item))
        .collect()
}

fn is_plausible_skill(item: &str) -> bool {
    !item.is_empty()
        && item.len() <= MAX_SECTION_ITEM_CHARS
        && item.split_whitespace().count() <= MAX_SECTION_ITEM_WORDS
        && item.chars().any(|c| c.is_alphabetic())
}
