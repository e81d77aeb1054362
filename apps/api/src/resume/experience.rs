//! Experience extraction: employment date ranges, with a "N years of experience" fallback.

use chrono::{Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::matching::scoring::ExperienceInterval;

/// `Jan 2019 - Present`, `03/2017 – 12/2019`, `2015 to 2018`, `Sept. 2020—Mar 2022`.
static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        (?: \b(?P<sm>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[\x20\t]+
          | (?P<smn>\d{1,2})/ )?
        (?P<sy>(?:19|20)\d{2})
        \s*(?:-|–|—|\bto\b|\buntil\b)\s*
        (?: (?P<present>present|current|now|today)
          | (?: \b(?P<em>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[\x20\t]+
              | (?P<emn>\d{1,2})/ )?
            (?P<ey>(?:19|20)\d{2}) )
        ",
    )
    .expect("valid date range regex")
});

static YEARS_OF_EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\+?\s*(?:years?|yrs?)\b(?:\s+of)?(?:\s+\w+)?\s+experience")
        .expect("valid years-of-experience regex")
});

/// Extracts employment intervals from resume text.
///
/// Missing months default to January. Open-ended ranges (`Present`) produce
/// `end = None`. Ranges that end before they start are discarded.
/// When no range is found, a `N years of experience` claim becomes a single
/// interval of N years ending `today`.
pub fn extract_experience(text: &str, today: NaiveDate) -> Vec<ExperienceInterval> {
    let intervals: Vec<ExperienceInterval> = DATE_RANGE_RE
        .captures_iter(text)
        .filter_map(|caps| parse_range(&caps))
        .collect();

    if !intervals.is_empty() {
        return intervals;
    }

    claimed_years(text, today).into_iter().collect()
}

fn parse_range(caps: &Captures<'_>) -> Option<ExperienceInterval> {
    let start = parse_date(caps, "sm", "smn", "sy")?;
    let end = if caps.name("present").is_some() {
        None
    } else {
        Some(parse_date(caps, "em", "emn", "ey")?)
    };

    if matches!(end, Some(end) if end < start) {
        return None;
    }
    Some(ExperienceInterval { start, end })
}

fn parse_date(
    caps: &Captures<'_>,
    month_name: &str,
    month_num: &str,
    year: &str,
) -> Option<NaiveDate> {
    let year: i32 = caps.name(year)?.as_str().parse().ok()?;
    let month = match (caps.name(month_name), caps.name(month_num)) {
        (Some(name), _) => month_from_abbrev(name.as_str())?,
        (None, Some(num)) => num.as_str().parse().ok()?,
        (None, None) => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = abbrev.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
}

fn claimed_years(text: &str, today: NaiveDate) -> Option<ExperienceInterval> {
    let years: u32 = YEARS_OF_EXPERIENCE_RE
        .captures(text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()?;
    if years == 0 {
        return None;
    }
    let start = today.checked_sub_months(Months::new(years * 12))?;
    Some(ExperienceInterval {
        start,
        end: Some(today),
    })
}
