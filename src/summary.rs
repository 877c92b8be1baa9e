use std::collections::HashSet;

use serde::Serialize;

use crate::models::{IngestResult, StudentRecord};

pub fn subjects(students: &[StudentRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    students
        .iter()
        .filter_map(|student| student.course.as_deref())
        .map(str::trim)
        .filter(|course| !course.is_empty())
        .filter(|course| seen.insert(*course))
        .map(str::to_string)
        .collect()
}

/// The week list offered to filters. Fixed, not derived from the weekly
/// blocks actually present, so a listed week may have no data.
pub fn weeks(canonical_weeks: u32) -> Vec<u32> {
    (1..=canonical_weeks).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCohort<'a> {
    pub students: &'a [StudentRecord],
    pub subjects: Vec<String>,
    pub weeks: Vec<u32>,
    pub processed_sheets: Vec<String>,
    pub skipped_sheets: Vec<String>,
}

impl<'a> ParsedCohort<'a> {
    pub fn from_result(result: &'a IngestResult) -> Self {
        Self {
            students: &result.students,
            subjects: subjects(&result.students),
            weeks: weeks(result.canonical_weeks),
            processed_sheets: result.processed_sheets(),
            skipped_sheets: result.skipped_sheets(),
        }
    }
}
