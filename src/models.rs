use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl Cell {
    /// Trimmed text of the cell, or `None` when the cell holds nothing usable.
    pub fn present_text(&self) -> Option<String> {
        let raw = match self {
            Cell::Empty | Cell::Error(_) => return None,
            Cell::Text(text) => text.clone(),
            Cell::Int(value) => value.to_string(),
            Cell::Float(value) => format_float(*value),
            Cell::Bool(value) => value.to_string(),
            Cell::DateTime(value) => {
                if value.time() == chrono::NaiveTime::MIN {
                    value.format("%Y-%m-%d").to_string()
                } else {
                    value.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

pub type Row = Vec<Cell>;

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    /// The decoded grid, or the reason the sheet could not be read.
    pub grid: Result<Vec<Row>, String>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            grid: Ok(rows),
        }
    }

    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grid: Err(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAttendance {
    pub week: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_checkpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    pub weekly_attendance: Vec<WeeklyAttendance>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    Blank,
    MissingKeyFields,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(StudentRecord),
    Rejected(RowRejection),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Unreadable(String),
    TooFewRows { rows: usize },
    InvalidHeaders { matched: usize, required: usize },
    NoRetainedRecords,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unreadable(reason) => write!(f, "unreadable ({reason})"),
            SkipReason::TooFewRows { rows } => write!(f, "only {rows} row(s)"),
            SkipReason::InvalidHeaders { matched, required } => write!(
                f,
                "header row matched {matched} of the {required} required names"
            ),
            SkipReason::NoRetainedRecords => write!(f, "no student rows"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetOutcome {
    Processed {
        records: Vec<StudentRecord>,
        rejected_rows: usize,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetReport {
    pub name: String,
    pub record_count: usize,
    pub rejected_rows: usize,
    pub skip_reason: Option<SkipReason>,
}

impl SheetReport {
    pub fn is_processed(&self) -> bool {
        self.skip_reason.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestResult {
    pub students: Vec<StudentRecord>,
    pub sheets: Vec<SheetReport>,
    pub canonical_weeks: u32,
}

impl IngestResult {
    pub fn processed_sheets(&self) -> Vec<String> {
        self.sheets
            .iter()
            .filter(|sheet| sheet.is_processed())
            .map(|sheet| sheet.name.clone())
            .collect()
    }

    pub fn skipped_sheets(&self) -> Vec<String> {
        self.sheets
            .iter()
            .filter(|sheet| !sheet.is_processed())
            .map(|sheet| sheet.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SubjectSummary {
    pub subject: String,
    pub total: usize,
    pub at_risk: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekStats {
    pub week: u32,
    pub present: usize,
    pub absent: usize,
    pub total: usize,
    pub session1_attended: usize,
    pub session2_attended: usize,
}
