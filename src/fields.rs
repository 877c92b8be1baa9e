/// Header names the template is expected to carry. A sheet is accepted when
/// enough of these appear verbatim (ignoring case and surrounding whitespace).
pub const REQUIRED_HEADERS: [&str; 14] = [
    "course",
    "student id",
    "first name",
    "last name",
    "campus",
    "student email",
    "personal email",
    "phone number",
    "locality",
    "mode",
    "final status",
    "engagement",
    "action",
    "follow up",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Substring,
}

impl MatchMode {
    /// `header` and `term` are both expected to be normalized already.
    pub fn matches(self, header: &str, term: &str) -> bool {
        match self {
            MatchMode::Exact => header == term,
            MatchMode::Substring => header.contains(term),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Course,
    StudentId,
    FirstName,
    LastName,
    Campus,
    StudentEmail,
    PersonalEmail,
    PhoneNumber,
    Locality,
    Mode,
    FinalStatus,
    Engagement,
    Action,
    FollowUp,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub terms: &'static [&'static str],
    pub mode: MatchMode,
}

pub const RECORD_FIELDS: [FieldSpec; 14] = [
    FieldSpec {
        field: Field::Course,
        terms: &["course", "subject"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::StudentId,
        terms: &["student id", "studentid"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::FirstName,
        terms: &["first name", "firstname"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::LastName,
        terms: &["last name", "lastname"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::Campus,
        terms: &["campus"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::StudentEmail,
        terms: &["student email"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::PersonalEmail,
        terms: &["personal email"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::PhoneNumber,
        terms: &["phone number", "phone"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::Locality,
        terms: &["locality"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::Mode,
        terms: &["mode"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::FinalStatus,
        terms: &["final status", "status"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::Engagement,
        terms: &["engagement"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::Action,
        terms: &["action"],
        mode: MatchMode::Substring,
    },
    FieldSpec {
        field: Field::FollowUp,
        terms: &["follow up", "followup"],
        mode: MatchMode::Substring,
    },
];

// Weekly block labels, matched by substring inside the lookahead window.
pub const SESSION1_TERMS: &[&str] = &["session 1", "session1"];
pub const SESSION2_TERMS: &[&str] = &["session 2", "session2"];
pub const ENGAGEMENT_TERMS: &[&str] = &["engagement"];
pub const ACTION_TERMS: &[&str] = &["action"];
pub const FOLLOW_UP_TERMS: &[&str] = &["follow up", "followup"];
pub const ASSESSMENT_TERMS: &[&str] = &["assessment checkpoint"];

pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn matches_any(header: &str, terms: &[&str], mode: MatchMode) -> bool {
    terms.iter().any(|term| mode.matches(header, term))
}
