use std::collections::HashMap;

use crate::fields::{matches_any, normalize_header, Field, MatchMode, RECORD_FIELDS, REQUIRED_HEADERS};
use crate::models::Row;

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderSet {
    columns: Vec<String>,
}

impl HeaderSet {
    pub fn from_row(row: &Row) -> Self {
        let columns = row
            .iter()
            .map(|cell| {
                cell.present_text()
                    .map(|text| normalize_header(&text))
                    .unwrap_or_default()
            })
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    pub fn required_matches(&self) -> usize {
        REQUIRED_HEADERS
            .iter()
            .filter(|name| self.columns.iter().any(|header| MatchMode::Exact.matches(header, name)))
            .count()
    }

    pub fn position(&self, terms: &[&str], mode: MatchMode) -> Option<usize> {
        self.columns
            .iter()
            .position(|header| !header.is_empty() && matches_any(header, terms, mode))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderCheck {
    Valid(HeaderSet),
    Invalid { matched: usize, required: usize },
}

/// Read the header row at `header_row` and accept it only if at least
/// `min_matches` of the required names are present.
pub fn locate_headers(rows: &[Row], header_row: usize, min_matches: usize) -> HeaderCheck {
    let Some(row) = rows.get(header_row) else {
        return HeaderCheck::Invalid {
            matched: 0,
            required: min_matches,
        };
    };

    let headers = HeaderSet::from_row(row);
    let matched = headers.required_matches();
    if matched >= min_matches {
        HeaderCheck::Valid(headers)
    } else {
        HeaderCheck::Invalid {
            matched,
            required: min_matches,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    positions: HashMap<Field, usize>,
}

impl ColumnMap {
    pub fn build(headers: &HeaderSet) -> Self {
        let positions = RECORD_FIELDS
            .iter()
            .filter_map(|spec| {
                headers
                    .position(spec.terms, spec.mode)
                    .map(|index| (spec.field, index))
            })
            .collect();
        Self { positions }
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    pub fn resolved(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn text_row(values: &[&str]) -> Row {
        values
            .iter()
            .map(|value| {
                if value.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(value.to_string())
                }
            })
            .collect()
    }

    fn template_headers() -> Row {
        text_row(&[
            "Course",
            "Student ID",
            "First Name",
            "Last Name",
            "Campus",
            "Student Email",
            "Personal Email",
            "Phone Number",
            "Locality",
            "Mode",
            "Final Status",
            "Engagement",
            "Action",
            "Follow Up",
        ])
    }

    #[test]
    fn accepts_full_template_in_any_case() {
        let mut header = template_headers();
        for cell in header.iter_mut() {
            if let Cell::Text(text) = cell {
                *text = format!("  {}  ", text.to_uppercase());
            }
        }
        let rows = vec![text_row(&["Cohort 2026"]), header];
        match locate_headers(&rows, 1, 8) {
            HeaderCheck::Valid(headers) => assert_eq!(headers.required_matches(), 14),
            other => panic!("expected valid headers, got {other:?}"),
        }
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let header = text_row(&[
            "Course",
            "Student ID",
            "First Name",
            "Last Name",
            "Campus",
            "Student Email",
            "Personal Email",
            "Phone Number",
        ]);
        let rows = vec![Vec::new(), header.clone()];
        assert!(matches!(locate_headers(&rows, 1, 8), HeaderCheck::Valid(_)));

        let rows = vec![Vec::new(), header[..7].to_vec()];
        assert_eq!(
            locate_headers(&rows, 1, 8),
            HeaderCheck::Invalid {
                matched: 7,
                required: 8
            }
        );
    }

    #[test]
    fn repeated_weekly_labels_count_once() {
        let header = text_row(&[
            "Course",
            "Engagement",
            "Action",
            "Engagement",
            "Action",
            "Engagement",
            "Action",
            "Engagement",
            "Action",
        ]);
        let rows = vec![Vec::new(), header];
        assert_eq!(
            locate_headers(&rows, 1, 8),
            HeaderCheck::Invalid {
                matched: 3,
                required: 8
            }
        );
    }

    #[test]
    fn partial_header_text_does_not_count_for_acceptance() {
        let header = text_row(&["Course Name", "Student ID Number", "Follow Up Notes"]);
        let headers = HeaderSet::from_row(&header);
        assert_eq!(headers.required_matches(), 0);
    }

    #[test]
    fn missing_header_row_is_invalid() {
        let rows = vec![template_headers()];
        assert!(matches!(
            locate_headers(&rows, 1, 8),
            HeaderCheck::Invalid { matched: 0, .. }
        ));
    }

    #[test]
    fn column_map_resolves_first_match_left_to_right() {
        let header = text_row(&[
            "Subject",
            "Student ID",
            "FirstName",
            "Last Name",
            "",
            "Week 1 Session 1",
            "Engagement",
            "Final Status",
            "Engagement",
            "FollowUp",
        ]);
        let map = ColumnMap::build(&HeaderSet::from_row(&header));
        assert_eq!(map.get(Field::Course), Some(0));
        assert_eq!(map.get(Field::StudentId), Some(1));
        assert_eq!(map.get(Field::FirstName), Some(2));
        assert_eq!(map.get(Field::LastName), Some(3));
        assert_eq!(map.get(Field::Engagement), Some(6));
        assert_eq!(map.get(Field::FinalStatus), Some(7));
        assert_eq!(map.get(Field::FollowUp), Some(9));
        assert_eq!(map.get(Field::Campus), None);
        assert_eq!(map.get(Field::PhoneNumber), None);
        assert_eq!(map.resolved(), 7);
    }

    #[test]
    fn numeric_header_cells_are_compared_as_text() {
        let header = vec![Cell::Int(2026), Cell::Text("Mode".to_string())];
        let headers = HeaderSet::from_row(&header);
        assert_eq!(headers.get(0), Some("2026"));
        assert_eq!(headers.position(&["mode"], MatchMode::Exact), Some(1));
    }
}
