//! Detection of the repeated per-week column groups.
//!
//! Header text repeats from week to week ("Engagement", "Action", ...), so a
//! column is attributed to a week by position: each "Session 1" header opens a
//! block and the labels found in a short window after it belong to that block.

use crate::fields::{
    matches_any, MatchMode, ACTION_TERMS, ASSESSMENT_TERMS, ENGAGEMENT_TERMS, FOLLOW_UP_TERMS,
    SESSION1_TERMS, SESSION2_TERMS,
};
use crate::headers::HeaderSet;
use crate::models::{Row, WeeklyAttendance};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekColumns {
    pub week: u32,
    pub session1: Option<usize>,
    pub session2: Option<usize>,
    pub engagement: Option<usize>,
    pub action: Option<usize>,
    pub follow_up: Option<usize>,
    pub assessment_checkpoint: Option<usize>,
}

impl WeekColumns {
    pub fn read(&self, row: &Row) -> WeeklyAttendance {
        let cell = |index: Option<usize>| {
            index
                .and_then(|index| row.get(index))
                .and_then(|cell| cell.present_text())
        };

        WeeklyAttendance {
            week: self.week,
            session1: cell(self.session1),
            session2: cell(self.session2),
            engagement: cell(self.engagement),
            action: cell(self.action),
            follow_up: cell(self.follow_up),
            assessment_checkpoint: cell(self.assessment_checkpoint),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyBlockLayout {
    pub weeks: Vec<WeekColumns>,
}

impl WeeklyBlockLayout {
    /// Scan the headers left to right and record one block per "Session 1"
    /// header. `lookahead` bounds how far past the session columns the
    /// remaining labels of a week are searched.
    pub fn detect(headers: &HeaderSet, lookahead: usize) -> Self {
        let is_label = |index: usize, terms: &[&str]| {
            headers
                .get(index)
                .map(|header| matches_any(header, terms, MatchMode::Substring))
                .unwrap_or(false)
        };

        let mut weeks = Vec::new();
        let mut week = 0u32;
        let mut index = 0usize;

        while index < headers.len() {
            if !is_label(index, SESSION1_TERMS) {
                index += 1;
                continue;
            }

            week += 1;
            let mut block = WeekColumns {
                week,
                session1: Some(index),
                ..WeekColumns::default()
            };

            let mut window_start = index + 1;
            if is_label(window_start, SESSION2_TERMS) {
                block.session2 = Some(window_start);
                window_start += 1;
            }

            let window_end = (window_start + lookahead).min(headers.len());
            let mut cursor = window_start;
            while cursor < window_end {
                // The next week starts here. Resume the outer scan at this
                // header instead of after the window, so a compact block
                // cannot swallow the following week.
                if is_label(cursor, SESSION1_TERMS) {
                    break;
                }
                if block.engagement.is_none() && is_label(cursor, ENGAGEMENT_TERMS) {
                    block.engagement = Some(cursor);
                }
                if block.action.is_none() && is_label(cursor, ACTION_TERMS) {
                    block.action = Some(cursor);
                }
                if block.follow_up.is_none() && is_label(cursor, FOLLOW_UP_TERMS) {
                    block.follow_up = Some(cursor);
                }
                if block.assessment_checkpoint.is_none() && is_label(cursor, ASSESSMENT_TERMS) {
                    block.assessment_checkpoint = Some(cursor);
                }
                cursor += 1;
            }

            weeks.push(block);
            index = cursor;
        }

        Self { weeks }
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn read(&self, row: &Row) -> Vec<WeeklyAttendance> {
        self.weeks.iter().map(|week| week.read(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn headers(values: &[&str]) -> HeaderSet {
        let row: Row = values
            .iter()
            .map(|value| Cell::Text(value.to_string()))
            .collect();
        HeaderSet::from_row(&row)
    }

    fn week_block(week: u32) -> Vec<String> {
        vec![
            format!("Week {week} Session 1"),
            format!("Week {week} Session 2"),
            "Engagement".to_string(),
            "Action".to_string(),
            "Follow Up".to_string(),
            "Assessment Checkpoint".to_string(),
        ]
    }

    #[test]
    fn no_session_headers_means_no_blocks() {
        let layout = WeeklyBlockLayout::detect(&headers(&["Course", "Engagement", "Action"]), 4);
        assert!(layout.weeks.is_empty());
    }

    #[test]
    fn full_blocks_are_numbered_in_discovery_order() {
        let mut values = vec!["Course".to_string(), "Final Status".to_string()];
        for week in 1..=3 {
            values.extend(week_block(week));
        }
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let layout = WeeklyBlockLayout::detect(&headers(&refs), 4);

        assert_eq!(layout.len(), 3);
        assert_eq!(
            layout.weeks.iter().map(|w| w.week).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        let second = &layout.weeks[1];
        assert_eq!(second.session1, Some(8));
        assert_eq!(second.session2, Some(9));
        assert_eq!(second.engagement, Some(10));
        assert_eq!(second.action, Some(11));
        assert_eq!(second.follow_up, Some(12));
        assert_eq!(second.assessment_checkpoint, Some(13));
    }

    #[test]
    fn labels_outside_the_window_are_ignored() {
        let layout = WeeklyBlockLayout::detect(
            &headers(&[
                "Session 1",
                "Session 2",
                "Notes",
                "Notes",
                "Notes",
                "Notes",
                "Engagement",
            ]),
            4,
        );
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.weeks[0].engagement, None);
    }

    #[test]
    fn lookahead_is_tunable() {
        let values = [
            "Session 1",
            "Session 2",
            "Notes",
            "Notes",
            "Notes",
            "Notes",
            "Engagement",
        ];
        let layout = WeeklyBlockLayout::detect(&headers(&values), 5);
        assert_eq!(layout.weeks[0].engagement, Some(6));
    }

    #[test]
    fn missing_session_two_still_records_found_fields() {
        let layout =
            WeeklyBlockLayout::detect(&headers(&["Session 1", "Engagement", "Action"]), 4);
        let block = &layout.weeks[0];
        assert_eq!(block.session1, Some(0));
        assert_eq!(block.session2, None);
        assert_eq!(block.engagement, Some(1));
        assert_eq!(block.action, Some(2));
        assert_eq!(block.follow_up, None);
    }

    #[test]
    fn short_block_does_not_swallow_the_next_week() {
        let layout = WeeklyBlockLayout::detect(
            &headers(&[
                "Session 1",
                "Session 2",
                "Engagement",
                "Session 1",
                "Session 2",
                "Action",
            ]),
            4,
        );
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.weeks[0].action, None);
        assert_eq!(layout.weeks[1].session1, Some(3));
        assert_eq!(layout.weeks[1].action, Some(5));
    }

    #[test]
    fn reads_weekly_attendance_from_a_row() {
        let layout = WeeklyBlockLayout::detect(
            &headers(&["Session 1", "Session 2", "Engagement", "Action"]),
            4,
        );
        let row = vec![
            Cell::Text(" Present ".to_string()),
            Cell::Text("   ".to_string()),
            Cell::Text("High".to_string()),
        ];
        let attendance = layout.read(&row);
        assert_eq!(attendance.len(), 1);
        assert_eq!(attendance[0].week, 1);
        assert_eq!(attendance[0].session1.as_deref(), Some("Present"));
        assert_eq!(attendance[0].session2, None);
        assert_eq!(attendance[0].engagement.as_deref(), Some("High"));
        assert_eq!(attendance[0].action, None);
    }
}
