use std::collections::BTreeMap;

use crate::models::{StudentRecord, SubjectSummary, WeekStats};
use crate::summary;

pub const ASSESSMENT_WEEKS: [u32; 3] = [3, 5, 8];

pub fn is_assessment_week(week: u32) -> bool {
    ASSESSMENT_WEEKS.contains(&week)
}

/// Only the final status decides whether a student is at risk.
pub fn is_at_risk(student: &StudentRecord) -> bool {
    student
        .final_status
        .as_deref()
        .map(|status| {
            let status = status.to_lowercase();
            status.contains("at risk") || status.contains("atrisk")
        })
        .unwrap_or(false)
}

pub fn filter_by_subject<'a>(
    students: &'a [StudentRecord],
    subject: Option<&str>,
) -> Vec<&'a StudentRecord> {
    students
        .iter()
        .filter(|student| match subject {
            Some(subject) => student.course.as_deref() == Some(subject),
            None => true,
        })
        .collect()
}

pub fn partition_by_risk<'a>(
    students: &[&'a StudentRecord],
) -> (Vec<&'a StudentRecord>, Vec<&'a StudentRecord>) {
    students.iter().copied().partition(|student| is_at_risk(student))
}

pub fn subject_breakdown(students: &[StudentRecord]) -> Vec<SubjectSummary> {
    summary::subjects(students)
        .into_iter()
        .map(|subject| {
            let enrolled = filter_by_subject(students, Some(subject.as_str()));
            let at_risk = enrolled.iter().filter(|student| is_at_risk(student)).count();
            let total = enrolled.len();
            SubjectSummary {
                subject,
                total,
                at_risk,
                percentage: if total == 0 {
                    0.0
                } else {
                    at_risk as f64 / total as f64 * 100.0
                },
            }
        })
        .collect()
}

fn attended(session: Option<&str>) -> bool {
    session
        .map(|text| {
            let text = text.to_lowercase();
            text.contains("present") || text.contains("attended")
        })
        .unwrap_or(false)
}

pub fn weekly_attendance_stats(students: &[&StudentRecord]) -> Vec<WeekStats> {
    let mut stats: BTreeMap<u32, WeekStats> = BTreeMap::new();

    for student in students {
        for entry in &student.weekly_attendance {
            let week = stats.entry(entry.week).or_insert_with(|| WeekStats {
                week: entry.week,
                ..WeekStats::default()
            });

            let first = attended(entry.session1.as_deref());
            let second = attended(entry.session2.as_deref());
            if first {
                week.session1_attended += 1;
            }
            if second {
                week.session2_attended += 1;
            }

            if first || second {
                week.present += 1;
            } else if entry.session1.is_some() || entry.session2.is_some() {
                week.absent += 1;
            }
            week.total += 1;
        }
    }

    stats.into_values().collect()
}

impl WeekStats {
    pub fn attendance_rate(&self) -> f64 {
        percentage(self.present, self.total)
    }

    /// Session rates are relative to every student considered, not only those
    /// with an entry for this week.
    pub fn session_rates(&self, student_count: usize) -> (f64, f64) {
        (
            percentage(self.session1_attended, student_count),
            percentage(self.session2_attended, student_count),
        )
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeeklyAttendance;

    fn sample_student(course: &str, status: Option<&str>) -> StudentRecord {
        StudentRecord {
            name: Some("Avery Lee".to_string()),
            course: Some(course.to_string()),
            final_status: status.map(str::to_string),
            ..StudentRecord::default()
        }
    }

    fn week(week: u32, session1: Option<&str>, session2: Option<&str>) -> WeeklyAttendance {
        WeeklyAttendance {
            week,
            session1: session1.map(str::to_string),
            session2: session2.map(str::to_string),
            ..WeeklyAttendance::default()
        }
    }

    #[test]
    fn at_risk_matches_either_spelling() {
        assert!(is_at_risk(&sample_student("Math", Some("At Risk"))));
        assert!(is_at_risk(&sample_student("Math", Some("AtRisk - review"))));
        assert!(!is_at_risk(&sample_student("Math", Some("Good Standing"))));
        assert!(!is_at_risk(&sample_student("Math", None)));
    }

    #[test]
    fn assessment_weeks_follow_the_checkpoint_schedule() {
        assert!(is_assessment_week(3));
        assert!(is_assessment_week(8));
        assert!(!is_assessment_week(4));
    }

    #[test]
    fn filter_and_partition_preserve_order() {
        let students = vec![
            sample_student("Math", Some("At Risk")),
            sample_student("Art", Some("Good")),
            sample_student("Math", Some("Good")),
        ];
        let math = filter_by_subject(&students, Some("Math"));
        assert_eq!(math.len(), 2);
        assert_eq!(filter_by_subject(&students, None).len(), 3);

        let (at_risk, good) = partition_by_risk(&math);
        assert_eq!(at_risk.len(), 1);
        assert_eq!(good.len(), 1);
        assert_eq!(good[0].final_status.as_deref(), Some("Good"));
    }

    #[test]
    fn breakdown_counts_at_risk_per_subject() {
        let students = vec![
            sample_student("Math", Some("At Risk")),
            sample_student("Art", Some("Good")),
            sample_student("Math", Some("Good")),
            sample_student("Math", Some("at risk")),
        ];
        let breakdown = subject_breakdown(&students);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].subject, "Math");
        assert_eq!(breakdown[0].total, 3);
        assert_eq!(breakdown[0].at_risk, 2);
        assert!((breakdown[0].percentage - 66.666).abs() < 0.01);
        assert_eq!(breakdown[1].subject, "Art");
        assert_eq!(breakdown[1].at_risk, 0);
    }

    #[test]
    fn weekly_stats_count_present_and_absent() {
        let mut first = sample_student("Math", None);
        first.weekly_attendance = vec![
            week(1, Some("Present"), Some("Absent")),
            week(2, Some("Absent"), None),
        ];
        let mut second = sample_student("Math", None);
        second.weekly_attendance = vec![week(1, None, Some("Attended")), week(2, None, None)];
        let third = sample_student("Math", None);

        let students = vec![&first, &second, &third];
        let stats = weekly_attendance_stats(&students);
        assert_eq!(stats.len(), 2);

        let week1 = &stats[0];
        assert_eq!(week1.week, 1);
        assert_eq!(week1.present, 2);
        assert_eq!(week1.absent, 0);
        assert_eq!(week1.total, 2);
        assert_eq!(week1.session1_attended, 1);
        assert_eq!(week1.session2_attended, 1);
        assert!((week1.attendance_rate() - 100.0).abs() < 0.001);
        let (s1, s2) = week1.session_rates(students.len());
        assert!((s1 - 33.333).abs() < 0.01);
        assert!((s2 - 33.333).abs() < 0.01);

        let week2 = &stats[1];
        assert_eq!(week2.present, 0);
        assert_eq!(week2.absent, 1);
        assert_eq!(week2.total, 2);
        assert_eq!(week2.attendance_rate(), 0.0);
    }

    #[test]
    fn no_weekly_entries_means_no_stats() {
        let student = sample_student("Math", None);
        assert!(weekly_attendance_stats(&[&student]).is_empty());
    }
}
