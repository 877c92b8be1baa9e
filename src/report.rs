use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{IngestResult, StudentRecord};
use crate::risk;
use crate::summary;

#[derive(Debug, Clone, Default)]
pub struct ReportFilter<'a> {
    pub subject: Option<&'a str>,
    pub week: Option<u32>,
}

fn assessment_for_week(student: &StudentRecord, week: u32) -> Option<&str> {
    student
        .weekly_attendance
        .iter()
        .find(|entry| entry.week == week)
        .and_then(|entry| entry.assessment_checkpoint.as_deref())
}

pub fn build_report(
    result: &IngestResult,
    filter: &ReportFilter<'_>,
    generated_at: DateTime<Utc>,
) -> String {
    let students = risk::filter_by_subject(&result.students, filter.subject);
    let (at_risk, good_standing) = risk::partition_by_risk(&students);
    let subjects = summary::subjects(&result.students);

    let mut output = String::new();
    let subject_label = filter.subject.unwrap_or("all subjects");

    let _ = writeln!(output, "# Cohort Ingestion Report");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        subject_label,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Sheets");

    for sheet in &result.sheets {
        match &sheet.skip_reason {
            None => {
                let _ = writeln!(
                    output,
                    "- {}: {} student records ({} rows dropped)",
                    sheet.name, sheet.record_count, sheet.rejected_rows
                );
            }
            Some(reason) => {
                let _ = writeln!(output, "- {}: skipped, {}", sheet.name, reason);
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total students: {}", students.len());
    let _ = writeln!(output, "- At risk: {}", at_risk.len());
    let _ = writeln!(output, "- Good standing: {}", good_standing.len());
    let _ = writeln!(output, "- Subjects: {}", subjects.len());

    let _ = writeln!(output);
    let _ = writeln!(output, "## Subject Breakdown");
    let breakdown = risk::subject_breakdown(&result.students);
    if breakdown.is_empty() {
        let _ = writeln!(output, "No subjects recorded.");
    } else {
        for subject in &breakdown {
            let _ = writeln!(
                output,
                "- {}: {} students, {} at risk ({:.1}%)",
                subject.subject, subject.total, subject.at_risk, subject.percentage
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Attendance");
    let stats = risk::weekly_attendance_stats(&students);
    let stats: Vec<_> = stats
        .into_iter()
        .filter(|week| filter.week.map_or(true, |selected| week.week == selected))
        .collect();
    if stats.is_empty() {
        let _ = writeln!(output, "No attendance data available for the selected criteria.");
    } else {
        for week in &stats {
            let (session1, session2) = week.session_rates(students.len());
            let marker = if risk::is_assessment_week(week.week) {
                " (assessment)"
            } else {
                ""
            };
            let _ = writeln!(
                output,
                "- Week {}{}: {:.0}% overall, session 1 {:.0}%, session 2 {:.0}% ({} present, {} absent)",
                week.week,
                marker,
                week.attendance_rate(),
                session1,
                session2,
                week.present,
                week.absent
            );
        }
    }

    let show_assessment = filter.week.filter(|week| risk::is_assessment_week(*week));
    let _ = writeln!(output);
    let _ = writeln!(output, "## At Risk Students");

    if at_risk.is_empty() {
        let _ = writeln!(output, "No students flagged at risk.");
    } else {
        for student in &at_risk {
            let _ = writeln!(
                output,
                "- {} ({}, {}): {}",
                student.name.as_deref().unwrap_or("Unknown Student"),
                student.course.as_deref().unwrap_or("Unknown Course"),
                student.campus.as_deref().unwrap_or("no campus"),
                student.final_status.as_deref().unwrap_or("Unknown")
            );
            for (label, value) in [
                ("Engagement", student.engagement.as_deref()),
                ("Action", student.action.as_deref()),
                ("Follow up", student.follow_up.as_deref()),
            ] {
                if let Some(value) = value {
                    let _ = writeln!(output, "  - {label}: {value}");
                }
            }
            if let Some(checkpoint) =
                show_assessment.and_then(|week| assessment_for_week(student, week))
            {
                let _ = writeln!(output, "  - Assessment checkpoint: {checkpoint}");
            }
        }
    }

    output
}
