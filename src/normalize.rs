use crate::fields::Field;
use crate::headers::ColumnMap;
use crate::models::{Row, RowOutcome, RowRejection, StudentRecord};
use crate::weekly::WeeklyBlockLayout;

#[derive(Debug, Clone)]
pub struct RowNormalizer {
    columns: ColumnMap,
    layout: WeeklyBlockLayout,
}

impl RowNormalizer {
    pub fn new(columns: ColumnMap, layout: WeeklyBlockLayout) -> Self {
        Self { columns, layout }
    }

    pub fn normalize(&self, row: &Row) -> RowOutcome {
        if row.iter().all(|cell| cell.present_text().is_none()) {
            return RowOutcome::Rejected(RowRejection::Blank);
        }

        let field = |field: Field| {
            self.columns
                .get(field)
                .and_then(|index| row.get(index))
                .and_then(|cell| cell.present_text())
        };

        let first_name = field(Field::FirstName);
        let last_name = field(Field::LastName);
        let name = compose_name(first_name.as_deref(), last_name.as_deref());

        let record = StudentRecord {
            name,
            course: field(Field::Course),
            student_id: field(Field::StudentId),
            first_name,
            last_name,
            campus: field(Field::Campus),
            student_email: field(Field::StudentEmail),
            personal_email: field(Field::PersonalEmail),
            phone_number: field(Field::PhoneNumber),
            locality: field(Field::Locality),
            mode: field(Field::Mode),
            final_status: field(Field::FinalStatus),
            engagement: field(Field::Engagement),
            action: field(Field::Action),
            follow_up: field(Field::FollowUp),
            weekly_attendance: self.layout.read(row),
        };

        if record.name.is_none() && record.course.is_none() && record.final_status.is_none() {
            return RowOutcome::Rejected(RowRejection::MissingKeyFields);
        }

        RowOutcome::Accepted(record)
    }
}

fn compose_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    match (first, last) {
        (None, None) => None,
        (first, last) => {
            let joined = format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default());
            Some(joined.trim().to_string())
        }
    }
}
