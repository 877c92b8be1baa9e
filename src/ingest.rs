use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::IngestConfig;
use crate::decode;
use crate::error::{IngestError, Result};
use crate::headers::{locate_headers, ColumnMap, HeaderCheck};
use crate::models::{
    IngestResult, Row, RowOutcome, Sheet, SheetOutcome, SheetReport, SkipReason, Workbook,
};
use crate::normalize::RowNormalizer;
use crate::weekly::WeeklyBlockLayout;

/// Normalize one sheet. Malformed sheets degrade to `Skipped`, never to an error.
pub fn process_sheet(sheet: &Sheet, config: &IngestConfig) -> SheetOutcome {
    let rows = match &sheet.grid {
        Ok(rows) => rows,
        Err(reason) => return SheetOutcome::Skipped(SkipReason::Unreadable(reason.clone())),
    };
    process_rows(&sheet.name, rows, config)
}

fn process_rows(name: &str, rows: &[Row], config: &IngestConfig) -> SheetOutcome {
    if rows.len() < 2 {
        return SheetOutcome::Skipped(SkipReason::TooFewRows { rows: rows.len() });
    }

    let headers = match locate_headers(rows, config.header_row, config.min_header_matches) {
        HeaderCheck::Valid(headers) => headers,
        HeaderCheck::Invalid { matched, required } => {
            return SheetOutcome::Skipped(SkipReason::InvalidHeaders { matched, required })
        }
    };

    let columns = ColumnMap::build(&headers);
    let layout = WeeklyBlockLayout::detect(&headers, config.block_lookahead);
    debug!(
        "Sheet '{}': {} record columns resolved, {} weekly block(s)",
        name,
        columns.resolved(),
        layout.len()
    );
    let normalizer = RowNormalizer::new(columns, layout);

    let mut records = Vec::new();
    let mut rejected_rows = 0usize;
    for row in rows.iter().skip(config.data_start_row) {
        match normalizer.normalize(row) {
            RowOutcome::Accepted(record) => records.push(record),
            RowOutcome::Rejected(_) => rejected_rows += 1,
        }
    }

    if records.is_empty() {
        return SheetOutcome::Skipped(SkipReason::NoRetainedRecords);
    }

    SheetOutcome::Processed {
        records,
        rejected_rows,
    }
}

pub fn ingest_workbook(workbook: &Workbook, config: &IngestConfig) -> Result<IngestResult> {
    if workbook.sheets.is_empty() {
        return Err(IngestError::NoSheets);
    }

    let mut students = Vec::new();
    let mut sheets = Vec::with_capacity(workbook.sheets.len());

    for sheet in &workbook.sheets {
        match process_sheet(sheet, config) {
            SheetOutcome::Processed {
                records,
                rejected_rows,
            } => {
                info!(
                    "Sheet '{}': {} student record(s), {} row(s) dropped",
                    sheet.name,
                    records.len(),
                    rejected_rows
                );
                sheets.push(SheetReport {
                    name: sheet.name.clone(),
                    record_count: records.len(),
                    rejected_rows,
                    skip_reason: None,
                });
                students.extend(records);
            }
            SheetOutcome::Skipped(reason) => {
                warn!("Skipping sheet '{}': {}", sheet.name, reason);
                sheets.push(SheetReport {
                    name: sheet.name.clone(),
                    record_count: 0,
                    rejected_rows: 0,
                    skip_reason: Some(reason),
                });
            }
        }
    }

    let result = IngestResult {
        students,
        sheets,
        canonical_weeks: config.canonical_weeks,
    };

    if result.students.is_empty() {
        return Err(IngestError::NoValidData {
            skipped: result.skipped_sheets(),
        });
    }

    Ok(result)
}

pub async fn ingest_file(path: &Path, config: &IngestConfig) -> Result<IngestResult> {
    let workbook = decode::read_workbook(path).await?;
    info!(
        "Workbook {} has {} sheet(s)",
        path.display(),
        workbook.sheets.len()
    );
    ingest_workbook(&workbook, config)
}
