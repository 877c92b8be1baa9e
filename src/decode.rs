//! Turning workbook bytes into sheets of cell grids.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::models::{Cell, Row, Sheet, Workbook};

/// Read the whole file, then decode it. The read is the only await point.
pub async fn read_workbook(path: &Path) -> Result<Workbook> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    decode_bytes(file_name, &bytes)
}

/// Decode by file extension: `.csv` becomes a single sheet, everything else is
/// handed to calamine, which recognises xlsx, xlsm, xlsb, xls and ods.
pub fn decode_bytes(file_name: &str, bytes: &[u8]) -> Result<Workbook> {
    let path = Path::new(file_name);
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if extension == "csv" {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("Sheet1");
        return decode_csv(name, bytes);
    }

    decode_spreadsheet(bytes)
}

fn decode_spreadsheet(bytes: &[u8]) -> Result<Workbook> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => sheets.push(Sheet::new(name, range_to_rows(&range))),
            Err(err) => {
                warn!("Could not read sheet '{}': {}", name, err);
                sheets.push(Sheet::unreadable(name, err.to_string()));
            }
        }
    }

    Ok(Workbook { sheets })
}

pub fn decode_csv(sheet_name: &str, bytes: &[u8]) -> Result<Workbook> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    // Legacy exports are often Windows-1252; invalid UTF-8 is replaced rather
    // than failing the file.
    for record in reader.byte_records() {
        let record = record?;
        let row: Row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(String::from_utf8_lossy(field).into_owned())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(Workbook {
        sheets: vec![Sheet::new(sheet_name, rows)],
    })
}

/// Rows are padded so that positions are absolute within the sheet, even when
/// the used range does not start at A1.
fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Row> = (0..start_row).map(|_| Vec::new()).collect();
    for source in range.rows() {
        let mut row: Row = Vec::with_capacity(start_col as usize + source.len());
        row.extend((0..start_col).map(|_| Cell::Empty));
        row.extend(source.iter().map(cell_from_data));
        rows.push(row);
    }
    rows
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Int(value) => Cell::Int(*value),
        Data::Float(value) => Cell::Float(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) if !value.is_duration() => Cell::DateTime(datetime),
            _ => Cell::Float(value.as_f64()),
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
        Data::Error(err) => Cell::Error(err.to_string()),
    }
}
