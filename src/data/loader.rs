use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::{Map, Value as JsonValue};

use super::error::{DataLoadError, FieldParseError};
use super::field::{self, RELEASE_DATE_FORMAT};
use super::model::RawRecord;

/// Columns every dataset must provide, in the order `record_from_cells`
/// expects them.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "name",
    "releaseDate",
    "developers",
    "publisherClass",
    "reviewScore",
    "copiesSold",
    "price",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw game rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma separated, header row
/// * `.tsv`          – tab separated, header row
/// * `.json`         – `[{ "name": ..., "releaseDate": ..., ... }, ...]`
/// * `.parquet`      – one column per field
///
/// `delimiter` overrides the separator for the delimited formats.
pub fn load_file(path: &Path, delimiter: Option<u8>) -> Result<Vec<RawRecord>, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "tsv" => load_delimited(path, delimiter.unwrap_or(b'\t'))?,
        "csv" | "txt" => load_delimited(path, delimiter.unwrap_or(b','))?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Read {} rows from {}", records.len(), path.display());
    Ok(records)
}

// ---------------------------------------------------------------------------
// Cells and column lookup shared by all formats
// ---------------------------------------------------------------------------

/// One source cell before it is interpreted for its column.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    fn text(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Null
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Some(s),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(f.to_string()),
        }
    }

    fn to_count(&self) -> Result<Option<u64>, FieldParseError> {
        let invalid = |value: String| FieldParseError::Number {
            value,
            kind: "copy count",
        };
        match self {
            Cell::Null => Ok(None),
            Cell::Text(s) => field::parse_count(s).map(Some),
            Cell::Int(i) => u64::try_from(*i).map(Some).map_err(|_| invalid(i.to_string())),
            Cell::Float(f) => field::count_from_f64(*f)
                .map(Some)
                .ok_or_else(|| invalid(f.to_string())),
        }
    }

    fn to_score(&self) -> Result<Option<f64>, FieldParseError> {
        match self {
            Cell::Null => Ok(None),
            Cell::Text(s) => field::parse_score(s).map(Some),
            Cell::Int(i) => Ok(Some(*i as f64)),
            Cell::Float(f) if f.is_finite() => Ok(Some(*f)),
            Cell::Float(f) => Err(FieldParseError::Number {
                value: f.to_string(),
                kind: "review score",
            }),
        }
    }

    fn to_price(&self) -> Result<Option<f64>, FieldParseError> {
        let value = match self {
            Cell::Null => return Ok(None),
            Cell::Text(s) => return field::parse_price(s).map(Some),
            Cell::Int(i) => *i as f64,
            Cell::Float(f) => *f,
        };
        field::price_from_f64(value)
            .map(Some)
            .ok_or_else(|| FieldParseError::Number {
                value: value.to_string(),
                kind: "price",
            })
    }
}

/// Positions of the required columns in a source header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex([usize; REQUIRED_COLUMNS.len()]);

impl ColumnIndex {
    fn locate<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self, DataLoadError> {
        let headers: Vec<&str> = headers
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers.iter().position(|h| *h == column) {
                Some(i) => *slot = i,
                None => missing.push(column.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(ColumnIndex(positions))
        } else {
            Err(DataLoadError::MissingColumns(missing))
        }
    }
}

fn record_from_cells(row: usize, cells: [Cell; REQUIRED_COLUMNS.len()]) -> RawRecord {
    let [name, release_date, developers, publisher_class, score, copies, price] = cells;
    RawRecord {
        review_score: absorb(row, "reviewScore", score.to_score()),
        copies_sold: absorb(row, "copiesSold", copies.to_count()),
        price: absorb(row, "price", price.to_price()),
        name: name.into_text().unwrap_or_default(),
        release_date: release_date.into_text(),
        developers: developers.into_text().unwrap_or_default(),
        publisher_class: publisher_class.into_text().unwrap_or_default(),
    }
}

/// Per-field failures degrade to a missing value.
fn absorb<T>(row: usize, column: &str, parsed: Result<Option<T>, FieldParseError>) -> Option<T> {
    parsed.unwrap_or_else(|e| {
        log::debug!("Row {row}, {column}: {e}; treating as missing");
        None
    })
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<RawRecord>, DataLoadError> {
    let csv_error = |source: csv::Error| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let columns = ColumnIndex::locate(headers.iter())?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error)?;
        let cells = columns
            .0
            .map(|i| record.get(i).map_or(Cell::Null, Cell::text));
        records.push(record_from_cells(row, cells));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "name": "Foo", "releaseDate": "15-03-2024", "copiesSold": 120000, ... },
///   ...
/// ]
/// ```
///
/// A column counts as present when at least one record carries the key.
fn load_json(path: &Path) -> Result<Vec<RawRecord>, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataLoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let JsonValue::Array(rows) = root else {
        return Err(DataLoadError::JsonNotArray);
    };

    let mut objects: Vec<Map<String, JsonValue>> = Vec::with_capacity(rows.len());
    for (row, value) in rows.into_iter().enumerate() {
        match value {
            JsonValue::Object(obj) => objects.push(obj),
            _ => return Err(DataLoadError::JsonShape { row }),
        }
    }

    let keys: BTreeSet<&str> = objects
        .iter()
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !keys.contains(column))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    Ok(objects
        .iter()
        .enumerate()
        .map(|(row, obj)| record_from_cells(row, REQUIRED_COLUMNS.map(|c| json_cell(obj.get(c)))))
        .collect())
}

fn json_cell(value: Option<&JsonValue>) -> Cell {
    match value {
        None | Some(JsonValue::Null) => Cell::Null,
        Some(JsonValue::String(s)) => Cell::text(s),
        Some(JsonValue::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Cell::Int(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        Some(other) => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// `releaseDate` may be stored as text (`DD-MM-YYYY`) or as an Arrow
/// `Date32`; numeric columns may be any integer or float width.  Works with
/// files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<Vec<RawRecord>, DataLoadError> {
    let parquet_error = |source: ParquetError| DataLoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_error)?;
    let columns = ColumnIndex::locate(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    )?;
    let reader = builder.build().map_err(parquet_error)?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        for row in 0..batch.num_rows() {
            let cells = columns.0.map(|i| extract_cell(batch.column(i), row));
            records.push(record_from_cells(records.len(), cells));
        }
    }
    Ok(records)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Cell::text(col.as_string::<i64>().value(row)),
        DataType::Int32 => Cell::Int(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Cell::Int(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => Cell::Int(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(Cell::Float(v as f64), Cell::Int)
        }
        DataType::Float32 => Cell::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map_or(Cell::Null, |d| {
                Cell::Text(d.format(RELEASE_DATE_FORMAT).to_string())
            }),
        DataType::Boolean => Cell::Text(col.as_boolean().value(row).to_string()),
        other => {
            log::debug!("Row {row}: unsupported parquet type {other:?}; treating as missing");
            Cell::Null
        }
    }
}
