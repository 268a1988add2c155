use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{REQUIRED_FIELDS, RecordError, StudentCollection, StudentRecord, parse_record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load student records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-delimited, header row with the column names
/// * `.tsv`     – same layout, tab-delimited
/// * `.json`    – `[{ "gender": "female", "math score": 72, ... }, ...]`
/// * `.parquet` – one column per field
///
/// The first row that fails to parse aborts the whole load.
pub fn load_file(path: &Path) -> Result<StudentCollection> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    Ok(StudentCollection::from_records(records))
}

/// Fail early when a sheet lacks a required column, even with no data rows.
fn check_columns(columns: &[&str]) -> Result<()> {
    match REQUIRED_FIELDS.into_iter().find(|field| !columns.contains(field)) {
        Some(field) => Err(RecordError::MissingField(field).into()),
        None => Ok(()),
    }
}

fn parse_row(row: &BTreeMap<String, String>, row_no: usize) -> Result<StudentRecord> {
    parse_record(row).with_context(|| format!("row {row_no}"))
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<StudentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    check_columns(&headers.iter().map(String::as_str).collect::<Vec<_>>())?;

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let record = result.with_context(|| format!("reading row {row_no}"))?;

        let row: BTreeMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();

        records.push(parse_row(&row, row_no)?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "gender": "female",
///     "race/ethnicity": "group B",
///     "math score": 72,
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<StudentRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, value) in rows.iter().enumerate() {
        let row_no = i + 1;
        let obj = value
            .as_object()
            .with_context(|| format!("row {row_no} is not a JSON object"))?;

        let row: BTreeMap<String, String> = obj
            .iter()
            .filter_map(|(key, val)| json_to_text(val).map(|text| (key.clone(), text)))
            .collect();

        records.push(parse_row(&row, row_no)?);
    }

    Ok(records)
}

/// Null is treated as an absent cell.
fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field. String, integer, float
/// and boolean columns are accepted; scores may be stored as numbers or text.
fn load_parquet(path: &Path) -> Result<Vec<StudentRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    check_columns(
        &schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect::<Vec<_>>(),
    )?;

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_no = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            row_no += 1;
            let mut cells = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = cell_to_text(batch.column(col_idx), row)
                    .with_context(|| format!("row {row_no}, column '{}'", field.name()))?;
                if let Some(text) = value {
                    cells.insert(field.name().clone(), text);
                }
            }
            records.push(parse_row(&cells, row_no)?);
        }
    }

    Ok(records)
}

/// Render a single Arrow cell as text. `None` for nulls.
fn cell_to_text(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let text = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row)
            .to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row)
            .to_string(),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row)
            .to_string(),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row)
            .to_string(),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row)
            .to_string(),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .context("expected BooleanArray")?
            .value(row)
            .to_string(),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(Some(text))
}
