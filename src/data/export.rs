use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::model::StudentRecord;
use super::query::{LabelFilter, SortDirection, filter_and_sort};

// ---------------------------------------------------------------------------
// Flat export row
// ---------------------------------------------------------------------------

/// One record flattened for export. Field order is the column order of the
/// written file; the first eight names match the input sheet so an export
/// can be loaded back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub gender: String,
    #[serde(rename = "race/ethnicity")]
    pub ethnicity: String,
    #[serde(rename = "parental level of education")]
    pub parental_education: String,
    pub lunch: String,
    #[serde(rename = "test preparation course")]
    pub test_prep: String,
    #[serde(rename = "math score")]
    pub math_score: f64,
    #[serde(rename = "reading score")]
    pub reading_score: f64,
    #[serde(rename = "writing score")]
    pub writing_score: f64,
    #[serde(rename = "average score")]
    pub average_score: f64,
    pub performance: String,
}

impl From<&StudentRecord> for ExportRow {
    fn from(record: &StudentRecord) -> Self {
        let demographics = record.demographics();
        let scores = record.scores();
        ExportRow {
            gender: demographics.gender.clone(),
            ethnicity: demographics.ethnicity.clone(),
            parental_education: demographics.parental_education.clone(),
            lunch: demographics.lunch.clone(),
            test_prep: demographics.test_prep.clone(),
            math_score: scores.math,
            reading_score: scores.reading,
            writing_score: scores.writing,
            average_score: record.average_score(),
            performance: record.label().to_string(),
        }
    }
}

/// The filtered and sorted view as flat rows. The display limit does not
/// apply to exports.
pub fn export_rows(
    records: &[StudentRecord],
    filter: LabelFilter,
    sort: SortDirection,
) -> Vec<ExportRow> {
    filter_and_sort(records, filter, sort)
        .iter()
        .map(ExportRow::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write the filtered view to `path`, returning the number of rows written.
/// `.json` produces an array of objects; anything else is written as CSV.
pub fn export_view(
    path: &Path,
    records: &[StudentRecord],
    filter: LabelFilter,
    sort: SortDirection,
) -> Result<usize> {
    let rows = export_rows(records, filter, sort);

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        write_json(path, &rows)?;
    } else {
        write_csv(path, &rows)?;
    }
    Ok(rows.len())
}

fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    if rows.is_empty() {
        // serialize() only emits the header alongside the first row
        writer.write_record([
            "gender",
            "race/ethnicity",
            "parental level of education",
            "lunch",
            "test preparation course",
            "math score",
            "reading score",
            "writing score",
            "average score",
            "performance",
        ])?;
    }
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn write_json(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, rows)
        .with_context(|| format!("writing {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
