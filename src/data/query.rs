use std::fmt;

use thiserror::Error;

use super::model::{PerformanceLabel, StudentRecord};

/// Limit used when the requested one cannot be parsed.
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("'{0}' is not a valid record limit")]
    InvalidLimit(String),

    #[error("no records loaded")]
    EmptyCollection,
}

// ---------------------------------------------------------------------------
// View parameters
// ---------------------------------------------------------------------------

/// Performance filter: the "All" sentinel or one specific label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFilter {
    #[default]
    All,
    Only(PerformanceLabel),
}

impl LabelFilter {
    /// Choices in the order the filter selector lists them.
    pub fn options() -> impl Iterator<Item = LabelFilter> {
        std::iter::once(LabelFilter::All).chain(PerformanceLabel::ALL.map(LabelFilter::Only))
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Only(label) => record.label() == *label,
        }
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFilter::All => f.write_str("All"),
            LabelFilter::Only(label) => write!(f, "{label}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub const ALL: [SortDirection; 2] = [SortDirection::Ascending, SortDirection::Descending];
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("Ascending"),
            SortDirection::Descending => f.write_str("Descending"),
        }
    }
}

/// Everything the displayed view depends on besides the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewParams {
    pub filter: LabelFilter,
    pub sort: SortDirection,
    pub limit: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            filter: LabelFilter::All,
            sort: SortDirection::Descending,
            limit: DEFAULT_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Limit parsing
// ---------------------------------------------------------------------------

pub fn try_parse_limit(input: &str) -> Result<usize, QueryError> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| QueryError::InvalidLimit(input.to_string()))
}

/// Parse a user-typed limit, falling back to [`DEFAULT_LIMIT`].
pub fn parse_limit(input: &str) -> usize {
    try_parse_limit(input).unwrap_or_else(|e| {
        log::debug!("{e}, using default of {DEFAULT_LIMIT}");
        DEFAULT_LIMIT
    })
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Filter then stable-sort by average score. No truncation; this is the
/// sequence that gets exported.
pub fn filter_and_sort(
    records: &[StudentRecord],
    filter: LabelFilter,
    sort: SortDirection,
) -> Vec<StudentRecord> {
    let mut selected: Vec<StudentRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();

    // sort_by is stable; descending compares b to a so ties keep their order.
    match sort {
        SortDirection::Ascending => {
            selected.sort_by(|a, b| a.average_score().total_cmp(&b.average_score()))
        }
        SortDirection::Descending => {
            selected.sort_by(|a, b| b.average_score().total_cmp(&a.average_score()))
        }
    }
    selected
}

/// Filter, sort and truncate to at most `limit` records.
pub fn build_view(
    records: &[StudentRecord],
    filter: LabelFilter,
    sort: SortDirection,
    limit: usize,
) -> Vec<StudentRecord> {
    let mut view = filter_and_sort(records, filter, sort);
    view.truncate(limit);
    view
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregates of the average score over a whole collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub count: usize,
}

pub fn compute_statistics(records: &[StudentRecord]) -> Result<Statistics, QueryError> {
    if records.is_empty() {
        return Err(QueryError::EmptyCollection);
    }

    let averages = records.iter().map(StudentRecord::average_score);
    let max = averages.clone().fold(f64::NEG_INFINITY, f64::max);
    let min = averages.clone().fold(f64::INFINITY, f64::min);
    let mean = averages.sum::<f64>() / records.len() as f64;

    Ok(Statistics {
        max,
        min,
        mean,
        count: records.len(),
    })
}
