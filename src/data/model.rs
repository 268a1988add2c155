use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Column names of the input sheet
// ---------------------------------------------------------------------------

pub const GENDER: &str = "gender";
pub const ETHNICITY: &str = "race/ethnicity";
pub const PARENTAL_EDUCATION: &str = "parental level of education";
pub const LUNCH: &str = "lunch";
pub const TEST_PREP: &str = "test preparation course";
pub const MATH_SCORE: &str = "math score";
pub const READING_SCORE: &str = "reading score";
pub const WRITING_SCORE: &str = "writing score";

/// Every column a row must carry, in sheet order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    GENDER,
    ETHNICITY,
    PARENTAL_EDUCATION,
    LUNCH,
    TEST_PREP,
    MATH_SCORE,
    READING_SCORE,
    WRITING_SCORE,
];

// ---------------------------------------------------------------------------
// Errors raised while turning a raw row into a record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}': '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// PerformanceLabel – qualitative band of an average score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PerformanceLabel {
    Outstanding,
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
}

impl PerformanceLabel {
    /// All labels, best band first.
    pub const ALL: [PerformanceLabel; 5] = [
        PerformanceLabel::Outstanding,
        PerformanceLabel::Excellent,
        PerformanceLabel::Good,
        PerformanceLabel::Satisfactory,
        PerformanceLabel::NeedsImprovement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceLabel::Outstanding => "Outstanding",
            PerformanceLabel::Excellent => "Excellent",
            PerformanceLabel::Good => "Good",
            PerformanceLabel::Satisfactory => "Satisfactory",
            PerformanceLabel::NeedsImprovement => "Needs Improvement",
        }
    }

    /// Position in [`PerformanceLabel::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PerformanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown performance label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for PerformanceLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PerformanceLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Map an average score to its band. Thresholds are checked high to low,
/// so a boundary value lands in the higher band.
pub fn classify(average_score: f64) -> PerformanceLabel {
    if average_score >= 90.0 {
        PerformanceLabel::Outstanding
    } else if average_score >= 80.0 {
        PerformanceLabel::Excellent
    } else if average_score >= 70.0 {
        PerformanceLabel::Good
    } else if average_score >= 60.0 {
        PerformanceLabel::Satisfactory
    } else {
        PerformanceLabel::NeedsImprovement
    }
}

// ---------------------------------------------------------------------------
// StudentRecord – one row of the sheet
// ---------------------------------------------------------------------------

/// Categorical columns of a student row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demographics {
    pub gender: String,
    pub ethnicity: String,
    pub parental_education: String,
    pub lunch: String,
    pub test_prep: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExamScores {
    pub math: f64,
    pub reading: f64,
    pub writing: f64,
}

impl ExamScores {
    pub fn new(math: f64, reading: f64, writing: f64) -> Self {
        Self { math, reading, writing }
    }

    pub fn mean(&self) -> f64 {
        (self.math + self.reading + self.writing) / 3.0
    }
}

/// A parsed exam entry. Fields are private so the average can never drift
/// from the scores it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    demographics: Demographics,
    scores: ExamScores,
    average_score: f64,
}

impl StudentRecord {
    pub fn new(demographics: Demographics, scores: ExamScores) -> Self {
        Self {
            demographics,
            average_score: scores.mean(),
            scores,
        }
    }

    pub fn demographics(&self) -> &Demographics {
        &self.demographics
    }

    pub fn gender(&self) -> &str {
        &self.demographics.gender
    }

    pub fn ethnicity(&self) -> &str {
        &self.demographics.ethnicity
    }

    pub fn parental_education(&self) -> &str {
        &self.demographics.parental_education
    }

    pub fn lunch(&self) -> &str {
        &self.demographics.lunch
    }

    pub fn test_prep(&self) -> &str {
        &self.demographics.test_prep
    }

    pub fn scores(&self) -> ExamScores {
        self.scores
    }

    pub fn math_score(&self) -> f64 {
        self.scores.math
    }

    pub fn reading_score(&self) -> f64 {
        self.scores.reading
    }

    pub fn writing_score(&self) -> f64 {
        self.scores.writing
    }

    pub fn average_score(&self) -> f64 {
        self.average_score
    }

    /// Derived on every call from the stored average.
    pub fn label(&self) -> PerformanceLabel {
        classify(self.average_score)
    }
}

fn field<'a>(
    row: &'a BTreeMap<String, String>,
    name: &'static str,
) -> Result<&'a str, RecordError> {
    row.get(name)
        .map(String::as_str)
        .ok_or(RecordError::MissingField(name))
}

fn score(row: &BTreeMap<String, String>, name: &'static str) -> Result<f64, RecordError> {
    let raw = field(row, name)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| RecordError::InvalidNumber {
            field: name,
            value: raw.to_string(),
        })
}

/// Build a record from one row of `column name → cell text`.
/// Unknown columns are ignored.
pub fn parse_record(row: &BTreeMap<String, String>) -> Result<StudentRecord, RecordError> {
    let demographics = Demographics {
        gender: field(row, GENDER)?.to_string(),
        ethnicity: field(row, ETHNICITY)?.to_string(),
        parental_education: field(row, PARENTAL_EDUCATION)?.to_string(),
        lunch: field(row, LUNCH)?.to_string(),
        test_prep: field(row, TEST_PREP)?.to_string(),
    };
    let scores = ExamScores::new(
        score(row, MATH_SCORE)?,
        score(row, READING_SCORE)?,
        score(row, WRITING_SCORE)?,
    );

    Ok(StudentRecord::new(demographics, scores))
}

// ---------------------------------------------------------------------------
// StudentCollection – the complete loaded sheet
// ---------------------------------------------------------------------------

/// Immutable snapshot of every loaded record. Cloning shares the records;
/// a reload builds a fresh collection instead of editing this one.
#[derive(Debug, Clone, Default)]
pub struct StudentCollection {
    records: Arc<[StudentRecord]>,
}

impl StudentCollection {
    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record count per label, indexed like [`PerformanceLabel::ALL`].
    pub fn label_counts(&self) -> [usize; 5] {
        let mut counts = [0; 5];
        for record in self.records.iter() {
            counts[record.label().index()] += 1;
        }
        counts
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(math: &str, reading: &str, writing: &str) -> BTreeMap<String, String> {
        [
            (GENDER, "female"),
            (ETHNICITY, "group B"),
            (PARENTAL_EDUCATION, "bachelor's degree"),
            (LUNCH, "standard"),
            (TEST_PREP, "none"),
            (MATH_SCORE, math),
            (READING_SCORE, reading),
            (WRITING_SCORE, writing),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub(crate) fn student(gender: &str, math: f64, reading: f64, writing: f64) -> StudentRecord {
        StudentRecord::new(
            Demographics {
                gender: gender.to_string(),
                ..Default::default()
            },
            ExamScores::new(math, reading, writing),
        )
    }

    #[test]
    fn parses_row_and_derives_average() {
        let record = parse_record(&row("70", "80", "90")).unwrap();
        assert_eq!(record.gender(), "female");
        assert_eq!(record.ethnicity(), "group B");
        assert_eq!(record.parental_education(), "bachelor's degree");
        assert_eq!(record.average_score(), 80.0);
        assert_eq!(record.label(), PerformanceLabel::Excellent);

        let record = parse_record(&row("40", "50", "60")).unwrap();
        assert_eq!(record.average_score(), 50.0);
        assert_eq!(record.label(), PerformanceLabel::NeedsImprovement);
    }

    #[test]
    fn score_whitespace_and_extra_columns_are_tolerated() {
        let mut r = row(" 72 ", "81.5", "90");
        r.insert("student id".into(), "s-001".into());
        let record = parse_record(&r).unwrap();
        assert_eq!(record.math_score(), 72.0);
        assert_eq!(record.reading_score(), 81.5);
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let mut r = row("70", "80", "90");
        r.remove(TEST_PREP);
        assert_eq!(parse_record(&r), Err(RecordError::MissingField(TEST_PREP)));
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        let err = parse_record(&row("70", "N/A", "90")).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidNumber {
                field: READING_SCORE,
                value: "N/A".to_string(),
            }
        );
    }

    #[test]
    fn boundaries_belong_to_the_higher_band() {
        assert_eq!(classify(90.0), PerformanceLabel::Outstanding);
        assert_eq!(classify(89.999), PerformanceLabel::Excellent);
        assert_eq!(classify(80.0), PerformanceLabel::Excellent);
        assert_eq!(classify(70.0), PerformanceLabel::Good);
        assert_eq!(classify(60.0), PerformanceLabel::Satisfactory);
        assert_eq!(classify(59.99), PerformanceLabel::NeedsImprovement);
    }

    #[test]
    fn out_of_range_scores_are_not_clamped() {
        let high = student("x", 120.0, 120.0, 120.0);
        assert_eq!(high.average_score(), 120.0);
        assert_eq!(high.label(), PerformanceLabel::Outstanding);

        let low = student("x", -30.0, 0.0, 0.0);
        assert_eq!(low.average_score(), -10.0);
        assert_eq!(low.label(), PerformanceLabel::NeedsImprovement);
    }

    #[test]
    fn label_text_round_trips() {
        for label in PerformanceLabel::ALL {
            assert_eq!(label.to_string().parse::<PerformanceLabel>(), Ok(label));
        }
        assert!("Great".parse::<PerformanceLabel>().is_err());
    }

    #[test]
    fn label_counts_cover_every_record() {
        let collection = StudentCollection::from_records(vec![
            student("a", 95.0, 95.0, 95.0),
            student("b", 50.0, 50.0, 50.0),
            student("c", 91.0, 92.0, 93.0),
        ]);
        let counts = collection.label_counts();
        assert_eq!(counts[PerformanceLabel::Outstanding.index()], 2);
        assert_eq!(counts[PerformanceLabel::NeedsImprovement.index()], 1);
        assert_eq!(counts.iter().sum::<usize>(), collection.len());
    }

    #[test]
    fn nan_score_needs_improvement_and_sorts_above_numbers() {
        use crate::data::query::{LabelFilter, SortDirection, build_view};

        let record = parse_record(&row("nan", "80", "90")).unwrap();
        assert!(record.average_score().is_nan());
        assert_eq!(record.label(), PerformanceLabel::NeedsImprovement);

        let records = vec![
            student("low", 50.0, 50.0, 50.0),
            record,
            student("high", 95.0, 95.0, 95.0),
        ];
        let nan_position = |view: &[StudentRecord]| {
            view.iter().position(|r| r.average_score().is_nan())
        };

        // total_cmp orders a positive NaN after every number
        let desc = build_view(&records, LabelFilter::All, SortDirection::Descending, 10);
        assert_eq!(nan_position(&desc), Some(0));
        let asc = build_view(&records, LabelFilter::All, SortDirection::Ascending, 10);
        assert_eq!(nan_position(&asc), Some(2));

        let needs = build_view(
            &records,
            LabelFilter::Only(PerformanceLabel::NeedsImprovement),
            SortDirection::Ascending,
            10,
        );
        assert_eq!(needs.len(), 2);
        assert_eq!(needs[0].gender(), "low");
    }
}
