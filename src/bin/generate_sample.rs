use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const STUDENTS: usize = 200;

const COLUMNS: [&str; 8] = [
    "gender",
    "race/ethnicity",
    "parental level of education",
    "lunch",
    "test preparation course",
    "math score",
    "reading score",
    "writing score",
];

const GENDERS: [&str; 2] = ["female", "male"];
const GROUPS: [&str; 5] = ["group A", "group B", "group C", "group D", "group E"];
const EDUCATION: [&str; 6] = [
    "some high school",
    "high school",
    "some college",
    "associate's degree",
    "bachelor's degree",
    "master's degree",
];
const LUNCH: [&str; 2] = ["standard", "free/reduced"];
const TEST_PREP: [&str; 2] = ["none", "completed"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[(self.next_u64() % choices.len() as u64) as usize]
    }
}

/// Integer exam score in 0..=100.
fn score(rng: &mut SimpleRng, mean: f64) -> i64 {
    rng.gauss(mean, 12.0).round().clamp(0.0, 100.0) as i64
}

struct Student {
    text: [&'static str; 5],
    scores: [i64; 3],
}

fn generate(rng: &mut SimpleRng) -> Vec<Student> {
    (0..STUDENTS)
        .map(|_| {
            let gender = rng.pick(&GENDERS);
            let group = rng.pick(&GROUPS);
            let education = rng.pick(&EDUCATION);
            let lunch = rng.pick(&LUNCH);
            let prep = rng.pick(&TEST_PREP);

            // A shared ability term keeps the three scores correlated.
            let mut ability = rng.gauss(66.0, 10.0);
            if prep == "completed" {
                ability += 5.0;
            }
            if lunch == "free/reduced" {
                ability -= 4.0;
            }

            Student {
                text: [gender, group, education, lunch, prep],
                scores: [
                    score(rng, ability),
                    score(rng, ability + 3.0),
                    score(rng, ability + 1.0),
                ],
            }
        })
        .collect()
}

fn write_csv(path: &str, students: &[Student]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(COLUMNS)?;
    for s in students {
        let scores = s.scores.map(|v| v.to_string());
        writer.write_record(s.text.iter().copied().chain(scores.iter().map(String::as_str)))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, students: &[Student]) -> Result<()> {
    let mut fields = Vec::with_capacity(COLUMNS.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(COLUMNS.len());

    for (i, name) in COLUMNS[..5].iter().enumerate() {
        fields.push(Field::new(*name, DataType::Utf8, false));
        columns.push(Arc::new(StringArray::from(
            students.iter().map(|s| s.text[i]).collect::<Vec<_>>(),
        )));
    }
    for (i, name) in COLUMNS[5..].iter().enumerate() {
        fields.push(Field::new(*name, DataType::Int64, false));
        columns.push(Arc::new(Int64Array::from(
            students.iter().map(|s| s.scores[i]).collect::<Vec<_>>(),
        )));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let students = generate(&mut rng);

    write_csv("sample_students.csv", &students)?;
    write_parquet("sample_students.parquet", &students)?;

    println!(
        "Wrote {} students to sample_students.csv and sample_students.parquet",
        students.len()
    );
    Ok(())
}
