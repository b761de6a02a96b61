//! Counselling CSV input and annotated CSV output.

use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::warn;

use college_match::MatchQuery;
use college_model::MatchResult;

/// Columns appended to every input row in the output file.
pub const RESULT_COLUMNS: [&str; 7] = [
    "matched_college_id",
    "matched_college_name",
    "matched_name",
    "match_type",
    "match_method",
    "match_confidence",
    "match_pass",
];

/// A counselling file held in memory with its query columns located.
#[derive(Debug, Clone)]
pub struct BatchInput {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    name_column: usize,
    state_column: usize,
}

impl BatchInput {
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data row numbers (1-based) with more fields than the header.
    ///
    /// Fields past the header width are not written back out.
    pub fn overlong_rows(&self) -> Vec<usize> {
        let width = self.headers.len();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() > width)
            .map(|(index, _)| index + 1)
            .collect()
    }

    /// One query per row; short rows yield empty fields.
    pub fn queries(&self) -> Vec<MatchQuery> {
        self.rows
            .iter()
            .map(|row| {
                MatchQuery::new(
                    row.get(self.name_column).unwrap_or_default(),
                    row.get(self.state_column).unwrap_or_default(),
                )
            })
            .collect()
    }
}

/// Read a counselling CSV. Column names are matched case-insensitively.
pub fn read_batch(path: &Path, name_column: &str, state_column: &str) -> Result<BatchInput> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read headers of {}", path.display()))?
        .clone();

    let name_index = find_column(&headers, name_column)
        .with_context(|| format!("locate name column in {}", path.display()))?;
    let state_index = find_column(&headers, state_column)
        .with_context(|| format!("locate state column in {}", path.display()))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("read row {} of {}", index + 1, path.display()))?;
        rows.push(record);
    }

    let input = BatchInput {
        headers,
        rows,
        name_column: name_index,
        state_column: state_index,
    };
    let overlong = input.overlong_rows();
    if let Some(first) = overlong.first() {
        warn!(
            rows = overlong.len(),
            first_row = first,
            columns = input.headers.len(),
            "rows have more fields than the header; extra fields are dropped from the output"
        );
    }
    Ok(input)
}

/// Write every input row followed by its match columns.
pub fn write_batch(path: &Path, input: &BatchInput, results: &[MatchResult]) -> Result<()> {
    if results.len() != input.rows.len() {
        bail!(
            "{} results for {} input rows",
            results.len(),
            input.rows.len()
        );
    }

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;

    let mut header: Vec<&str> = input.headers.iter().collect();
    header.extend(RESULT_COLUMNS);
    writer.write_record(&header).context("write header")?;

    let width = input.headers.len();
    for (row, result) in input.rows.iter().zip(results) {
        let mut fields: Vec<String> = (0..width)
            .map(|index| row.get(index).unwrap_or_default().to_string())
            .collect();
        fields.extend(result_fields(result));
        writer.write_record(&fields).context("write row")?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// Values of [`RESULT_COLUMNS`] for one result.
pub fn result_fields(result: &MatchResult) -> [String; 7] {
    let college = result.college();
    [
        college.map(|c| c.id().to_string()).unwrap_or_default(),
        college
            .map(|c| c.canonical_name().to_string())
            .unwrap_or_default(),
        if result.is_matched() {
            result.matched_name().to_string()
        } else {
            String::new()
        },
        result.match_type().as_str().to_string(),
        result.method().as_str().to_string(),
        format!("{:.4}", result.confidence()),
        result.pass().to_string(),
    ]
}

fn find_column(headers: &StringRecord, column: &str) -> Result<usize> {
    let wanted = column.trim();
    match headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(wanted))
    {
        Some(index) => Ok(index),
        None => bail!(
            "column {wanted:?} not found (available: {})",
            headers.iter().collect::<Vec<_>>().join(", ")
        ),
    }
}
