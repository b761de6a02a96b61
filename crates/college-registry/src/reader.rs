//! Registry file reading (JSON array or CSV with header row).

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use college_model::RawCollege;

use crate::error::{RegistryError, Result};
use crate::loader::{LoadOutcome, load_rows};

/// Source format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(FileFormat::Json),
            Some("csv") => Ok(FileFormat::Csv),
            _ => Err(RegistryError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Read the foundation registry from `path` and load it.
///
/// File-level problems (unreadable file, invalid JSON document, broken CSV
/// header) are errors. Individual rows that fail to decode or validate are
/// skipped and reported in [`LoadOutcome::skipped`].
pub fn read_registry(path: &Path) -> Result<LoadOutcome> {
    let rows = read_rows::<RawCollege>(path)?;
    info!(path = %path.display(), rows = rows.len(), "read registry file");
    Ok(load_rows(rows))
}

/// Decode every row of a JSON array or CSV file, keeping per-row failures.
pub(crate) fn read_rows<T>(path: &Path) -> Result<Vec<std::result::Result<T, String>>>
where
    T: DeserializeOwned,
{
    match FileFormat::from_path(path)? {
        FileFormat::Json => read_json_rows(path),
        FileFormat::Csv => read_csv_rows(path),
    }
}

fn read_json_rows<T>(path: &Path) -> Result<Vec<std::result::Result<T, String>>>
where
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(|source| RegistryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| {
            RegistryError::JsonParse {
                path: path.to_path_buf(),
                source,
            }
        })?;

    Ok(values
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(|e| e.to_string()))
        .collect())
}

fn read_csv_rows<T>(path: &Path) -> Result<Vec<std::result::Result<T, String>>>
where
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(|source| RegistryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(file);

    // Surface a broken header as a file-level error before reading rows.
    reader
        .headers()
        .map_err(|source| RegistryError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(reader
        .deserialize::<T>()
        .map(|row| row.map_err(|e| e.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            FileFormat::from_path(Path::new("colleges.JSON")).unwrap(),
            FileFormat::Json
        );
        assert_eq!(
            FileFormat::from_path(Path::new("data/colleges.csv")).unwrap(),
            FileFormat::Csv
        );
        assert!(matches!(
            FileFormat::from_path(Path::new("colleges.xlsx")),
            Err(RegistryError::UnsupportedFormat { .. })
        ));
        assert!(FileFormat::from_path(Path::new("colleges")).is_err());
    }
}
