//! External baseline loading (JSON, JSON lines, CSV)

use crate::model::BaselineEntry;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("baseline JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("baseline JSON error on line {line}: {source}")]
    JsonLine {
        line: usize,
        source: serde_json::Error,
    },

    #[error("baseline CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Input layout, chosen from the file extension or, failing that, the first
/// non-blank character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineFormat {
    Json,
    JsonLines,
    Csv,
}

impl BaselineFormat {
    pub fn detect(path: &Path, text: &str) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Self::Json,
            "jsonl" | "ndjson" => Self::JsonLines,
            "csv" => Self::Csv,
            _ => match text.trim_start().chars().next() {
                Some('[') => Self::Json,
                Some('{') => Self::JsonLines,
                _ => Self::Csv,
            },
        }
    }
}

/// Parse baseline text in the given format.
pub fn parse_baseline(text: &str, format: BaselineFormat) -> Result<Vec<BaselineEntry>, BaselineError> {
    match format {
        BaselineFormat::Json => Ok(serde_json::from_str(text)?),
        BaselineFormat::JsonLines => text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|source| BaselineError::JsonLine {
                    line: i + 1,
                    source,
                })
            })
            .collect(),
        BaselineFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(text.as_bytes());
            let mut entries = Vec::new();
            for row in reader.deserialize() {
                entries.push(row?);
            }
            Ok(entries)
        }
    }
}

/// Load a baseline file.
pub fn load_baseline(path: impl AsRef<Path>) -> Result<Vec<BaselineEntry>, BaselineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let entries = parse_baseline(&text, BaselineFormat::detect(path, &text))?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "baseline loaded");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(body.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn loads_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "base.json",
            r#"[{"material":"PEO","property":"ionic_conductivity","value_min":1e-5,"value_max":8e-5,"unit_si":"S/cm"}]"#,
        );
        let entries = load_baseline(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].range(), (1e-5, 8e-5));
    }

    #[test]
    fn loads_json_lines_and_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "base.jsonl",
            "{\"material\":\"PEO\",\"property\":\"dispersity\",\"value_min\":1.1,\"unit_si\":\"1\"}\n\n{\"material\":\"PS\",\"property\":\"dispersity\",\"value_min\":1.05,\"unit_si\":\"1\"}\n",
        );
        assert_eq!(load_baseline(&path).unwrap().len(), 2);

        let bad = write(&dir, "bad.jsonl", "{\"material\":\"PEO\"}\n");
        assert!(matches!(
            load_baseline(&bad),
            Err(BaselineError::JsonLine { line: 1, .. })
        ));
    }

    #[test]
    fn loads_csv_with_empty_max() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "base.csv",
            "material,property,value_min,value_max,unit_si\nPEO,ionic_conductivity,1e-5,8e-5,S/cm\nPS,glass_transition_temperature,373,,K\n",
        );
        let entries = load_baseline(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].value_max, None);
        assert_eq!(entries[1].range(), (373.0, 373.0));
    }

    #[test]
    fn sniffs_format_without_extension() {
        assert_eq!(BaselineFormat::detect(Path::new("b"), "  [ ]"), BaselineFormat::Json);
        assert_eq!(BaselineFormat::detect(Path::new("b"), "{\"a\":1}"), BaselineFormat::JsonLines);
        assert_eq!(BaselineFormat::detect(Path::new("b"), "material,property"), BaselineFormat::Csv);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_baseline("/nonexistent/ironclad/baseline.csv"),
            Err(BaselineError::Io(_))
        ));
    }
}
