use chrono::{NaiveDate, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub const EXPORT_PREFIX: &str = "revwhoix-domains";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create {path}: {source}")]
    Create {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to write export: {0}")]
    Write(#[from] std::io::Error),
}

/// What the user is about to save: the suggested file name and a snapshot of
/// the filtered domains at the time the export was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pub file_name: String,
    pub domains: Vec<String>,
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}-{}.csv", EXPORT_PREFIX, date.format("%Y-%m-%d"))
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Newline-joined list, the payload for both clipboard copies and exports.
pub fn joined(domains: &[String]) -> String {
    domains.join("\n")
}

/// Writes the domains verbatim, one per line with no quoting and no trailing
/// newline. Returns the number of domains written.
pub fn write_domains<W: Write>(writer: W, domains: &[String]) -> Result<usize, ExportError> {
    let mut writer = BufWriter::new(writer);
    writer.write_all(joined(domains).as_bytes())?;
    writer.flush()?;

    Ok(domains.len())
}

pub fn write_domains_to_path(path: &Path, domains: &[String]) -> Result<usize, ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.display().to_string(),
        source,
    })?;
    write_domains(file, domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn domains(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn file_name_carries_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "revwhoix-domains-2024-03-07.csv");
    }

    #[test]
    fn joined_has_no_trailing_newline() {
        assert_eq!(joined(&domains(&["a.com", "b.com"])), "a.com\nb.com");
        assert_eq!(joined(&[]), "");
    }

    #[test]
    fn writes_one_domain_per_line() {
        let mut out = Vec::new();
        let written = write_domains(&mut out, &domains(&["a.example.com", "b.example.com"])).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a.example.com\nb.example.com"
        );
    }

    #[test]
    fn export_matches_joined_payload_without_quoting() {
        let list = domains(&["a.com", "", "x\"y.com", "c,d.com"]);
        let mut out = Vec::new();
        write_domains(&mut out, &list).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), joined(&list));
        assert_eq!(joined(&list), "a.com\n\nx\"y.com\nc,d.com");
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name(today()));
        let written = write_domains_to_path(&path, &domains(&["x.org"])).unwrap();
        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "x.org");
    }

    #[test]
    fn missing_directory_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_domains_to_path(&path, &domains(&["x.org"])).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
        assert!(err.to_string().contains("out.csv"));
    }
}
