//! Per-element assembly and the report table.

use crate::config::MissingPolicy;
use crate::extract::{ExtractedRecord, LogExtractor};
use crate::locate::{ElementFiles, ElementKey};
use std::path::{Path, PathBuf};

/// One element's merged fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub key: ElementKey,
    pub record: ExtractedRecord,
}

/// All element rows plus the column layout they are written with.
///
/// Columns are the catalog fields, then every other field in order of first
/// appearance (library versions), then the status/error text fields.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    leading: Vec<String>,
    discovered: Vec<String>,
    trailing: Vec<String>,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn new(leading: Vec<String>, trailing: Vec<String>) -> Self {
        Self {
            leading,
            discovered: Vec::new(),
            trailing,
            rows: Vec::new(),
        }
    }

    /// Append a row. Duplicate keys are kept as separate rows.
    pub fn push(&mut self, key: ElementKey, record: ExtractedRecord) {
        if self.rows.iter().any(|row| row.key == key) {
            tracing::warn!(element = %key, "duplicate element key");
        }
        for name in record.field_names() {
            if !self.has_column(name) {
                self.discovered.push(name.to_string());
            }
        }
        self.rows.push(ReportRow { key, record });
    }

    fn has_column(&self, name: &str) -> bool {
        self.leading
            .iter()
            .chain(&self.discovered)
            .chain(&self.trailing)
            .any(|c| c == name)
    }

    pub fn columns(&self) -> Vec<&str> {
        self.leading
            .iter()
            .chain(&self.discovered)
            .chain(&self.trailing)
            .map(String::as_str)
            .collect()
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of key columns: the longest key in the table.
    pub fn key_width(&self) -> usize {
        self.rows.iter().map(|row| row.key.len()).max().unwrap_or(0)
    }

    pub fn row(&self, key: &ElementKey) -> Option<&ReportRow> {
        self.rows.iter().find(|row| &row.key == key)
    }

    /// Every row's value for `column`, or `None` if the column is unknown.
    pub fn column(&self, column: &str) -> Option<Vec<(&ElementKey, Option<&str>)>> {
        if !self.has_column(column) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| (&row.key, row.record.get(column)))
                .collect(),
        )
    }
}

/// Errors produced while building the report.
#[derive(Debug)]
pub enum ReportError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Read { source, .. } => Some(source),
        }
    }
}

/// Read a log as text with `\n` line endings only.
fn read_log(path: &Path) -> Result<String, ReportError> {
    let bytes = std::fs::read(path).map_err(|e| ReportError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %path.display(), "log is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok(normalize_newlines(text))
}

/// Fold `\r\n` and lone `\r` into `\n`.
fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Read and extract the three files of one element into a single record.
pub fn extract_element(
    extractor: &LogExtractor,
    files: &ElementFiles,
) -> Result<ExtractedRecord, ReportError> {
    let mut record = extractor.extract_resource_log(&read_log(&files.log)?);

    let mut text_fields = extractor.extract_status_log(&read_log(&files.out)?);
    let error_fields = extractor.extract_error_log(&read_log(&files.err)?);
    for name in text_fields.merge(error_fields) {
        tracing::warn!(element = %files.key, field = %name, "field produced twice, keeping first");
    }
    for name in record.merge(text_fields) {
        tracing::warn!(element = %files.key, field = %name, "field produced twice, keeping first");
    }

    Ok(record)
}

/// Build the report for `elements`, in the order given.
///
/// A read failure aborts the run under [`MissingPolicy::Fail`]; under
/// [`MissingPolicy::Skip`] the element is dropped with a warning.
pub fn build_report(
    extractor: &LogExtractor,
    elements: &[ElementFiles],
    on_failure: MissingPolicy,
) -> Result<ReportTable, ReportError> {
    let mut table = ReportTable::new(extractor.leading_columns(), extractor.trailing_columns());

    for files in elements {
        let record = match extract_element(extractor, files) {
            Ok(record) => record,
            Err(e) if on_failure == MissingPolicy::Skip => {
                tracing::warn!(element = %files.key, error = %e, "skipping element");
                continue;
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(element = %files.key, fields = record.len(), "extracted element");
        table.push(files.key.clone(), record);
    }

    if table.is_empty() {
        tracing::warn!("no elements found, report will only have a header");
    }
    Ok(table)
}
