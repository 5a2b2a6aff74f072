//! Field extraction from the three per-element log files.

pub mod catalog;
pub mod diagnostics;
pub mod record;
pub mod usage;
pub mod versions;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::config::DiagnosticsConfig;
use catalog::{Catalog, CatalogError};
use diagnostics::{
    join_unique, DiagnosticPatterns, DERIVED_FIELDS, ERRORS_ERR_FIELD, ERRORS_OUT_FIELD,
    WARNINGS_FIELD,
};
pub use record::ExtractedRecord;

/// Turns raw log text into records, one operation per file type.
#[derive(Debug, Clone)]
pub struct LogExtractor {
    catalog: Catalog,
    diagnostics: DiagnosticPatterns,
    err_separator: String,
}

impl LogExtractor {
    pub fn new(catalog: Catalog, config: &DiagnosticsConfig) -> Result<Self, CatalogError> {
        let diagnostics = DiagnosticPatterns::new(&config.component).map_err(|e| {
            CatalogError::InvalidPattern {
                field: "diagnostics.component".to_string(),
                source: e,
            }
        })?;
        Ok(Self {
            catalog,
            diagnostics,
            err_separator: config.err_file_separator.clone(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Columns every report carries ahead of any library-version column.
    pub fn leading_columns(&self) -> Vec<String> {
        self.catalog.field_names().map(str::to_string).collect()
    }

    /// Columns every report carries after the library-version columns.
    pub fn trailing_columns(&self) -> Vec<String> {
        DERIVED_FIELDS.iter().map(|f| f.to_string()).collect()
    }

    /// Accounting log: every catalog field, missing where its rule found nothing.
    pub fn extract_resource_log(&self, text: &str) -> ExtractedRecord {
        let mut record = ExtractedRecord::new();
        for rule in self.catalog.rules() {
            let value = rule.apply(text);
            if value.is_none() {
                tracing::trace!(field = %rule.field, "no match");
            }
            record.set(rule.field.clone(), value);
        }
        record
    }

    /// Status log: library versions, deduplicated warnings and ERROR lines.
    pub fn extract_status_log(&self, text: &str) -> ExtractedRecord {
        let mut record = versions::extract_versions(text);
        let warnings = join_unique(self.diagnostics.warnings(text), "\n");
        let errors = join_unique(self.diagnostics.errors(text), "\n");
        record.set(WARNINGS_FIELD, Some(warnings));
        record.set(ERRORS_OUT_FIELD, Some(errors));
        record
    }

    /// Error log: deduplicated ERROR lines joined with the configured separator.
    pub fn extract_error_log(&self, text: &str) -> ExtractedRecord {
        let mut record = ExtractedRecord::new();
        let errors = join_unique(self.diagnostics.errors(text), &self.err_separator);
        record.set(ERRORS_ERR_FIELD, Some(errors));
        record
    }
}
