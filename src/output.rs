/// Delimited report output.
///
/// The file extension picks the delimiter: `.csv` → comma, `.tsv` → tab.
/// Header row: one empty cell per key column, then the field names.
use crate::report::ReportTable;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
}

impl OutputFormat {
    /// Select the format from the output path's extension.
    pub fn from_path(path: &Path) -> Result<Self, OutputError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Ok(OutputFormat::Csv),
            Some("tsv") => Ok(OutputFormat::Tsv),
            other => Err(OutputError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: other.map(str::to_string),
            }),
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            OutputFormat::Csv => b',',
            OutputFormat::Tsv => b'\t',
        }
    }
}

/// Errors produced while writing the report.
#[derive(Debug)]
pub enum OutputError {
    UnsupportedFormat {
        path: PathBuf,
        extension: Option<String>,
    },
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    Write(csv::Error),
    Flush(std::io::Error),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::UnsupportedFormat { path, extension } => match extension {
                Some(ext) => write!(
                    f,
                    "unsupported output format '.{ext}' for {} (use .csv or .tsv)",
                    path.display()
                ),
                None => write!(
                    f,
                    "output file {} has no extension (use .csv or .tsv)",
                    path.display()
                ),
            },
            OutputError::Create { path, source } => {
                write!(f, "failed to create {}: {source}", path.display())
            }
            OutputError::Write(e) => write!(f, "failed to write report: {e}"),
            OutputError::Flush(e) => write!(f, "failed to flush report: {e}"),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::UnsupportedFormat { .. } => None,
            OutputError::Create { source, .. } => Some(source),
            OutputError::Write(e) => Some(e),
            OutputError::Flush(e) => Some(e),
        }
    }
}

impl From<csv::Error> for OutputError {
    fn from(e: csv::Error) -> Self {
        OutputError::Write(e)
    }
}

/// Serialize `table` to `writer`.
pub fn write_table<W: std::io::Write>(
    table: &ReportTable,
    format: OutputFormat,
    writer: W,
) -> Result<(), OutputError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer);

    let key_width = table.key_width();
    let columns = table.columns();

    let header = std::iter::repeat("")
        .take(key_width)
        .chain(columns.iter().copied());
    wtr.write_record(header)?;

    for row in table.rows() {
        let tokens = row.key.tokens();
        let key_cells = (0..key_width).map(|i| tokens.get(i).map_or("", String::as_str));
        let value_cells = columns
            .iter()
            .map(|column| row.record.get(column).unwrap_or(""));
        wtr.write_record(key_cells.chain(value_cells))?;
    }

    wtr.flush().map_err(OutputError::Flush)?;
    Ok(())
}

/// Create `path` and write the report into it.
pub fn write_report(
    table: &ReportTable,
    path: &Path,
    format: OutputFormat,
) -> Result<(), OutputError> {
    let file = std::fs::File::create(path).map_err(|e| OutputError::Create {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_table(table, format, std::io::BufWriter::new(file))?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "report written"
    );
    Ok(())
}
