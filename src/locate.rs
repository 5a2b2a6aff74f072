//! Element discovery: map a job directory onto per-element file triples.
//!
//! Every `<prefix><token>_<token>..._<token>.out` file under the job's logs
//! directory is one element. Its key is the stem without the prefix, split
//! on `_`; its companions share the stem with the `.log` and `.err`
//! extensions.

use crate::config::{LayoutConfig, MissingPolicy};
use std::path::{Path, PathBuf};

/// Composite, order-sensitive identifier of one element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementKey(Vec<String>);

impl ElementKey {
    /// Derive a key from a file stem, stripping `prefix` when present.
    pub fn from_stem(stem: &str, prefix: &str) -> Self {
        let rest = match stem.strip_prefix(prefix) {
            Some(rest) => rest,
            None => {
                tracing::debug!(stem, prefix, "file stem lacks prefix, using it whole");
                stem
            }
        };
        Self(rest.split('_').map(str::to_string).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for ElementKey {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl std::fmt::Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("_"))
    }
}

/// The three source files of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementFiles {
    pub key: ElementKey,
    /// Status/output log (the primary artifact).
    pub out: PathBuf,
    /// Resource-accounting log.
    pub log: PathBuf,
    /// Error log.
    pub err: PathBuf,
}

impl ElementFiles {
    fn from_out_path(out: PathBuf, layout: &LayoutConfig) -> Option<Self> {
        let stem = out.file_stem()?.to_str()?;
        let key = ElementKey::from_stem(stem, &layout.file_prefix);
        let log = out.with_extension(&layout.log_ext);
        let err = out.with_extension(&layout.err_ext);
        Some(Self { key, out, log, err })
    }

    /// Companion files that do not exist on disk.
    pub fn missing_companions(&self) -> Vec<&Path> {
        [self.log.as_path(), self.err.as_path()]
            .into_iter()
            .filter(|p| !p.is_file())
            .collect()
    }
}

/// Errors produced while discovering elements.
#[derive(Debug)]
pub enum LocateError {
    LogsDirMissing {
        path: PathBuf,
    },
    NonUtf8Path {
        path: PathBuf,
    },
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    MissingCompanion {
        element: ElementKey,
        path: PathBuf,
    },
}

impl std::fmt::Display for LocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocateError::LogsDirMissing { path } => {
                write!(f, "logs directory not found: {}", path.display())
            }
            LocateError::NonUtf8Path { path } => {
                write!(f, "path is not valid UTF-8: {}", path.display())
            }
            LocateError::Pattern { pattern, source } => {
                write!(f, "invalid glob pattern '{pattern}': {source}")
            }
            LocateError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LocateError::MissingCompanion { element, path } => write!(
                f,
                "element {element}: companion file missing: {}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocateError::Pattern { source, .. } => Some(source),
            LocateError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Find every element under `job_dir`, ordered by `.out` filename.
///
/// An element with a missing `.log` or `.err` file, or a `.out` name that is
/// not valid UTF-8, either aborts discovery or is dropped with a warning,
/// depending on `on_missing`.
pub fn locate_elements(
    job_dir: &Path,
    layout: &LayoutConfig,
    on_missing: MissingPolicy,
) -> Result<Vec<ElementFiles>, LocateError> {
    let logs_dir = job_dir.join(&layout.logs_dir);
    if !logs_dir.is_dir() {
        return Err(LocateError::LogsDirMissing { path: logs_dir });
    }

    let pattern_str = format!("*.{}", glob::Pattern::escape(&layout.out_ext));
    let pattern = glob::Pattern::new(&pattern_str).map_err(|e| LocateError::Pattern {
        pattern: pattern_str.clone(),
        source: e,
    })?;

    let io_err = |e: std::io::Error| LocateError::Io {
        path: logs_dir.clone(),
        source: e,
    };
    let mut out_files = Vec::new();
    for entry in std::fs::read_dir(&logs_dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() {
            continue;
        }
        let is_out = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => pattern.matches(name),
            // glob cannot match these; fall back to the raw extension
            None => path.extension() == Some(std::ffi::OsStr::new(&layout.out_ext)),
        };
        if is_out {
            out_files.push(path);
        }
    }
    out_files.sort();

    let mut elements = Vec::with_capacity(out_files.len());
    for out in out_files {
        let Some(files) = ElementFiles::from_out_path(out.clone(), layout) else {
            match on_missing {
                MissingPolicy::Fail => return Err(LocateError::NonUtf8Path { path: out }),
                MissingPolicy::Skip => {
                    tracing::warn!(path = %out.display(), "skipping file with non UTF-8 name");
                    continue;
                }
            }
        };

        if let Some(missing) = files.missing_companions().first() {
            match on_missing {
                MissingPolicy::Fail => {
                    return Err(LocateError::MissingCompanion {
                        element: files.key.clone(),
                        path: missing.to_path_buf(),
                    });
                }
                MissingPolicy::Skip => {
                    tracing::warn!(
                        element = %files.key,
                        path = %missing.display(),
                        "companion file missing, skipping element"
                    );
                    continue;
                }
            }
        }

        tracing::debug!(element = %files.key, path = %files.out.display(), "found element");
        elements.push(files);
    }

    tracing::info!(count = elements.len(), dir = %logs_dir.display(), "discovered elements");
    Ok(elements)
}
