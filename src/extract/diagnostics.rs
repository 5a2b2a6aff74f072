/// Leveled diagnostic lines of the status and error logs.
///
/// Matches the junifer logging format:
/// `YYYY-MM-DD HH:MM:SS,mmm - COMPONENT - LEVEL - message`.
use regex::Regex;
use std::collections::HashSet;

pub const WARNINGS_FIELD: &str = "warnings";
pub const ERRORS_OUT_FIELD: &str = "errors_out_file";
pub const ERRORS_ERR_FIELD: &str = "errors_err_file";

/// Fields produced from the status and error logs rather than the catalog.
pub const DERIVED_FIELDS: [&str; 3] = [WARNINGS_FIELD, ERRORS_OUT_FIELD, ERRORS_ERR_FIELD];

const TIMESTAMP: &str = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2},\d{3}";

/// Compiled WARNING/ERROR line patterns for one logging component.
#[derive(Debug, Clone)]
pub struct DiagnosticPatterns {
    warning: Regex,
    error: Regex,
}

impl DiagnosticPatterns {
    pub fn new(component: &str) -> Result<Self, regex::Error> {
        let component = regex::escape(component);
        Ok(Self {
            warning: Regex::new(&format!("{TIMESTAMP} - {component} - WARNING - (.+)"))?,
            error: Regex::new(&format!("{TIMESTAMP} - {component} - ERROR - .+"))?,
        })
    }

    /// Message part of every WARNING line, in order of appearance.
    pub fn warnings<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.warning
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Every ERROR line in full, in order of appearance.
    pub fn errors<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.error.find_iter(text).map(|m| m.as_str()).collect()
    }
}

/// Drop repeated entries, keeping the first occurrence of each.
pub fn dedup<'a, I>(items: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(*item)).collect()
}

/// Deduplicate `items` and join the survivors with `separator`.
pub fn join_unique<'a, I>(items: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    dedup(items).join(separator)
}
