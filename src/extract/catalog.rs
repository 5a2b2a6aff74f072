//! The accounting-log rule catalog: field name → (extractor, match policy).

use super::diagnostics::DERIVED_FIELDS;
use super::record::FieldValue;
use super::usage::{link_values, UsageComponent, UsageLink};
use crate::config::{PolicyConfig, RuleConfig};
use regex::Regex;

/// How repeated matches in one text are reduced to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Fields that appear once per log (termination status, resources).
    First,
    /// Fields repeated by every re-run logged to the same file.
    Last,
}

impl MatchPolicy {
    pub fn reduce<I>(self, matches: I) -> FieldValue
    where
        I: IntoIterator<Item = String>,
    {
        match self {
            MatchPolicy::First => matches.into_iter().next(),
            MatchPolicy::Last => matches.into_iter().last(),
        }
    }
}

impl From<PolicyConfig> for MatchPolicy {
    fn from(p: PolicyConfig) -> Self {
        match p {
            PolicyConfig::First => MatchPolicy::First,
            PolicyConfig::Last => MatchPolicy::Last,
        }
    }
}

/// How a rule locates its candidate values.
#[derive(Debug, Clone)]
pub enum Extractor {
    /// Free search; the value is capture group 1 of each match.
    Pattern(Regex),
    /// One link of the usage chain.
    Usage {
        link: UsageLink,
        component: UsageComponent,
    },
}

impl Extractor {
    /// All candidate values in `text`, in text order.
    pub fn candidates(&self, text: &str) -> Vec<String> {
        match self {
            Extractor::Pattern(re) => re
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .collect(),
            Extractor::Usage { link, component } => link_values(*link, *component, text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub field: String,
    pub extractor: Extractor,
    pub policy: MatchPolicy,
}

impl Rule {
    /// Run the rule over `text`. No match is the missing value, not an error.
    pub fn apply(&self, text: &str) -> FieldValue {
        self.policy.reduce(self.extractor.candidates(text))
    }
}

/// Built-in single-occurrence fields.
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("job_terminated", r"Job terminated\.\n\s+\((\d+)\)"),
    ("return_value", r"Normal termination \(return value (\d+)\)"),
    ("CPUs", r"Cpus\s+:\s+([\d.]+)"),
    ("disk_in_kb", r"Disk \(KB\)\s+:\s+([\d.]+)"),
    ("memory_in_mb", r"Memory \(MB\)\s+:\s+([\d.]+)"),
];

/// Errors raised while assembling a catalog from configuration.
#[derive(Debug)]
pub enum CatalogError {
    EmptyField,
    InvalidPattern { field: String, source: regex::Error },
    CaptureGroups { field: String, found: usize },
    DuplicateField(String),
    ReservedField(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::EmptyField => write!(f, "rule with empty field name"),
            CatalogError::InvalidPattern { field, source } => {
                write!(f, "invalid pattern for field '{field}': {source}")
            }
            CatalogError::CaptureGroups { field, found } => write!(
                f,
                "pattern for field '{field}' must have exactly one capture group, found {found}"
            ),
            CatalogError::DuplicateField(field) => write!(f, "field '{field}' defined twice"),
            CatalogError::ReservedField(field) => {
                write!(f, "field '{field}' is reserved for status/error log output")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Immutable table of accounting-log rules, applied in declaration order.
#[derive(Debug, Clone)]
pub struct Catalog {
    rules: Vec<Rule>,
}

impl Catalog {
    /// The built-in junifer/HTCondor catalog.
    pub fn builtin() -> Self {
        let mut rules: Vec<Rule> = BUILTIN_PATTERNS
            .iter()
            .map(|(field, pattern)| Rule {
                field: field.to_string(),
                extractor: Extractor::Pattern(Regex::new(pattern).unwrap()),
                policy: MatchPolicy::First,
            })
            .collect();

        for link in UsageLink::CHAIN {
            for component in [UsageComponent::Usr, UsageComponent::Sys] {
                rules.push(Rule {
                    field: format!("{}_{}", link.field_stem(), component.field_suffix()),
                    extractor: Extractor::Usage { link, component },
                    policy: MatchPolicy::Last,
                });
            }
        }

        Self { rules }
    }

    /// The built-in catalog followed by the configured extra rules.
    pub fn with_rules(extra: &[RuleConfig]) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        for cfg in extra {
            let rule = compile_rule(cfg)?;
            catalog.push(rule)?;
        }
        Ok(catalog)
    }

    fn push(&mut self, rule: Rule) -> Result<(), CatalogError> {
        if DERIVED_FIELDS.contains(&rule.field.as_str()) {
            return Err(CatalogError::ReservedField(rule.field));
        }
        if self.rules.iter().any(|r| r.field == rule.field) {
            return Err(CatalogError::DuplicateField(rule.field));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.field.as_str())
    }
}

fn compile_rule(cfg: &RuleConfig) -> Result<Rule, CatalogError> {
    if cfg.field.trim().is_empty() {
        return Err(CatalogError::EmptyField);
    }
    let re = Regex::new(&cfg.pattern).map_err(|e| CatalogError::InvalidPattern {
        field: cfg.field.clone(),
        source: e,
    })?;
    // captures_len counts the implicit whole-match group
    let groups = re.captures_len() - 1;
    if groups != 1 {
        return Err(CatalogError::CaptureGroups {
            field: cfg.field.clone(),
            found: groups,
        });
    }
    Ok(Rule {
        field: cfg.field.clone(),
        extractor: Extractor::Pattern(re),
        policy: cfg.policy.into(),
    })
}
