use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration loaded from junilog.toml.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[derive(Default)]
pub struct JunilogConfig {
    pub layout: LayoutConfig,
    pub discovery: DiscoveryConfig,
    pub diagnostics: DiagnosticsConfig,
    pub resource: ResourceConfig,
}

/// Where the per-element files live and how they are named.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub logs_dir: PathBuf,
    pub file_prefix: String,
    pub out_ext: String,
    pub log_ext: String,
    pub err_ext: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub on_missing: MissingPolicy,
}

/// What to do with an element whose companion `.log` or `.err` file is absent.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Abort the whole run.
    Fail,
    /// Drop the element and keep going.
    Skip,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// COMPONENT token of `timestamp - COMPONENT - LEVEL - message` lines.
    pub component: String,
    pub err_file_separator: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[derive(Default)]
pub struct ResourceConfig {
    pub rules: Vec<RuleConfig>,
}

/// A user-supplied accounting-log rule, appended to the built-in catalog.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RuleConfig {
    pub field: String,
    pub pattern: String,
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyConfig {
    #[default]
    First,
    Last,
}

// --- Default implementations ---

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("logs"),
            file_prefix: "junifer_run_".to_string(),
            out_ext: "out".to_string(),
            log_ext: "log".to_string(),
            err_ext: "err".to_string(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            on_missing: MissingPolicy::Fail,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            component: "JUNIFER".to_string(),
            err_file_separator: "\n".to_string(),
        }
    }
}

/// Errors produced while loading the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Load the configuration from `path`.
///
/// When `required` is false a missing file yields the defaults; this is how
/// the implicit `junilog.toml` in the working directory is treated.
pub fn load_config(path: &Path, required: bool) -> Result<JunilogConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(JunilogConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_junifer_layout() {
        let cfg = JunilogConfig::default();
        assert_eq!(cfg.layout.logs_dir, PathBuf::from("logs"));
        assert_eq!(cfg.layout.file_prefix, "junifer_run_");
        assert_eq!(cfg.layout.out_ext, "out");
        assert_eq!(cfg.discovery.on_missing, MissingPolicy::Fail);
        assert_eq!(cfg.diagnostics.component, "JUNIFER");
        assert_eq!(cfg.diagnostics.err_file_separator, "\n");
        assert!(cfg.resource.rules.is_empty());
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config(&dir.path().join("junilog.toml"), false).unwrap();
        assert_eq!(cfg, JunilogConfig::default());
    }

    #[test]
    fn missing_required_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(&dir.path().join("nope.toml"), true).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junilog.toml");
        std::fs::write(
            &path,
            r#"
[layout]
file_prefix = "run_"

[discovery]
on_missing = "skip"

[[resource.rules]]
field = "gpus"
pattern = 'Gpus\s+:\s+([\d.]+)'
policy = "last"
"#,
        )
        .unwrap();

        let cfg = load_config(&path, true).unwrap();
        assert_eq!(cfg.layout.file_prefix, "run_");
        assert_eq!(cfg.layout.err_ext, "err");
        assert_eq!(cfg.discovery.on_missing, MissingPolicy::Skip);
        assert_eq!(cfg.resource.rules.len(), 1);
        assert_eq!(cfg.resource.rules[0].field, "gpus");
        assert_eq!(cfg.resource.rules[0].policy, PolicyConfig::Last);
    }

    #[test]
    fn rule_policy_defaults_to_first() {
        let cfg: JunilogConfig = toml::from_str(
            r#"
[[resource.rules]]
field = "slots"
pattern = 'Slots\s+:\s+(\d+)'
"#,
        )
        .unwrap();
        assert_eq!(cfg.resource.rules[0].policy, PolicyConfig::First);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junilog.toml");
        std::fs::write(&path, "[layout\nlogs_dir = 3").unwrap();
        let err = load_config(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_policy_is_parse_error() {
        let result: Result<JunilogConfig, _> =
            toml::from_str("[discovery]\non_missing = \"maybe\"\n");
        assert!(result.is_err());
    }
}
