//! Optional `.codemerge.toml` defaults, merged under the command-line flags.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::MergeError;
use crate::merge::LineBudget;
use crate::transform::ProcessingOptions;

pub const DEFAULT_CONFIG_FILE: &str = ".codemerge.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub options: ProcessingOptions,
    pub line_budget: Option<i64>,
    pub types: Vec<String>,
    pub exclude: Vec<String>,
}

impl FileConfig {
    /// Load `explicit` if given (it must exist), else `./.codemerge.toml` when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let parsed = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(parsed)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The configured budget, validated the same way as the CLI value.
    pub fn line_budget(&self) -> Result<Option<LineBudget>, MergeError> {
        self.line_budget
            .map(|lines| lines.to_string().parse())
            .transpose()
    }
}

/// A flag set on either side stays set.
pub fn merge_options(file: ProcessingOptions, cli: ProcessingOptions) -> ProcessingOptions {
    ProcessingOptions {
        add_file_name: file.add_file_name || cli.add_file_name,
        remove_comments: file.remove_comments || cli.remove_comments,
        remove_imports: file.remove_imports || cli.remove_imports,
        remove_extra_newlines: file.remove_extra_newlines || cli.remove_extra_newlines,
    }
}

/// Config entries first, then CLI entries, deduplicated keeping first occurrence.
pub fn merge_lists(file: Vec<String>, cli: Vec<String>) -> Vec<String> {
    let mut combined = file;
    combined.extend(cli);

    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_options_and_lists() {
        let cfg = FileConfig::parse(
            r#"
remove_comments = true
remove_extra_newlines = true
line_budget = 400
types = ["cs", "xaml"]
exclude = ["obj/**"]
"#,
        )
        .unwrap();

        assert!(cfg.options.remove_comments);
        assert!(cfg.options.remove_extra_newlines);
        assert!(!cfg.options.add_file_name);
        assert_eq!(cfg.line_budget().unwrap().map(LineBudget::get), Some(400));
        assert_eq!(cfg.types, vec!["cs", "xaml"]);
        assert_eq!(cfg.exclude, vec!["obj/**"]);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = FileConfig::parse("").unwrap();
        assert_eq!(cfg.options, ProcessingOptions::default());
        assert!(cfg.line_budget().unwrap().is_none());
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let cfg = FileConfig::parse("line_budget = 0").unwrap();
        assert!(matches!(
            cfg.line_budget(),
            Err(MergeError::InvalidLineBudget { .. })
        ));
    }

    #[test]
    fn wrong_value_type_fails_to_parse() {
        assert!(FileConfig::parse("remove_imports = \"yes\"").is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config"));
    }

    #[test]
    fn options_are_or_ed() {
        let file = ProcessingOptions {
            remove_comments: true,
            ..Default::default()
        };
        let cli = ProcessingOptions {
            add_file_name: true,
            ..Default::default()
        };
        let merged = merge_options(file, cli);
        assert!(merged.remove_comments && merged.add_file_name);
        assert!(!merged.remove_imports && !merged.remove_extra_newlines);
    }

    #[test]
    fn lists_keep_order_without_duplicates() {
        let merged = merge_lists(
            vec!["py".into(), "cs".into()],
            vec!["cs".into(), "js".into()],
        );
        assert_eq!(merged, vec!["py", "cs", "js"]);
    }
}
