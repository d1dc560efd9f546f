//! The per-file transformation pipeline.
//!
//! Stages always run in the order of [`Stage::PIPELINE`]; a disabled stage is
//! skipped, never reordered. The filename marker runs last so it is never
//! stripped by an earlier stage.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::comments::CommentStripper;
use crate::error::{MergeError, Result};
use crate::filetype::{FileTypeRule, rule_for_path};

/// The four switches a caller can flip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    pub add_file_name: bool,
    pub remove_comments: bool,
    pub remove_imports: bool,
    pub remove_extra_newlines: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RemoveComments,
    RemoveImports,
    CollapseBlankLines,
    AddFileName,
}

impl Stage {
    pub const PIPELINE: [Stage; 4] = [
        Stage::RemoveComments,
        Stage::RemoveImports,
        Stage::CollapseBlankLines,
        Stage::AddFileName,
    ];

    pub fn enabled(self, options: &ProcessingOptions) -> bool {
        match self {
            Stage::RemoveComments => options.remove_comments,
            Stage::RemoveImports => options.remove_imports,
            Stage::CollapseBlankLines => options.remove_extra_newlines,
            Stage::AddFileName => options.add_file_name,
        }
    }

    pub fn apply(self, text: &str, rule: &FileTypeRule, file_name: &str) -> String {
        match self {
            Stage::RemoveComments => rule.strip_comments(text),
            Stage::RemoveImports => collapse_line_breaks(&rule.strip_imports(text)),
            Stage::CollapseBlankLines => collapse_blank_lines(text),
            Stage::AddFileName => prepend_file_name(text, rule, file_name),
        }
    }
}

static LINE_BREAK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n){2,}").expect("built-in pattern must compile"));
static BLANK_LINE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n\s*\r?\n)+").expect("built-in pattern must compile"));

/// Squeeze runs of two or more line breaks into one blank line, then trim.
pub fn collapse_line_breaks(text: &str) -> String {
    LINE_BREAK_RUN.replace_all(text, "\n\n").trim().to_owned()
}

/// Squeeze runs of whitespace-only lines into one blank line, then trim.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINE_RUN.replace_all(text, "\n\n").trim().to_owned()
}

/// `{prefix} {file_name}{suffix}`, one blank line, then the content.
pub fn prepend_file_name(text: &str, rule: &FileTypeRule, file_name: &str) -> String {
    format!(
        "{} {file_name}{}\n\n{text}",
        rule.comment_start, rule.comment_end
    )
}

/// Run the enabled stages over `raw`.
pub fn process(
    raw: &str,
    rule: &FileTypeRule,
    file_name: &str,
    options: &ProcessingOptions,
) -> String {
    let mut text = raw.to_owned();

    for stage in Stage::PIPELINE {
        if stage.enabled(options) {
            text = stage.apply(&text, rule, file_name);
        }
    }

    text
}

/// Read `path` and run it through [`process`] using the rule for its extension.
pub fn process_file(path: &Path, options: &ProcessingOptions) -> Result<String> {
    let raw = fs::read_to_string(path).map_err(|e| MergeError::read(path, e))?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let rule = rule_for_path(path);
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let text = process(raw, rule, &file_name, options);
    log::debug!(
        "Processed {} as {:?} ({} bytes -> {} bytes)",
        path.display(),
        rule.category,
        raw.len(),
        text.len()
    );

    Ok(text)
}
