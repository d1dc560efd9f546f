//! Pattern-based comment and import stripping.
//!
//! None of this is a lexer. Comment-like sequences inside string literals are
//! stripped too, and a `/*` that follows a `//` on the same line is removed with
//! the line comment, so its closing `*/` survives the block pass.

use std::borrow::Cow;

use regex::Regex;

use crate::filetype::FileTypeRule;

/// Text-to-text stripping passes for one file type.
pub trait CommentStripper {
    /// Remove line comments up to (not including) the line break.
    fn strip_line_comments(&self, src: &str) -> String;

    /// Remove block comments, non-greedy. Whether a span may cross lines is up to the rule.
    fn strip_block_comments(&self, src: &str) -> String;

    /// Blank out whole lines that are import/include statements.
    fn strip_imports(&self, src: &str) -> String;

    /// Line pass first, then block pass.
    fn strip_comments(&self, src: &str) -> String {
        let without_lines = self.strip_line_comments(src);
        self.strip_block_comments(&without_lines)
    }
}

fn erase(pattern: Option<&Regex>, src: &str) -> String {
    match pattern {
        Some(re) => match re.replace_all(src, "") {
            Cow::Borrowed(_) => src.to_owned(),
            Cow::Owned(out) => out,
        },
        None => src.to_owned(),
    }
}

impl CommentStripper for FileTypeRule {
    fn strip_line_comments(&self, src: &str) -> String {
        erase(self.line_comment, src)
    }

    fn strip_block_comments(&self, src: &str) -> String {
        erase(self.block_comment, src)
    }

    fn strip_imports(&self, src: &str) -> String {
        erase(self.import, src)
    }
}
