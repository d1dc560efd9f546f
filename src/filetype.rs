//! File-type classification: extension -> comment and import rules.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Broad comment-syntax family a file type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// `//` line comments and `/* */` block comments.
    CFamily,
    /// `#` line comments and triple-quoted blocks.
    ScriptStyle,
    /// `<!-- -->` comments only.
    MarkupStyle,
    /// Anything we have no rule for. Commented like C, no import removal.
    Unknown,
}

/// Immutable per-extension rule. Looked up with [`rule_for_extension`].
#[derive(Debug)]
pub struct FileTypeRule {
    pub extensions: &'static [&'static str],
    pub category: FileCategory,
    /// Wrapped around the filename marker line.
    pub comment_start: &'static str,
    pub comment_end: &'static str,
    pub line_comment: Option<&'static Regex>,
    pub block_comment: Option<&'static Regex>,
    pub import: Option<&'static Regex>,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

static C_LINE_COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"//[^\r\n]*"));
static C_BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)/\*.*?\*/"));
static HASH_LINE_COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"#[^\r\n]*"));
// Triple-quoted spans are only removed when they open and close on one line.
static TRIPLE_QUOTE_BLOCK: Lazy<Regex> =
    Lazy::new(|| compile(r#"'''[^\r\n]*?'''|"""[^\r\n]*?""""#));
static MARKUP_COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)<!--.*?-->"));

// Import patterns are anchored to whole lines; `\r?` keeps CRLF files matching.
static INCLUDE_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?m)^[ \t]*#include[ \t]+[<"][^>"\r\n]*[>"][ \t]*\r?$"#));
static USING_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^[ \t]*using[ \t]+[\w.]+(?:[ \t]*=[ \t]*[\w.<>]+)?[ \t]*;[ \t]*\r?$")
});
static VB_IMPORTS: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*Imports[ \t]+[\w.]+[ \t]*\r?$"));
static JAVA_IMPORT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^[ \t]*import[ \t]+[\w.]+[ \t]*;[ \t]*\r?$"));
static PY_IMPORT: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?m)^[ \t]*(?:import[ \t]+[\w.]+(?:[ \t]+as[ \t]+\w+)?|from[ \t]+[\w.]+[ \t]+import[ \t]+[\w*, \t]+)[ \t]*\r?$",
    )
});

fn c_family(extensions: &'static [&'static str], import: Option<&'static Regex>) -> FileTypeRule {
    FileTypeRule {
        extensions,
        category: FileCategory::CFamily,
        comment_start: "//",
        comment_end: "",
        line_comment: Some(&*C_LINE_COMMENT),
        block_comment: Some(&*C_BLOCK_COMMENT),
        import,
    }
}

static RULES: Lazy<Vec<FileTypeRule>> = Lazy::new(|| {
    vec![
        c_family(&["c", "cpp", "h"], Some(&*INCLUDE_DIRECTIVE)),
        c_family(&["cs"], Some(&*USING_DIRECTIVE)),
        c_family(&["vb"], Some(&*VB_IMPORTS)),
        c_family(&["java"], Some(&*JAVA_IMPORT)),
        c_family(&["js"], None),
        FileTypeRule {
            extensions: &["py"],
            category: FileCategory::ScriptStyle,
            comment_start: "#",
            comment_end: "",
            line_comment: Some(&*HASH_LINE_COMMENT),
            block_comment: Some(&*TRIPLE_QUOTE_BLOCK),
            import: Some(&*PY_IMPORT),
        },
        FileTypeRule {
            extensions: &["html", "xaml"],
            category: FileCategory::MarkupStyle,
            comment_start: "<!--",
            comment_end: "-->",
            line_comment: None,
            block_comment: Some(&*MARKUP_COMMENT),
            import: None,
        },
    ]
});

static FALLBACK: Lazy<FileTypeRule> = Lazy::new(|| FileTypeRule {
    extensions: &[],
    category: FileCategory::Unknown,
    comment_start: "//",
    comment_end: "",
    line_comment: Some(&*C_LINE_COMMENT),
    block_comment: Some(&*C_BLOCK_COMMENT),
    import: None,
});

/// Look up the rule for an extension (with or without a leading dot, any case).
pub fn rule_for_extension(ext: &str) -> &'static FileTypeRule {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();

    RULES
        .iter()
        .find(|rule| rule.extensions.contains(&ext.as_str()))
        .unwrap_or(&*FALLBACK)
}

pub fn rule_for_path(path: &Path) -> &'static FileTypeRule {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    rule_for_extension(ext)
}

/// Every extension that has a dedicated rule.
pub fn known_extensions() -> impl Iterator<Item = &'static str> {
    RULES.iter().flat_map(|rule| rule.extensions.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("c", FileCategory::CFamily)]
    #[case("CPP", FileCategory::CFamily)]
    #[case(".h", FileCategory::CFamily)]
    #[case("Cs", FileCategory::CFamily)]
    #[case("vb", FileCategory::CFamily)]
    #[case("java", FileCategory::CFamily)]
    #[case("js", FileCategory::CFamily)]
    #[case("PY", FileCategory::ScriptStyle)]
    #[case("html", FileCategory::MarkupStyle)]
    #[case("xaml", FileCategory::MarkupStyle)]
    #[case("rs", FileCategory::Unknown)]
    #[case("", FileCategory::Unknown)]
    fn lookup_is_case_insensitive(#[case] ext: &str, #[case] expected: FileCategory) {
        assert_eq!(rule_for_extension(ext).category, expected);
    }

    #[test]
    fn unknown_extensions_use_c_comments_and_no_imports() {
        let rule = rule_for_extension("txt");
        assert_eq!(rule.comment_start, "//");
        assert!(rule.line_comment.is_some());
        assert!(rule.block_comment.is_some());
        assert!(rule.import.is_none());
    }

    #[test]
    fn javascript_has_no_import_pattern() {
        assert!(rule_for_extension("js").import.is_none());
    }

    #[test]
    fn markup_rule_has_no_line_comment_pattern() {
        let rule = rule_for_extension("xaml");
        assert!(rule.line_comment.is_none());
        assert_eq!((rule.comment_start, rule.comment_end), ("<!--", "-->"));
    }

    #[test]
    fn rule_for_path_reads_extension() {
        let rule = rule_for_path(Path::new("dir/Main.Java"));
        assert!(rule.extensions.contains(&"java"));
        assert_eq!(rule_for_path(Path::new("Makefile")).category, FileCategory::Unknown);
    }

    #[test]
    fn known_extensions_lists_every_rule() {
        let exts: Vec<_> = known_extensions().collect();
        for ext in ["c", "cpp", "h", "cs", "vb", "java", "js", "py", "html", "xaml"] {
            assert!(exts.contains(&ext), "missing {ext}");
        }
    }
}
