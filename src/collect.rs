//! Turn command-line path arguments into the ordered file list the merge consumes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

/// How directory arguments are expanded.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Lowercase extensions without a dot.
    pub exts: HashSet<String>,
    pub excludes: Vec<String>,
    pub no_gitignore: bool,
    pub follow_symlinks: bool,
}

/// File arguments are kept as given, in order. Directory arguments are
/// replaced by their matching files, sorted by path. Nothing is deduplicated.
pub fn collect_paths(inputs: &[PathBuf], opts: &CollectOptions) -> Result<Vec<PathBuf>> {
    let exclude_globset = build_exclude_globset(&opts.excludes)?;
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = walk_dir(input, opts, exclude_globset.as_ref())?;
            log::debug!("{} matched {} file(s)", input.display(), found.len());
            files.append(&mut found);
        } else {
            files.push(input.clone());
        }
    }

    Ok(files)
}

fn walk_dir(root: &Path, opts: &CollectOptions, excludes: Option<&GlobSet>) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(root);
    builder.follow_links(opts.follow_symlinks);

    if opts.no_gitignore {
        builder
            .git_ignore(false)
            .git_exclude(false)
            .git_global(false)
            .ignore(false);
    } else {
        builder
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .ignore(true)
            .require_git(false);
    }

    // The filter closure must be 'static.
    let root_for_filter = root.to_path_buf();
    let excludes = excludes.cloned();

    builder.filter_entry(move |entry: &DirEntry| {
        if entry.depth() == 0 {
            return true;
        }

        let Some(gs) = excludes.as_ref() else {
            return true;
        };

        let path = entry.path();
        let rel = path.strip_prefix(&root_for_filter).unwrap_or(path);
        let rel_norm = normalize_for_matching(rel);
        if gs.is_match(&rel_norm) {
            return false;
        }

        // A trailing slash lets `tests/**` prune the whole directory early.
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        !(is_dir && gs.is_match(format!("{rel_norm}/")))
    });

    let mut files = Vec::new();
    for result in builder.build() {
        let entry = result.with_context(|| format!("Failed to walk {}", root.display()))?;

        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        if matches_ext(path, &opts.exts) {
            files.push(path.to_path_buf());
        } else {
            log::trace!("Skipping {} (extension not selected)", path.display());
        }
    }

    files.sort();
    Ok(files)
}

/// Build a GlobSet from the `--exclude` patterns; `None` when there are none.
fn build_exclude_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    let patterns: Vec<&str> = patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob =
            Glob::new(pat).with_context(|| format!("Invalid --exclude glob pattern: {pat}"))?;
        builder.add(glob);
    }

    let set = builder
        .build()
        .context("Failed to build exclude glob set")?;
    Ok(Some(set))
}

/// Case-insensitive extension match against a lowercase set.
pub fn matches_ext(path: &Path, exts: &HashSet<String>) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => exts.contains(&ext.to_ascii_lowercase()),
        None => false,
    }
}

/// Lowercase, strip leading dots, drop empties.
pub fn normalize_exts<I, S>(raw: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Slash-separated form for glob matching.
fn normalize_for_matching(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn opts(exts: &[&str]) -> CollectOptions {
        CollectOptions {
            exts: normalize_exts(exts),
            ..Default::default()
        }
    }

    #[test]
    fn matches_ext_is_case_insensitive_and_requires_extension() {
        let exts = normalize_exts(["py"]);

        assert!(matches_ext(Path::new("foo.PY"), &exts));
        assert!(matches_ext(Path::new("dir/bar.py"), &exts));
        assert!(!matches_ext(Path::new("README"), &exts));
        assert!(!matches_ext(Path::new("script.sh"), &exts));
    }

    #[test]
    fn normalize_exts_strips_dots_and_blanks() {
        let exts = normalize_exts([".CS", " xaml ", ""]);
        assert_eq!(exts, HashSet::from(["cs".to_string(), "xaml".to_string()]));
    }

    #[test]
    fn files_keep_argument_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.md");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        let inputs = vec![b.clone(), a.clone(), b.clone()];
        let out = collect_paths(&inputs, &opts(&["py"])).unwrap();
        assert_eq!(out, vec![b.clone(), a, b]);
    }

    #[test]
    fn directories_expand_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/z.cs"), "").unwrap();
        fs::write(dir.path().join("src/a.cs"), "").unwrap();
        fs::write(dir.path().join("src/nested/m.CS"), "").unwrap();
        fs::write(dir.path().join("src/notes.txt"), "").unwrap();

        let root = dir.path().join("src");
        let out = collect_paths(&[root.clone()], &opts(&["cs"])).unwrap();
        assert_eq!(
            out,
            vec![
                root.join("a.cs"),
                root.join("nested/m.CS"),
                root.join("z.cs"),
            ]
        );
    }

    #[test]
    fn exclude_globs_prune_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("obj")).unwrap();
        fs::write(dir.path().join("obj/gen.cs"), "").unwrap();
        fs::write(dir.path().join("main.cs"), "").unwrap();

        let mut o = opts(&["cs"]);
        o.excludes = vec!["obj/**".into()];
        let out = collect_paths(&[dir.path().to_path_buf()], &o).unwrap();
        assert_eq!(out, vec![dir.path().join("main.cs")]);
    }

    #[test]
    fn invalid_exclude_glob_is_reported() {
        let mut o = opts(&["cs"]);
        o.excludes = vec!["[".into()];
        let err = collect_paths(&[], &o).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid --exclude glob pattern"));
    }
}
