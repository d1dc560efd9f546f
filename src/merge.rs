//! Counting and merging an ordered list of files.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{MergeError, Result};
use crate::transform::{ProcessingOptions, process_file};

/// Line printed between the head and tail of a budgeted merge.
pub const SEPARATOR: &str = "==================================================";

/// Cap on the number of lines a merge may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBudget(NonZeroUsize);

impl LineBudget {
    pub fn new(lines: usize) -> Option<Self> {
        NonZeroUsize::new(lines).map(LineBudget)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Lines kept from the start: the larger half when the budget is odd.
    pub fn head(self) -> usize {
        self.get().div_ceil(2)
    }

    pub fn tail(self) -> usize {
        self.get() / 2
    }
}

impl fmt::Display for LineBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LineBudget {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason| MergeError::InvalidLineBudget {
            value: s.to_owned(),
            reason,
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("a line budget is required"));
        }

        let lines: i64 = trimmed
            .parse()
            .map_err(|_| invalid("expected a whole number"))?;
        if lines <= 0 {
            return Err(invalid("must be greater than 0"));
        }

        usize::try_from(lines)
            .ok()
            .and_then(LineBudget::new)
            .ok_or_else(|| invalid("too large"))
    }
}

/// Lines of the transformed text, ignoring empty fragments.
pub fn count_non_empty_lines(text: &str) -> usize {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLineCount {
    pub path: PathBuf,
    pub lines: usize,
}

/// Per-file line counts after transformation, in list order.
pub fn line_counts(paths: &[PathBuf], options: &ProcessingOptions) -> Result<Vec<FileLineCount>> {
    paths
        .iter()
        .map(|path| {
            let text = process_file(path, options)?;
            Ok(FileLineCount {
                path: path.clone(),
                lines: count_non_empty_lines(&text),
            })
        })
        .collect()
}

/// Total non-empty lines the merge would contain. Writes nothing.
pub fn count_lines(paths: &[PathBuf], options: &ProcessingOptions) -> Result<usize> {
    Ok(line_counts(paths, options)?
        .iter()
        .map(|count| count.lines)
        .sum())
}

/// Write every transformed file to `sink` in list order.
///
/// Without a budget each file is followed by a blank line. With one, the files
/// are buffered first and cut down to a head and a tail when they exceed it.
pub fn merge<W: Write>(
    paths: &[PathBuf],
    options: &ProcessingOptions,
    sink: &mut W,
    budget: Option<LineBudget>,
) -> Result<()> {
    let sink_err = |e| MergeError::write("output sink", e);

    match budget {
        None => {
            for path in paths {
                let text = process_file(path, options)?;
                write!(sink, "{text}\n\n").map_err(sink_err)?;
            }
        }
        Some(budget) => {
            let mut buffer = String::new();
            for path in paths {
                buffer.push_str(&process_file(path, options)?);
                buffer.push('\n');
            }

            let excerpt = split_head_tail(&buffer, budget);
            sink.write_all(excerpt.as_deref().unwrap_or(buffer.as_str()).as_bytes())
                .map_err(sink_err)?;
        }
    }

    sink.flush().map_err(sink_err)
}

/// Merge into a file at `output`, created (or truncated) once per call.
pub fn merge_to_path(
    paths: &[PathBuf],
    options: &ProcessingOptions,
    output: &Path,
    budget: Option<LineBudget>,
) -> Result<()> {
    let target = output.display().to_string();
    let file = File::create(output).map_err(|e| MergeError::write(target.clone(), e))?;
    let mut writer = BufWriter::new(file);

    merge(paths, options, &mut writer, budget).map_err(|err| match err {
        MergeError::OutputWrite { source, .. } => MergeError::write(target.clone(), source),
        other => other,
    })?;

    log::info!("Merged {} file(s) into {}", paths.len(), target);
    Ok(())
}

/// Head/tail excerpt of `buffer`, or `None` when it already fits the budget.
///
/// Interior empty lines count; a trailing line break does not start a new line.
pub fn split_head_tail(buffer: &str, budget: LineBudget) -> Option<String> {
    let lines: Vec<&str> = buffer.lines().collect();
    let total = lines.len();

    if total <= budget.get() {
        return None;
    }

    let (head, tail) = (budget.head(), budget.tail());
    log::info!("{total} lines exceed the budget of {budget}; keeping {head} + {tail}");

    let mut out = String::new();
    for line in &lines[..head] {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(SEPARATOR);
    out.push_str("\n\n");
    for line in &lines[total - tail..] {
        out.push_str(line);
        out.push('\n');
    }

    Some(out)
}
