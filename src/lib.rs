use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Serialize;

pub mod collect;
pub mod comments;
pub mod config;
pub mod error;
pub mod filetype;
pub mod logging;
pub mod merge;
pub mod transform;

pub use crate::collect::{CollectOptions, collect_paths};
pub use crate::comments::CommentStripper;
pub use crate::error::MergeError;
pub use crate::filetype::{FileCategory, FileTypeRule, rule_for_extension, rule_for_path};
pub use crate::merge::{
    FileLineCount, LineBudget, SEPARATOR, count_lines, line_counts, merge, merge_to_path,
};
pub use crate::transform::{ProcessingOptions, Stage, process, process_file};

/// What the CLI asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print the line count the merge would produce.
    Count { json: bool },
    /// Write the merge to `output`, or stdout when `None`.
    Merge {
        output: Option<PathBuf>,
        line_budget: Option<LineBudget>,
    },
}

/// Configuration passed from the CLI layer (main.rs) into the core logic.
#[derive(Debug)]
pub struct Config {
    pub mode: Mode,
    pub paths: Vec<PathBuf>,
    pub collect: CollectOptions,
    pub options: ProcessingOptions,
}

#[derive(Serialize)]
struct CountReport {
    total: usize,
    files: Vec<FileLineCount>,
}

pub fn run_with_config(cfg: Config) -> Result<()> {
    let files = collect_paths(&cfg.paths, &cfg.collect)?;
    if files.is_empty() {
        bail!("No input files (check the paths and --type filters).");
    }
    log::info!("Processing {} file(s) with {:?}", files.len(), cfg.options);

    match cfg.mode {
        Mode::Count { json } => {
            let counts = line_counts(&files, &cfg.options)?;
            let total: usize = counts.iter().map(|c| c.lines).sum();

            if json {
                let report = CountReport {
                    total,
                    files: counts,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{total}");
            }
        }
        Mode::Merge {
            output: Some(output),
            line_budget,
        } => {
            merge_to_path(&files, &cfg.options, &output, line_budget)?;
            eprintln!(
                "Merged {} file(s) into {}",
                files.len(),
                output.display()
            );
        }
        Mode::Merge {
            output: None,
            line_budget,
        } => {
            let stdout = io::stdout();
            let mut out = io::BufWriter::new(stdout.lock());
            merge(&files, &cfg.options, &mut out, line_budget)?;
            out.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
