use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use codemerge::collect::normalize_exts;
use codemerge::config::{FileConfig, merge_lists, merge_options};
use codemerge::filetype::known_extensions;
use codemerge::logging::setup_logger;
use codemerge::{CollectOptions, Config, LineBudget, Mode, ProcessingOptions, run_with_config};

/// codemerge - merge source files into one text file.
#[derive(Parser, Debug)]
#[command(
    name = "codemerge",
    author,
    version,
    about = "Merge source files into one text file, optionally stripping comments, imports and blank lines",
    long_about = r#"Merge source files into one text file, in the order given.

Each file can be cleaned up on the way:
  • comments removed (//, /* */, #, ''' ''', <!-- -->, by file type)
  • import / include / using lines removed
  • runs of blank lines collapsed
  • a filename marker line prepended

Typical usage:
  codemerge count --remove-comments src/a.cs src/b.cs
  codemerge merge -c -i -b -n -o merged.txt src
  codemerge merge --line-budget 400 -o excerpt.txt src
"#
)]
struct Cli {
    /// Increase log output (-v info, -vv debug). CODEMERGE_LOG overrides.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Read defaults from this TOML file instead of ./.codemerge.toml.
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print how many non-empty lines the merge would contain.
    Count {
        #[command(flatten)]
        common: CommonArgs,

        /// Print a JSON object with the total and per-file counts.
        #[arg(long = "json")]
        json: bool,
    },

    /// Write the merged text to a file (or stdout).
    Merge {
        #[command(flatten)]
        common: CommonArgs,

        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep at most N lines: the first half and last half of the merge,
        /// joined by a separator line.
        #[arg(long = "line-budget", value_name = "N")]
        line_budget: Option<LineBudget>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Files or directories, merged in the order given.
    ///
    /// Directories are expanded recursively (sorted, .gitignore respected).
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// Prepend a filename marker line to each file.
    #[arg(short = 'n', long = "add-file-name")]
    add_file_name: bool,

    /// Strip comments according to each file's type.
    #[arg(short = 'c', long = "remove-comments")]
    remove_comments: bool,

    /// Strip whole-line import / include / using statements.
    #[arg(short = 'i', long = "remove-imports")]
    remove_imports: bool,

    /// Collapse runs of blank lines into one.
    #[arg(short = 'b', long = "remove-extra-newlines")]
    remove_extra_newlines: bool,

    /// Extensions to pick up when expanding directories (e.g. cs, xaml).
    ///
    /// Can be repeated or comma-separated. Defaults to every type with
    /// dedicated comment rules.
    #[arg(
        short = 't',
        long = "type",
        alias = "ext",
        value_name = "EXT",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    exts: Vec<String>,

    /// Glob patterns to skip while expanding directories, relative to each
    /// directory argument (e.g. 'obj/**').
    #[arg(
        long = "exclude",
        short = 'E',
        value_name = "GLOB",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    excludes: Vec<String>,

    /// Disable reading .gitignore / .ignore / git exclude files.
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// Follow symbolic links while expanding directories.
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,
}

impl CommonArgs {
    fn options(&self) -> ProcessingOptions {
        ProcessingOptions {
            add_file_name: self.add_file_name,
            remove_comments: self.remove_comments,
            remove_imports: self.remove_imports,
            remove_extra_newlines: self.remove_extra_newlines,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logger(cli.verbose).context("Failed to initialise logging")?;

    let file_cfg = FileConfig::load(cli.config.as_deref())?;

    let (common, mode) = match cli.command {
        Command::Count { common, json } => (common, Mode::Count { json }),
        Command::Merge {
            common,
            output,
            line_budget,
        } => {
            let line_budget = match line_budget {
                Some(budget) => Some(budget),
                None => file_cfg.line_budget()?,
            };
            (
                common,
                Mode::Merge {
                    output,
                    line_budget,
                },
            )
        }
    };

    let options = merge_options(file_cfg.options, common.options());

    let mut exts = normalize_exts(merge_lists(file_cfg.types.clone(), common.exts));
    if exts.is_empty() {
        exts = normalize_exts(known_extensions());
    }

    let cfg = Config {
        mode,
        paths: common.paths,
        collect: CollectOptions {
            exts,
            excludes: merge_lists(file_cfg.exclude.clone(), common.excludes),
            no_gitignore: common.no_gitignore,
            follow_symlinks: common.follow_symlinks,
        },
        options,
    };

    run_with_config(cfg)
}
