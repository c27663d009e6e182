//! # batch 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use crate::batch::DEFAULT_PATTERN;
use crate::models::Language;
use clap::Args;
use std::path::PathBuf;

/// batch 子命令参数
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input: source file or directory containing source files
    pub input: PathBuf,

    /// Glob patterns for input files (comma separated)
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Number of files analyzed at the same time (0 = one per CPU)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Language for files whose extension is not recognized
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// External analysis program; receives source on stdin and prints a JSON report
    ///
    /// Split like a shell command line: quote paths that contain spaces
    /// (e.g. "python3 '/opt/my tools/detect.py'"). No variable expansion.
    #[arg(long, env = "CODEAUTH_ANALYZER")]
    pub analyzer: String,

    /// Export all results to a CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,

    /// Export all results and summary statistics to a JSON file
    #[arg(long)]
    pub output_json: Option<PathBuf>,
}
