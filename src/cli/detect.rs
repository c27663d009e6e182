//! # detect 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/detect.rs`

use crate::models::Language;
use clap::Args;
use std::path::PathBuf;

/// detect 子命令参数
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Source file to analyze ('-' reads from stdin)
    pub input: PathBuf,

    /// Source language (inferred from the file extension if omitted)
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// External analysis program; receives source on stdin and prints a JSON report
    ///
    /// Split like a shell command line: quote paths that contain spaces
    /// (e.g. "python3 '/opt/my tools/detect.py'"). No variable expansion.
    #[arg(long, env = "CODEAUTH_ANALYZER")]
    pub analyzer: String,

    /// Print the report as JSON instead of a formatted summary
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
