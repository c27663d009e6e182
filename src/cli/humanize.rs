//! # humanize 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/humanize.rs`

use clap::Args;
use std::path::PathBuf;

/// humanize 子命令参数
#[derive(Args, Debug)]
pub struct HumanizeArgs {
    /// Source file to humanize ('-' reads from stdin)
    pub input: PathBuf,

    /// Humanization strength (0-100): <33 light, <66 medium, otherwise aggressive
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub strength: u8,

    /// Write the humanized code to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// External humanization program; receives source on stdin and prints the rewritten code
    ///
    /// Split like a shell command line: quote paths that contain spaces
    /// (e.g. "python3 '/opt/my tools/detect.py'"). No variable expansion.
    #[arg(long, env = "CODEAUTH_HUMANIZER")]
    pub humanizer: String,

    /// Overwrite an existing output file
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
