//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `detect`: 检测单个源码是否为 AI 生成
//! - `humanize`: 人性化改写单个源码
//! - `batch`: 批量分析目录中的源码文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: detect, humanize, batch

pub mod batch;
pub mod detect;
pub mod humanize;

use clap::{Parser, Subcommand};

/// codeauth - 代码真实性工具箱
#[derive(Parser)]
#[command(name = "codeauth")]
#[command(version)]
#[command(about = "Detect AI-generated code, humanize it, and analyze code in batches", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug diagnostics on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Detect whether a piece of source code is AI generated
    Detect(detect::DetectArgs),

    /// Rewrite source code so it reads as human written
    Humanize(humanize::HumanizeArgs),

    /// Analyze many source files and summarize the results
    Batch(batch::BatchArgs),
}
