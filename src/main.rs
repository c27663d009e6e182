//! # codeauth - 代码真实性工具箱
//!
//! 检测 AI 生成的代码、人性化改写代码、批量分析源码文件。
//! 实际的检测与改写均委托给外部服务程序。
//!
//! ## 子命令
//! - `detect`   - 单个源码的 AI 生成概率
//! - `humanize` - 单个源码的人性化改写
//! - `batch`    - 批量分析与汇总统计
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (文件收集与批量执行)
//!   │     ├── tracker/   (批量进度跟踪器)
//!   │     ├── services/  (外部服务契约)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   ├── logging.rs  (诊断日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod logging;
mod models;
mod services;
mod tracker;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
