//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `services/`, `tracker/`, `batch/`, `utils/`
//! - 子模块: detect, humanize, batch

pub mod batch;
pub mod detect;
pub mod humanize;

use crate::cli::Commands;
use crate::error::{CodeAuthError, Result};

use std::fs;
use std::io::Read;
use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Detect(args) => detect::execute(args),
        Commands::Humanize(args) => humanize::execute(args),
        Commands::Batch(args) => batch::execute(args),
    }
}

/// 读取源码（`-` 表示 stdin）
pub(crate) fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| CodeAuthError::FileReadError {
                path: "<stdin>".to_string(),
                source: e,
            })?;
        return Ok(source);
    }

    if !path.exists() {
        return Err(CodeAuthError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    fs::read_to_string(path).map_err(|e| CodeAuthError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 空源码不提交给外部服务
pub(crate) fn ensure_not_blank(source: &str, action: &str) -> Result<()> {
    if source.trim().is_empty() {
        return Err(CodeAuthError::InvalidInput(format!(
            "no code to {}: the input is empty",
            action
        )));
    }
    Ok(())
}
