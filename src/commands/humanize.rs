//! # humanize 命令实现
//!
//! 把单个源码交给人性化服务改写，始终要求保留功能。
//!
//! ## 依赖关系
//! - 使用 `cli/humanize.rs` 定义的参数
//! - 使用 `services/` 调用外部人性化程序
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use super::{ensure_not_blank, read_source};
use crate::cli::humanize::HumanizeArgs;
use crate::error::{CodeAuthError, Result};
use crate::models::{HumanizeResult, SourceStats, StrengthLevel};
use crate::services::{CodeHumanizationService, CommandHumanizer};
use crate::utils::{output, progress};

use std::fs;

/// 执行 humanize 命令
pub fn execute(args: HumanizeArgs) -> Result<()> {
    let humanizer = CommandHumanizer::new(&args.humanizer)?;
    let source = read_source(&args.input)?;

    if let Some(path) = &args.output {
        if path.exists() && !args.overwrite {
            return Err(CodeAuthError::InvalidInput(format!(
                "output '{}' already exists (use --overwrite)",
                path.display()
            )));
        }
    }

    let level = StrengthLevel::from_strength(args.strength);
    let spinner = progress::create_spinner(&format!("Humanizing code ({} strength)...", level));
    let result = humanize_source(&humanizer, &source, args.strength);
    spinner.finish_and_clear();
    let result = result?;

    match &args.output {
        Some(path) => {
            fs::write(path, &result.transformed_text).map_err(|e| CodeAuthError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;

            let before = SourceStats::of(&source);
            let after = SourceStats::of(&result.transformed_text);
            output::print_header("Code Humanization");
            output::print_field("Strength", &format!("{} ({})", args.strength, level));
            output::print_field("Mode", level.description());
            output::print_field("Preserve Functionality", "always enabled");
            output::print_field(
                "Lines",
                &format!("{} -> {}", before.lines, after.lines),
            );
            output::print_success(&format!("Humanized code saved to '{}'", path.display()));
        }
        None => print!("{}", result.transformed_text),
    }

    Ok(())
}

/// 校验并改写单个源码（保留功能）
pub fn humanize_source(
    service: &dyn CodeHumanizationService,
    source: &str,
    strength: u8,
) -> Result<HumanizeResult> {
    ensure_not_blank(source, "humanize")?;
    tracing::debug!(strength, chars = source.len(), "humanizing source");
    service.humanize(source, strength, true)
}
