//! # 终端输出工具
//!
//! 状态行、报告字段和概率着色的统一样式。
//! 警告和错误写到 stderr，使 `humanize` / `detect --json` 的 stdout 保持干净。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块和 `batch/runner.rs` 使用
//! - 使用 `models/verdict.rs` 为概率着色
//! - 使用 `colored` crate

use crate::models::Verdict;
use colored::{ColoredString, Colorize};

const RULE_WIDTH: usize = 60;
const FIELD_WIDTH: usize = 22;

/// 状态行类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Info,
    Warning,
    Error,
}

impl Status {
    fn tag(self) -> ColoredString {
        match self {
            Status::Success => "[OK]".green().bold(),
            Status::Info => "[*]".blue().bold(),
            Status::Warning => "[WARN]".yellow().bold(),
            Status::Error => "[ERR]".red().bold(),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Status::Warning | Status::Error)
    }
}

fn status_line(status: Status, msg: &str) -> String {
    format!("{} {}", status.tag(), msg)
}

fn emit(status: Status, msg: &str) {
    let line = status_line(status, msg);
    if status.to_stderr() {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

pub fn print_success(msg: &str) {
    emit(Status::Success, msg);
}

pub fn print_info(msg: &str) {
    emit(Status::Info, msg);
}

pub fn print_warning(msg: &str) {
    emit(Status::Warning, msg);
}

pub fn print_error(msg: &str) {
    emit(Status::Error, msg);
}

fn field_line(key: &str, value: &str) -> String {
    format!(
        "  {:<width$} {}",
        format!("{}:", key).dimmed(),
        value,
        width = FIELD_WIDTH
    )
}

/// 报告字段（键左对齐）
pub fn print_field(key: &str, value: &str) {
    println!("{}", field_line(key, value));
}

/// 概率单元格：`85% (AI)`，按判定等级着色
pub fn probability_cell(score: f64) -> String {
    let verdict = Verdict::from_score(score);
    verdict
        .paint(&format!("{:.0}% ({})", score, verdict.badge()))
        .to_string()
}

/// 报告标题栏
pub fn print_header(title: &str) {
    let rule = "─".repeat(RULE_WIDTH);
    println!("\n{}", rule.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", rule.dimmed());
}

pub fn print_separator() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_routing() {
        assert!(Status::Warning.to_stderr());
        assert!(Status::Error.to_stderr());
        assert!(!Status::Success.to_stderr());
        assert!(!Status::Info.to_stderr());
    }

    #[test]
    fn test_status_line_keeps_message() {
        colored::control::set_override(false);
        assert_eq!(status_line(Status::Warning, "slow analyzer"), "[WARN] slow analyzer");
        assert_eq!(status_line(Status::Success, "saved"), "[OK] saved");
    }

    #[test]
    fn test_probability_cell_uses_band_badge() {
        colored::control::set_override(false);
        assert_eq!(probability_cell(12.4), "12% (Human)");
        assert_eq!(probability_cell(30.0), "30% (Review)");
        assert_eq!(probability_cell(70.0), "70% (AI)");
    }

    #[test]
    fn test_field_line_alignment() {
        colored::control::set_override(false);
        let line = field_line("Verdict", "Likely Human");
        assert!(line.starts_with("  Verdict:"));
        assert!(line.ends_with(" Likely Human"));
        assert_eq!(line.find("Likely"), Some(2 + FIELD_WIDTH + 1));
    }
}
