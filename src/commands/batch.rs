//! # batch 命令实现
//!
//! 批量分析源码文件并汇总结果。
//!
//! ## 功能
//! - 收集匹配的源码文件并入队
//! - 逐个（或有界并发）调用分析服务
//! - 终端结果表格与汇总统计
//! - 导出 CSV / JSON
//!
//! ## 依赖关系
//! - 使用 `cli/batch.rs` 定义的参数
//! - 使用 `batch/` 收集文件与驱动运行
//! - 使用 `tracker/` 记录状态与统计
//! - 使用 `services/` 调用外部分析程序

use super::read_source;
use crate::batch::{BatchRunner, FileCollector};
use crate::cli::batch::BatchArgs;
use crate::error::{CodeAuthError, Result};
use crate::models::{Language, NewItem, Outcome, Verdict, WorkItem};
use crate::services::{CodeAnalysisService, CommandAnalyzer};
use crate::tracker::{BatchProgressTracker, BatchStats};
use crate::utils::output;

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tabled::{Table, Tabled};

/// 结果表格行
#[derive(Debug, Clone, Tabled)]
struct ResultRow {
    #[tabled(rename = "File Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "AI Probability")]
    probability: String,
    #[tabled(rename = "Processing Time")]
    time: String,
}

/// 汇总表格行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Files Analyzed")]
    analyzed: usize,
    #[tabled(rename = "Avg AI Probability")]
    average: String,
    #[tabled(rename = "Likely Human")]
    human: usize,
    #[tabled(rename = "Needs Review")]
    review: usize,
    #[tabled(rename = "Likely AI")]
    ai: usize,
    #[tabled(rename = "Errors")]
    errored: usize,
}

/// JSON 导出内容
#[derive(Serialize)]
struct BatchExport<'a> {
    summary: BatchStats,
    items: &'a [WorkItem],
}

/// 执行 batch 命令
pub fn execute(args: BatchArgs) -> Result<()> {
    let analyzer = CommandAnalyzer::new(&args.analyzer)?;
    execute_with(&args, &analyzer, false)
}

/// 使用给定分析服务执行 batch 命令
///
/// 只要运行结束，导出文件总会写出（即使没有任何文件分析成功）。
pub fn execute_with(
    args: &BatchArgs,
    service: &dyn CodeAnalysisService,
    quiet: bool,
) -> Result<()> {
    output::print_header("Batch Code Analysis");

    if !args.input.exists() {
        return Err(CodeAuthError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    let jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    output::print_info(&format!(
        "{} file(s) ready for analysis ({} at a time)",
        files.len(),
        jobs
    ));

    let tracker = analyze_files(&files, jobs, args.language, service, quiet)?;

    print_results(&tracker);

    if tracker.completed().next().is_none() {
        output::print_warning("No file was analyzed successfully; check the analyzer command.");
    }

    if let Some(path) = &args.output_csv {
        save_results_csv(tracker.items(), path)?;
        output::print_success(&format!("Results exported to '{}'", path.display()));
    }
    if let Some(path) = &args.output_json {
        save_results_json(&tracker, path)?;
        output::print_success(&format!("Results exported to '{}'", path.display()));
    }

    Ok(())
}

/// 入队并分析文件列表，返回运行结束后的跟踪器
pub fn analyze_files(
    files: &[PathBuf],
    jobs: usize,
    fallback_language: Option<Language>,
    service: &dyn CodeAnalysisService,
    quiet: bool,
) -> Result<BatchProgressTracker> {
    let mut tracker = BatchProgressTracker::with_concurrency(jobs);
    tracker.enqueue(files.iter().map(|path| new_item(path)))?;

    let tracker = Mutex::new(tracker);
    let stats = BatchRunner::new().quiet(quiet).run(&tracker, |item| {
        analyze_item(item, fallback_language, service).map_err(|e| e.to_string())
    })?;

    tracing::info!(
        completed = stats.completed_count,
        total = stats.total_count,
        "batch analysis finished"
    );

    tracker
        .into_inner()
        .map_err(|_| CodeAuthError::Other("batch tracker lock poisoned".to_string()))
}

fn new_item(path: &Path) -> NewItem {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let size_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    NewItem::new(name, size_bytes).with_source(path)
}

/// 分析单个工作项对应的源文件
fn analyze_item(
    item: &WorkItem,
    fallback_language: Option<Language>,
    service: &dyn CodeAnalysisService,
) -> Result<Outcome> {
    let path = item
        .source
        .as_deref()
        .ok_or_else(|| CodeAuthError::InvalidInput(format!("{} has no source file", item.name)))?;

    let language = Language::from_path(path)
        .or(fallback_language)
        .ok_or_else(|| {
            CodeAuthError::InvalidInput(format!(
                "cannot infer language of '{}' (use --language)",
                item.name
            ))
        })?;

    let source = read_source(path)?;
    let report = super::detect::analyze_source(service, &source, language)?;

    Ok(Outcome {
        score: report.ai_probability,
        elapsed_seconds: report.elapsed_seconds,
    })
}

fn print_results(tracker: &BatchProgressTracker) {
    let stats = tracker.stats();

    let rows: Vec<ResultRow> = tracker
        .items()
        .iter()
        .map(|item| ResultRow {
            name: item.name.clone(),
            size: item.display_size(),
            status: item.status.to_string(),
            probability: item
                .score
                .map(output::probability_cell)
                .unwrap_or_else(|| "-".to_string()),
            time: item
                .elapsed_seconds
                .map(|t| format!("{:.1}s", t))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    output::print_header("Analysis Results");
    println!("{}", Table::new(&rows));

    let summary = SummaryRow {
        analyzed: stats.completed_count,
        average: format!("{:.1}%", stats.average_score),
        human: stats.human_count,
        review: stats.review_count,
        ai: stats.ai_count,
        errored: stats.errored_count,
    };
    println!("\n{}", Table::new(std::iter::once(summary)));

    output::print_separator();
    output::print_success(&format!(
        "{} of {} files completed ({:.0}%)",
        stats.completed_count, stats.total_count, stats.overall_progress
    ));

    let failures: Vec<&WorkItem> = tracker
        .items()
        .iter()
        .filter(|item| item.error.is_some())
        .collect();
    if !failures.is_empty() {
        output::print_warning("Failed files:");
        for item in failures.iter().take(10) {
            output::print_error(&format!(
                "  {}: {}",
                item.name,
                item.error.as_deref().unwrap_or_default()
            ));
        }
        if failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", failures.len() - 10));
        }
    }
}

/// 保存结果到 CSV
fn save_results_csv(items: &[WorkItem], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "id",
        "file_name",
        "size_bytes",
        "status",
        "ai_probability",
        "verdict",
        "elapsed_seconds",
        "error",
    ])?;

    for item in items {
        wtr.write_record([
            item.id.0.to_string(),
            item.name.clone(),
            item.size_bytes.to_string(),
            item.status.to_string(),
            item.score.map(|s| format!("{:.2}", s)).unwrap_or_default(),
            item.score
                .map(|s| Verdict::from_score(s).label().to_string())
                .unwrap_or_default(),
            item.elapsed_seconds
                .map(|t| format!("{:.3}", t))
                .unwrap_or_default(),
            item.error.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush().map_err(|e| CodeAuthError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 保存结果与汇总统计到 JSON
fn save_results_json(tracker: &BatchProgressTracker, output_path: &Path) -> Result<()> {
    let export = BatchExport {
        summary: tracker.stats(),
        items: tracker.items(),
    };
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(output_path, json).map_err(|e| CodeAuthError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })
}
