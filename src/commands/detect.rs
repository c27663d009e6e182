//! # detect 命令实现
//!
//! 把单个源码交给分析服务，显示 AI 生成概率与特征分解。
//!
//! ## 功能
//! - 从文件或 stdin 读取源码，推断语言
//! - 显示概率、判定等级、置信度、耗时
//! - 特征评分表格
//! - 可选 JSON 输出
//!
//! ## 依赖关系
//! - 使用 `cli/detect.rs` 定义的参数
//! - 使用 `services/` 调用外部分析程序
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use super::{ensure_not_blank, read_source};
use crate::cli::detect::DetectArgs;
use crate::error::Result;
use crate::models::{AnalysisReport, Language, SourceStats, Verdict};
use crate::services::{CodeAnalysisService, CommandAnalyzer};
use crate::utils::{output, progress};

use colored::Colorize;
use tabled::{Table, Tabled};

/// 特征评分行
#[derive(Debug, Clone, Tabled)]
struct FeatureRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Details")]
    details: String,
}

/// 执行 detect 命令
pub fn execute(args: DetectArgs) -> Result<()> {
    let analyzer = CommandAnalyzer::new(&args.analyzer)?;

    let source = read_source(&args.input)?;
    let language = resolve_language(&args);

    let spinner = progress::create_spinner("Analyzing code...");
    let result = analyze_source(&analyzer, &source, language);
    spinner.finish_and_clear();
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&args, language, &source, &report);
    Ok(())
}

/// 校验并分析单个源码
pub fn analyze_source(
    service: &dyn CodeAnalysisService,
    source: &str,
    language: Language,
) -> Result<AnalysisReport> {
    ensure_not_blank(source, "analyze")?;
    tracing::debug!(%language, chars = source.len(), "analyzing source");
    service.analyze(source, language.tag())
}

fn resolve_language(args: &DetectArgs) -> Language {
    args.language
        .or_else(|| Language::from_path(&args.input))
        .unwrap_or_else(|| {
            tracing::warn!(
                "cannot infer language of '{}', assuming javascript",
                args.input.display()
            );
            Language::Javascript
        })
}

fn print_report(args: &DetectArgs, language: Language, source: &str, report: &AnalysisReport) {
    let verdict = report.verdict();
    let stats = SourceStats::of(source);

    output::print_header("AI Code Detection");
    output::print_field("Input", &args.input.display().to_string());
    output::print_field("Language", language.tag());
    output::print_field(
        "Size",
        &format!("{} characters, {} lines", stats.chars, stats.lines),
    );
    output::print_separator();
    output::print_field(
        "AI Probability",
        &verdict
            .paint(&format!("{:.0}%", report.ai_probability))
            .bold()
            .to_string(),
    );
    output::print_field("Verdict", &verdict.paint(verdict.label()).to_string());
    output::print_field("Confidence", &report.confidence.to_string());
    output::print_field("Processing Time", &format!("{:.1}s", report.elapsed_seconds));

    if !report.features.is_empty() {
        let rows: Vec<FeatureRow> = report
            .features
            .iter()
            .map(|(name, feature)| FeatureRow {
                feature: name.clone(),
                score: format!("{:.0}%", feature.score),
                details: feature.details.join("; "),
            })
            .collect();
        println!("\n{}", Table::new(&rows));
    }

    if verdict == Verdict::ReviewNeeded {
        println!();
        output::print_warning(
            "Human review recommended: the result falls between the human and AI thresholds.",
        );
    }
}
