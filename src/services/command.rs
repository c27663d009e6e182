//! # 基于外部程序的服务实现
//!
//! 通过管道把源码写入用户配置的外部程序，读取其标准输出作为结果。
//!
//! ## 协议
//! - 源码写入 stdin
//! - 环境变量: `CODEAUTH_LANGUAGE`, `CODEAUTH_STRENGTH`, `CODEAUTH_PRESERVE_FUNCTIONALITY`
//! - 分析程序输出 JSON 报告（`aiProbability`, `confidence`, 可选 `elapsedSeconds`, 可选 `features`）
//! - 人性化程序直接输出改写后的源码
//! - 程序不存在或退出码非零 → 服务不可用
//!
//! ## 依赖关系
//! - 实现 `services/mod.rs` 中的 trait
//! - 使用 `serde_json` 解析报告

use super::{CodeAnalysisService, CodeHumanizationService};
use crate::error::{CodeAuthError, Result};
use crate::models::{AnalysisReport, Confidence, FeatureScore, HumanizeResult};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;

/// 外部程序命令行（程序名 + 参数）
#[derive(Debug, Clone)]
struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    /// 按 shell 引号规则拆分命令行；空命令或引号不匹配时返回 `None`
    fn parse(command_line: &str) -> Option<Self> {
        let mut parts = split_command_line(command_line)?.into_iter();
        let program = parts.next()?;
        Some(ExternalCommand {
            program,
            args: parts.collect(),
        })
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 运行程序，返回 stdout；错误信息以字符串返回，由调用方映射为对应服务错误
    fn run(&self, input: &str, envs: &[(&str, String)]) -> std::result::Result<String, String> {
        tracing::debug!(command = %self.display(), bytes = input.len(), "spawning external service");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(envs.iter().map(|(k, v)| (*k, v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("cannot start '{}': {}", self.program, e))?;

        // 单独线程写 stdin，避免大输入时与 stdout 互相阻塞
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_string();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| format!("'{}' did not complete: {}", self.display(), e))?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                // 程序未读完输入就退出时 stdin 会断开，以退出码为准
                Ok(Err(e)) => tracing::debug!("stdin write to '{}' ended early: {}", self.program, e),
                Err(_) => return Err("stdin writer thread panicked".to_string()),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(format!("'{}' exited with {}: {}", self.display(), output.status, stderr));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| format!("'{}' produced non UTF-8 output", self.display()))
    }
}

/// 拆分命令行：支持单引号、双引号与反斜杠转义，不做变量展开
fn split_command_line(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        c => current.push(c),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            c @ ('"' | '\\') => current.push(c),
                            c => {
                                current.push('\\');
                                current.push(c);
                            }
                        },
                        c => current.push(c),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next()?);
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Some(words)
}

// ─────────────────────────────────────────────────────────────
// 分析服务
// ─────────────────────────────────────────────────────────────

/// 外部分析程序输出的报告（耗时可省略）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    ai_probability: f64,
    confidence: Confidence,
    elapsed_seconds: Option<f64>,
    #[serde(default)]
    features: BTreeMap<String, FeatureScore>,
}

/// 基于外部程序的代码分析服务
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    command: ExternalCommand,
}

impl CommandAnalyzer {
    pub fn new(command_line: &str) -> Result<Self> {
        let command = ExternalCommand::parse(command_line).ok_or_else(|| {
            CodeAuthError::AnalysisUnavailable("analyzer command is empty or has an unbalanced quote".to_string())
        })?;
        Ok(CommandAnalyzer { command })
    }
}

impl CodeAnalysisService for CommandAnalyzer {
    fn analyze(&self, source: &str, language: &str) -> Result<AnalysisReport> {
        let start = Instant::now();
        let stdout = self
            .command
            .run(source, &[("CODEAUTH_LANGUAGE", language.to_string())])
            .map_err(CodeAuthError::AnalysisUnavailable)?;
        let wall_time = start.elapsed().as_secs_f64();

        parse_report(&stdout, wall_time)
    }
}

/// 解析并校验分析报告
fn parse_report(stdout: &str, wall_time: f64) -> Result<AnalysisReport> {
    let raw: RawReport = serde_json::from_str(stdout.trim()).map_err(|e| {
        CodeAuthError::AnalysisUnavailable(format!("malformed analysis report: {}", e))
    })?;

    check_percentage("aiProbability", raw.ai_probability)?;
    for (name, feature) in &raw.features {
        check_percentage(&format!("features.{}.score", name), feature.score)?;
    }

    let elapsed_seconds = match raw.elapsed_seconds {
        Some(s) if s.is_finite() && s >= 0.0 => s,
        _ => wall_time,
    };

    Ok(AnalysisReport {
        ai_probability: raw.ai_probability,
        confidence: raw.confidence,
        elapsed_seconds,
        features: raw.features,
    })
}

fn check_percentage(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(CodeAuthError::AnalysisUnavailable(format!(
            "malformed analysis report: {} = {} is outside [0, 100]",
            field, value
        )))
    }
}

// ─────────────────────────────────────────────────────────────
// 人性化服务
// ─────────────────────────────────────────────────────────────

/// 基于外部程序的代码人性化服务
#[derive(Debug, Clone)]
pub struct CommandHumanizer {
    command: ExternalCommand,
}

impl CommandHumanizer {
    pub fn new(command_line: &str) -> Result<Self> {
        let command = ExternalCommand::parse(command_line).ok_or_else(|| {
            CodeAuthError::HumanizationUnavailable("humanizer command is empty or has an unbalanced quote".to_string())
        })?;
        Ok(CommandHumanizer { command })
    }
}

impl CodeHumanizationService for CommandHumanizer {
    fn humanize(
        &self,
        source: &str,
        strength: u8,
        preserve_functionality: bool,
    ) -> Result<HumanizeResult> {
        if strength > 100 {
            return Err(CodeAuthError::InvalidInput(format!(
                "strength {} is outside [0, 100]",
                strength
            )));
        }

        let envs = [
            ("CODEAUTH_STRENGTH", strength.to_string()),
            (
                "CODEAUTH_PRESERVE_FUNCTIONALITY",
                if preserve_functionality { "1" } else { "0" }.to_string(),
            ),
        ];

        let transformed_text = self
            .command
            .run(source, &envs)
            .map_err(CodeAuthError::HumanizationUnavailable)?;

        Ok(HumanizeResult { transformed_text })
    }
}
