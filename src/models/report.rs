//! # 外部服务结果数据模型
//!
//! 代码分析服务与代码人性化服务的返回值。
//!
//! ## 依赖关系
//! - 被 `services/` 解析与构造
//! - 被 `commands/detect.rs`, `commands/humanize.rs` 显示

use super::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 分析置信度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
        }
    }
}

/// 单项特征评分 (stylistic / structural / statistical ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub score: f64,
    #[serde(default)]
    pub details: Vec<String>,
}

/// 代码分析报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// AI 生成概率 [0, 100]
    pub ai_probability: f64,

    pub confidence: Confidence,

    /// 服务报告的耗时（秒）
    pub elapsed_seconds: f64,

    #[serde(default)]
    pub features: BTreeMap<String, FeatureScore>,
}

impl AnalysisReport {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.ai_probability)
    }
}

/// 人性化强度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Light,
    Medium,
    Aggressive,
}

impl StrengthLevel {
    pub fn from_strength(strength: u8) -> Self {
        if strength < 33 {
            StrengthLevel::Light
        } else if strength < 66 {
            StrengthLevel::Medium
        } else {
            StrengthLevel::Aggressive
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrengthLevel::Light => "Minimal changes, subtle human touches",
            StrengthLevel::Medium => "Moderate changes, variable naming and comments",
            StrengthLevel::Aggressive => "Significant changes, restructuring and style variations",
        }
    }
}

impl std::fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrengthLevel::Light => write!(f, "Light"),
            StrengthLevel::Medium => write!(f, "Medium"),
            StrengthLevel::Aggressive => write!(f, "Aggressive"),
        }
    }
}

/// 人性化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanizeResult {
    pub transformed_text: String,
}

/// 源码统计（字符数 / 行数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    pub chars: usize,
    pub lines: usize,
}

impl SourceStats {
    pub fn of(source: &str) -> Self {
        SourceStats {
            chars: source.chars().count(),
            lines: source.split('\n').count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_levels() {
        assert_eq!(StrengthLevel::from_strength(0), StrengthLevel::Light);
        assert_eq!(StrengthLevel::from_strength(32), StrengthLevel::Light);
        assert_eq!(StrengthLevel::from_strength(33), StrengthLevel::Medium);
        assert_eq!(StrengthLevel::from_strength(65), StrengthLevel::Medium);
        assert_eq!(StrengthLevel::from_strength(66), StrengthLevel::Aggressive);
        assert_eq!(StrengthLevel::from_strength(100), StrengthLevel::Aggressive);
    }

    #[test]
    fn test_source_stats() {
        let stats = SourceStats::of("fn main() {\n}\n");
        assert_eq!(stats.chars, 14);
        assert_eq!(stats.lines, 3);
        assert_eq!(SourceStats::of("").lines, 1);
    }

    #[test]
    fn test_report_from_json() {
        let json = r#"{
            "aiProbability": 82,
            "confidence": "High",
            "elapsedSeconds": 1.4,
            "features": {
                "stylistic": { "score": 75, "details": ["Consistent formatting"] }
            }
        }"#;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.ai_probability, 82.0);
        assert_eq!(report.confidence, Confidence::High);
        assert_eq!(report.verdict(), Verdict::LikelyAi);
        assert_eq!(report.features["stylistic"].details.len(), 1);
    }
}
