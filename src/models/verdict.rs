//! # 判定等级
//!
//! AI 生成概率的三段式判定，单文件与批量视图统一使用：
//! - `score < 30`        → Likely Human
//! - `30 <= score < 70`  → Human Review Needed
//! - `score >= 70`       → Likely AI Generated
//!
//! ## 依赖关系
//! - 被 `tracker/stats.rs` 用于统计分类
//! - 被 `commands/detect.rs`, `commands/batch.rs` 用于显示

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

/// 低于此值判定为人类编写
pub const HUMAN_THRESHOLD: f64 = 30.0;

/// 不低于此值判定为 AI 生成
pub const AI_THRESHOLD: f64 = 70.0;

/// 判定等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    LikelyHuman,
    ReviewNeeded,
    LikelyAi,
}

impl Verdict {
    /// 由概率分数分类
    pub fn from_score(score: f64) -> Self {
        if score < HUMAN_THRESHOLD {
            Verdict::LikelyHuman
        } else if score < AI_THRESHOLD {
            Verdict::ReviewNeeded
        } else {
            Verdict::LikelyAi
        }
    }

    /// 完整标签（单文件报告）
    pub fn label(self) -> &'static str {
        match self {
            Verdict::LikelyHuman => "Likely Human",
            Verdict::ReviewNeeded => "Human Review Needed",
            Verdict::LikelyAi => "Likely AI Generated",
        }
    }

    /// 简短徽标（批量表格）
    pub fn badge(self) -> &'static str {
        match self {
            Verdict::LikelyHuman => "Human",
            Verdict::ReviewNeeded => "Review",
            Verdict::LikelyAi => "AI",
        }
    }

    /// 终端着色
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Verdict::LikelyHuman => text.green(),
            Verdict::ReviewNeeded => text.yellow(),
            Verdict::LikelyAi => text.red(),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
