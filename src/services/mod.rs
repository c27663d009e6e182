//! # 外部服务接口
//!
//! 代码分析与代码人性化均由外部服务完成，本模块只定义契约。
//!
//! ## 契约
//! - `CodeAnalysisService::analyze(source, language)` → AI 概率、置信度、耗时、特征评分；
//!   失败时返回 `AnalysisUnavailable`
//! - `CodeHumanizationService::humanize(source, strength, preserve_functionality)` → 改写后的源码；
//!   失败时返回 `HumanizationUnavailable`
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch/runner.rs` 使用
//! - 子模块: command（基于外部程序的实现）

pub mod command;

pub use command::{CommandAnalyzer, CommandHumanizer};

use crate::error::Result;
use crate::models::{AnalysisReport, HumanizeResult};

/// 代码分析服务
pub trait CodeAnalysisService: Send + Sync {
    fn analyze(&self, source: &str, language: &str) -> Result<AnalysisReport>;
}

/// 代码人性化服务
pub trait CodeHumanizationService: Send + Sync {
    fn humanize(
        &self,
        source: &str,
        strength: u8,
        preserve_functionality: bool,
    ) -> Result<HumanizeResult>;
}
