//! # 数据模型模块
//!
//! 定义工作项、判定等级、服务结果等数据模型。
//!
//! ## 依赖关系
//! - 被 `tracker/`, `services/` 和 `commands/` 使用
//! - 子模块: work_item, verdict, report, language

pub mod language;
pub mod report;
pub mod verdict;
pub mod work_item;

pub use language::Language;
pub use report::{AnalysisReport, Confidence, FeatureScore, HumanizeResult, SourceStats, StrengthLevel};
pub use verdict::Verdict;
pub use work_item::{ItemId, ItemStatus, NewItem, Outcome, WorkItem};
