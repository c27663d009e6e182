//! # 批量分析工作项数据模型
//!
//! 单个待分析文件（或代码片段）在批量运行中的状态。
//!
//! ## 状态机
//! ```text
//! Pending ──Begin──▶ Analyzing ──Complete──▶ Completed
//!                         │
//!                         └────Fail────────▶ Errored
//! ```
//! `Completed` 与 `Errored` 为终态，不可再迁移。
//!
//! ## 依赖关系
//! - 被 `tracker/` 持有和修改
//! - 被 `commands/batch.rs` 读取并导出

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 工作项唯一标识（在单个跟踪器内单调递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 工作项状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Analyzing,
    Completed,
    Errored,
}

impl ItemStatus {
    /// 是否为终态
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Completed | ItemStatus::Errored)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Pending => write!(f, "pending"),
            ItemStatus::Analyzing => write!(f, "analyzing"),
            ItemStatus::Completed => write!(f, "completed"),
            ItemStatus::Errored => write!(f, "errored"),
        }
    }
}

/// 入队请求
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub size_bytes: u64,
    pub source: Option<PathBuf>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        NewItem {
            name: name.into(),
            size_bytes,
            source: None,
        }
    }

    /// 记录源文件路径（供执行器读取源码）
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }
}

/// 分析成功的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// AI 生成概率 [0, 100]
    pub score: f64,
    /// 分析耗时（秒）
    pub elapsed_seconds: f64,
}

/// 批量分析工作项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: ItemId,
    pub name: String,
    pub size_bytes: u64,
    pub status: ItemStatus,

    /// 仅在 `Completed` 时存在
    pub score: Option<f64>,

    /// 仅在 `Completed` 时存在
    pub elapsed_seconds: Option<f64>,

    /// 仅在 `Errored` 时存在
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl WorkItem {
    pub(crate) fn pending(id: ItemId, request: NewItem) -> Self {
        WorkItem {
            id,
            name: request.name,
            size_bytes: request.size_bytes,
            status: ItemStatus::Pending,
            score: None,
            elapsed_seconds: None,
            error: None,
            source: request.source,
        }
    }

    /// 人类可读的文件大小 (e.g. "2.1 KB")
    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// 格式化字节数
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!ItemStatus::Pending.is_terminal());
        assert!(!ItemStatus::Analyzing.is_terminal());
        assert!(ItemStatus::Completed.is_terminal());
        assert!(ItemStatus::Errored.is_terminal());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2150), "2.1 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_pending_item_has_no_results() {
        let item = WorkItem::pending(ItemId(7), NewItem::new("a.js", 10));
        assert_eq!(item.status, ItemStatus::Pending);
        assert!(item.score.is_none());
        assert!(item.elapsed_seconds.is_none());
        assert!(item.error.is_none());
    }
}
