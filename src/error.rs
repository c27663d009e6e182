//! # 统一错误处理模块
//!
//! 定义 codeauth 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 使用 `models/work_item.rs` 中的状态类型描述非法状态迁移

use crate::models::{ItemId, ItemStatus};
use thiserror::Error;

/// codeauth 统一错误类型
#[derive(Error, Debug)]
pub enum CodeAuthError {
    // ─────────────────────────────────────────────────────────────
    // 批量跟踪器错误（均可恢复，失败时状态不变）
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A batch run is already in progress")]
    AlreadyRunning,

    #[error("Invalid transition for item {id}: {from} -> {to}")]
    InvalidTransition {
        id: ItemId,
        from: ItemStatus,
        to: ItemStatus,
    },

    #[error("Work item not found: {0}")]
    NotFound(ItemId),

    #[error("Concurrency limit reached: at most {limit} item(s) may be analyzing")]
    ConcurrencyLimit { limit: usize },

    // ─────────────────────────────────────────────────────────────
    // 外部服务错误
    // ─────────────────────────────────────────────────────────────
    #[error("Code analysis service unavailable: {0}")]
    AnalysisUnavailable(String),

    #[error("Code humanization service unavailable: {0}")]
    HumanizationUnavailable(String),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CodeAuthError>;
