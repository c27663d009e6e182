//! # 源码语言标签
//!
//! 根据文件扩展名推断语言，作为分析服务的 `language` 参数。
//!
//! ## 依赖关系
//! - 被 `cli/` 作为 `ValueEnum` 使用
//! - 被 `commands/` 用于推断输入语言

use clap::ValueEnum;
use std::path::Path;

/// 支持的源码语言
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Language {
    Javascript,
    Python,
    Java,
    Cpp,
    Go,
}

impl Language {
    /// 从文件扩展名推断
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())?;

        match ext.as_str() {
            "js" | "jsx" | "mjs" | "ts" | "tsx" => Some(Language::Javascript),
            "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "h" => Some(Language::Cpp),
            "go" => Some(Language::Go),
            _ => None,
        }
    }

    /// 传递给分析服务的标签
    pub fn tag(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Go => "go",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
