//! # 日志初始化
//!
//! 安装全局 `tracing` 订阅者，诊断信息输出到 stderr，
//! 不与 `utils/output.rs` 的用户输出混在一起。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber` 的 `EnvFilter`（`RUST_LOG` 优先）

use tracing_subscriber::EnvFilter;

/// 初始化日志；`verbose` 为 true 时默认级别为 debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "codeauth=debug" } else { "codeauth=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
