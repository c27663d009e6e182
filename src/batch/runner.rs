//! # 批量执行器
//!
//! 驱动一次批量运行：按插入顺序取出待处理项，调用分析函数，
//! 并把结果以状态迁移的形式提交给跟踪器。
//!
//! ## 功能
//! - 并发上限为 1 时严格顺序处理（完成顺序 = 插入顺序）
//! - 并发上限 n > 1 时使用 n 线程的 rayon 线程池
//! - 对跟踪器的写入通过 `Mutex` 串行化，分析本身在锁外执行
//! - 开始前检查并发槽位，运行中出错时中止并回到空闲
//! - 进度条显示
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `tracker/` 记录状态
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行处理

use crate::error::{CodeAuthError, Result};
use crate::models::{ItemId, Outcome, WorkItem};
use crate::tracker::{BatchProgressTracker, BatchStats, Transition};
use crate::utils::{output, progress};

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::sync::{Mutex, MutexGuard};

/// 批量执行器
#[derive(Debug, Default)]
pub struct BatchRunner {
    /// 不显示进度条
    quiet: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// 运行跟踪器中所有待处理项，返回最终统计
    ///
    /// `analyze` 返回 `Err(reason)` 时该项标记为 `Errored`，运行继续。
    /// 跟踪器本身报错时中止运行：剩余项标记为 `Errored` 并返回该错误。
    pub fn run<F>(&self, tracker: &Mutex<BatchProgressTracker>, analyze: F) -> Result<BatchStats>
    where
        F: Fn(&WorkItem) -> std::result::Result<Outcome, String> + Sync + Send,
    {
        let (ids, jobs) = {
            let mut guard = lock(tracker)?;
            if guard.is_running() {
                return Err(CodeAuthError::AlreadyRunning);
            }
            // 运行外已有项占满并发槽位时拒绝开始，避免运行卡在半途
            let limit = guard.concurrency();
            if guard.analyzing_count() >= limit {
                return Err(CodeAuthError::ConcurrencyLimit { limit });
            }
            (guard.start_run()?, limit)
        };

        let pb = if self.quiet {
            ProgressBar::hidden()
        } else {
            progress::create_progress_bar(ids.len() as u64, "Analyzing")
        };

        let processed = if jobs <= 1 {
            ids.iter()
                .try_for_each(|id| process_item(tracker, *id, &analyze, &pb))
        } else {
            rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|e| CodeAuthError::Other(format!("Failed to build thread pool: {}", e)))
                .and_then(|pool| {
                    pool.install(|| {
                        ids.par_iter()
                            .try_for_each(|id| process_item(tracker, *id, &analyze, &pb))
                    })
                })
        };

        pb.finish_and_clear();

        // 出错时把运行内剩余项记为失败，使跟踪器回到空闲
        if let Err(e) = processed {
            lock(tracker)?.abort_run(&e.to_string());
            return Err(e);
        }

        let stats = lock(tracker)?.stats();
        Ok(stats)
    }
}

/// 处理单个工作项：Begin → analyze → Complete / Fail
fn process_item<F>(
    tracker: &Mutex<BatchProgressTracker>,
    id: ItemId,
    analyze: &F,
    pb: &ProgressBar,
) -> Result<()>
where
    F: Fn(&WorkItem) -> std::result::Result<Outcome, String> + Sync + Send,
{
    let item = {
        let mut guard = lock(tracker)?;
        guard.advance(id, Transition::Begin)?;
        guard.get(id).cloned().ok_or(CodeAuthError::NotFound(id))?
    };
    pb.set_message(item.name.clone());

    let transition = match analyze(&item) {
        Ok(outcome) => Transition::Complete(outcome),
        Err(reason) => Transition::Fail(reason),
    };

    let failure = {
        let mut guard = lock(tracker)?;
        match guard.advance(id, transition) {
            Ok(()) => guard.get(id).and_then(|item| item.error.clone()),
            // 服务返回了越界结果：记为失败而不是中止整个运行
            Err(CodeAuthError::InvalidInput(reason)) => {
                guard.advance(id, Transition::Fail(reason.clone()))?;
                Some(reason)
            }
            Err(e) => return Err(e),
        }
    };

    if let Some(reason) = failure {
        pb.suspend(|| output::print_warning(&format!("Failed to analyze {}: {}", item.name, reason)));
    }
    pb.inc(1);

    Ok(())
}

fn lock(tracker: &Mutex<BatchProgressTracker>) -> Result<MutexGuard<'_, BatchProgressTracker>> {
    tracker
        .lock()
        .map_err(|_| CodeAuthError::Other("batch tracker lock poisoned".to_string()))
}
