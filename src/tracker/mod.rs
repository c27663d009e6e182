//! # 批量进度跟踪器
//!
//! 持有有序的工作项列表，提供入队、开始运行、推进单项状态和汇总统计。
//!
//! ## 功能
//! - 入队时生成唯一 id，保持插入顺序（即处理顺序）
//! - 按 `Pending → Analyzing → {Completed | Errored}` 校验状态迁移
//! - 限制同时处于 `Analyzing` 的项数（默认 1）
//! - 运行内所有项到达终态后自动回到空闲
//! - 运行出错时可中止，剩余项记为 `Errored`
//! - 任何失败操作都不改变内部状态
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 驱动
//! - 被 `commands/batch.rs` 读取快照
//! - 使用 `models/work_item.rs`
//! - 子模块: stats

pub mod stats;

pub use stats::BatchStats;

use crate::error::{CodeAuthError, Result};
use crate::models::{ItemId, ItemStatus, NewItem, Outcome, WorkItem};

/// 单项状态迁移请求
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Pending → Analyzing
    Begin,
    /// Analyzing → Completed
    Complete(Outcome),
    /// Analyzing → Errored
    Fail(String),
}

impl Transition {
    fn source(&self) -> ItemStatus {
        match self {
            Transition::Begin => ItemStatus::Pending,
            Transition::Complete(_) | Transition::Fail(_) => ItemStatus::Analyzing,
        }
    }

    fn target(&self) -> ItemStatus {
        match self {
            Transition::Begin => ItemStatus::Analyzing,
            Transition::Complete(_) => ItemStatus::Completed,
            Transition::Fail(_) => ItemStatus::Errored,
        }
    }
}

/// 批量进度跟踪器
#[derive(Debug)]
pub struct BatchProgressTracker {
    items: Vec<WorkItem>,
    next_id: u64,
    /// 当前运行包含的工作项；`None` 表示空闲
    run: Option<Vec<ItemId>>,
    concurrency: usize,
}

impl Default for BatchProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgressTracker {
    /// 创建单并发跟踪器
    pub fn new() -> Self {
        Self::with_concurrency(1)
    }

    /// 创建指定并发上限的跟踪器（0 视为 1）
    pub fn with_concurrency(concurrency: usize) -> Self {
        BatchProgressTracker {
            items: Vec::new(),
            next_id: 1,
            run: None,
            concurrency: concurrency.max(1),
        }
    }

    /// 追加工作项，返回新生成的 id
    pub fn enqueue<I>(&mut self, requests: I) -> Result<Vec<ItemId>>
    where
        I: IntoIterator<Item = NewItem>,
    {
        let requests: Vec<NewItem> = requests.into_iter().collect();

        // 先整体校验，保证失败时不追加任何项
        if let Some(pos) = requests.iter().position(|r| r.name.trim().is_empty()) {
            return Err(CodeAuthError::InvalidInput(format!(
                "item {} in enqueue request has an empty name",
                pos + 1
            )));
        }

        let mut ids = Vec::with_capacity(requests.len());
        for request in requests {
            let id = ItemId(self.next_id);
            self.next_id += 1;
            tracing::debug!(%id, name = %request.name, "enqueued");
            self.items.push(WorkItem::pending(id, request));
            ids.push(id);
        }

        Ok(ids)
    }

    /// 开始运行：按插入顺序快照所有 `Pending` 项
    pub fn start_run(&mut self) -> Result<Vec<ItemId>> {
        if self.run.is_some() {
            return Err(CodeAuthError::AlreadyRunning);
        }

        let ids: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.status == ItemStatus::Pending)
            .map(|item| item.id)
            .collect();

        tracing::info!(items = ids.len(), "batch run started");
        if !ids.is_empty() {
            self.run = Some(ids.clone());
        }

        Ok(ids)
    }

    /// 推进单个工作项的状态
    pub fn advance(&mut self, id: ItemId, transition: Transition) -> Result<()> {
        let analyzing = self.analyzing_count();
        let limit = self.concurrency;

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CodeAuthError::NotFound(id))?;

        if item.status != transition.source() {
            return Err(CodeAuthError::InvalidTransition {
                id,
                from: item.status,
                to: transition.target(),
            });
        }

        // 结果校验在查找与状态检查之后
        if let Transition::Complete(outcome) = &transition {
            validate_outcome(outcome)?;
        }

        if transition == Transition::Begin && analyzing >= limit {
            return Err(CodeAuthError::ConcurrencyLimit { limit });
        }

        item.status = transition.target();
        match transition {
            Transition::Begin => {}
            Transition::Complete(outcome) => {
                item.score = Some(outcome.score);
                item.elapsed_seconds = Some(outcome.elapsed_seconds);
            }
            Transition::Fail(reason) => {
                item.error = Some(reason);
            }
        }
        tracing::debug!(%id, status = %item.status, "item advanced");

        if item.status.is_terminal() {
            self.finish_run_if_done();
        }

        Ok(())
    }

    /// 汇总统计
    pub fn stats(&self) -> BatchStats {
        BatchStats::from_items(&self.items)
    }

    /// 全部工作项（插入顺序）
    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&WorkItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// 已完成的工作项
    pub fn completed(&self) -> impl Iterator<Item = &WorkItem> {
        self.items
            .iter()
            .filter(|item| item.status == ItemStatus::Completed)
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 中止当前运行：运行中尚未终结的工作项全部记为 `Errored`
    ///
    /// 无运行时为空操作。返回被中止的工作项数量。
    pub fn abort_run(&mut self, reason: &str) -> usize {
        let Some(ids) = self.run.take() else {
            return 0;
        };

        let mut aborted = 0;
        for item in self.items.iter_mut() {
            if ids.contains(&item.id) && !item.status.is_terminal() {
                item.status = ItemStatus::Errored;
                item.error = Some(reason.to_string());
                aborted += 1;
            }
        }

        tracing::warn!(aborted, reason, "batch run aborted");
        aborted
    }

    /// 当前处于 `Analyzing` 的工作项数量
    pub fn analyzing_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == ItemStatus::Analyzing)
            .count()
    }

    fn finish_run_if_done(&mut self) {
        let done = match &self.run {
            Some(ids) => ids.iter().all(|id| {
                self.get(*id)
                    .map(|item| item.status.is_terminal())
                    .unwrap_or(true)
            }),
            None => false,
        };

        if done {
            self.run = None;
            let stats = self.stats();
            tracing::info!(
                completed = stats.completed_count,
                errored = stats.errored_count,
                "batch run finished"
            );
        }
    }
}

fn validate_outcome(outcome: &Outcome) -> Result<()> {
    if !outcome.score.is_finite() || !(0.0..=100.0).contains(&outcome.score) {
        return Err(CodeAuthError::InvalidInput(format!(
            "score {} is outside [0, 100]",
            outcome.score
        )));
    }
    if !outcome.elapsed_seconds.is_finite() || outcome.elapsed_seconds < 0.0 {
        return Err(CodeAuthError::InvalidInput(format!(
            "elapsed time {} is not a valid duration",
            outcome.elapsed_seconds
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(score: f64) -> Transition {
        Transition::Complete(Outcome {
            score,
            elapsed_seconds: 1.5,
        })
    }

    fn tracker_with(names: &[&str]) -> (BatchProgressTracker, Vec<ItemId>) {
        let mut tracker = BatchProgressTracker::new();
        let ids = tracker
            .enqueue(names.iter().map(|n| NewItem::new(*n, 1024)))
            .unwrap();
        (tracker, ids)
    }

    #[test]
    fn test_enqueue_preserves_order_across_calls() {
        let (mut tracker, first) = tracker_with(&["a.js", "b.py"]);
        let second = tracker.enqueue(vec![NewItem::new("c.go", 10)]).unwrap();

        let names: Vec<&str> = tracker.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a.js", "b.py", "c.go"]);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert!(tracker.items().iter().all(|i| i.status == ItemStatus::Pending));
    }

    #[test]
    fn test_ids_are_unique() {
        let (mut tracker, mut ids) = tracker_with(&["a.js", "b.py", "c.go"]);
        ids.extend(tracker.enqueue(vec![NewItem::new("d.cpp", 1)]).unwrap());
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn test_enqueue_empty_name_is_atomic() {
        let (mut tracker, _) = tracker_with(&["a.js"]);
        let err = tracker
            .enqueue(vec![NewItem::new("b.py", 1), NewItem::new("  ", 1)])
            .unwrap_err();
        assert!(matches!(err, CodeAuthError::InvalidInput(_)));
        assert_eq!(tracker.items().len(), 1);
    }

    #[test]
    fn test_start_run_twice_fails() {
        let (mut tracker, ids) = tracker_with(&["a.js", "b.py"]);
        assert_eq!(tracker.start_run().unwrap(), ids);
        assert!(tracker.is_running());
        assert!(matches!(
            tracker.start_run(),
            Err(CodeAuthError::AlreadyRunning)
        ));
    }

    #[test]
    fn test_start_run_without_pending_items_stays_idle() {
        let mut tracker = BatchProgressTracker::new();
        assert!(tracker.start_run().unwrap().is_empty());
        assert!(!tracker.is_running());
    }

    #[test]
    fn test_scenario_single_completion() {
        let (mut tracker, ids) = tracker_with(&["a.js", "b.py", "c.go"]);
        tracker.start_run().unwrap();
        tracker.advance(ids[0], Transition::Begin).unwrap();
        tracker.advance(ids[0], outcome(10.0)).unwrap();

        let stats = tracker.stats();
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.average_score, 10.0);
        assert_eq!(stats.human_count, 1);
        assert_eq!(stats.review_count, 0);
        assert_eq!(stats.ai_count, 0);
    }

    #[test]
    fn test_complete_from_pending_is_invalid() {
        let (mut tracker, ids) = tracker_with(&["a.js"]);
        let err = tracker.advance(ids[0], outcome(50.0)).unwrap_err();
        assert!(matches!(
            err,
            CodeAuthError::InvalidTransition {
                from: ItemStatus::Pending,
                to: ItemStatus::Completed,
                ..
            }
        ));
        assert_eq!(tracker.items()[0].status, ItemStatus::Pending);
        assert!(tracker.items()[0].score.is_none());
    }

    #[test]
    fn test_terminal_states_are_never_left() {
        let (mut tracker, ids) = tracker_with(&["a.js", "b.py"]);
        tracker.advance(ids[0], Transition::Begin).unwrap();
        tracker.advance(ids[0], outcome(80.0)).unwrap();
        tracker.advance(ids[1], Transition::Begin).unwrap();
        tracker
            .advance(ids[1], Transition::Fail("service down".to_string()))
            .unwrap();

        for id in &ids {
            for transition in [Transition::Begin, outcome(1.0), Transition::Fail("x".into())] {
                let before = tracker.get(*id).unwrap().clone();
                assert!(matches!(
                    tracker.advance(*id, transition),
                    Err(CodeAuthError::InvalidTransition { .. })
                ));
                let after = tracker.get(*id).unwrap();
                assert_eq!(before.status, after.status);
                assert_eq!(before.score, after.score);
            }
        }
    }

    #[test]
    fn test_unknown_id_not_found() {
        let (mut tracker, _) = tracker_with(&["a.js"]);
        assert!(matches!(
            tracker.advance(ItemId(999), Transition::Begin),
            Err(CodeAuthError::NotFound(ItemId(999)))
        ));
        assert!(matches!(
            tracker.advance(ItemId(999), Transition::Fail("boom".into())),
            Err(CodeAuthError::NotFound(ItemId(999)))
        ));
        assert!(matches!(
            tracker.advance(ItemId(999), outcome(50.0)),
            Err(CodeAuthError::NotFound(ItemId(999)))
        ));
    }

    #[test]
    fn test_out_of_range_complete_on_unknown_id_not_found() {
        let (mut tracker, _) = tracker_with(&["a.js"]);
        assert!(matches!(
            tracker.advance(ItemId(999), outcome(150.0)),
            Err(CodeAuthError::NotFound(ItemId(999)))
        ));
    }

    #[test]
    fn test_out_of_range_complete_on_pending_is_invalid_transition() {
        let (mut tracker, ids) = tracker_with(&["a.js"]);
        assert!(matches!(
            tracker.advance(ids[0], outcome(150.0)),
            Err(CodeAuthError::InvalidTransition {
                from: ItemStatus::Pending,
                to: ItemStatus::Completed,
                ..
            })
        ));
        assert_eq!(tracker.items()[0].status, ItemStatus::Pending);
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let (mut tracker, ids) = tracker_with(&["a.js"]);
        tracker.advance(ids[0], Transition::Begin).unwrap();
        for bad in [-1.0, 100.5, f64::NAN] {
            assert!(matches!(
                tracker.advance(ids[0], outcome(bad)),
                Err(CodeAuthError::InvalidInput(_))
            ));
        }
        assert_eq!(tracker.items()[0].status, ItemStatus::Analyzing);
        tracker.advance(ids[0], outcome(100.0)).unwrap();
        assert_eq!(tracker.items()[0].score, Some(100.0));
    }

    #[test]
    fn test_results_only_on_completed() {
        let (mut tracker, ids) = tracker_with(&["a.js", "b.py"]);
        tracker.advance(ids[0], Transition::Begin).unwrap();
        let item = tracker.get(ids[0]).unwrap();
        assert!(item.score.is_none() && item.elapsed_seconds.is_none());

        tracker
            .advance(ids[0], Transition::Fail("timeout".into()))
            .unwrap();
        let item = tracker.get(ids[0]).unwrap();
        assert!(item.score.is_none() && item.elapsed_seconds.is_none());
        assert_eq!(item.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_single_concurrency_limit() {
        let (mut tracker, ids) = tracker_with(&["a.js", "b.py"]);
        tracker.advance(ids[0], Transition::Begin).unwrap();
        assert!(matches!(
            tracker.advance(ids[1], Transition::Begin),
            Err(CodeAuthError::ConcurrencyLimit { limit: 1 })
        ));
        assert_eq!(tracker.items()[1].status, ItemStatus::Pending);

        tracker.advance(ids[0], outcome(20.0)).unwrap();
        tracker.advance(ids[1], Transition::Begin).unwrap();
    }

    #[test]
    fn test_bounded_concurrency() {
        let mut tracker = BatchProgressTracker::with_concurrency(2);
        let ids = tracker
            .enqueue(["a", "b", "c"].iter().map(|n| NewItem::new(*n, 1)))
            .unwrap();
        tracker.advance(ids[0], Transition::Begin).unwrap();
        tracker.advance(ids[1], Transition::Begin).unwrap();
        assert!(matches!(
            tracker.advance(ids[2], Transition::Begin),
            Err(CodeAuthError::ConcurrencyLimit { limit: 2 })
        ));
    }

    #[test]
    fn test_run_returns_to_idle_when_all_terminal() {
        let (mut tracker, ids) = tracker_with(&["a.js", "b.py"]);
        tracker.start_run().unwrap();

        tracker.advance(ids[0], Transition::Begin).unwrap();
        tracker.advance(ids[0], outcome(90.0)).unwrap();
        assert!(tracker.is_running());

        // 运行中入队的项不属于本次运行
        tracker.enqueue(vec![NewItem::new("late.go", 1)]).unwrap();

        tracker.advance(ids[1], Transition::Begin).unwrap();
        tracker
            .advance(ids[1], Transition::Fail("unreadable".into()))
            .unwrap();
        assert!(!tracker.is_running());

        let next = tracker.start_run().unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(tracker.get(next[0]).unwrap().name, "late.go");
    }

    #[test]
    fn test_stats_total_matches_items() {
        let (mut tracker, ids) = tracker_with(&["a.js", "b.py", "c.go"]);
        tracker.advance(ids[1], Transition::Begin).unwrap();
        tracker.advance(ids[1], outcome(30.0)).unwrap();
        tracker.advance(ids[2], Transition::Begin).unwrap();
        tracker.advance(ids[2], outcome(70.0)).unwrap();

        let stats = tracker.stats();
        assert_eq!(stats.total_count, tracker.items().len());
        assert_eq!(stats.review_count, 1);
        assert_eq!(stats.ai_count, 1);
        assert_eq!(stats.average_score, 50.0);
        assert_eq!(tracker.completed().count(), 2);
    }

    #[test]
    fn test_abort_run_marks_remaining_items_errored() {
        let (mut tracker, ids) = tracker_with(&["a.js", "b.py", "c.go"]);
        tracker.start_run().unwrap();
        tracker.advance(ids[0], Transition::Begin).unwrap();
        tracker.advance(ids[0], outcome(10.0)).unwrap();
        tracker.advance(ids[1], Transition::Begin).unwrap();

        assert_eq!(tracker.abort_run("analyzer crashed"), 2);
        assert!(!tracker.is_running());
        assert_eq!(tracker.analyzing_count(), 0);

        let items = tracker.items();
        assert_eq!(items[0].status, ItemStatus::Completed);
        for item in &items[1..] {
            assert_eq!(item.status, ItemStatus::Errored);
            assert_eq!(item.error.as_deref(), Some("analyzer crashed"));
            assert!(item.score.is_none());
        }

        let stats = tracker.stats();
        assert_eq!(stats.errored_count, 2);
        assert_eq!(stats.completed_count, 1);

        // 空闲后可再次入队并运行
        let more = tracker.enqueue([NewItem::new("d.rs", 1)]).unwrap();
        assert_eq!(tracker.start_run().unwrap(), more);
    }

    #[test]
    fn test_abort_run_when_idle_is_noop() {
        let (mut tracker, _) = tracker_with(&["a.js"]);
        assert_eq!(tracker.abort_run("nothing"), 0);
        assert_eq!(tracker.items()[0].status, ItemStatus::Pending);
    }
}
