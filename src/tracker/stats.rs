//! # 批量统计
//!
//! 从工作项快照计算汇总统计，纯读取无副作用。
//!
//! ## 依赖关系
//! - 被 `tracker/mod.rs` 调用
//! - 使用 `models/verdict.rs` 分类

use crate::models::{ItemStatus, Verdict, WorkItem};
use serde::Serialize;

/// 批量运行汇总统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchStats {
    pub completed_count: usize,
    pub total_count: usize,
    /// 已完成项的平均分数（无完成项时为 0）
    pub average_score: f64,
    /// score < 30
    pub human_count: usize,
    /// 30 <= score < 70
    pub review_count: usize,
    /// score >= 70
    pub ai_count: usize,
    pub errored_count: usize,
    /// completed / total * 100（total 为 0 时为 0）
    pub overall_progress: f64,
}

impl BatchStats {
    pub fn from_items(items: &[WorkItem]) -> Self {
        let mut stats = BatchStats {
            total_count: items.len(),
            ..Default::default()
        };

        let mut score_sum = 0.0;
        for item in items {
            match item.status {
                ItemStatus::Completed => {
                    let score = item.score.unwrap_or(0.0);
                    stats.completed_count += 1;
                    score_sum += score;
                    match Verdict::from_score(score) {
                        Verdict::LikelyHuman => stats.human_count += 1,
                        Verdict::ReviewNeeded => stats.review_count += 1,
                        Verdict::LikelyAi => stats.ai_count += 1,
                    }
                }
                ItemStatus::Errored => stats.errored_count += 1,
                ItemStatus::Pending | ItemStatus::Analyzing => {}
            }
        }

        if stats.completed_count > 0 {
            stats.average_score = score_sum / stats.completed_count as f64;
        }
        if stats.total_count > 0 {
            stats.overall_progress =
                stats.completed_count as f64 / stats.total_count as f64 * 100.0;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemId, NewItem};

    fn completed(id: u64, score: f64) -> WorkItem {
        let mut item = WorkItem::pending(ItemId(id), NewItem::new(format!("f{}.py", id), 1));
        item.status = ItemStatus::Completed;
        item.score = Some(score);
        item.elapsed_seconds = Some(1.0);
        item
    }

    #[test]
    fn test_empty_stats() {
        let stats = BatchStats::from_items(&[]);
        assert_eq!(stats, BatchStats::default());
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.overall_progress, 0.0);
    }

    #[test]
    fn test_band_counts_and_mean() {
        let mut errored = WorkItem::pending(ItemId(9), NewItem::new("bad.go", 1));
        errored.status = ItemStatus::Errored;
        let pending = WorkItem::pending(ItemId(10), NewItem::new("later.js", 1));

        let items = vec![
            completed(1, 10.0),
            completed(2, 30.0),
            completed(3, 69.0),
            completed(4, 70.0),
            errored,
            pending,
        ];
        let stats = BatchStats::from_items(&items);

        assert_eq!(stats.total_count, 6);
        assert_eq!(stats.completed_count, 4);
        assert_eq!(stats.human_count, 1);
        assert_eq!(stats.review_count, 2);
        assert_eq!(stats.ai_count, 1);
        assert_eq!(stats.errored_count, 1);
        assert!((stats.average_score - 44.75).abs() < 1e-9);
        assert!((stats.overall_progress - 4.0 / 6.0 * 100.0).abs() < 1e-9);
    }
}
