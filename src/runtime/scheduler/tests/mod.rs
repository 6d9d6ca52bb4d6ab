//! Scheduler 单元测试
//!
//! 测试任务标识、任务状态、队列配置与统计


use crate::runtime::scheduler::{QueueConfig, QueueStats, TaskId, TaskIdGenerator, TaskState};
use std::sync::atomic::Ordering;

#[cfg(test)]
mod task_id_tests {
    use super::*;

    #[test]
    fn test_task_id_display() {
        assert_eq!(TaskId(5).to_string(), "Task(5)");
    }

    #[test]
    fn test_task_id_generator_is_sequential() {
        let ids = TaskIdGenerator::new();
        assert_eq!(ids.generate(), TaskId(0));
        assert_eq!(ids.generate(), TaskId(1));
        assert_eq!(ids.generate(), TaskId(2));
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_queue_config_default() {
        let config = QueueConfig::default();
        assert_eq!(config.name, "tasks");
        assert!(config.log_rejections);
    }

    #[test]
    fn test_queue_config_named() {
        let config = QueueConfig::named("mail");
        assert_eq!(config.name, "mail");
        assert!(config.log_rejections);
    }

    #[test]
    fn test_queue_config_missing_fields_use_defaults() {
        let config: QueueConfig = serde_json::from_str(r#"{"log_rejections": false}"#).unwrap();
        assert_eq!(config.name, "tasks");
        assert!(!config.log_rejections);
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_stats_counts_finished_tasks() {
        let stats = QueueStats::default();
        stats.record_submitted();
        stats.record_submitted();
        stats.record_submitted();
        stats.record_finished(TaskState::Fulfilled);
        stats.record_finished(TaskState::Rejected);

        assert_eq!(stats.submitted.load(Ordering::SeqCst), 3);
        assert_eq!(stats.fulfilled.load(Ordering::SeqCst), 1);
        assert_eq!(stats.rejected.load(Ordering::SeqCst), 1);
        assert_eq!(stats.in_queue(), 1);
    }

    #[test]
    fn test_stats_ignore_unfinished_states() {
        let stats = QueueStats::default();
        stats.record_finished(TaskState::Queued);
        stats.record_finished(TaskState::Running);
        assert_eq!(stats.fulfilled.load(Ordering::SeqCst), 0);
        assert_eq!(stats.rejected.load(Ordering::SeqCst), 0);
    }
}
