//! # Execution Scheduling
//!
//! Groups a batch of pending tasks into a priority-ordered serial phase
//! followed by a concurrency-limited parallel phase, executes both, and
//! merges every outcome into one aggregate result.
//!
//! ## Phases
//!
//! 1. **Partition** — `group_by_priority` splits the batch: tasks whose key
//!    appears in the user's priority list run first, ordered to match that
//!    list (one task per matched name, unmatched names skipped silently);
//!    everything else keeps its original relative order.
//! 2. **Serial phase** — priority tasks run one at a time, in order. A
//!    failure is recorded and the phase continues; priority tasks always
//!    complete (success or failure) before any other task starts.
//! 3. **Parallel phase** — remaining tasks run on a dedicated pool with
//!    exactly the configured number of worker threads, so at most that many
//!    external processes are live at once. Submission follows the original
//!    order; completion order is unconstrained; collected outcomes preserve
//!    submission order.
//! 4. **Aggregate** — serial results first, then parallel results. If any
//!    outcome failed the aggregate is failed, but the complete result
//!    sequence stays available so partial successes remain inspectable.
//!
//! There is no cancellation at task granularity: a spawned process runs to
//! completion or natural failure.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::invocation::ExecutionResult;

/// A schedulable unit of work: one tool invocation or one script run.
pub trait Task: Send + Sync {
    /// Grouping key matched against `--priority` names.
    fn key(&self) -> &str;

    /// Execute the task. `Err` means the work could not start (e.g. spawn
    /// failure); a completed-but-failed tool is an `Ok` result with its
    /// success flag unset.
    fn run(&self) -> Result<ExecutionResult>;
}

/// Partition of pending tasks into the serial and parallel phases.
pub struct PriorityGrouping {
    pub priority: Vec<Box<dyn Task>>,
    pub other: Vec<Box<dyn Task>>,
}

/// Split `tasks` by the user-supplied priority name list.
///
/// Priority tasks are ordered to match `names`; duplicate and unknown names
/// are ignored. With an empty name list every task stays in `other`, in its
/// original order.
pub fn group_by_priority(tasks: Vec<Box<dyn Task>>, names: &[String]) -> PriorityGrouping {
    let mut slots: Vec<Option<Box<dyn Task>>> = tasks.into_iter().map(Some).collect();
    let mut priority = Vec::new();

    for name in names {
        let matched = slots.iter_mut().find(|slot| {
            slot.as_ref()
                .map(|task| task.key() == name)
                .unwrap_or(false)
        });
        if let Some(slot) = matched {
            priority.push(slot.take().expect("slot checked above"));
        }
    }

    PriorityGrouping {
        priority,
        other: slots.into_iter().flatten().collect(),
    }
}

/// Merged outcome of a scheduled batch.
#[derive(Debug, Default)]
pub struct AggregateResult {
    /// Every completed invocation, serial phase first, each phase in
    /// submission order.
    pub results: Vec<ExecutionResult>,
    /// Spawn-level errors for tasks that never produced a result.
    pub errors: Vec<Error>,
}

impl AggregateResult {
    fn record(&mut self, outcome: Result<ExecutionResult>) {
        match outcome {
            Ok(result) => self.results.push(result),
            Err(err) => self.errors.push(err),
        }
    }

    /// Number of scheduled tasks, completed or not.
    pub fn total(&self) -> usize {
        self.results.len() + self.errors.len()
    }

    /// Count of failed outcomes (spawn errors plus non-zero exits).
    pub fn failure_count(&self) -> usize {
        let failed_results = self
            .results
            .iter()
            .filter(|result| !result.success)
            .count();
        failed_results + self.errors.len()
    }

    /// Whether any outcome in the batch failed.
    pub fn failed(&self) -> bool {
        self.failure_count() > 0
    }

    /// Raise the distinct execution-failure condition when any outcome
    /// failed. The result sequence remains available on `self` either way.
    pub fn ensure_success(&self) -> Result<()> {
        if self.failed() {
            return Err(Error::ExecutionFailure {
                failures: self.failure_count(),
                total: self.total(),
            });
        }
        Ok(())
    }
}

/// Priority/parallelism scheduler for a batch of tasks.
pub struct ExecutionScheduler {
    concurrency: usize,
}

impl ExecutionScheduler {
    /// `concurrency` bounds the parallel phase; it is clamped to at least 1.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Run the batch through both phases.
    ///
    /// Only pool construction can fail here; per-task failures are collected
    /// into the aggregate, never propagated early.
    pub fn schedule(
        &self,
        tasks: Vec<Box<dyn Task>>,
        priority_names: &[String],
    ) -> Result<AggregateResult> {
        let grouping = group_by_priority(tasks, priority_names);
        let mut aggregate = AggregateResult::default();

        // Serial phase: strict one-at-a-time, failures recorded, never
        // aborting the phase.
        for task in &grouping.priority {
            log::debug!("Running priority task {}", task.key());
            aggregate.record(task.run());
        }

        // Parallel phase: bounded pool, submission order preserved in the
        // collected outcomes.
        if !grouping.other.is_empty() {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.concurrency)
                .build()
                .map_err(|err| Error::Scheduler {
                    message: err.to_string(),
                })?;

            let outcomes: Vec<Result<ExecutionResult>> =
                pool.install(|| grouping.other.par_iter().map(|task| task.run()).collect());

            for outcome in outcomes {
                aggregate.record(outcome);
            }
        }

        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Scripted task: records its start, optionally sleeps, returns a
    /// scripted exit code or spawn error.
    struct ScriptedTask {
        key: String,
        exit_code: i32,
        spawn_error: bool,
        sleep: Duration,
        starts: Arc<Mutex<Vec<(String, Instant)>>>,
        live: Arc<AtomicUsize>,
        max_live: Arc<AtomicUsize>,
    }

    impl ScriptedTask {
        fn ok(key: &str, starts: &Arc<Mutex<Vec<(String, Instant)>>>) -> Box<dyn Task> {
            Self::with_exit(key, 0, starts)
        }

        fn with_exit(
            key: &str,
            exit_code: i32,
            starts: &Arc<Mutex<Vec<(String, Instant)>>>,
        ) -> Box<dyn Task> {
            Box::new(Self {
                key: key.to_string(),
                exit_code,
                spawn_error: false,
                sleep: Duration::ZERO,
                starts: starts.clone(),
                live: Arc::new(AtomicUsize::new(0)),
                max_live: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    impl Task for ScriptedTask {
        fn key(&self) -> &str {
            &self.key
        }

        fn run(&self) -> Result<ExecutionResult> {
            self.starts
                .lock()
                .unwrap()
                .push((self.key.clone(), Instant::now()));

            let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_live.fetch_max(live, Ordering::SeqCst);
            if !self.sleep.is_zero() {
                std::thread::sleep(self.sleep);
            }
            self.live.fetch_sub(1, Ordering::SeqCst);

            if self.spawn_error {
                return Err(Error::DriverExecution {
                    driver: self.key.clone(),
                    message: "spawn failed".to_string(),
                });
            }

            Ok(ExecutionResult {
                key: self.key.clone(),
                exit_code: self.exit_code,
                success: self.exit_code == 0,
                stdout: String::new(),
                stderr: String::new(),
                elapsed: Duration::ZERO,
            })
        }
    }

    fn starts() -> Arc<Mutex<Vec<(String, Instant)>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn keys(tasks: &[Box<dyn Task>]) -> Vec<&str> {
        tasks.iter().map(|task| task.key()).collect()
    }

    fn fixture(starts: &Arc<Mutex<Vec<(String, Instant)>>>) -> Vec<Box<dyn Task>> {
        ["primary", "foo", "bar", "baz", "qux"]
            .iter()
            .map(|key| ScriptedTask::ok(key, starts))
            .collect()
    }

    #[test]
    fn test_grouping_extracts_priority_in_list_order() {
        let starts = starts();
        let names = vec!["qux".to_string(), "foo".to_string()];
        let grouping = group_by_priority(fixture(&starts), &names);

        assert_eq!(keys(&grouping.priority), vec!["qux", "foo"]);
        assert_eq!(keys(&grouping.other), vec!["primary", "bar", "baz"]);
    }

    #[test]
    fn test_grouping_without_priority_names() {
        let starts = starts();
        let grouping = group_by_priority(fixture(&starts), &[]);

        assert!(grouping.priority.is_empty());
        assert_eq!(
            keys(&grouping.other),
            vec!["primary", "foo", "bar", "baz", "qux"]
        );
    }

    #[test]
    fn test_grouping_ignores_unknown_and_duplicate_names() {
        let starts = starts();
        let names = vec![
            "qux".to_string(),
            "ghost".to_string(),
            "qux".to_string(),
            "foo".to_string(),
        ];
        let grouping = group_by_priority(fixture(&starts), &names);

        assert_eq!(keys(&grouping.priority), vec!["qux", "foo"]);
        assert_eq!(keys(&grouping.other), vec!["primary", "bar", "baz"]);
    }

    #[test]
    fn test_schedule_merges_serial_then_parallel_in_order() {
        let starts = starts();
        let scheduler = ExecutionScheduler::new(2);
        let names = vec!["qux".to_string(), "foo".to_string()];

        let aggregate = scheduler.schedule(fixture(&starts), &names).unwrap();

        let result_keys: Vec<&str> = aggregate
            .results
            .iter()
            .map(|result| result.key.as_str())
            .collect();
        assert_eq!(result_keys, vec!["qux", "foo", "primary", "bar", "baz"]);
        assert!(!aggregate.failed());
        assert!(aggregate.ensure_success().is_ok());
    }

    #[test]
    fn test_serial_failure_does_not_stop_the_phase() {
        let starts = starts();
        let tasks: Vec<Box<dyn Task>> = vec![
            ScriptedTask::with_exit("first", 1, &starts),
            ScriptedTask::ok("second", &starts),
        ];
        let names = vec!["first".to_string(), "second".to_string()];

        let aggregate = ExecutionScheduler::new(1).schedule(tasks, &names).unwrap();

        assert_eq!(aggregate.results.len(), 2);
        assert!(!aggregate.results[0].success);
        assert!(aggregate.results[1].success);
    }

    #[test]
    fn test_aggregate_failure_keeps_full_result_set() {
        let starts = starts();
        let tasks: Vec<Box<dyn Task>> = vec![
            ScriptedTask::ok("a", &starts),
            ScriptedTask::with_exit("b", 2, &starts),
            ScriptedTask::ok("c", &starts),
        ];

        let aggregate = ExecutionScheduler::new(2).schedule(tasks, &[]).unwrap();

        assert_eq!(aggregate.results.len(), 3);
        assert!(aggregate.failed());
        assert_eq!(aggregate.failure_count(), 1);
        match aggregate.ensure_success() {
            Err(Error::ExecutionFailure { failures, total }) => {
                assert_eq!(failures, 1);
                assert_eq!(total, 3);
            }
            other => panic!("expected ExecutionFailure, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_spawn_errors_collected_without_aborting_siblings() {
        let starts = starts();
        let mut tasks: Vec<Box<dyn Task>> = vec![
            ScriptedTask::ok("a", &starts),
            ScriptedTask::ok("c", &starts),
        ];
        tasks.insert(
            1,
            Box::new(ScriptedTask {
                key: "b".to_string(),
                exit_code: 0,
                spawn_error: true,
                sleep: Duration::ZERO,
                starts: starts.clone(),
                live: Arc::new(AtomicUsize::new(0)),
                max_live: Arc::new(AtomicUsize::new(0)),
            }),
        );

        let aggregate = ExecutionScheduler::new(2).schedule(tasks, &[]).unwrap();

        assert_eq!(aggregate.results.len(), 2);
        assert_eq!(aggregate.errors.len(), 1);
        assert_eq!(aggregate.total(), 3);
        assert!(aggregate.failed());
    }

    #[test]
    fn test_priority_tasks_complete_before_parallel_phase_starts() {
        let starts = starts();
        let tasks: Vec<Box<dyn Task>> = ["gate", "slow-a", "slow-b", "slow-c"]
            .iter()
            .map(|key| -> Box<dyn Task> {
                Box::new(ScriptedTask {
                    key: key.to_string(),
                    exit_code: 0,
                    spawn_error: false,
                    sleep: Duration::from_millis(10),
                    starts: starts.clone(),
                    live: Arc::new(AtomicUsize::new(0)),
                    max_live: Arc::new(AtomicUsize::new(0)),
                })
            })
            .collect();

        ExecutionScheduler::new(3)
            .schedule(tasks, &["gate".to_string()])
            .unwrap();

        let recorded = starts.lock().unwrap();
        let gate_start = recorded
            .iter()
            .find(|(key, _)| key == "gate")
            .map(|(_, at)| *at)
            .unwrap();
        for (key, at) in recorded.iter() {
            if key != "gate" {
                // Serial phase ran to completion (including its 10ms sleep)
                // before any parallel task started.
                assert!(
                    *at >= gate_start + Duration::from_millis(10),
                    "{} started before the priority task finished",
                    key
                );
            }
        }
    }

    #[test]
    fn test_parallel_phase_respects_concurrency_limit() {
        let starts = starts();
        let live = Arc::new(AtomicUsize::new(0));
        let max_live = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<Box<dyn Task>> = (0..6)
            .map(|index| -> Box<dyn Task> {
                Box::new(ScriptedTask {
                    key: format!("task-{}", index),
                    exit_code: 0,
                    spawn_error: false,
                    sleep: Duration::from_millis(15),
                    starts: starts.clone(),
                    live: live.clone(),
                    max_live: max_live.clone(),
                })
            })
            .collect();

        ExecutionScheduler::new(2).schedule(tasks, &[]).unwrap();

        assert!(
            max_live.load(Ordering::SeqCst) <= 2,
            "more than two tasks were live at once"
        );
    }

    #[test]
    fn test_concurrency_clamped_to_one() {
        let starts = starts();
        let tasks: Vec<Box<dyn Task>> = vec![ScriptedTask::ok("only", &starts)];
        let aggregate = ExecutionScheduler::new(0).schedule(tasks, &[]).unwrap();
        assert_eq!(aggregate.results.len(), 1);
    }

    #[test]
    fn test_empty_batch() {
        let aggregate = ExecutionScheduler::new(2).schedule(Vec::new(), &[]).unwrap();
        assert_eq!(aggregate.total(), 0);
        assert!(!aggregate.failed());
        assert!(aggregate.ensure_success().is_ok());
    }
}
