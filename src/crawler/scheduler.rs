//! Scheduler for dispatching tasks under a concurrency and rate limit
//!
//! This module handles:
//! - FIFO queue of pending tasks in input order
//! - Global concurrency limiting via a semaphore
//! - A single "next allowed start" cursor enforcing a minimum gap between task starts
//!
//! The two limits are independent: a task starts only once it holds a worker
//! slot and the cursor has passed.

use crate::state::CrawlTask;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// A task cleared to start, holding its worker slot
pub struct ScheduledTask {
    /// The task to run
    pub task: CrawlTask,

    /// When the scheduler released the task
    pub started_at: Instant,

    /// The worker slot; released when dropped
    pub _permit: OwnedSemaphorePermit,
}

/// Scheduler owns the pending queue, the worker slots and the rate-limit cursor
///
/// It is driven by a single dispatcher loop, so the cursor needs no locking;
/// the semaphore is shared with the running workers, which release their
/// slot by dropping the permit.
pub struct Scheduler {
    /// Worker slots (at most `max_connections` tasks in flight)
    slots: Arc<Semaphore>,

    /// Maximum number of tasks in flight
    max_connections: usize,

    /// Tasks not yet started, in input order
    pending: VecDeque<CrawlTask>,

    /// Minimum gap between two task starts
    rate_limit: Duration,

    /// Earliest instant the next task may start
    next_start: Option<Instant>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_connections` - Maximum number of concurrently running tasks (at least 1)
    /// * `rate_limit` - Minimum gap between task starts; zero disables it
    /// * `tasks` - Tasks to dispatch, in the order they should start
    pub fn new(max_connections: usize, rate_limit: Duration, tasks: Vec<CrawlTask>) -> Self {
        let max_connections = max_connections.max(1);

        Self {
            slots: Arc::new(Semaphore::new(max_connections)),
            max_connections,
            pending: VecDeque::from(tasks),
            rate_limit,
            next_start: None,
        }
    }

    /// Gets the next task to start
    ///
    /// This method:
    /// 1. Returns None if no task is pending
    /// 2. Waits for a free worker slot
    /// 3. Waits until the rate-limit cursor has passed
    /// 4. Pops the oldest pending task and advances the cursor by the rate limit
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledTask)` - A task that may start now
    /// * `None` - Every task has been handed out
    pub async fn next_task(&mut self) -> Option<ScheduledTask> {
        if self.pending.is_empty() {
            return None;
        }

        let permit = self.slots.clone().acquire_owned().await.ok()?;

        if let Some(next_start) = self.next_start {
            if Instant::now() < next_start {
                tracing::trace!(
                    "Rate limit: waiting {:?} before next start. Pending: {}",
                    next_start - Instant::now(),
                    self.pending.len()
                );
                tokio::time::sleep_until(next_start).await;
            }
        }

        let task = self.pending.pop_front()?;
        let started_at = Instant::now();

        if !self.rate_limit.is_zero() {
            self.next_start = Some(started_at + self.rate_limit);
        }

        tracing::debug!("Dispatching task {}: {}", task.index, task.url);

        Some(ScheduledTask {
            task,
            started_at,
            _permit: permit,
        })
    }

    /// Returns the number of tasks not yet started
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether every task has been handed out
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the number of tasks currently holding a worker slot
    pub fn in_flight(&self) -> usize {
        self.max_connections - self.slots.available_permits()
    }

    /// Returns the configured concurrency limit
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}
