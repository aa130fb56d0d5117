use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

use super::{RenderJob, RetryPolicy, TaskId, TaskState, TaskStatus};
use crate::renderer::TattooRenderer;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Task '{0}' already exists")]
    DuplicateTask(TaskId),
    #[error("Dispatcher is shut down")]
    ShutDown,
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Number of worker threads
    pub workers: usize,
    pub retry: RetryPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
            retry: RetryPolicy::default(),
        }
    }
}

struct Queued {
    id: TaskId,
    job: RenderJob,
}

/// A retry waiting out its backoff.
struct Delayed {
    not_before: Instant,
    /// Submission order, so retries due at the same instant stay FIFO
    seq: u64,
    queued: Queued,
}

impl Delayed {
    fn key(&self) -> (Instant, u64) {
        (self.not_before, self.seq)
    }
}

impl PartialEq for Delayed {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Delayed {}

impl PartialOrd for Delayed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delayed {
    // Reversed so the max-heap pops the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Jobs ready to run plus retries that are not due yet.
#[derive(Default)]
struct JobQueue {
    ready: VecDeque<Queued>,
    delayed: BinaryHeap<Delayed>,
    next_seq: u64,
    closed: bool,
}

impl JobQueue {
    /// Move every retry whose deadline has passed onto the ready queue.
    fn promote_due(&mut self, now: Instant) {
        while self
            .delayed
            .peek()
            .is_some_and(|delayed| delayed.not_before <= now)
        {
            if let Some(delayed) = self.delayed.pop() {
                self.ready.push_back(delayed.queued);
            }
        }
    }
}

enum Next {
    Run(Queued),
    /// Closed: the retries still waiting are handed back to be revoked
    Exit(Vec<Queued>),
}

/// State shared between the handle and its workers.
struct Shared {
    renderer: TattooRenderer,
    retry: RetryPolicy,
    statuses: Mutex<HashMap<TaskId, TaskStatus>>,
    /// Signalled whenever any task changes state
    changed: Condvar,
    queue: Mutex<JobQueue>,
    /// Signalled when work is queued or the dispatcher closes
    work: Condvar,
}

impl Shared {
    fn statuses(&self) -> MutexGuard<'_, HashMap<TaskId, TaskStatus>> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue(&self) -> MutexGuard<'_, JobQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to a task's status and wake any waiters.
    fn update<R>(&self, id: &str, f: impl FnOnce(&mut TaskStatus) -> R) -> Option<R> {
        let result = self.statuses().get_mut(id).map(f);
        self.changed.notify_all();
        result
    }

    /// Queue a retry that becomes runnable once `delay` has passed.
    fn schedule_retry(&self, queued: Queued, delay: Duration) {
        let mut queue = self.queue();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        queue.delayed.push(Delayed {
            not_before: Instant::now() + delay,
            seq,
            queued,
        });
        drop(queue);
        self.work.notify_one();
    }

    /// Block until a job is runnable or the dispatcher closes.
    ///
    /// After closing, ready jobs still drain but pending retries do not.
    fn next_job(&self) -> Next {
        let mut queue = self.queue();
        loop {
            queue.promote_due(Instant::now());
            if let Some(queued) = queue.ready.pop_front() {
                // Hand the retry timer to an idle worker while this one is busy
                if !queue.delayed.is_empty() {
                    self.work.notify_one();
                }
                return Next::Run(queued);
            }
            if queue.closed {
                let abandoned = std::mem::take(&mut queue.delayed)
                    .into_iter()
                    .map(|delayed| delayed.queued)
                    .collect();
                return Next::Exit(abandoned);
            }

            let deadline = queue.delayed.peek().map(|delayed| delayed.not_before);
            queue = match deadline {
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    self.work
                        .wait_timeout(queue, timeout)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .work
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }
}

/// Runs render jobs on a pool of worker threads.
///
/// Each task moves through [`TaskState`]; failures are retried according to
/// the configured [`RetryPolicy`] and the last error message is kept verbatim
/// for pollers. A task waiting out its retry backoff does not occupy a worker.
pub struct Dispatcher {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn start(renderer: TattooRenderer, config: DispatcherConfig) -> Self {
        let shared = Arc::new(Shared {
            renderer,
            retry: config.retry,
            statuses: Mutex::new(HashMap::new()),
            changed: Condvar::new(),
            queue: Mutex::new(JobQueue::default()),
            work: Condvar::new(),
        });

        let workers = (0..config.workers.max(1))
            .map(|index| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("render-worker-{index}"))
                    .spawn(move || worker_loop(&shared))
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::error!("Failed to spawn render worker: {}", e);
                    None
                }
            })
            .collect::<Vec<_>>();

        log::info!("Dispatcher started with {} workers", workers.len());

        Self { shared, workers }
    }

    /// Queue a job under `id`. The task starts out [`TaskState::Pending`].
    pub fn submit(&self, id: impl Into<TaskId>, job: RenderJob) -> Result<(), DispatchError> {
        let id = id.into();
        let mut queue = self.shared.queue();
        if queue.closed {
            return Err(DispatchError::ShutDown);
        }

        {
            let mut statuses = self.shared.statuses();
            if statuses.contains_key(&id) {
                return Err(DispatchError::DuplicateTask(id));
            }
            statuses.insert(id.clone(), TaskStatus::new(id.clone()));
        }

        queue.ready.push_back(Queued { id: id.clone(), job });
        drop(queue);
        self.shared.work.notify_one();

        log::debug!("Task {} queued", id);
        Ok(())
    }

    pub fn status(&self, id: &str) -> Option<TaskStatus> {
        self.shared.statuses().get(id).cloned()
    }

    /// Cancel a task that is not currently running.
    ///
    /// Returns `true` if the task was pending or waiting to retry and is now
    /// revoked. A running or finished task is left alone.
    pub fn revoke(&self, id: &str) -> bool {
        let revoked = self
            .shared
            .update(id, |status| {
                status.state.can_transition_to(TaskState::Revoked)
                    && status.transition(TaskState::Revoked)
            })
            .unwrap_or(false);
        if revoked {
            log::info!("Task {} revoked", id);
        }
        revoked
    }

    /// Block until the task reaches a terminal state or `timeout` elapses,
    /// then return its latest status.
    pub fn wait(&self, id: &str, timeout: Duration) -> Option<TaskStatus> {
        let deadline = Instant::now() + timeout;
        let mut statuses = self.shared.statuses();
        loop {
            let status = statuses.get(id)?;
            if status.state.is_terminal() {
                return Some(status.clone());
            }
            let now = Instant::now();
            if now >= deadline {
                return Some(status.clone());
            }
            statuses = self
                .shared
                .changed
                .wait_timeout(statuses, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Stop accepting work, let queued jobs finish, and join the workers.
    ///
    /// Tasks still waiting out a retry backoff are revoked instead of run.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.shared.queue().closed = true;
        self.shared.work.notify_all();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("Render worker panicked");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        match shared.next_job() {
            Next::Run(queued) => run_task(shared, queued),
            Next::Exit(abandoned) => {
                for Queued { id, .. } in abandoned {
                    let revoked = shared
                        .update(&id, |status| status.transition(TaskState::Revoked))
                        .unwrap_or(false);
                    if revoked {
                        log::info!("Task {} revoked at shutdown while awaiting retry", id);
                    }
                }
                break;
            }
        }
    }
}

/// Run one attempt; a retryable failure goes back on the queue.
fn run_task(shared: &Shared, queued: Queued) {
    let id = queued.id.as_str();
    let attempt = shared.update(id, |status| {
        if status.transition(TaskState::Started) {
            status.attempts += 1;
            Some(status.attempts)
        } else {
            None
        }
    });
    let Some(Some(attempt)) = attempt else {
        log::debug!("Task {} skipped: no longer runnable", id);
        return;
    };

    let job = &queued.job;
    match shared
        .renderer
        .render(&job.text, &job.font_path, job.color, job.size)
    {
        Ok(artifact) => {
            shared.update(id, |status| {
                status.transition(TaskState::Success);
                status.artifact = Some(artifact);
            });
        }
        Err(e) => {
            let retry = attempt <= shared.retry.max_retries;
            let message = e.to_string();
            let kind = e.kind();
            shared.update(id, |status| {
                status.error = Some(message.clone());
                status.error_kind = Some(kind);
                status.transition(if retry {
                    TaskState::Retry
                } else {
                    TaskState::Failure
                });
            });

            if !retry {
                log::error!(
                    "Task {} failed after {} attempts: {}",
                    id,
                    attempt,
                    message
                );
                return;
            }

            let delay = shared.retry.delay_for(attempt);
            log::warn!(
                "Task {} attempt {} failed ({}), retrying in {:?}",
                id,
                attempt,
                message,
                delay
            );
            shared.schedule_retry(queued, delay);
        }
    }
}
