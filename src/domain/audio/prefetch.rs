use super::budget::DispatchBudget;
use super::cache::{AudioCache, EntryStatus};
use super::key::CacheKey;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const JOB_HISTORY_LIMIT: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefetchPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Returned by `schedule`; cancelling it stops any not-yet-dispatched keys
#[derive(Debug, Clone)]
pub struct PrefetchHandle {
    id: Uuid,
    cancel: CancellationToken,
}

impl PrefetchHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Drained,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefetchJobStatus {
    pub job_id: Uuid,
    pub priority: PrefetchPriority,
    pub total: usize,
    pub dispatched: usize,
    pub skipped: usize,
    pub remaining: usize,
    pub state: JobState,
}

struct PrefetchJob {
    id: Uuid,
    priority: PrefetchPriority,
    sequence: u64,
    keys: VecDeque<CacheKey>,
    cancel: CancellationToken,
    total: usize,
    dispatched: usize,
    skipped: usize,
}

impl PrefetchJob {
    fn status(&self, state: JobState) -> PrefetchJobStatus {
        PrefetchJobStatus {
            job_id: self.id,
            priority: self.priority,
            total: self.total,
            dispatched: self.dispatched,
            skipped: self.skipped,
            remaining: self.keys.len(),
            state,
        }
    }
}

#[derive(Default)]
struct JobQueue {
    jobs: Vec<PrefetchJob>,
    history: VecDeque<PrefetchJobStatus>,
    next_sequence: u64,
}

impl JobQueue {
    fn retire(&mut self, status: PrefetchJobStatus) {
        tracing::debug!(
            job_id = %status.job_id,
            state = ?status.state,
            dispatched = status.dispatched,
            skipped = status.skipped,
            "Prefetch job retired"
        );
        self.history.push_back(status);
        while self.history.len() > JOB_HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    fn prune_cancelled(&mut self) {
        let (cancelled, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.jobs)
            .into_iter()
            .partition(|job| job.cancel.is_cancelled());
        self.jobs = live;

        for job in cancelled {
            self.retire(job.status(JobState::Cancelled));
        }
    }
}

struct CoordinatorInner {
    cache: Arc<AudioCache>,
    budget: Arc<DispatchBudget>,
    queue: Mutex<JobQueue>,
    wakeup: Notify,
}

impl CoordinatorInner {
    fn has_work(&self) -> bool {
        let mut queue = self.queue.lock();
        queue.prune_cancelled();
        !queue.jobs.is_empty()
    }

    /// Pop the next key that still needs synthesis, walking jobs in
    /// priority order. Keys already ready or in flight are skipped.
    fn next_dispatch(&self) -> Option<(Uuid, CacheKey)> {
        let mut queue = self.queue.lock();
        queue.prune_cancelled();

        while let Some(job) = queue.jobs.first_mut() {
            while let Some(key) = job.keys.pop_front() {
                match self.cache.status(&key) {
                    Some(EntryStatus::Ready) | Some(EntryStatus::Pending) => {
                        job.skipped += 1;
                    }
                    _ => {
                        job.dispatched += 1;
                        return Some((job.id, key));
                    }
                }
            }

            let drained = queue.jobs.remove(0);
            queue.retire(drained.status(JobState::Drained));
        }

        None
    }
}

/// Warms the audio cache in the background.
///
/// Jobs run highest priority first, oldest first within a priority, and
/// each job's keys go out in the order given. At most `budget.capacity()`
/// syntheses are in flight at once, shared with foreground playback.
pub struct PrefetchCoordinator {
    inner: Arc<CoordinatorInner>,
    shutdown: CancellationToken,
}

impl PrefetchCoordinator {
    pub fn new(cache: Arc<AudioCache>, budget: Arc<DispatchBudget>) -> Self {
        let inner = Arc::new(CoordinatorInner {
            cache,
            budget,
            queue: Mutex::new(JobQueue::default()),
            wakeup: Notify::new(),
        });
        let shutdown = CancellationToken::new();

        tokio::spawn(run_dispatch_loop(inner.clone(), shutdown.clone()));

        Self { inner, shutdown }
    }

    pub fn schedule(&self, keys: Vec<CacheKey>, priority: PrefetchPriority) -> PrefetchHandle {
        let handle = PrefetchHandle {
            id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
        };

        {
            let mut queue = self.inner.queue.lock();
            let sequence = queue.next_sequence;
            queue.next_sequence += 1;

            let job = PrefetchJob {
                id: handle.id,
                priority,
                sequence,
                total: keys.len(),
                keys: keys.into(),
                cancel: handle.cancel.clone(),
                dispatched: 0,
                skipped: 0,
            };

            tracing::info!(
                job_id = %job.id,
                priority = ?priority,
                total = job.total,
                "Prefetch job scheduled"
            );

            queue.jobs.push(job);
            queue
                .jobs
                .sort_by_key(|job| (Reverse(job.priority), job.sequence));
        }

        self.inner.wakeup.notify_one();
        handle
    }

    pub fn cancel(&self, handle: &PrefetchHandle) {
        handle.cancel();
        tracing::info!(job_id = %handle.id, "Prefetch job cancelled");
        self.inner.wakeup.notify_one();
    }

    /// Returns false when no queued job has this id
    pub fn cancel_job(&self, job_id: Uuid) -> bool {
        let token = self
            .inner
            .queue
            .lock()
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .map(|job| job.cancel.clone());

        match token {
            Some(token) => {
                token.cancel();
                tracing::info!(job_id = %job_id, "Prefetch job cancelled");
                self.inner.wakeup.notify_one();
                true
            }
            None => false,
        }
    }

    pub fn job_status(&self, job_id: Uuid) -> Option<PrefetchJobStatus> {
        let queue = self.inner.queue.lock();

        if let Some(job) = queue.jobs.iter().find(|job| job.id == job_id) {
            let state = if job.cancel.is_cancelled() {
                JobState::Cancelled
            } else {
                JobState::Queued
            };
            return Some(job.status(state));
        }

        queue
            .history
            .iter()
            .rev()
            .find(|status| status.job_id == job_id)
            .cloned()
    }
}

impl Drop for PrefetchCoordinator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_dispatch_loop(inner: Arc<CoordinatorInner>, shutdown: CancellationToken) {
    tracing::debug!(
        capacity = inner.budget.capacity(),
        "Prefetch dispatcher started"
    );

    loop {
        // Register interest before checking so a schedule in between is not missed
        let notified = inner.wakeup.notified();
        if !inner.has_work() {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = notified => continue,
            }
        }

        let permit = tokio::select! {
            _ = shutdown.cancelled() => break,
            permit = inner.budget.acquire_background() => match permit {
                Some(permit) => permit,
                None => break,
            },
        };

        let Some((job_id, key)) = inner.next_dispatch() else {
            continue;
        };

        tracing::debug!(job_id = %job_id, key = %key, "Prefetch dispatch");

        let cache = inner.cache.clone();
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(e) = cache.resolve(&key).await {
                tracing::warn!(
                    job_id = %job_id,
                    key = %key,
                    error = %e,
                    kind = e.kind(),
                    "Prefetch synthesis failed"
                );
            }
        });
    }

    tracing::debug!("Prefetch dispatcher stopped");
}
