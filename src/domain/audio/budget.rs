use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Default)]
struct BudgetState {
    /// Slots handed to foreground work beyond capacity
    debt: usize,
    /// Foreground permits currently alive
    foreground: usize,
}

/// Shared limit on concurrent provider calls.
///
/// Background prefetch waits for a free slot and never starts while any
/// foreground work is active. A foreground request never waits: if every
/// slot is busy it borrows one, and the next slot freed repays the debt
/// instead of going to prefetch.
#[derive(Debug)]
pub struct DispatchBudget {
    semaphore: Arc<Semaphore>,
    state: Mutex<BudgetState>,
    foreground_idle: Notify,
    capacity: usize,
}

impl DispatchBudget {
    pub fn new(capacity: usize) -> Arc<Self> {
        let capacity = capacity.max(1);
        Arc::new(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            state: Mutex::new(BudgetState::default()),
            foreground_idle: Notify::new(),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots free for background work right now
    pub fn available(&self) -> usize {
        let state = self.state.lock();
        if state.foreground > 0 {
            return 0;
        }
        self.semaphore.available_permits().saturating_sub(state.debt)
    }

    /// Returns immediately, borrowing a slot when none is free
    pub fn acquire_foreground(self: &Arc<Self>) -> DispatchPermit {
        let mut state = self.state.lock();
        state.foreground += 1;

        let kind = match self.semaphore.clone().try_acquire_owned() {
            Ok(permit) => PermitKind::Held(permit),
            Err(_) => {
                state.debt += 1;
                tracing::debug!(
                    capacity = self.capacity,
                    debt = state.debt,
                    "Foreground borrowed a dispatch slot"
                );
                PermitKind::Borrowed
            }
        };

        DispatchPermit {
            kind,
            foreground: Some(self.clone()),
        }
    }

    /// Waits for a slot with no foreground work in progress. Freed slots
    /// repay foreground borrowing first. `None` if the semaphore was closed.
    pub async fn acquire_background(&self) -> Option<DispatchPermit> {
        loop {
            let idle = self.foreground_idle.notified();
            if self.state.lock().foreground > 0 {
                idle.await;
                continue;
            }

            let permit = self.semaphore.clone().acquire_owned().await.ok()?;

            let mut state = self.state.lock();
            if state.debt > 0 {
                state.debt -= 1;
                permit.forget();
                continue;
            }
            if state.foreground > 0 {
                // Foreground arrived while we waited; let it run first
                continue;
            }

            return Some(DispatchPermit {
                kind: PermitKind::Held(permit),
                foreground: None,
            });
        }
    }

    fn release_foreground(&self, borrowed: bool) {
        let mut state = self.state.lock();
        state.foreground -= 1;

        if borrowed {
            if state.debt > 0 {
                state.debt -= 1;
            } else {
                self.semaphore.add_permits(1);
            }
        }

        if state.foreground == 0 {
            self.foreground_idle.notify_waiters();
        }
    }
}

#[derive(Debug)]
enum PermitKind {
    Held(#[allow(dead_code)] OwnedSemaphorePermit),
    Borrowed,
}

/// Occupies one dispatch slot until dropped
#[derive(Debug)]
pub struct DispatchPermit {
    kind: PermitKind,
    foreground: Option<Arc<DispatchBudget>>,
}

impl DispatchPermit {
    pub fn is_borrowed(&self) -> bool {
        matches!(self.kind, PermitKind::Borrowed)
    }
}

impl Drop for DispatchPermit {
    fn drop(&mut self) {
        if let Some(budget) = self.foreground.take() {
            budget.release_foreground(self.is_borrowed());
        }
    }
}
