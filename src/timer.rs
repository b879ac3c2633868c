//! Wall-clock task scheduling
//!
//! Power-up spawns and effect expiries fire on wall-clock delays that are
//! not synchronized with tick boundaries. Everything runs on the caller's
//! single thread: the orchestrator polls the queue once per frame, so there
//! is no locking and no reentrancy. A generation counter invalidates every
//! outstanding handle when a session ends, so a stale callback can never
//! mutate a fresh session's state.

use crate::sim::PowerUpKind;

/// Work scheduled to fire at a wall-clock instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Periodic power-up creation; the orchestrator reschedules it on firing
    PowerUpSpawn,
    /// Revert a time-limited player modifier
    EffectExpiry(PowerUpKind),
}

/// Handle to a scheduled task. Handles from a cleared generation are duds:
/// cancelling them is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId {
    id: u64,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: u64,
    fire_at: f64,
    task: TimerTask,
}

/// Single-threaded wall-clock task queue
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    generation: u64,
    tasks: Vec<Scheduled>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire `delay` seconds after `now`.
    pub fn schedule(&mut self, task: TimerTask, now: f64, delay: f64) -> TaskId {
        self.next_id += 1;
        let id = self.next_id;
        self.tasks.push(Scheduled {
            id,
            fire_at: now + delay,
            task,
        });
        TaskId {
            id,
            generation: self.generation,
        }
    }

    /// Cancel one task. Stale handles from a cleared generation are no-ops.
    pub fn cancel(&mut self, handle: TaskId) {
        if handle.generation != self.generation {
            return;
        }
        self.tasks.retain(|t| t.id != handle.id);
    }

    /// Drop every pending task and invalidate all outstanding handles.
    /// Called atomically on session end and reset.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.tasks.clear();
    }

    /// Remove and return every task due at `now`, in firing order
    /// (schedule order breaks ties).
    pub fn poll(&mut self, now: f64) -> Vec<TimerTask> {
        if self.tasks.iter().all(|t| t.fire_at > now) {
            return Vec::new();
        }
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.fire_at <= now);
        self.tasks = pending;
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.id.cmp(&b.id)));
        due.into_iter().map(|t| t.task).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
