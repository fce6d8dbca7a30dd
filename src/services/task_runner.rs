use place_dither::{Phase, Progress, QuantizeError};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::TaskError;

/// Kinds of background work; each kind has its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Adjust,
    Dither,
}

impl TaskKind {
    fn index(self) -> usize {
        match self {
            TaskKind::Adjust => 0,
            TaskKind::Dither => 1,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskKind::Adjust => "adjust",
            TaskKind::Dither => "dither",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// No job, or the last job has been delivered
    Idle,
    /// A job was dispatched and its result is awaited
    Processing,
}

/// What a submission resolves to when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    /// A newer submission of the same kind replaced this one; its result
    /// was discarded.
    Superseded,
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }
}

#[derive(Debug)]
struct SlotState {
    generation: u64,
    state: TaskState,
}

/// One task kind's bookkeeping.
///
/// `delivery` is held while a progress event reaches the caller's sink and
/// while `submit` bumps the generation, so no event from a superseded job
/// can slip past the bump. `state` is only ever held briefly and never
/// while user code runs, so a sink may query [`TaskRunner::state`].
#[derive(Debug)]
struct Slot {
    state: Mutex<SlotState>,
    delivery: Mutex<()>,
}

impl Slot {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                generation: 0,
                state: TaskState::Idle,
            }),
            delivery: Mutex::new(()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn generation(&self) -> u64 {
        self.state().generation
    }

    /// Start a new generation; any older job is cancelled from here on.
    fn bump(&self, next: TaskState) -> (u64, Option<u64>) {
        let _delivery = self.delivery();
        let mut guard = self.state();
        let previous = (guard.state == TaskState::Processing).then_some(guard.generation);
        guard.generation += 1;
        guard.state = next;
        (guard.generation, previous)
    }
}

/// Runs CPU-bound jobs off the async runtime with cancel-and-replace
/// semantics per [`TaskKind`].
///
/// Submitting a job while another of the same kind is still running
/// supersedes the old one: it stops at its next scan line, none of its
/// progress is forwarded after that point, and its submitter receives
/// [`Outcome::Superseded`]. Jobs of different kinds never affect each other.
///
/// Dropping a `submit` future before it resolves cancels its job the same
/// way and returns the slot to [`TaskState::Idle`].
#[derive(Debug)]
pub struct TaskRunner {
    slots: [Arc<Slot>; 2],
}

impl TaskRunner {
    pub fn new() -> Self {
        Self {
            slots: [Arc::new(Slot::new()), Arc::new(Slot::new())],
        }
    }

    pub fn state(&self, kind: TaskKind) -> TaskState {
        self.slots[kind.index()].state().state
    }

    /// Run `job` on the blocking pool and wait for it.
    ///
    /// The job owns everything it captures (pixel buffers are moved in) and
    /// reports through the `&mut dyn Progress` it is handed. Progress events
    /// go to `sink` until the job is superseded.
    pub async fn submit<T, F, S>(
        &self,
        kind: TaskKind,
        sink: S,
        job: F,
    ) -> Result<Outcome<T>, TaskError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Progress) -> Result<T, QuantizeError> + Send + 'static,
        S: FnMut(Phase, u8) + Send + 'static,
    {
        let slot = self.slots[kind.index()].clone();
        let (generation, superseded) = slot.bump(TaskState::Processing);
        if let Some(superseded) = superseded {
            tracing::debug!(%kind, superseded, "Superseding running task");
        }
        tracing::debug!(%kind, generation, "Submitted task");

        let mut pending = Pending {
            slot: slot.clone(),
            generation,
            kind,
            armed: true,
        };
        let mut ticket = Ticket {
            slot: slot.clone(),
            generation,
            sink,
        };
        let joined = tokio::task::spawn_blocking(move || job(&mut ticket)).await;
        pending.armed = false;

        {
            let mut guard = slot.state();
            if guard.generation != generation {
                tracing::debug!(%kind, generation, "Discarding superseded result");
                return Ok(Outcome::Superseded);
            }
            guard.state = TaskState::Idle;
        }

        match joined {
            Ok(Ok(value)) => Ok(Outcome::Completed(value)),
            // Only a generation change cancels a ticket.
            Ok(Err(QuantizeError::Cancelled)) => Ok(Outcome::Superseded),
            Ok(Err(source)) => Err(TaskError::Failed { kind, source }),
            Err(e) if e.is_panic() => {
                let payload = e.into_panic();
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::warn!(%kind, %message, "Task panicked");
                Err(TaskError::Panicked { kind, message })
            }
            Err(_) => Err(TaskError::Aborted { kind }),
        }
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancels the job of a `submit` future that is dropped before it resolves.
struct Pending {
    slot: Arc<Slot>,
    generation: u64,
    kind: TaskKind,
    armed: bool,
}

impl Drop for Pending {
    fn drop(&mut self) {
        if !self.armed || self.slot.generation() != self.generation {
            return;
        }
        let _delivery = self.slot.delivery();
        let mut guard = self.slot.state();
        // A newer submission may have won the race for the locks.
        if guard.generation == self.generation {
            guard.generation += 1;
            guard.state = TaskState::Idle;
            tracing::debug!(
                kind = %self.kind,
                generation = self.generation,
                "Submitter gone, cancelling task"
            );
        }
    }
}

/// Progress handle given to a running job.
///
/// Forwarding holds the slot's delivery lock, which `submit` also takes to
/// bump the generation, so once a newer job is submitted the old one can no
/// longer reach its sink.
struct Ticket<S> {
    slot: Arc<Slot>,
    generation: u64,
    sink: S,
}

impl<S: FnMut(Phase, u8)> Progress for Ticket<S> {
    fn report(&mut self, phase: Phase, percent: u8) {
        let _delivery = self.slot.delivery();
        if self.slot.generation() == self.generation {
            (self.sink)(phase, percent);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.slot.generation() != self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completed_job_returns_to_idle() {
        let runner = TaskRunner::new();
        let outcome = runner
            .submit(TaskKind::Adjust, |_, _| {}, |_| Ok(7))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Completed(7));
        assert_eq!(runner.state(TaskKind::Adjust), TaskState::Idle);
    }

    #[tokio::test]
    async fn test_progress_is_forwarded() {
        let runner = TaskRunner::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        runner
            .submit(
                TaskKind::Dither,
                move |phase, pct| sink_seen.lock().unwrap().push((phase, pct)),
                |progress| {
                    progress.report(Phase::Dither, 0);
                    progress.report(Phase::Dither, 100);
                    Ok(())
                },
            )
            .await
            .unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(Phase::Dither, 0), (Phase::Dither, 100)]
        );
    }

    #[tokio::test]
    async fn test_job_error_is_reported_and_slot_recovers() {
        let runner = TaskRunner::new();
        let result: Result<Outcome<()>, _> = runner
            .submit(TaskKind::Dither, |_, _| {}, |_| {
                Err(QuantizeError::Buffer(place_dither::BufferError::ZeroDimension {
                    width: 0,
                    height: 1,
                }))
            })
            .await;
        assert!(matches!(
            result,
            Err(TaskError::Failed {
                kind: TaskKind::Dither,
                ..
            })
        ));
        assert_eq!(runner.state(TaskKind::Dither), TaskState::Idle);
    }

    #[test]
    fn test_outcome_helpers() {
        assert_eq!(Outcome::Completed(3).completed(), Some(3));
        assert!(Outcome::<u8>::Superseded.is_superseded());
        assert_eq!(Outcome::<u8>::Superseded.completed(), None);
    }

    #[test]
    fn test_task_kind_display() {
        assert_eq!(TaskKind::Adjust.to_string(), "adjust");
        assert_eq!(TaskKind::Dither.to_string(), "dither");
    }
}
