//! Frame scheduler for timers, periodic tasks and debounced work
//!
//! Everything runs on the host's UI thread. The host calls
//! [`Scheduler::advance_to`] once per animation frame with the current time
//! and receives the events that came due, in due order. Nothing fires on its
//! own, so tearing a view down is just [`Scheduler::cancel_all`].

use ahash::AHashMap;

/// Handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone)]
enum TaskKind {
    Once,
    Periodic { period_ms: f64 },
}

#[derive(Debug, Clone)]
struct Task<E> {
    due_ms: f64,
    kind: TaskKind,
    event: E,
}

/// Single-threaded, host-driven scheduler
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: f64,
    next_id: u64,
    tasks: AHashMap<TaskId, Task<E>>,
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 1,
            tasks: AHashMap::new(),
        }
    }

    /// Time of the most recent `advance_to`
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    fn insert(&mut self, due_ms: f64, kind: TaskKind, event: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert(id, Task { due_ms, kind, event });
        id
    }

    /// Fire `event` once, `delay_ms` after the current time
    pub fn schedule_once(&mut self, delay_ms: f64, event: E) -> TaskId {
        let due = self.now_ms + delay_ms.max(0.0);
        self.insert(due, TaskKind::Once, event)
    }

    /// Fire `event` every `period_ms`, first after one period
    pub fn schedule_periodic(&mut self, period_ms: f64, event: E) -> TaskId {
        let period_ms = period_ms.max(1.0);
        let due = self.now_ms + period_ms;
        self.insert(due, TaskKind::Periodic { period_ms }, event)
    }

    /// Returns false if the task had already fired or been cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!("Cancelling {} scheduled task(s)", self.tasks.len());
        }
        self.tasks.clear();
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Advance the clock and collect due events in due order.
    ///
    /// Periodic tasks fire at most once per call and are rescheduled from the
    /// new time, so a stalled host never receives a burst of catch-up events.
    /// Time never moves backwards.
    pub fn advance_to(&mut self, now_ms: f64) -> Vec<E> {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        let now = self.now_ms;

        let mut due: Vec<(f64, TaskId)> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due_ms <= now)
            .map(|(id, task)| (task.due_ms, *id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut fired = Vec::with_capacity(due.len());
        for (_, id) in due {
            let Some(task) = self.tasks.get_mut(&id) else {
                continue;
            };
            fired.push(task.event.clone());
            match task.kind {
                TaskKind::Once => {
                    self.tasks.remove(&id);
                }
                TaskKind::Periodic { period_ms } => {
                    let mut next = task.due_ms + period_ms;
                    if next <= now {
                        next = now + period_ms;
                    }
                    task.due_ms = next;
                }
            }
        }
        fired
    }
}

/// Coalesces bursts of triggers into one delayed event
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: f64,
    pending: Option<TaskId>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Restart the quiet period; any earlier pending trigger is dropped
    pub fn trigger<E: Clone>(&mut self, scheduler: &mut Scheduler<E>, event: E) -> TaskId {
        if let Some(previous) = self.pending.take() {
            scheduler.cancel(previous);
        }
        let id = scheduler.schedule_once(self.delay_ms, event);
        self.pending = Some(id);
        id
    }

    pub fn cancel<E: Clone>(&mut self, scheduler: &mut Scheduler<E>) {
        if let Some(previous) = self.pending.take() {
            scheduler.cancel(previous);
        }
    }

    pub fn is_pending<E: Clone>(&self, scheduler: &Scheduler<E>) -> bool {
        self.pending.map(|id| scheduler.is_pending(id)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(100.0, "fit");
        assert!(scheduler.advance_to(50.0).is_empty());
        assert_eq!(scheduler.advance_to(100.0), vec!["fit"]);
        assert!(scheduler.advance_to(500.0).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(300.0, 3);
        scheduler.schedule_once(100.0, 1);
        scheduler.schedule_once(200.0, 2);
        assert_eq!(scheduler.advance_to(1000.0), vec![1, 2, 3]);
    }

    #[test]
    fn test_periodic_no_catch_up_burst() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_periodic(100.0, "pulse");
        assert_eq!(scheduler.advance_to(100.0).len(), 1);
        // Host stalls for ten periods
        assert_eq!(scheduler.advance_to(1100.0).len(), 1);
        assert!(scheduler.advance_to(1150.0).is_empty());
        assert_eq!(scheduler.advance_to(1200.0).len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_periodic(10.0, ());
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance_to(100.0).is_empty());
    }

    #[test]
    fn test_time_is_monotonic() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        scheduler.advance_to(500.0);
        scheduler.advance_to(100.0);
        assert_eq!(scheduler.now(), 500.0);
    }

    #[test]
    fn test_debouncer_coalesces() {
        let mut scheduler = Scheduler::new();
        let mut debouncer = Debouncer::new(100.0);
        for t in [0.0, 30.0, 60.0, 90.0] {
            scheduler.advance_to(t);
            debouncer.trigger(&mut scheduler, "resize");
        }
        assert_eq!(scheduler.pending_count(), 1);
        assert!(scheduler.advance_to(150.0).is_empty());
        assert_eq!(scheduler.advance_to(190.0), vec!["resize"]);
        assert!(!debouncer.is_pending(&scheduler));
    }
}
