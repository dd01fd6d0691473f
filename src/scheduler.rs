use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

pub type Task = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Runs tasks after a delay. Scheduled tasks can be cancelled until they run.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TimerId;
    fn cancel(&self, id: TimerId);
}

/// `setTimeout` backed scheduler. Pending timeouts are owned here so they can
/// be cancelled. The map is shared with the timeout callbacks, so dropping the
/// scheduler only clears timeouts once no queued task holds a handle to it; a
/// running typing animation keeps it alive until the last character.
#[derive(Default)]
pub struct TimeoutScheduler {
    next_id: Cell<u64>,
    pending: Rc<RefCell<HashMap<TimerId, Timeout>>>,
}

impl TimeoutScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let pending = Rc::clone(&self.pending);
        let timeout = Timeout::new(delay_ms, move || {
            let fired = pending.borrow_mut().remove(&id);
            task();
            drop(fired);
        });
        self.pending.borrow_mut().insert(id, timeout);
        id
    }

    fn cancel(&self, id: TimerId) {
        // Dropping a Timeout clears it.
        self.pending.borrow_mut().remove(&id);
    }
}
