use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::scheduler::{Scheduler, TimerId};

struct State<A> {
    handler: Box<dyn Fn(A)>,
    scheduler: Rc<dyn Scheduler>,
    delay_ms: u32,
    pending: Cell<Option<TimerId>>,
}

/// Collapses a burst of calls into one, run `delay_ms` after the last call
/// with that call's arguments.
pub struct Debouncer<A> {
    state: Rc<State<A>>,
}

impl<A> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<A: 'static> Debouncer<A> {
    pub fn new<F>(delay_ms: u32, scheduler: Rc<dyn Scheduler>, handler: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self {
            state: Rc::new(State {
                handler: Box::new(handler),
                scheduler,
                delay_ms,
                pending: Cell::new(None),
            }),
        }
    }

    pub fn call(&self, args: A) {
        self.cancel();

        let state: Weak<State<A>> = Rc::downgrade(&self.state);
        let id = self.state.scheduler.schedule(
            self.state.delay_ms,
            Box::new(move || {
                if let Some(state) = state.upgrade() {
                    state.pending.set(None);
                    (state.handler)(args);
                }
            }),
        );
        self.state.pending.set(Some(id));
    }

    pub fn cancel(&self) {
        if let Some(id) = self.state.pending.take() {
            self.state.scheduler.cancel(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }
}
