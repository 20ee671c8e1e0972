//! Runs queued continuations for the current thread.
//!
//! Completing a future from inside a continuation would otherwise recurse
//! into the next future's continuations, so a long chain of derived futures
//! would need one stack frame per link. Instead, every task goes through a
//! per-thread queue. The outermost call drains it before returning; nested
//! calls only enqueue.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

pub type Task = Box<dyn FnOnce()>;

thread_local! {
    static QUEUE: RefCell<VecDeque<Task>> = RefCell::new(VecDeque::new());
    static RUNNING: Cell<bool> = Cell::new(false);
}

/// Runs the task, after any tasks already queued on this thread.
pub fn run(task: Task) {
    QUEUE.with(|q| q.borrow_mut().push_back(task));

    if RUNNING.with(|r| r.replace(true)) {
        // An outer call is draining the queue and will get to it
        return;
    }

    let _reset = Reset;

    while let Some(task) = QUEUE.with(|q| q.borrow_mut().pop_front()) {
        task();
    }
}

// Clears the running flag, also when a task panics.
struct Reset;

impl Drop for Reset {
    fn drop(&mut self) {
        RUNNING.with(|r| r.set(false));
    }
}
