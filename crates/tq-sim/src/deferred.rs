//! Call-once payloads for payload-mode queues.
//!
//! A [`Deferred`] is a boxed closure run when its ticket is popped.  It gets
//! the queue back, so it can schedule follow-up calls.

use std::fmt;

use tq_core::{QueueResult, TicketId};
use tq_queue::TurnQueue;

use crate::{RunConfig, RunSummary, SimResult, StopReason};

pub type DeferredQueue = TurnQueue<Deferred>;

pub struct Deferred(Box<dyn FnOnce(&mut DeferredQueue)>);

impl Deferred {
    pub fn new(f: impl FnOnce(&mut DeferredQueue) + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn call(self, queue: &mut DeferredQueue) {
        (self.0)(queue)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<deferred>")
    }
}

/// Schedule `f` to run `interval` ticks from now.
///
/// # Errors
/// [`QueueError::TimeOverflow`][tq_core::QueueError::TimeOverflow] if the
/// due time exceeds `u64::MAX`.
pub fn call_later(
    queue: &mut DeferredQueue,
    interval: u64,
    f: impl FnOnce(&mut DeferredQueue) + 'static,
) -> QueueResult<TicketId> {
    queue.schedule_id(interval, Deferred::new(f))
}

/// Pop and invoke deferred calls in due order until the queue empties or a
/// budget in `config` is reached.  `purge_every` is ignored: payload-mode
/// tickets are never stale.
pub fn run_deferred(queue: &mut DeferredQueue, config: &RunConfig) -> SimResult<RunSummary> {
    config.validate()?;
    let mut turns = 0u64;
    let stop = loop {
        if config.out_of_turns(turns) {
            break StopReason::TurnBudget;
        }
        let due = match queue.peek() {
            Ok(t) => t.time,
            Err(_) => break StopReason::Exhausted,
        };
        if config.past_budget(due) {
            break StopReason::TimeBudget;
        }
        let ticket = queue.pop()?;
        ticket.payload.call(queue);
        turns += 1;
    };
    Ok(RunSummary { turns, final_clock: queue.clock(), stop })
}
