//! The `Runner` struct and its turn loop.

use tq_core::{ActorId, QueueError, Tick, Ticket};
use tq_queue::{ActorQueue, Schedulable};

use crate::{RunConfig, SimResult, TurnObserver};

// ── RunSummary ────────────────────────────────────────────────────────────────

/// Why a run stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// No valid tickets remain.
    Exhausted,
    /// The next ticket is due after `RunConfig::until`.
    TimeBudget,
    /// `RunConfig::max_turns` turns ran.
    TurnBudget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Turns taken during this run.
    pub turns: u64,
    pub final_clock: Tick,
    pub stop: StopReason,
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// Drives an [`ActorQueue`] under a [`RunConfig`].
///
/// Each iteration of [`run`](Self::run):
///
/// 1. Peek the next valid ticket (discarding garbage ahead of it).
/// 2. Stop if the queue is empty, the ticket is past `until`, or the turn
///    budget is spent.
/// 3. `advance_one_turn`, which runs the actor's handler in-line.
/// 4. Every `purge_every` turns, purge garbage tickets.
pub struct Runner<A: Schedulable> {
    pub queue: ActorQueue<A>,
    config: RunConfig,
    /// Turns taken across all runs and steps.
    total_turns: u64,
}

impl<A: Schedulable> Runner<A> {
    /// # Errors
    /// [`SimError::Config`][crate::SimError::Config] if `config` is invalid.
    pub fn new(queue: ActorQueue<A>, config: RunConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { queue, config, total_turns: 0 })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn total_turns(&self) -> u64 {
        self.total_turns
    }

    pub fn into_queue(self) -> ActorQueue<A> {
        self.queue
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run turns until the queue empties or a budget is reached.
    pub fn run<O: TurnObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        log::debug!("run start: clock={} config={:?}", self.queue.clock(), self.config);
        let mut turns = 0u64;
        let stop = loop {
            if self.config.out_of_turns(turns) {
                break StopReason::TurnBudget;
            }
            let due = match self.queue.peek() {
                Ok(t) => t.time,
                Err(QueueError::Empty) => break StopReason::Exhausted,
                Err(e) => return Err(e.into()),
            };
            if self.config.past_budget(due) {
                break StopReason::TimeBudget;
            }
            self.step(observer)?;
            turns += 1;
        };

        let summary = RunSummary { turns, final_clock: self.queue.clock(), stop };
        log::debug!("run end: {summary:?}");
        observer.on_run_end(&summary);
        Ok(summary)
    }

    /// Run exactly one turn, ignoring budgets.  Returns `None` if the queue
    /// is empty.
    pub fn step<O: TurnObserver>(&mut self, observer: &mut O) -> SimResult<Option<Ticket<ActorId>>> {
        let next = match self.queue.peek() {
            Ok(t) => t.clone(),
            Err(QueueError::Empty) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        observer.on_turn_start(&next);

        let ticket = self.queue.advance_one_turn()?;
        self.total_turns += 1;
        observer.on_turn_end(self.queue.clock(), ticket.payload);

        if let Some(every) = self.config.purge_every {
            if self.total_turns.is_multiple_of(every) {
                let removed = self.queue.purge();
                observer.on_purge(self.queue.clock(), removed);
            }
        }
        Ok(Some(ticket))
    }
}
