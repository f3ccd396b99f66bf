//! Integration tests for tq-sim.

use std::cell::RefCell;
use std::rc::Rc;

use tq_core::{ActorId, QueueResult, Tick, Ticket};
use tq_queue::{ActorQueue, Schedulable, ScheduleHandle, Turn};

use crate::{NoopObserver, RunConfig, RunSummary, Runner, StopReason, TurnObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Reschedules itself by `speed` for `lives` turns, then clears.
#[derive(Clone, Debug)]
struct Walker {
    speed:  u64,
    lives:  Option<u32>,
    handle: ScheduleHandle,
}

impl Walker {
    fn forever(speed: u64) -> Self {
        Self { speed, lives: None, handle: ScheduleHandle::new() }
    }

    fn mortal(speed: u64, lives: u32) -> Self {
        Self { speed, lives: Some(lives), handle: ScheduleHandle::new() }
    }
}

impl Schedulable for Walker {
    fn handle(&self) -> &ScheduleHandle {
        &self.handle
    }

    fn handle_mut(&mut self) -> &mut ScheduleHandle {
        &mut self.handle
    }

    fn on_turn(&mut self, turn: &mut Turn<'_>) -> QueueResult<()> {
        match &mut self.lives {
            Some(0) => {
                self.handle.clear();
            }
            Some(n) => {
                *n -= 1;
                self.handle.reschedule_in(turn, self.speed)?;
            }
            None => {
                self.handle.reschedule_in(turn, self.speed)?;
            }
        }
        Ok(())
    }
}

fn queue_of(walkers: Vec<Walker>) -> (ActorQueue<Walker>, Vec<ActorId>) {
    let mut q = ActorQueue::new();
    let ids = walkers
        .into_iter()
        .map(|w| {
            let speed = w.speed;
            let id = q.spawn(w);
            q.schedule_in(id, speed).unwrap();
            id
        })
        .collect();
    (q, ids)
}

#[derive(Default)]
struct Recorder {
    starts: Vec<(Tick, ActorId)>,
    ends:   Vec<Tick>,
    purges: Vec<usize>,
    summary: Option<RunSummary>,
}

impl TurnObserver for Recorder {
    fn on_turn_start(&mut self, ticket: &Ticket<ActorId>) {
        self.starts.push((ticket.time, ticket.payload));
    }

    fn on_turn_end(&mut self, clock: Tick, _actor: ActorId) {
        self.ends.push(clock);
    }

    fn on_purge(&mut self, _clock: Tick, removed: usize) {
        self.purges.push(removed);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        self.summary = Some(summary.clone());
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn default_has_no_limits() {
        let c = RunConfig::default();
        assert!(c.until.is_none() && c.max_turns.is_none() && c.purge_every.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_purge_interval_is_rejected() {
        let c = RunConfig::default().with_purge_every(0);
        assert!(c.validate().is_err());
        let (q, _) = queue_of(vec![]);
        assert!(Runner::new(q, c).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_partial_json() {
        let c: RunConfig = serde_json::from_str(r#"{ "until": 100 }"#).unwrap();
        assert_eq!(c, RunConfig::until(Tick(100)));
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runner_tests {
    use super::*;

    #[test]
    fn stops_at_time_budget_and_leaves_future_tickets() {
        let (q, _) = queue_of(vec![Walker::forever(3), Walker::forever(5)]);
        let mut runner = Runner::new(q, RunConfig::until(Tick(100))).unwrap();
        let summary = runner.run(&mut NoopObserver).unwrap();

        assert_eq!(summary.stop, StopReason::TimeBudget);
        // 33 turns for speed 3 (T3..T99) + 20 for speed 5 (T5..T100).
        assert_eq!(summary.turns, 53);
        assert_eq!(summary.final_clock, Tick(100));
        assert_eq!(runner.queue.live_len(), 2);
        assert!(runner.queue.peek().unwrap().time > Tick(100));
    }

    #[test]
    fn stops_at_turn_budget() {
        let (q, _) = queue_of(vec![Walker::forever(2)]);
        let mut runner = Runner::new(q, RunConfig::default().with_max_turns(4)).unwrap();
        let summary = runner.run(&mut NoopObserver).unwrap();
        assert_eq!(summary, RunSummary { turns: 4, final_clock: Tick(8), stop: StopReason::TurnBudget });

        // A second run gets a fresh budget; the total keeps counting.
        runner.run(&mut NoopObserver).unwrap();
        assert_eq!(runner.total_turns(), 8);
        assert_eq!(runner.queue.clock(), Tick(16));
    }

    #[test]
    fn stops_when_every_actor_clears() {
        let (q, _) = queue_of(vec![Walker::mortal(1, 2), Walker::mortal(2, 1)]);
        let mut runner = Runner::new(q, RunConfig::default()).unwrap();
        let mut rec = Recorder::default();
        let summary = runner.run(&mut rec).unwrap();

        assert_eq!(summary.stop, StopReason::Exhausted);
        assert_eq!(summary.turns, 5);
        assert_eq!(rec.summary, Some(summary));
        assert!(!runner.queue.is_non_empty());
    }

    #[test]
    fn observer_sees_turns_in_order() {
        let (q, ids) = queue_of(vec![Walker::forever(2), Walker::forever(3)]);
        let mut runner = Runner::new(q, RunConfig::until(Tick(6))).unwrap();
        let mut rec = Recorder::default();
        runner.run(&mut rec).unwrap();

        let (a, b) = (ids[0], ids[1]);
        assert_eq!(
            rec.starts,
            // At T6, b's ticket was scheduled first (at T3).
            vec![(Tick(2), a), (Tick(3), b), (Tick(4), a), (Tick(6), b), (Tick(6), a)]
        );
        assert_eq!(rec.ends, vec![Tick(2), Tick(3), Tick(4), Tick(6), Tick(6)]);
    }

    #[test]
    fn scheduled_purge_collects_cleared_tickets() {
        let (q, _) = queue_of(vec![Walker::mortal(1, 0), Walker::forever(4)]);
        let config = RunConfig::until(Tick(8)).with_purge_every(1);
        let mut runner = Runner::new(q, config).unwrap();
        let mut rec = Recorder::default();
        runner.run(&mut rec).unwrap();

        // The mortal walker clears on its first turn; the purge right after
        // drops its ticket, later purges find nothing.
        assert_eq!(rec.purges, vec![1, 0, 0]);
        assert_eq!(runner.queue.len_physical(), 1);
    }

    #[test]
    fn step_runs_single_turn() {
        let (q, ids) = queue_of(vec![Walker::forever(7)]);
        let mut runner = Runner::new(q, RunConfig::until(Tick(0))).unwrap();
        let t = runner.step(&mut NoopObserver).unwrap().unwrap();
        assert_eq!(t.payload, ids[0]);
        assert_eq!(runner.queue.clock(), Tick(7));

        let mut empty = Runner::new(ActorQueue::<Walker>::new(), RunConfig::default()).unwrap();
        assert!(empty.step(&mut NoopObserver).unwrap().is_none());
    }
}

// ── Deferred calls ────────────────────────────────────────────────────────────

#[cfg(test)]
mod deferred_tests {
    use tq_core::QueueError;

    use crate::{DeferredQueue, call_later, run_deferred};

    use super::*;

    #[test]
    fn calls_run_in_due_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut q = DeferredQueue::new();
        for n in [3u64, 2, 1, 4] {
            let log = Rc::clone(&log);
            call_later(&mut q, n, move |_| log.borrow_mut().push(n)).unwrap();
        }

        let summary = run_deferred(&mut q, &RunConfig::default()).unwrap();
        assert_eq!(*log.borrow(), vec![1, 2, 3, 4]);
        assert_eq!(summary.final_clock, Tick(4));
        assert_eq!(summary.stop, StopReason::Exhausted);
    }

    #[test]
    fn calls_may_schedule_follow_ups() {
        fn tick(q: &mut DeferredQueue, log: Rc<RefCell<Vec<Tick>>>, left: u32) {
            log.borrow_mut().push(q.clock());
            if left > 0 {
                call_later(q, 10, move |q| tick(q, log, left - 1)).unwrap();
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut q = DeferredQueue::new();
        let l = Rc::clone(&log);
        call_later(&mut q, 5, move |q| tick(q, l, 3)).unwrap();

        let summary = run_deferred(&mut q, &RunConfig::until(Tick(30))).unwrap();
        assert_eq!(*log.borrow(), vec![Tick(5), Tick(15), Tick(25)]);
        assert_eq!(summary.stop, StopReason::TimeBudget);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn display_hides_closures() {
        let mut q = DeferredQueue::new();
        call_later(&mut q, 1, |_| {}).unwrap();
        assert!(q.to_string().contains("payload=<deferred>"));
    }

    #[test]
    fn call_past_max_tick_is_rejected() {
        let mut q = DeferredQueue::with_clock(Tick(u64::MAX));
        assert_eq!(
            call_later(&mut q, 1, |_| {}).unwrap_err(),
            QueueError::TimeOverflow { clock: Tick(u64::MAX), interval: 1 }
        );
        assert!(q.is_empty());
        call_later(&mut q, 0, |_| {}).unwrap();
        assert_eq!(q.len(), 1);
    }
}
