//! speeds — smallest demo for the turnq scheduler.
//!
//! Runs a rat (speed 3) and a snail (speed 5) that reschedule themselves
//! every turn, plus a hare that naps after a few dashes.  Then replays the
//! classic four-call deferred example.
//!
//! Set `RUST_LOG=tq_queue=trace` to see every schedule and pop.  An optional
//! first argument is a JSON `RunConfig`, e.g. `'{"until": 40}'`.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use tq_core::{ActorId, QueueResult, Tick, Ticket};
use tq_queue::{ActorQueue, Schedulable, ScheduleHandle, Turn};
use tq_sim::{DeferredQueue, RunConfig, RunSummary, Runner, TurnObserver, call_later, run_deferred};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_UNTIL: Tick = Tick(100);
const HARE_DASHES:   u32  = 4;

// ── Actors ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Critter {
    name:    &'static str,
    speed:   u64,
    /// Turns left before the critter stops for good; `None` runs forever.
    stamina: Option<u32>,
    handle:  ScheduleHandle,
}

impl Critter {
    fn new(name: &'static str, speed: u64, stamina: Option<u32>) -> Self {
        Self { name, speed, stamina, handle: ScheduleHandle::new() }
    }
}

impl Schedulable for Critter {
    fn handle(&self) -> &ScheduleHandle {
        &self.handle
    }

    fn handle_mut(&mut self) -> &mut ScheduleHandle {
        &mut self.handle
    }

    fn on_turn(&mut self, turn: &mut Turn<'_>) -> QueueResult<()> {
        println!(
            "  {:>4}  {:<5} waited {} ticks",
            turn.clock().to_string(),
            self.name,
            turn.time_passed()
        );
        match &mut self.stamina {
            Some(0) => {
                println!("        {} stops", self.name);
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

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct TurnCounter {
    per_actor: Vec<u64>,
}

impl TurnObserver for TurnCounter {
    fn on_turn_start(&mut self, ticket: &Ticket<ActorId>) {
        let i = ticket.payload.index();
        if self.per_actor.len() <= i {
            self.per_actor.resize(i + 1, 0);
        }
        self.per_actor[i] += 1;
    }

    fn on_purge(&mut self, clock: Tick, removed: usize) {
        log::info!("{clock}: purged {removed} stale tickets");
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        log::info!("run ended: {summary:?}");
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(json) => serde_json::from_str(&json)?,
        None => RunConfig::until(DEFAULT_UNTIL).with_purge_every(25),
    };

    // ── Repeating actors ──────────────────────────────────────────────────
    let mut queue = ActorQueue::new();
    for critter in [
        Critter::new("rat", 3, None),
        Critter::new("snail", 5, None),
        Critter::new("hare", 1, Some(HARE_DASHES)),
    ] {
        let speed = critter.speed;
        let id = queue.spawn(critter);
        queue.schedule_in(id, speed)?;
    }

    println!("actor run ({config:?})");
    let mut runner = Runner::new(queue, config)?;
    let mut counter = TurnCounter::default();
    let summary = runner.run(&mut counter)?;

    println!();
    for (id, critter) in runner.queue.actors() {
        let turns = counter.per_actor.get(id.index()).copied().unwrap_or(0);
        println!("  {:<5} took {turns} turns", critter.name);
    }
    println!("  {} turns, stopped at {} ({:?})", summary.turns, summary.final_clock, summary.stop);
    println!("  {}", runner.queue);

    // ── Deferred calls ────────────────────────────────────────────────────
    println!();
    println!("deferred calls");
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut calls = DeferredQueue::new();
    for n in [3u64, 2, 1, 4] {
        let order = Rc::clone(&order);
        call_later(&mut calls, n, move |q| {
            println!("  {}  call scheduled with interval {n}", q.clock());
            order.borrow_mut().push(n);
        })?;
    }
    run_deferred(&mut calls, &RunConfig::default())?;
    println!("  order: {:?}", order.borrow());

    Ok(())
}
