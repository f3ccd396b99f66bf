//! `tq-sim` — driver loops for the turnq scheduler.
//!
//! # Turn loop
//!
//! ```text
//! loop:
//!   ① Budget  — stop after max_turns turns this run.
//!   ② Peek    — next valid ticket; stop if none, or if due after `until`.
//!   ③ Turn    — advance_one_turn: clock = ticket.time, run the actor's
//!               on_turn in-line; it must reschedule or clear.
//!   ④ Purge   — every purge_every turns, drop garbage tickets.
//! ```
//!
//! Payload-mode queues of [`Deferred`] calls use [`run_deferred`] with the
//! same budgets.
//!
//! # Cargo features
//!
//! | Feature | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Serde derives on `RunConfig` and queue snapshots.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tq_queue::ActorQueue;
//! use tq_sim::{NoopObserver, RunConfig, Runner};
//!
//! let mut queue = ActorQueue::new();
//! let id = queue.spawn(my_actor);
//! queue.schedule_in(id, 3)?;
//! let mut runner = Runner::new(queue, RunConfig::until(Tick(100)))?;
//! runner.run(&mut NoopObserver)?;
//! ```

pub mod config;
pub mod deferred;
pub mod error;
pub mod observer;
pub mod runner;

#[cfg(test)]
mod tests;

pub use config::RunConfig;
pub use deferred::{Deferred, DeferredQueue, call_later, run_deferred};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, TurnObserver};
pub use runner::{RunSummary, Runner, StopReason};
