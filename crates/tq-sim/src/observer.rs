//! Run observer trait for progress reporting and data collection.

use tq_core::{ActorId, Tick, Ticket};

use crate::RunSummary;

/// Callbacks invoked by [`Runner`][crate::Runner] around each turn.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — turn printer
///
/// ```rust,ignore
/// struct TurnPrinter;
///
/// impl TurnObserver for TurnPrinter {
///     fn on_turn_start(&mut self, ticket: &Ticket<ActorId>) {
///         println!("{}: {}", ticket.time, ticket.payload);
///     }
/// }
/// ```
pub trait TurnObserver {
    /// Called with the ticket about to be consumed, before the handler runs.
    fn on_turn_start(&mut self, _ticket: &Ticket<ActorId>) {}

    /// Called after the handler returned; `clock` equals the consumed
    /// ticket's time.
    fn on_turn_end(&mut self, _clock: Tick, _actor: ActorId) {}

    /// Called after a scheduled purge with the number of tickets removed.
    fn on_purge(&mut self, _clock: Tick, _removed: usize) {}

    /// Called once when `run` stops.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`TurnObserver`] that does nothing.
pub struct NoopObserver;

impl TurnObserver for NoopObserver {}
