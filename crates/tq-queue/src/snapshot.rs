//! Plain-data snapshots of queue state.
//!
//! A queue is fully described by its clock, its sequence counter, and its
//! heap contents.  Snapshots hold exactly that (plus the actor arena in
//! actor mode); restoring re-validates and re-heapifies.  With the `serde`
//! feature both types serialize with any serde format.

use tq_core::{ActorId, Tick, Ticket, TicketId};

/// State of a [`TurnQueue`](crate::TurnQueue).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueSnapshot<T> {
    pub clock: Tick,
    pub next_sequence: TicketId,
    /// In due order when produced by `snapshot()`; any order is accepted.
    pub tickets: Vec<Ticket<T>>,
}

/// State of an [`ActorQueue`](crate::ActorQueue), garbage tickets included.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorSnapshot<A> {
    pub clock: Tick,
    pub next_sequence: TicketId,
    pub tickets: Vec<Ticket<ActorId>>,
    /// Arena slots by `ActorId`; `None` marks a despawned actor.
    pub actors: Vec<Option<A>>,
}
