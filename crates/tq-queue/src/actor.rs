//! `ActorQueue<A>` — actor mode with lazy invalidation.
//!
//! # Validity
//!
//! The queue owns its actors in an arena indexed by [`ActorId`]; every ticket
//! carries the id of the actor it belongs to.  Each actor embeds a
//! [`ScheduleHandle`] naming its *current* ticket, and a ticket is valid iff
//!
//! ```text
//! actors[ticket.payload] exists  ∧  its handle.current == Some(ticket.sequence)
//! ```
//!
//! Cancelling or superseding a ticket therefore only rewrites the handle.
//! The old heap entry stays where it is until a peek finds it at the top
//! (each garbage entry is discarded exactly once) or [`ActorQueue::purge`]
//! rebuilds the heap.
//!
//! # Turn protocol
//!
//! ```text
//! Unscheduled ──schedule_in──▶ Scheduled ──advance_one_turn──▶ Active
//!      ▲                           ▲                             │
//!      │                           └──── handle.reschedule_in ───┤
//!      └──────────────────────────────── handle.clear ───────────┘
//! ```
//!
//! During [`advance_one_turn`](ActorQueue::advance_one_turn) the active
//! ticket stays at the top of the heap.  `reschedule_in` overwrites it in
//! place; `clear` leaves it behind as garbage.  When the handler returns,
//! the queue asserts the handle no longer names the active ticket.

use std::collections::HashMap;
use std::fmt;

use tq_core::{ActorId, QueueError, QueueResult, Tick, Ticket, TicketId};

use crate::ActorSnapshot;
use crate::heap::TicketHeap;

// ── ScheduleHandle ────────────────────────────────────────────────────────────

/// The scheduling state an actor embeds: the id of its current ticket, or
/// `None` while unscheduled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleHandle {
    current: Option<TicketId>,
}

impl ScheduleHandle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> Option<TicketId> {
        self.current
    }

    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.current.is_some()
    }

    /// Replace the active ticket with one due `interval` ticks from now.
    ///
    /// Only legal from inside the owning actor's [`Schedulable::on_turn`],
    /// once per turn.
    ///
    /// # Errors
    /// - [`QueueError::AlreadyRescheduled`] on a second call in the same turn,
    ///   through this handle or any copy of it.
    /// - [`QueueError::NotActive`] if this handle does not own the ticket
    ///   being processed.
    /// - [`QueueError::TimeOverflow`] if the new due time exceeds `u64::MAX`.
    pub fn reschedule_in(&mut self, turn: &mut Turn<'_>, interval: u64) -> QueueResult<TicketId> {
        // Checked on the turn, not the handle: a cloned handle must not get
        // a second replacement past this point.
        if turn.replacement.is_some() {
            return Err(QueueError::AlreadyRescheduled { actor: turn.actor() });
        }
        if self.current != Some(turn.ticket.sequence)
            || turn.heap.peek().map(|t| t.sequence) != Some(turn.ticket.sequence)
        {
            return Err(QueueError::NotActive { active: turn.actor() });
        }

        let ticket = turn.heap.make_ticket(interval, turn.actor())?;
        let id = ticket.sequence;
        turn.heap.replace_min(ticket);
        log::trace!(
            "reschedule {} seq={} -> seq={} (+{interval})",
            turn.actor(),
            turn.ticket.sequence.0,
            id.0
        );
        self.current = Some(id);
        turn.replacement = Some(id);
        Ok(id)
    }

    /// Forget the current ticket.  From inside a turn this ends the actor's
    /// participation; the old heap entry is collected lazily.
    pub fn clear(&mut self) -> Option<TicketId> {
        self.current.take()
    }
}

// ── Schedulable ───────────────────────────────────────────────────────────────

/// Capability implemented by anything an [`ActorQueue`] can run.
pub trait Schedulable {
    fn handle(&self) -> &ScheduleHandle;

    fn handle_mut(&mut self) -> &mut ScheduleHandle;

    /// Take a turn.  Before returning `Ok`, the implementation must either
    /// call `self.handle_mut().reschedule_in(turn, ..)` or
    /// `self.handle_mut().clear()`.
    ///
    /// Returning `Err` skips the post-condition check and the error is passed
    /// through by `advance_one_turn`.  If the handle still names the active
    /// ticket, that ticket stays valid at the head of the queue.
    fn on_turn(&mut self, turn: &mut Turn<'_>) -> QueueResult<()>;
}

// ── Turn ──────────────────────────────────────────────────────────────────────

/// The context of one actor's turn.  Exists only for the duration of
/// [`Schedulable::on_turn`].
pub struct Turn<'a> {
    heap: &'a mut TicketHeap<ActorId>,
    ticket: Ticket<ActorId>,
    replacement: Option<TicketId>,
}

impl Turn<'_> {
    /// The ticket being processed.
    pub fn ticket(&self) -> &Ticket<ActorId> {
        &self.ticket
    }

    pub fn actor(&self) -> ActorId {
        self.ticket.payload
    }

    /// The queue clock, equal to `ticket().time`.
    pub fn clock(&self) -> Tick {
        self.heap.clock
    }

    pub fn time_passed(&self) -> i64 {
        self.ticket.time_passed(self.heap.clock)
    }

    pub fn time_left(&self) -> i64 {
        self.ticket.time_left(self.heap.clock)
    }

    pub fn progress(&self) -> QueueResult<f64> {
        self.ticket.progress(self.heap.clock)
    }
}

// ── ActorQueue ────────────────────────────────────────────────────────────────

/// A turn queue over an arena of [`Schedulable`] actors.
pub struct ActorQueue<A> {
    heap: TicketHeap<ActorId>,
    actors: Vec<Option<A>>,
}

impl<A: Schedulable> Default for ActorQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Schedulable> ActorQueue<A> {
    pub fn new() -> Self {
        Self::with_clock(Tick::ZERO)
    }

    pub fn with_clock(clock: Tick) -> Self {
        Self {
            heap: TicketHeap::new(clock),
            actors: Vec::new(),
        }
    }

    // ── Arena ─────────────────────────────────────────────────────────────

    /// Add an actor to the arena, unscheduled.  Any ticket its handle names
    /// is forgotten.
    pub fn spawn(&mut self, mut actor: A) -> ActorId {
        actor.handle_mut().clear();
        let id = ActorId(self.actors.len() as u32);
        self.actors.push(Some(actor));
        id
    }

    /// Remove an actor, tombstoning its slot.  Its tickets become stale.
    pub fn despawn(&mut self, id: ActorId) -> Option<A> {
        let mut actor = self.actors.get_mut(id.index())?.take()?;
        actor.handle_mut().clear();
        Some(actor)
    }

    pub fn actor(&self, id: ActorId) -> Option<&A> {
        self.actors.get(id.index())?.as_ref()
    }

    /// Mutable access to an actor.  Rewriting its handle here is equivalent
    /// to `cancel`; it cannot install a ticket.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut A> {
        self.actors.get_mut(id.index())?.as_mut()
    }

    /// Live actors with their ids, in id order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &A)> {
        self.actors
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.as_ref().map(|a| (ActorId(i as u32), a)))
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// First registration: give an unscheduled actor a ticket due
    /// `interval` ticks from now.
    ///
    /// # Errors
    /// [`QueueError::UnknownActor`], [`QueueError::AlreadyScheduled`], or
    /// [`QueueError::TimeOverflow`].
    pub fn schedule_in(&mut self, id: ActorId, interval: u64) -> QueueResult<Ticket<ActorId>> {
        let actor = self
            .actors
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(QueueError::UnknownActor { actor: id })?;
        if actor.handle().is_scheduled() {
            return Err(QueueError::AlreadyScheduled { actor: id });
        }
        let ticket = self.heap.make_ticket(interval, id)?;
        actor.handle_mut().current = Some(ticket.sequence);
        log::trace!("schedule {id} seq={} due={}", ticket.sequence.0, ticket.time);
        self.heap.push(ticket.clone());
        Ok(ticket)
    }

    /// Clear an actor's current ticket from outside its turn.  Returns
    /// whether it was scheduled.
    pub fn cancel(&mut self, id: ActorId) -> QueueResult<bool> {
        let actor = self.actor_mut(id).ok_or(QueueError::UnknownActor { actor: id })?;
        Ok(actor.handle_mut().clear().is_some())
    }

    // ── Queue operations ──────────────────────────────────────────────────

    #[inline]
    pub fn clock(&self) -> Tick {
        self.heap.clock
    }

    #[inline]
    pub fn next_sequence(&self) -> TicketId {
        self.heap.next_sequence
    }

    /// Whether `ticket` is its actor's current ticket.
    pub fn is_valid(&self, ticket: &Ticket<ActorId>) -> bool {
        is_current(&self.actors, ticket)
    }

    /// Discard garbage entries until the top of the heap is valid.
    fn skip_stale(&mut self) {
        while let Some(top) = self.heap.peek() {
            if is_current(&self.actors, top) {
                break;
            }
            self.heap.discard_min();
        }
    }

    /// The next valid ticket, discarding any garbage ahead of it.
    pub fn peek(&mut self) -> QueueResult<&Ticket<ActorId>> {
        self.skip_stale();
        self.heap.peek().ok_or(QueueError::Empty)
    }

    pub fn is_non_empty(&mut self) -> bool {
        self.skip_stale();
        self.heap.len() > 0
    }

    /// Run the next due actor's turn and return the ticket it consumed.
    ///
    /// # Errors
    /// [`QueueError::Empty`] if no valid ticket remains, or whatever error
    /// the handler returned.
    ///
    /// # Panics
    /// If the handler returns `Ok` without rescheduling or clearing.
    pub fn advance_one_turn(&mut self) -> QueueResult<Ticket<ActorId>> {
        self.skip_stale();
        let ticket = self.heap.peek().ok_or(QueueError::Empty)?.clone();
        self.heap.clock = ticket.time;

        let id = ticket.payload;
        let actor = self
            .actors
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(QueueError::UnknownActor { actor: id })?;

        let mut turn = Turn {
            heap: &mut self.heap,
            ticket,
            replacement: None,
        };
        actor.on_turn(&mut turn)?;

        let ticket = turn.ticket;
        assert!(
            actor.handle().current() != Some(ticket.sequence),
            "{id} returned from on_turn at {} without rescheduling or clearing",
            ticket.time
        );
        Ok(ticket)
    }

    /// Rebuild the heap keeping only valid tickets.  O(n).  Returns the
    /// number of garbage entries removed.
    pub fn purge(&mut self) -> usize {
        let actors = &self.actors;
        let removed = self.heap.retain(|t| is_current(actors, t));
        log::debug!("purge removed {removed} stale tickets, {} remain", self.heap.len());
        removed
    }

    /// Heap size including garbage entries.
    pub fn len_physical(&self) -> usize {
        self.heap.len()
    }

    /// Number of valid tickets.  O(n).
    pub fn live_len(&self) -> usize {
        self.heap.iter().filter(|t| is_current(&self.actors, t)).count()
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// Capture clock, sequence counter, every heap entry (garbage included),
    /// and the actor arena.
    pub fn snapshot(&self) -> ActorSnapshot<A>
    where
        A: Clone,
    {
        ActorSnapshot {
            clock: self.heap.clock,
            next_sequence: self.heap.next_sequence,
            tickets: self.heap.to_vec(),
            actors: self.actors.clone(),
        }
    }

    /// Rebuild from a snapshot: validate and heapify the tickets, purge the
    /// ones no actor claims, then clear any handle naming a ticket that is
    /// not in the heap or that belongs to another actor.
    pub fn restore(snapshot: ActorSnapshot<A>) -> QueueResult<Self> {
        let heap = TicketHeap::from_parts(
            snapshot.clock,
            snapshot.next_sequence,
            snapshot.tickets,
        )?;
        let mut queue = Self { heap, actors: snapshot.actors };
        queue.purge();

        let owners: HashMap<TicketId, ActorId> =
            queue.heap.iter().map(|t| (t.sequence, t.payload)).collect();
        for (i, slot) in queue.actors.iter_mut().enumerate() {
            let Some(actor) = slot else { continue };
            let id = ActorId(i as u32);
            if let Some(seq) = actor.handle().current() {
                if owners.get(&seq) != Some(&id) {
                    log::debug!("restore: {id} named missing ticket {}; unscheduled", seq.0);
                    actor.handle_mut().clear();
                }
            }
        }
        log::debug!(
            "restored actor queue: clock={} tickets={} actors={}",
            queue.heap.clock,
            queue.heap.len(),
            queue.actors.len()
        );
        Ok(queue)
    }
}

fn is_current<A: Schedulable>(actors: &[Option<A>], ticket: &Ticket<ActorId>) -> bool {
    actors
        .get(ticket.payload.index())
        .and_then(Option::as_ref)
        .is_some_and(|a| a.handle().current() == Some(ticket.sequence))
}

impl<A: Schedulable> fmt::Display for ActorQueue<A> {
    /// Stale entries are prefixed with `~`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ActorQueue(clock={}, next_sequence={}, heap=[",
            self.heap.clock.0, self.heap.next_sequence.0
        )?;
        for (i, t) in self.heap.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if !is_current(&self.actors, t) {
                f.write_str("~")?;
            }
            write!(f, "{t}")?;
        }
        f.write_str("])")
    }
}
