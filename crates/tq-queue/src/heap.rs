//! `TicketHeap` — the clock, sequence counter, and min-heap shared by both
//! queue modes.
//!
//! `BinaryHeap` is a max-heap, so tickets are stored as `Reverse<Ticket<T>>`.
//! Replacing the minimum goes through `peek_mut`, which sifts the new entry
//! down once when the guard drops: one O(log n) pass instead of pop + push.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use tq_core::{QueueError, QueueResult, Tick, Ticket, TicketId};

pub(crate) struct TicketHeap<T> {
    pub(crate) clock: Tick,
    pub(crate) next_sequence: TicketId,
    heap: BinaryHeap<Reverse<Ticket<T>>>,
}

impl<T> TicketHeap<T> {
    pub(crate) fn new(clock: Tick) -> Self {
        Self {
            clock,
            next_sequence: TicketId(0),
            heap: BinaryHeap::new(),
        }
    }

    /// Rebuild from externally supplied parts, validating every ticket
    /// against the clock and sequence counter before heapifying.
    pub(crate) fn from_parts(
        clock: Tick,
        next_sequence: TicketId,
        tickets: Vec<Ticket<T>>,
    ) -> QueueResult<Self> {
        let mut seen = HashSet::with_capacity(tickets.len());
        for t in &tickets {
            if t.sequence >= next_sequence {
                return Err(QueueError::Snapshot(format!(
                    "ticket sequence {} not below next_sequence {}",
                    t.sequence.0, next_sequence.0
                )));
            }
            if !seen.insert(t.sequence) {
                return Err(QueueError::Snapshot(format!(
                    "duplicate ticket sequence {}",
                    t.sequence.0
                )));
            }
            if t.insert_time > clock || t.time < clock {
                return Err(QueueError::Snapshot(format!(
                    "ticket {} spans {}..{} which does not contain clock {}",
                    t.sequence.0, t.insert_time, t.time, clock
                )));
            }
        }
        Ok(Self {
            clock,
            next_sequence,
            heap: tickets.into_iter().map(Reverse).collect(),
        })
    }

    /// Create a ticket due `interval` ticks from now.  Does not insert it.
    /// On overflow the sequence counter is left untouched.
    pub(crate) fn make_ticket(&mut self, interval: u64, payload: T) -> QueueResult<Ticket<T>> {
        let ticket = Ticket::new(self.clock, interval, self.next_sequence, payload)?;
        self.next_sequence = ticket.sequence.next();
        Ok(ticket)
    }

    pub(crate) fn push(&mut self, ticket: Ticket<T>) {
        self.heap.push(Reverse(ticket));
    }

    pub(crate) fn peek(&self) -> Option<&Ticket<T>> {
        self.heap.peek().map(|r| &r.0)
    }

    /// Remove the minimum and advance the clock to its time.
    pub(crate) fn pop(&mut self) -> Option<Ticket<T>> {
        let ticket = self.heap.pop()?.0;
        self.clock = ticket.time;
        Some(ticket)
    }

    /// Remove the minimum without consuming it (garbage collection).
    pub(crate) fn discard_min(&mut self) -> Option<Ticket<T>> {
        self.heap.pop().map(|r| r.0)
    }

    /// Overwrite the minimum in place and return the entry it displaced.
    /// On an empty heap the ticket is pushed instead.
    pub(crate) fn replace_min(&mut self, ticket: Ticket<T>) -> Option<Ticket<T>> {
        if let Some(mut top) = self.heap.peek_mut() {
            return Some(std::mem::replace(&mut *top, Reverse(ticket)).0);
        }
        self.heap.push(Reverse(ticket));
        None
    }

    /// Keep only tickets matching `keep`, re-heapifying in O(n).
    /// Returns the number removed.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&Ticket<T>) -> bool) -> usize {
        let before = self.heap.len();
        self.heap.retain(|r| keep(&r.0));
        before - self.heap.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Ticket<T>> {
        self.heap.iter().map(|r| &r.0)
    }

    /// Heap contents in due order.
    pub(crate) fn sorted(&self) -> Vec<&Ticket<T>> {
        let mut v: Vec<&Ticket<T>> = self.iter().collect();
        v.sort();
        v
    }
}

impl<T: Clone> TicketHeap<T> {
    pub(crate) fn to_vec(&self) -> Vec<Ticket<T>> {
        self.sorted().into_iter().cloned().collect()
    }
}
