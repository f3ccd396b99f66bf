//! `TurnQueue<T>` — payload mode.
//!
//! Every scheduled ticket is eventually popped exactly once, in nondecreasing
//! time order and FIFO within a tick.  There is no cancellation: a ticket is
//! valid from creation until it is popped.
//!
//! The queue is drained with a plain loop, which leaves the body free to
//! schedule more tickets while draining:
//!
//! ```rust
//! use tq_queue::TurnQueue;
//!
//! let mut q = TurnQueue::new();
//! q.schedule(2, "b")?;
//! q.schedule(1, "a")?;
//! let mut order = Vec::new();
//! while let Some(t) = q.try_pop() {
//!     order.push(t.payload);
//!     if t.payload == "a" {
//!         q.schedule(5, "c")?;
//!     }
//! }
//! assert_eq!(order, ["a", "b", "c"]);
//! # Ok::<(), tq_queue::QueueError>(())
//! ```

use std::fmt;

use tq_core::{QueueError, QueueResult, Tick, Ticket, TicketId};

use crate::QueueSnapshot;
use crate::heap::TicketHeap;

pub struct TurnQueue<T> {
    inner: TicketHeap<T>,
}

impl<T> Default for TurnQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TurnQueue<T> {
    /// An empty queue with its clock at `Tick::ZERO`.
    pub fn new() -> Self {
        Self::with_clock(Tick::ZERO)
    }

    /// An empty queue whose clock starts at `clock`.
    pub fn with_clock(clock: Tick) -> Self {
        Self { inner: TicketHeap::new(clock) }
    }

    /// Time of the most recently popped ticket.
    #[inline]
    pub fn clock(&self) -> Tick {
        self.inner.clock
    }

    /// Sequence number the next scheduled ticket will receive.
    #[inline]
    pub fn next_sequence(&self) -> TicketId {
        self.inner.next_sequence
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    #[inline]
    pub fn is_non_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Schedule `payload` to come due `interval` ticks after the current
    /// clock, returning a copy of the inserted ticket.
    ///
    /// # Errors
    /// [`QueueError::TimeOverflow`] if the due time exceeds `u64::MAX`; the
    /// queue is left unchanged.
    pub fn schedule(&mut self, interval: u64, payload: T) -> QueueResult<Ticket<T>>
    where
        T: Clone,
    {
        let ticket = self.inner.make_ticket(interval, payload)?;
        log::trace!("schedule seq={} due={}", ticket.sequence.0, ticket.time);
        self.inner.push(ticket.clone());
        Ok(ticket)
    }

    /// Like [`schedule`](Self::schedule) but returns only the ticket's id,
    /// for payloads that cannot be cloned.
    pub fn schedule_id(&mut self, interval: u64, payload: T) -> QueueResult<TicketId> {
        let ticket = self.inner.make_ticket(interval, payload)?;
        let id = ticket.sequence;
        log::trace!("schedule seq={} due={}", id.0, ticket.time);
        self.inner.push(ticket);
        Ok(id)
    }

    /// The next ticket due, without removing it.
    pub fn peek(&self) -> QueueResult<&Ticket<T>> {
        self.inner.peek().ok_or(QueueError::Empty)
    }

    /// Remove and return the next ticket due, advancing the clock to its time.
    pub fn pop(&mut self) -> QueueResult<Ticket<T>> {
        self.try_pop().ok_or(QueueError::Empty)
    }

    /// [`pop`](Self::pop) returning `None` on an empty queue.
    pub fn try_pop(&mut self) -> Option<Ticket<T>> {
        let ticket = self.inner.pop()?;
        log::trace!("pop seq={} clock={}", ticket.sequence.0, ticket.time);
        Some(ticket)
    }

    /// Pop every ticket in due order.
    pub fn drain(&mut self) -> impl Iterator<Item = Ticket<T>> + '_ {
        std::iter::from_fn(move || self.try_pop())
    }

    /// Heap contents in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Ticket<T>> {
        self.inner.iter()
    }

    /// Capture `(clock, next_sequence, tickets)`; tickets are in due order.
    pub fn snapshot(&self) -> QueueSnapshot<T>
    where
        T: Clone,
    {
        QueueSnapshot {
            clock: self.inner.clock,
            next_sequence: self.inner.next_sequence,
            tickets: self.inner.to_vec(),
        }
    }

    /// Rebuild a queue from a snapshot, re-establishing heap order.
    ///
    /// # Errors
    /// [`QueueError::Snapshot`] if a ticket's sequence is duplicated or not
    /// below `next_sequence`, or its window does not contain `clock`.
    pub fn restore(snapshot: QueueSnapshot<T>) -> QueueResult<Self> {
        let inner = TicketHeap::from_parts(
            snapshot.clock,
            snapshot.next_sequence,
            snapshot.tickets,
        )?;
        log::debug!("restored turn queue: clock={} tickets={}", inner.clock, inner.len());
        Ok(Self { inner })
    }
}

impl<T: fmt::Debug> fmt::Display for TurnQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TurnQueue(clock={}, next_sequence={}, heap=[",
            self.inner.clock.0, self.inner.next_sequence.0
        )?;
        for (i, t) in self.inner.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{t}")?;
        }
        f.write_str("])")
    }
}
