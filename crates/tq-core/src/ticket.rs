//! `Ticket` — one scheduled occurrence.
//!
//! A ticket is an immutable record created only by a queue, so its
//! `insert_time` and `sequence` are authoritative.  All queries take the
//! caller's notion of "now" explicitly; asking at any time gives a defined
//! answer (negative `time_left` once the ticket is overdue, and so on).
//!
//! # Ordering
//!
//! ```text
//! a < b  ⇔  a.time < b.time  ∨  (a.time == b.time ∧ a.sequence < b.sequence)
//! ```
//!
//! The payload never takes part in comparison.  Because sequence numbers are
//! unique per queue, this is a total order among one queue's tickets and
//! gives strict FIFO among tickets due on the same tick.

use std::cmp::Ordering;
use std::fmt;

use crate::{QueueError, QueueResult, Tick, TicketId};

/// A scheduled occurrence carrying a payload of type `T`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticket<T> {
    /// Tick at which this ticket becomes due.  Always `>= insert_time`.
    pub time: Tick,
    /// The owning queue's clock when the ticket was created.
    pub insert_time: Tick,
    /// Queue-assigned sequence number; also the ticket's identity.
    pub sequence: TicketId,
    pub payload: T,
}

impl<T> Ticket<T> {
    /// Build a ticket due `interval` ticks after `now`.
    ///
    /// Queues are the only intended callers; a ticket built by hand has no
    /// meaning until it is restored into a queue through a snapshot.
    ///
    /// # Errors
    /// [`QueueError::TimeOverflow`] if `now + interval` exceeds `u64::MAX`.
    pub fn new(now: Tick, interval: u64, sequence: TicketId, payload: T) -> QueueResult<Self> {
        let time = now
            .checked_offset(interval)
            .ok_or(QueueError::TimeOverflow { clock: now, interval })?;
        Ok(Self {
            time,
            insert_time: now,
            sequence,
            payload,
        })
    }

    #[inline]
    pub fn id(&self) -> TicketId {
        self.sequence
    }

    /// Length of the scheduled window, `time - insert_time`.
    #[inline]
    pub fn interval(&self) -> u64 {
        self.time - self.insert_time
    }

    /// Ticks elapsed since creation, `now - insert_time`.
    #[inline]
    pub fn time_passed(&self, now: Tick) -> i64 {
        now.signed_diff(self.insert_time)
    }

    /// Ticks remaining until due, `time - now`.
    #[inline]
    pub fn time_left(&self, now: Tick) -> i64 {
        self.time.signed_diff(now)
    }

    /// Fraction of the window elapsed at `now`: `0.0` at `insert_time`,
    /// `1.0` at `time`, linear in between.
    ///
    /// # Errors
    /// [`QueueError::DegenerateInterval`] when the window has zero length.
    pub fn progress(&self, now: Tick) -> QueueResult<f64> {
        match self.interval() {
            0 => Err(QueueError::DegenerateInterval { ticket: self.sequence }),
            n => Ok(self.time_passed(now) as f64 / n as f64),
        }
    }
}

impl<T> PartialEq for Ticket<T> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl<T> Eq for Ticket<T> {}

impl<T> PartialOrd for Ticket<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Ticket<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl<T: fmt::Debug> fmt::Display for Ticket<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket(time={}, insert_time={}, seq={}, payload={:?})",
            self.time.0, self.insert_time.0, self.sequence.0, self.payload
        )
    }
}
