//! Scheduler error type.
//!
//! Every variant is a local, synchronous failure raised before any queue
//! state is mutated.  A turn handler that returns without rescheduling or
//! clearing is not represented here: that is a programmer error and panics.

use thiserror::Error;

use crate::{ActorId, Tick, TicketId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("turn queue is empty")]
    Empty,

    #[error("ticket {ticket} has a zero-length interval; progress is undefined")]
    DegenerateInterval { ticket: TicketId },

    #[error("{actor} already holds a current ticket; use reschedule_in from its turn")]
    AlreadyScheduled { actor: ActorId },

    /// The handle used does not own the ticket being processed for `active`.
    #[error("reschedule from a handle that does not own the active ticket of {active}")]
    NotActive { active: ActorId },

    #[error("{actor} already rescheduled during this turn")]
    AlreadyRescheduled { actor: ActorId },

    #[error("{actor} does not exist in this queue")]
    UnknownActor { actor: ActorId },

    #[error("scheduling {interval} ticks after {clock} overflows the tick range")]
    TimeOverflow { clock: Tick, interval: u64 },

    #[error("inconsistent snapshot: {0}")]
    Snapshot(String),
}

/// Shorthand result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;
