//! `tq-queue` — time-ordered turn queues.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`simple`]    | `TurnQueue<T>`: payload mode, no cancellation                 |
//! | [`actor`]     | `ActorQueue<A>`, `Schedulable`, `ScheduleHandle`, `Turn`      |
//! | [`snapshot`]  | `QueueSnapshot<T>`, `ActorSnapshot<A>`                         |
//!
//! # Ordering model (summary)
//!
//! Both modes share one min-heap keyed on `(time, sequence)`:
//!
//! ```text
//! schedule(interval)  → Ticket { time: clock + interval, insert_time: clock, sequence: n++ }
//! pop / advance       → clock = ticket.time
//! ```
//!
//! Popped times never decrease, and tickets due on the same tick come out in
//! the order they were scheduled.  Actor mode adds lazy invalidation: see
//! [`actor`] for the validity rule.
//!
//! All operations run synchronously on the caller's thread.  A queue is
//! `Send` when its payload is, but sharing one between threads needs
//! external serialization.

pub mod actor;
pub mod simple;
pub mod snapshot;

mod heap;


pub use actor::{ActorQueue, Schedulable, ScheduleHandle, Turn};
pub use simple::TurnQueue;
pub use snapshot::{ActorSnapshot, QueueSnapshot};

pub use tq_core::{ActorId, QueueError, QueueResult, Tick, Ticket, TicketId};
