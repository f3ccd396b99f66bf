//! `tq-core` — foundational types for the `turnq` turn scheduler.
//!
//! This crate is a dependency of every other `tq-*` crate.  It has no `tq-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ActorId`, `TicketId`                                 |
//! | [`time`]        | `Tick`                                                |
//! | [`ticket`]      | `Ticket<T>` and its progress queries                  |
//! | [`error`]       | `QueueError`, `QueueResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by queue snapshots in `tq-queue`.                 |

pub mod error;
pub mod ids;
pub mod ticket;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{QueueError, QueueResult};
pub use ids::{ActorId, TicketId};
pub use ticket::Ticket;
pub use time::Tick;
