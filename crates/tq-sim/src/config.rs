//! Run budgets.

use tq_core::Tick;

use crate::{SimError, SimResult};

/// Limits for one call to [`Runner::run`][crate::Runner::run] or
/// [`run_deferred`][crate::run_deferred].
///
/// Typically built in code, or loaded from a JSON/TOML file by the
/// application when the `serde` feature is enabled.  All fields default to
/// "no limit".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Last tick that may be processed.  The run stops before any ticket due
    /// after this tick; that ticket stays queued.
    pub until: Option<Tick>,

    /// Maximum number of turns per run.
    pub max_turns: Option<u64>,

    /// Purge garbage tickets after every N turns (actor mode only).  `None`
    /// never purges; stale entries are then only dropped as peeks reach them.
    pub purge_every: Option<u64>,
}

impl RunConfig {
    /// Run everything due at or before `tick`.
    pub fn until(tick: Tick) -> Self {
        Self { until: Some(tick), ..Self::default() }
    }

    pub fn with_max_turns(mut self, n: u64) -> Self {
        self.max_turns = Some(n);
        self
    }

    pub fn with_purge_every(mut self, n: u64) -> Self {
        self.purge_every = Some(n);
        self
    }

    /// # Errors
    /// [`SimError::Config`] if `purge_every` is zero.
    pub fn validate(&self) -> SimResult<()> {
        if self.purge_every == Some(0) {
            return Err(SimError::Config("purge_every must be at least 1".into()));
        }
        Ok(())
    }

    /// Whether a ticket due at `time` is beyond the time budget.
    #[inline]
    pub(crate) fn past_budget(&self, time: Tick) -> bool {
        self.until.is_some_and(|u| time > u)
    }

    #[inline]
    pub(crate) fn out_of_turns(&self, ran: u64) -> bool {
        self.max_turns.is_some_and(|m| ran >= m)
    }
}
