//! Bookkeeping for the background credential-refresh loop.
//!
//! The timer itself lives in `net::session_ops`; this module holds the
//! generation counter that makes start/stop idempotent. Every `start`
//! hands out a generation number the spawned loop must present on each
//! tick; `stop` (and restart) bumps the counter so any loop still sleeping
//! on an old generation exits at its next wake instead of mutating state.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

/// Refresh period, deliberately shorter than the server-side expiry of the
/// access credential so renewal normally happens before expiry.
pub const REFRESH_INTERVAL_SECS: u64 = 14 * 60;

#[derive(Clone, Debug, Default)]
pub struct TickGate {
    generation: u64,
    running: bool,
}

impl TickGate {
    /// Begin a run. Returns the generation for the new loop, or `None` if a
    /// loop is already running (double-start must not add a second timer).
    pub fn start(&mut self) -> Option<u64> {
        if self.running {
            return None;
        }
        self.running = true;
        self.generation += 1;
        Some(self.generation)
    }

    /// End the current run. Any pending tick is cancelled deterministically:
    /// its generation is no longer admitted.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    /// Whether a loop holding `generation` may act on a tick.
    #[must_use]
    pub fn admits(&self, generation: u64) -> bool {
        self.running && generation == self.generation
    }
}
