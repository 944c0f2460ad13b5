//! Shared client-side session state modules.
//!
//! DESIGN
//! ======
//! The session core is split into plain, natively-testable machines:
//! `session` (status + operation lifecycle), `verification` (the
//! register → verify → login flow), `guard` (route admission decisions),
//! and `scheduler` (background refresh bookkeeping). Browser I/O never
//! lives here; `net/` and `util/` drive these machines.

pub mod guard;
pub mod scheduler;
pub mod session;
pub mod verification;

use leptos::prelude::RwSignal;

use session::SessionState;
use verification::VerificationFlow;

/// Reactive handles for the session core, provided via context from `App`.
///
/// `Copy` so event handlers and spawned tasks can capture it freely.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: RwSignal<SessionState>,
    pub flow: RwSignal<VerificationFlow>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(SessionState::default()),
            flow: RwSignal::new(VerificationFlow::default()),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
