//! Route admission: a pure decision over the session status.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::session::Status;

/// Where the anonymous entry point and the authenticated landing live.
pub const LOGIN_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// The two guard variants a route boundary can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    /// Admits only authenticated sessions.
    Protected,
    /// Admits only sessions that are not authenticated.
    AnonymousOnly,
}

/// What the route boundary should render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Admit,
    /// The session is still being probed or refreshed: show a neutral
    /// loading state, never a redirect, so the initial probe cannot race
    /// the router into a flash-redirect.
    Pending,
    Redirect(&'static str),
}

/// Evaluated on every render of a route boundary.
#[must_use]
pub fn admission(status: Status, kind: GuardKind) -> Admission {
    if matches!(status, Status::Checking | Status::Refreshing) {
        return Admission::Pending;
    }
    let authenticated = status == Status::Authenticated;
    match kind {
        GuardKind::Protected if authenticated => Admission::Admit,
        GuardKind::Protected => Admission::Redirect(LOGIN_PATH),
        GuardKind::AnonymousOnly if authenticated => Admission::Redirect(DASHBOARD_PATH),
        GuardKind::AnonymousOnly => Admission::Admit,
    }
}
