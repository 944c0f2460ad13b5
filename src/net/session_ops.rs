//! Async session operations: the glue between UI events, the remote
//! service, and the state machines.
//!
//! Each operation validates locally, begins a ticketed transition on the
//! session state, performs the remote call, and commits the outcome. The
//! durable credential slots are persisted or cleared here, alongside the
//! in-memory mirror. The background refresh loop also lives here as
//! [`RefreshScheduler`].

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use crate::net::api;
use crate::state::SessionContext;
use crate::state::scheduler::TickGate;
use crate::state::session::{
    OpKind, OpTicket, Probe, SessionError, SessionState, validate_email, validate_name,
    validate_password,
};
use crate::state::verification::{VerificationFlow, validate_code};
use crate::util::credentials;

fn state_dropped() -> SessionError {
    SessionError::Network("session state dropped".to_owned())
}

fn begin(cx: SessionContext, kind: OpKind) -> Option<OpTicket> {
    cx.state.try_update(|s| s.begin(kind))
}

fn is_current(cx: SessionContext, ticket: OpTicket) -> bool {
    cx.state
        .try_with_untracked(|s| s.is_current(ticket))
        .unwrap_or(false)
}

/// Record a locally-caught error without starting an operation.
fn reject(cx: SessionContext, err: SessionError) -> SessionError {
    cx.state.update(|s| s.reject(&err));
    err
}

/// Load the durable credential slots into the in-memory mirror. Run once
/// at startup, before the initial probe.
pub fn bootstrap(cx: SessionContext) {
    let access = credentials::load_access();
    let refresh_present = credentials::load_refresh().is_some();
    cx.state.update(|s| {
        s.access_credential = access;
        s.refresh_credential_present = refresh_present;
    });
}

/// Register a new account. On success the verification flow moves to
/// `CodeSent`; the session stays unauthenticated until login.
///
/// # Errors
///
/// Validation errors never leave the client; remote errors are recorded in
/// `last_error` and returned so the calling flow can react.
pub async fn register(
    cx: SessionContext,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), SessionError> {
    if let Err(err) = validate_name(name)
        .and_then(|()| validate_email(email))
        .and_then(|()| validate_password(password))
    {
        return Err(reject(cx, err));
    }

    let Some(ticket) = begin(cx, OpKind::Register) else {
        return Err(state_dropped());
    };
    let outcome = api::register(name, email, password).await.map(|r| r.user);
    let result = cx
        .state
        .try_update(|s| s.finish_register(ticket, outcome))
        .unwrap_or_else(|| Err(state_dropped()));
    if result.is_ok() && is_current(cx, ticket) {
        cx.flow.update(VerificationFlow::on_registered);
    }
    result
}

/// Submit the emailed 6-digit code.
///
/// # Errors
///
/// Same policy as [`register`]. A wrong code leaves the flow on `CodeSent`
/// with one attempt burned.
pub async fn verify_email(cx: SessionContext, code: &str) -> Result<(), SessionError> {
    if let Err(err) = validate_code(code) {
        return Err(reject(cx, err));
    }
    let gate = cx
        .flow
        .try_with_untracked(VerificationFlow::can_verify)
        .unwrap_or_else(|| Err(state_dropped()));
    if let Err(err) = gate {
        return Err(reject(cx, err));
    }

    let Some(ticket) = begin(cx, OpKind::VerifyEmail) else {
        return Err(state_dropped());
    };
    let outcome = api::verify_email(code).await.map(|r| r.user);
    let result = cx
        .state
        .try_update(|s| s.finish_verify(ticket, outcome))
        .unwrap_or_else(|| Err(state_dropped()));
    if is_current(cx, ticket) {
        match &result {
            Ok(()) => cx.flow.update(VerificationFlow::on_verify_ok),
            Err(err) => cx.flow.update(|f| f.on_verify_err(err)),
        }
    }
    result
}

/// Log in with email and password. On success the access credential is
/// persisted and a `Verified` flow is marked `Completed`.
///
/// # Errors
///
/// Same policy as [`register`]; failure drops the session to `Anonymous`.
pub async fn login(cx: SessionContext, email: &str, password: &str) -> Result<(), SessionError> {
    if let Err(err) = validate_email(email).and_then(|()| validate_password(password)) {
        return Err(reject(cx, err));
    }

    let Some(ticket) = begin(cx, OpKind::Login) else {
        return Err(state_dropped());
    };
    let outcome = api::login(email, password).await;
    let refresh_token = outcome
        .as_ref()
        .ok()
        .and_then(|r| r.refresh_token.clone());
    let result = cx
        .state
        .try_update(|s| s.finish_login(ticket, outcome))
        .unwrap_or_else(|| Err(state_dropped()));
    if result.is_ok() && is_current(cx, ticket) {
        persist_slots(cx, refresh_token.as_deref());
        cx.flow.update(VerificationFlow::on_login);
    }
    result
}

/// Complete an OAuth login with the token posted back by the provider
/// popup (see `net::oauth::popup_handshake`).
///
/// # Errors
///
/// Same policy as [`login`].
pub async fn oauth_login(
    cx: SessionContext,
    token: &str,
    provider: &str,
) -> Result<(), SessionError> {
    let Some(ticket) = begin(cx, OpKind::OauthLogin) else {
        return Err(state_dropped());
    };
    let outcome = api::get_me(Some(token)).await;
    let result = cx
        .state
        .try_update(|s| s.finish_oauth(ticket, token, outcome))
        .unwrap_or_else(|| Err(state_dropped()));
    if is_current(cx, ticket) {
        match &result {
            Ok(()) => {
                leptos::logging::log!("signed in via {provider}");
                persist_slots(cx, None);
                cx.flow.update(VerificationFlow::on_login);
            }
            Err(_) => credentials::clear(),
        }
    }
    result
}

/// Silent probe of the current authentication state. Never fails from the
/// caller's point of view: an unreachable or rejecting service is reported
/// as [`Probe::Anonymous`] and no error banner is raised.
pub async fn fetch_current_user(cx: SessionContext) -> Probe {
    let Some(ticket) = begin(cx, OpKind::Probe) else {
        return Probe::Anonymous;
    };
    let probe = match api::get_me(None).await {
        Ok(user) => Probe::Authenticated(user),
        Err(_) => Probe::Anonymous,
    };
    let _ = cx.state.try_update(|s| s.apply_probe(ticket, probe.clone()));
    probe
}

/// Renew the access credential from the refresh credential. Any failure
/// ends the session: both durable slots are cleared and `SessionExpired`
/// is returned (the scheduler reacts with a full logout).
///
/// # Errors
///
/// Returns `SessionError::SessionExpired` when the service rejects the
/// refresh.
pub async fn refresh_credential(cx: SessionContext) -> Result<(), SessionError> {
    let Some(ticket) = begin(cx, OpKind::Refresh) else {
        return Err(state_dropped());
    };
    let outcome = api::refresh_token().await;
    let result = cx
        .state
        .try_update(|s| s.finish_refresh(ticket, outcome))
        .unwrap_or_else(|| Err(state_dropped()));
    if is_current(cx, ticket) {
        match &result {
            Ok(()) => persist_slots(cx, None),
            Err(_) => credentials::clear(),
        }
    }
    result
}

/// Ask for a fresh verification code. Errors land in `last_error` only;
/// this path is not critical enough to interrupt the flow.
pub async fn resend_verification_code(cx: SessionContext) {
    let can_resend = cx
        .flow
        .try_with_untracked(VerificationFlow::can_resend)
        .unwrap_or(false);
    if !can_resend {
        let _ = reject(
            cx,
            SessionError::Validation("no verification in progress".to_owned()),
        );
        return;
    }

    let Some(ticket) = begin(cx, OpKind::Resend) else {
        return;
    };
    let outcome = api::resend_email().await;
    let ok = outcome.is_ok();
    let _ = cx.state.try_update(|s| s.finish_resend(ticket, outcome));
    if ok && is_current(cx, ticket) {
        cx.flow.update(VerificationFlow::on_resent);
    }
}

/// End the session. The remote revoke is best-effort; local state and both
/// durable slots are cleared no matter what, so the user can always get
/// out, dead network included.
pub async fn logout(cx: SessionContext) {
    api::logout().await;
    let _ = cx.state.try_update(SessionState::force_logout);
    let _ = cx.flow.try_update(|f| *f = VerificationFlow::default());
    credentials::clear();
}

/// Write the mirrored slots out to durable storage after a successful
/// credential-bearing operation.
fn persist_slots(cx: SessionContext, refresh_token: Option<&str>) {
    let access = cx
        .state
        .try_with_untracked(|s| s.access_credential.clone())
        .flatten();
    if let Some(token) = access {
        credentials::store_access(&token);
    }
    if let Some(token) = refresh_token {
        credentials::store_refresh(token);
    }
}

/// Recurring background renewal of the access credential.
///
/// Started once when the application mounts and stopped on unmount. The
/// [`TickGate`] generation counter makes both directions idempotent: a
/// second `start` adds no timer, and `stop` retires any sleeping loop at
/// its next wake. A failed tick performs a full logout so the user is
/// never left holding a silently-expired session, but the loop keeps
/// ticking so a later login is renewed again without a remount.
#[derive(Clone, Default)]
pub struct RefreshScheduler {
    gate: Rc<RefCell<TickGate>>,
}

impl RefreshScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, cx: SessionContext) {
        let Some(generation) = self.gate.borrow_mut().start() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        {
            let gate = Rc::clone(&self.gate);
            leptos::task::spawn_local(async move {
                loop {
                    gloo_timers::future::sleep(std::time::Duration::from_secs(
                        crate::state::scheduler::REFRESH_INTERVAL_SECS,
                    ))
                    .await;
                    if !gate.borrow().admits(generation) {
                        break;
                    }
                    if refresh_credential(cx).await.is_err() {
                        leptos::logging::warn!("credential refresh failed, ending session");
                        logout(cx).await;
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (generation, cx);
        }
    }

    pub fn stop(&self) {
        self.gate.borrow_mut().stop();
    }
}
