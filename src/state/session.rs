//! Core session state machine: status, errors, and operation lifecycle.
//!
//! Every session-mutating operation follows the same shape: `begin` clears
//! the last error, sets a transient status, and issues an [`OpTicket`]; the
//! remote call runs; a `finish_*` method commits the outcome. A completion
//! is applied only if its ticket is still the newest issued, so a slow,
//! superseded request can never clobber the result of a newer one
//! ("last issued wins"). `force_logout` is the one exception: it applies
//! unconditionally and invalidates every ticket still in flight.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use thiserror::Error;

use crate::net::types::{AuthResponse, RefreshResponse, User};

/// Discrete phase of the authentication lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    Anonymous,
    Authenticating,
    Authenticated,
    Verifying,
    /// A session probe has not resolved yet. Route guards hold rendering
    /// instead of redirecting while in this phase. This is also the initial
    /// status: the session is unknown until the startup probe answers.
    #[default]
    Checking,
    Refreshing,
}

/// Structured session error: the kind drives recovery policy, the message
/// is what the user sees.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Malformed input, rejected before any remote call.
    #[error("{0}")]
    Validation(String),
    /// The service rejected the supplied credentials or code.
    #[error("{0}")]
    Auth(String),
    /// The service could not be reached or answered with garbage.
    #[error("{0}")]
    Network(String),
    /// The refresh credential was rejected; the session is over.
    #[error("session expired, please sign in again")]
    SessionExpired,
}

/// Session-mutating operations that go through the ticket lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Register,
    VerifyEmail,
    Login,
    OauthLogin,
    Probe,
    Refresh,
    Resend,
}

/// Handle for one in-flight operation. Completions carrying a stale ticket
/// are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpTicket {
    seq: u64,
    pub kind: OpKind,
}

/// Outcome of the silent session probe. Not an error in either case:
/// "not logged in" is an ordinary answer, not an exceptional condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Probe {
    Authenticated(User),
    Anonymous,
}

/// Process-wide session state. One instance lives for the page lifetime,
/// held in an `RwSignal` provided via context; tests instantiate isolated
/// copies directly.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Present only while `status == Authenticated`.
    pub user: Option<User>,
    /// Identity of an in-progress registration, before the user has logged
    /// in. Kept apart from `user` so an unverified registration never looks
    /// authenticated.
    pub pending_user: Option<User>,
    pub status: Status,
    /// True once email verification succeeded for the current registration.
    pub verified: bool,
    /// Cleared at the start of every operation.
    pub last_error: Option<SessionError>,
    /// In-memory mirror of the durable access-credential slot. Presence is
    /// a hint for bootstrap, never a security boundary; the service is the
    /// source of truth.
    pub access_credential: Option<String>,
    /// Whether a refresh credential is believed to exist durably.
    pub refresh_credential_present: bool,
    issued_seq: u64,
}

impl SessionState {
    /// Start an operation: clear the last error, set the transient status,
    /// and issue a fresh ticket that supersedes all earlier ones.
    pub fn begin(&mut self, kind: OpKind) -> OpTicket {
        self.last_error = None;
        match kind {
            OpKind::Register | OpKind::Login | OpKind::OauthLogin => {
                self.status = Status::Authenticating;
            }
            OpKind::VerifyEmail => self.status = Status::Verifying,
            OpKind::Probe => self.status = Status::Checking,
            OpKind::Refresh => self.status = Status::Refreshing,
            // Resending a code does not change the session phase.
            OpKind::Resend => {}
        }
        self.issued_seq += 1;
        OpTicket {
            seq: self.issued_seq,
            kind,
        }
    }

    /// Whether a ticket is still the newest issued.
    #[must_use]
    pub fn is_current(&self, ticket: OpTicket) -> bool {
        ticket.seq == self.issued_seq
    }

    /// Commit a registration outcome. The returned user is held as
    /// `pending_user`: registration does not authenticate.
    ///
    /// # Errors
    ///
    /// Mirrors a failed outcome back to the caller.
    pub fn finish_register(
        &mut self,
        ticket: OpTicket,
        outcome: Result<User, SessionError>,
    ) -> Result<(), SessionError> {
        if !self.is_current(ticket) {
            return outcome.map(|_| ());
        }
        match outcome {
            Ok(user) => {
                self.pending_user = Some(user);
                self.status = Status::Anonymous;
                Ok(())
            }
            Err(err) => {
                self.status = Status::Anonymous;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Commit an email-verification outcome.
    ///
    /// # Errors
    ///
    /// Mirrors a failed outcome back to the caller.
    pub fn finish_verify(
        &mut self,
        ticket: OpTicket,
        outcome: Result<User, SessionError>,
    ) -> Result<(), SessionError> {
        if !self.is_current(ticket) {
            return outcome.map(|_| ());
        }
        match outcome {
            Ok(user) => {
                self.pending_user = Some(user);
                self.verified = true;
                self.status = Status::Anonymous;
                Ok(())
            }
            Err(err) => {
                self.status = Status::Anonymous;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Commit a password-login outcome. On success the session becomes
    /// authenticated and the credential slots are (re)established; callers
    /// persist the mirrored slots afterwards.
    ///
    /// # Errors
    ///
    /// Mirrors a failed outcome back to the caller.
    pub fn finish_login(
        &mut self,
        ticket: OpTicket,
        outcome: Result<AuthResponse, SessionError>,
    ) -> Result<(), SessionError> {
        if !self.is_current(ticket) {
            return outcome.map(|_| ());
        }
        match outcome {
            Ok(response) => {
                self.user = Some(response.user);
                self.pending_user = None;
                self.status = Status::Authenticated;
                if response.access_token.is_some() {
                    self.access_credential = response.access_token;
                }
                // The login response channel establishes the refresh
                // credential even when it is not echoed in the body.
                self.refresh_credential_present = true;
                Ok(())
            }
            Err(err) => {
                self.user = None;
                self.status = Status::Anonymous;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Commit an OAuth login: the token obtained from the provider
    /// handshake becomes the access credential, the probed profile becomes
    /// the user.
    ///
    /// # Errors
    ///
    /// Mirrors a failed outcome back to the caller.
    pub fn finish_oauth(
        &mut self,
        ticket: OpTicket,
        token: &str,
        outcome: Result<User, SessionError>,
    ) -> Result<(), SessionError> {
        if !self.is_current(ticket) {
            return outcome.map(|_| ());
        }
        match outcome {
            Ok(user) => {
                self.user = Some(user);
                self.pending_user = None;
                self.status = Status::Authenticated;
                self.access_credential = Some(token.to_owned());
                self.refresh_credential_present = true;
                Ok(())
            }
            Err(err) => {
                self.user = None;
                self.status = Status::Anonymous;
                self.access_credential = None;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Commit a probe answer. Never records an error: an anonymous answer
    /// quietly lands the session in `Anonymous`.
    pub fn apply_probe(&mut self, ticket: OpTicket, probe: Probe) {
        if !self.is_current(ticket) {
            return;
        }
        match probe {
            Probe::Authenticated(user) => {
                self.user = Some(user);
                self.status = Status::Authenticated;
            }
            Probe::Anonymous => {
                self.user = None;
                self.status = Status::Anonymous;
                self.last_error = None;
            }
        }
    }

    /// Commit a credential-refresh outcome. Any failure ends the session:
    /// both slots are cleared and the caller is expected to also clear the
    /// durable copies.
    ///
    /// # Errors
    ///
    /// Mirrors a failed outcome back to the caller.
    pub fn finish_refresh(
        &mut self,
        ticket: OpTicket,
        outcome: Result<RefreshResponse, SessionError>,
    ) -> Result<(), SessionError> {
        if !self.is_current(ticket) {
            return outcome.map(|_| ());
        }
        match outcome {
            Ok(response) => {
                self.user = Some(response.user);
                self.access_credential = Some(response.access_token);
                self.refresh_credential_present = true;
                self.status = Status::Authenticated;
                Ok(())
            }
            Err(err) => {
                self.user = None;
                self.access_credential = None;
                self.refresh_credential_present = false;
                self.status = Status::Anonymous;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Commit a resend-code outcome. Success leaves the session phase
    /// untouched; failure drops to `Anonymous` with the error recorded but
    /// not re-signaled (the banner is enough for this non-critical path).
    pub fn finish_resend(&mut self, ticket: OpTicket, outcome: Result<(), SessionError>) {
        if !self.is_current(ticket) {
            return;
        }
        match outcome {
            Ok(()) => self.last_error = None,
            Err(err) => {
                self.status = Status::Anonymous;
                self.last_error = Some(err);
            }
        }
    }

    /// Unconditional local logout. Applies regardless of any in-flight
    /// operation and invalidates every outstanding ticket, so a slow login
    /// completion cannot resurrect the session afterwards.
    pub fn force_logout(&mut self) {
        self.user = None;
        self.pending_user = None;
        self.verified = false;
        self.status = Status::Anonymous;
        self.last_error = None;
        self.access_credential = None;
        self.refresh_credential_present = false;
        self.issued_seq += 1;
    }

    /// Record a locally-caught error without starting an operation.
    pub fn reject(&mut self, err: &SessionError) {
        self.last_error = Some(err.clone());
    }
}

/// Structural email check, run before any remote call.
///
/// # Errors
///
/// Returns `SessionError::Validation` when the address is malformed.
pub fn validate_email(email: &str) -> Result<(), SessionError> {
    let well_formed = !email.contains(char::is_whitespace)
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
    if well_formed {
        Ok(())
    } else {
        Err(SessionError::Validation(
            "enter a valid email address".to_owned(),
        ))
    }
}

/// Minimum password length accepted client-side.
///
/// # Errors
///
/// Returns `SessionError::Validation` when the password is too short.
pub fn validate_password(password: &str) -> Result<(), SessionError> {
    if password.len() >= 6 {
        Ok(())
    } else {
        Err(SessionError::Validation(
            "password must be at least 6 characters".to_owned(),
        ))
    }
}

/// # Errors
///
/// Returns `SessionError::Validation` when the name is blank.
pub fn validate_name(name: &str) -> Result<(), SessionError> {
    if name.trim().is_empty() {
        Err(SessionError::Validation("enter your name".to_owned()))
    } else {
        Ok(())
    }
}
