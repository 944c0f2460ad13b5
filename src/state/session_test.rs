use super::*;
use crate::net::types::{AuthResponse, RefreshResponse, User};
use crate::state::verification::{Stage, VerificationFlow};

fn user(email: &str) -> User {
    User {
        id: "u-1".to_owned(),
        name: "Ann".to_owned(),
        email: email.to_owned(),
        last_login: None,
    }
}

fn auth_response(email: &str) -> AuthResponse {
    AuthResponse {
        user: user(email),
        access_token: Some("acc-1".to_owned()),
        refresh_token: Some("ref-1".to_owned()),
    }
}

fn refresh_response(email: &str) -> RefreshResponse {
    RefreshResponse {
        access_token: "acc-2".to_owned(),
        user: user(email),
    }
}

fn authenticated(email: &str) -> SessionState {
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::Login);
    state
        .finish_login(ticket, Ok(auth_response(email)))
        .expect("login");
    state
}

/// `user != null` implies `status == Authenticated`, checked after every
/// mutation in these tests.
fn assert_invariant(state: &SessionState) {
    if state.user.is_some() {
        assert_eq!(state.status, Status::Authenticated);
    }
}

// =============================================================
// Defaults and operation lifecycle
// =============================================================

#[test]
fn default_state_is_checking_with_no_user() {
    let state = SessionState::default();
    assert_eq!(state.status, Status::Checking);
    assert!(state.user.is_none());
    assert!(state.pending_user.is_none());
    assert!(state.last_error.is_none());
    assert!(state.access_credential.is_none());
    assert!(!state.refresh_credential_present);
}

#[test]
fn begin_clears_last_error_and_sets_transient_status() {
    let mut state = SessionState::default();
    state.last_error = Some(SessionError::Auth("old".to_owned()));

    state.begin(OpKind::Login);
    assert!(state.last_error.is_none());
    assert_eq!(state.status, Status::Authenticating);

    state.begin(OpKind::VerifyEmail);
    assert_eq!(state.status, Status::Verifying);
    state.begin(OpKind::Probe);
    assert_eq!(state.status, Status::Checking);
    state.begin(OpKind::Refresh);
    assert_eq!(state.status, Status::Refreshing);
}

#[test]
fn begin_resend_keeps_current_status() {
    let mut state = authenticated("ann@x.com");
    state.begin(OpKind::Resend);
    assert_eq!(state.status, Status::Authenticated);
}

// =============================================================
// Login
// =============================================================

#[test]
fn login_success_authenticates_and_stores_credentials() {
    let state = authenticated("ann@x.com");
    assert_eq!(state.status, Status::Authenticated);
    assert_eq!(state.user.as_ref().map(|u| u.email.as_str()), Some("ann@x.com"));
    assert_eq!(state.access_credential.as_deref(), Some("acc-1"));
    assert!(state.refresh_credential_present);
    assert_invariant(&state);
}

#[test]
fn login_failure_returns_to_anonymous_with_error() {
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::Login);
    let err = SessionError::Auth("bad credentials".to_owned());

    let result = state.finish_login(ticket, Err(err.clone()));
    assert_eq!(result, Err(err.clone()));
    assert_eq!(state.status, Status::Anonymous);
    assert_eq!(state.last_error, Some(err));
    assert!(state.user.is_none());
    assert_invariant(&state);
}

#[test]
fn login_without_body_tokens_still_marks_refresh_credential() {
    // Cookie-channel deployments omit tokens from the response body.
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::Login);
    let response = AuthResponse {
        user: user("ann@x.com"),
        access_token: None,
        refresh_token: None,
    };
    state.finish_login(ticket, Ok(response)).expect("login");
    assert!(state.refresh_credential_present);
    assert!(state.access_credential.is_none());
}

// =============================================================
// Ordering: last issued wins
// =============================================================

#[test]
fn stale_completion_is_discarded() {
    let mut state = SessionState::default();
    let old = state.begin(OpKind::Login);
    let new = state.begin(OpKind::Login);

    // The older request resolves after the newer one was issued.
    let _ = state.finish_login(old, Ok(auth_response("old@x.com")));
    assert!(state.user.is_none());
    assert_eq!(state.status, Status::Authenticating);

    state
        .finish_login(new, Ok(auth_response("new@x.com")))
        .expect("current login");
    assert_eq!(state.user.as_ref().map(|u| u.email.as_str()), Some("new@x.com"));
    assert_invariant(&state);
}

#[test]
fn late_login_cannot_resurrect_a_logged_out_session() {
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::Login);

    state.force_logout();
    let _ = state.finish_login(ticket, Ok(auth_response("ann@x.com")));

    assert_eq!(state.status, Status::Anonymous);
    assert!(state.user.is_none());
    assert!(state.access_credential.is_none());
    assert_invariant(&state);
}

#[test]
fn stale_refresh_failure_does_not_wipe_newer_session() {
    let mut state = SessionState::default();
    let stale = state.begin(OpKind::Refresh);
    let login = state.begin(OpKind::Login);
    state
        .finish_login(login, Ok(auth_response("ann@x.com")))
        .expect("login");

    let _ = state.finish_refresh(stale, Err(SessionError::SessionExpired));
    assert_eq!(state.status, Status::Authenticated);
    assert!(state.user.is_some());
    assert_invariant(&state);
}

// =============================================================
// Register / verify
// =============================================================

#[test]
fn register_success_holds_pending_user_not_user() {
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::Register);
    state
        .finish_register(ticket, Ok(user("ann@x.com")))
        .expect("register");

    assert!(state.user.is_none());
    assert_eq!(state.status, Status::Anonymous);
    assert_eq!(
        state.pending_user.as_ref().map(|u| u.email.as_str()),
        Some("ann@x.com")
    );
    assert_invariant(&state);
}

#[test]
fn verify_success_sets_verified_flag() {
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::VerifyEmail);
    state
        .finish_verify(ticket, Ok(user("ann@x.com")))
        .expect("verify");
    assert!(state.verified);
    assert!(state.user.is_none());
    assert_invariant(&state);
}

// =============================================================
// Probe
// =============================================================

#[test]
fn probe_success_authenticates() {
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::Probe);
    state.apply_probe(ticket, Probe::Authenticated(user("ann@x.com")));
    assert_eq!(state.status, Status::Authenticated);
    assert_invariant(&state);
}

#[test]
fn probe_failure_is_quietly_anonymous() {
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::Probe);
    state.apply_probe(ticket, Probe::Anonymous);
    assert_eq!(state.status, Status::Anonymous);
    assert!(state.last_error.is_none());
    assert!(state.user.is_none());
}

// =============================================================
// Refresh
// =============================================================

#[test]
fn refresh_success_rotates_access_credential() {
    let mut state = authenticated("ann@x.com");
    let ticket = state.begin(OpKind::Refresh);
    state
        .finish_refresh(ticket, Ok(refresh_response("ann@x.com")))
        .expect("refresh");
    assert_eq!(state.access_credential.as_deref(), Some("acc-2"));
    assert_eq!(state.status, Status::Authenticated);
    assert_invariant(&state);
}

#[test]
fn refresh_failure_clears_session_and_slots() {
    let mut state = authenticated("ann@x.com");
    let ticket = state.begin(OpKind::Refresh);

    let result = state.finish_refresh(ticket, Err(SessionError::SessionExpired));
    assert_eq!(result, Err(SessionError::SessionExpired));
    assert_eq!(state.status, Status::Anonymous);
    assert!(state.user.is_none());
    assert!(state.access_credential.is_none());
    assert!(!state.refresh_credential_present);
    assert_invariant(&state);
}

#[test]
fn refresh_resumes_after_failure_and_relogin() {
    // The scheduler outlives a forced logout, so a session started after a
    // failed tick must still accept later refreshes.
    let mut state = authenticated("ann@x.com");
    let ticket = state.begin(OpKind::Refresh);
    let _ = state.finish_refresh(ticket, Err(SessionError::SessionExpired));
    assert_eq!(state.status, Status::Anonymous);

    let ticket = state.begin(OpKind::Login);
    state
        .finish_login(ticket, Ok(auth_response("ann@x.com")))
        .expect("login");

    let ticket = state.begin(OpKind::Refresh);
    state
        .finish_refresh(ticket, Ok(refresh_response("ann@x.com")))
        .expect("refresh after relogin");
    assert_eq!(state.status, Status::Authenticated);
    assert_eq!(state.access_credential.as_deref(), Some("acc-2"));
    assert_invariant(&state);
}

// =============================================================
// Resend / logout
// =============================================================

#[test]
fn resend_success_keeps_status_and_clears_error() {
    let mut state = authenticated("ann@x.com");
    let ticket = state.begin(OpKind::Resend);
    state.finish_resend(ticket, Ok(()));
    assert_eq!(state.status, Status::Authenticated);
    assert!(state.last_error.is_none());
}

#[test]
fn resend_failure_drops_to_anonymous_with_error() {
    let mut state = SessionState::default();
    let ticket = state.begin(OpKind::Resend);
    state.finish_resend(ticket, Err(SessionError::Network("down".to_owned())));
    assert_eq!(state.status, Status::Anonymous);
    assert!(state.last_error.is_some());
}

#[test]
fn logout_always_ends_the_session() {
    // The remote revoke failing changes nothing: ops call `force_logout`
    // unconditionally, and the reset itself has no failure path.
    let mut state = authenticated("ann@x.com");
    state.force_logout();
    assert_eq!(state.status, Status::Anonymous);
    assert!(state.user.is_none());
    assert!(state.pending_user.is_none());
    assert!(!state.verified);
    assert!(state.access_credential.is_none());
    assert!(!state.refresh_credential_present);
    assert_invariant(&state);
}

// =============================================================
// Validation
// =============================================================

#[test]
fn reject_records_error_without_marking_busy() {
    let mut state = SessionState::default();
    state.reject(&SessionError::Validation("password too short".to_owned()));
    assert_eq!(state.status, Status::Checking);
    assert!(state.last_error.is_some());

    // A locally-caught error also leaves in-flight ordering alone.
    let mut state = authenticated("ann@x.com");
    let ticket = state.begin(OpKind::Refresh);
    state.reject(&SessionError::Validation("password too short".to_owned()));
    assert_eq!(state.status, Status::Refreshing);
    assert!(state.is_current(ticket));
}

#[test]
fn email_validation_rejects_malformed_addresses() {
    assert!(validate_email("ann@x.com").is_ok());
    for bad in ["", "ann", "@x.com", "ann@", "ann@x", "a nn@x.com", "ann@.com"] {
        assert!(validate_email(bad).is_err(), "accepted {bad:?}");
    }
}

#[test]
fn password_validation_requires_six_chars() {
    assert!(validate_password("secret1").is_ok());
    assert!(validate_password("short").is_err());
}

#[test]
fn name_validation_rejects_blank() {
    assert!(validate_name("Ann").is_ok());
    assert!(validate_name("   ").is_err());
}

// =============================================================
// End-to-end scenario over both machines
// =============================================================

#[test]
fn register_verify_login_scenario() {
    let mut state = SessionState::default();
    let mut flow = VerificationFlow::default();

    // register("Ann", "ann@x.com", "secret1") succeeds.
    let ticket = state.begin(OpKind::Register);
    state
        .finish_register(ticket, Ok(user("ann@x.com")))
        .expect("register");
    flow.on_registered();
    assert_eq!(flow.stage, Stage::CodeSent);
    assert_invariant(&state);

    // verifyEmail("000000") is wrong: stage stays CodeSent, error recorded.
    let ticket = state.begin(OpKind::VerifyEmail);
    let wrong = state.finish_verify(ticket, Err(SessionError::Auth("wrong code".to_owned())));
    assert!(wrong.is_err());
    flow.on_verify_err(&SessionError::Auth("wrong code".to_owned()));
    assert_eq!(flow.stage, Stage::CodeSent);
    assert!(state.last_error.is_some());
    assert_invariant(&state);

    // The correct code advances to Verified.
    let ticket = state.begin(OpKind::VerifyEmail);
    state
        .finish_verify(ticket, Ok(user("ann@x.com")))
        .expect("verify");
    flow.on_verify_ok();
    assert_eq!(flow.stage, Stage::Verified);
    assert!(state.verified);

    // login("ann@x.com", "secret1") authenticates and completes the flow.
    let ticket = state.begin(OpKind::Login);
    state
        .finish_login(ticket, Ok(auth_response("ann@x.com")))
        .expect("login");
    flow.on_login();
    assert_eq!(flow.stage, Stage::Completed);
    assert_eq!(state.status, Status::Authenticated);
    assert_eq!(state.user.as_ref().map(|u| u.email.as_str()), Some("ann@x.com"));
    assert_invariant(&state);
}
