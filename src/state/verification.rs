//! Verification flow: the stage machine between registering and logging in.
//!
//! Registration makes the server send a 6-digit code as a side effect, so a
//! successful register lands the flow directly on `CodeSent` (the
//! "registered" moment is never observable on its own). A correct code
//! advances to `Verified`; a wrong code stays on `CodeSent` and burns one
//! attempt. After [`MAX_CODE_ATTEMPTS`] wrong codes further attempts are
//! refused locally until a resend. Logging in from `Verified` completes the
//! flow; the flow never authenticates anyone by itself.

#[cfg(test)]
#[path = "verification_test.rs"]
mod verification_test;

use crate::state::session::SessionError;

/// Wrong codes tolerated before requiring a fresh one.
pub const MAX_CODE_ATTEMPTS: u8 = 5;

/// Stage of the registration → verification → login sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    /// No registration in progress.
    #[default]
    Inactive,
    /// A code has been emailed and is awaited.
    CodeSent,
    /// The email is verified; login is the next step.
    Verified,
    /// The user has since logged in through the normal login path.
    Completed,
}

#[derive(Clone, Debug, Default)]
pub struct VerificationFlow {
    pub stage: Stage,
    attempts: u8,
}

impl VerificationFlow {
    /// A registration succeeded; the server has already sent the code.
    pub fn on_registered(&mut self) {
        self.stage = Stage::CodeSent;
        self.attempts = 0;
    }

    /// Whether a verification attempt may be made right now.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` when no code is pending or the
    /// attempt budget is spent.
    pub fn can_verify(&self) -> Result<(), SessionError> {
        match self.stage {
            Stage::CodeSent if self.attempts < MAX_CODE_ATTEMPTS => Ok(()),
            Stage::CodeSent => Err(SessionError::Validation(
                "too many incorrect codes, request a new one".to_owned(),
            )),
            _ => Err(SessionError::Validation(
                "no verification in progress".to_owned(),
            )),
        }
    }

    pub fn on_verify_ok(&mut self) {
        self.stage = Stage::Verified;
    }

    /// A failed verification: the stage does not move. Only an `Auth`
    /// rejection (wrong or expired code) burns an attempt; a transport
    /// failure says nothing about the code and leaves the budget intact.
    pub fn on_verify_err(&mut self, err: &SessionError) {
        if matches!(err, SessionError::Auth(_)) {
            self.attempts = self.attempts.saturating_add(1);
        }
    }

    #[must_use]
    pub fn can_resend(&self) -> bool {
        self.stage == Stage::CodeSent
    }

    /// A fresh code was sent; the attempt budget resets.
    pub fn on_resent(&mut self) {
        self.attempts = 0;
    }

    /// A login succeeded. Only a `Verified` flow is completed by it;
    /// logging in outside a verification flow leaves the stage alone.
    pub fn on_login(&mut self) {
        if self.stage == Stage::Verified {
            self.stage = Stage::Completed;
        }
    }

    #[must_use]
    pub fn attempts_left(&self) -> u8 {
        MAX_CODE_ATTEMPTS.saturating_sub(self.attempts)
    }
}

/// The emailed code is exactly six ASCII digits.
///
/// # Errors
///
/// Returns `SessionError::Validation` for anything else.
pub fn validate_code(code: &str) -> Result<(), SessionError> {
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(SessionError::Validation(
            "enter the 6-digit code from your email".to_owned(),
        ))
    }
}
