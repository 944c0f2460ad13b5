//! REST calls to the authentication service.
//!
//! Client-side (hydrate): real HTTP via `gloo-net`, with cookies included
//! so the refresh-credential response channel works. Server-side: inert
//! stubs returning a network error, since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and unparseable bodies become `SessionError::Network`;
//! 4xx rejections become `SessionError::Auth` carrying the service's
//! `message`; any failure of `/refresh-token` is normalized to
//! `SessionError::SessionExpired` because a failed refresh always ends the
//! session (the refresh loop reacts to it with a full logout).

#![allow(clippy::unused_async)]

use crate::state::session::SessionError;

#[cfg(feature = "hydrate")]
use super::types::ErrorBody;
use super::types::{AuthResponse, RefreshResponse, User};

const API_BASE: &str = "/api/auth";

#[cfg(feature = "hydrate")]
fn network(err: impl std::fmt::Display) -> SessionError {
    SessionError::Network(err.to_string())
}

#[cfg(not(feature = "hydrate"))]
fn unavailable() -> SessionError {
    SessionError::Network("not available on server".to_owned())
}

/// Map a non-2xx response into a session error.
#[cfg(feature = "hydrate")]
async fn error_from_response(resp: gloo_net::http::Response) -> SessionError {
    let status = resp.status();
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("request failed with status {status}"));
    if (400..500).contains(&status) {
        SessionError::Auth(message)
    } else {
        SessionError::Network(message)
    }
}

#[cfg(feature = "hydrate")]
async fn post_json<T: serde::de::DeserializeOwned>(
    path: &str,
    body: &serde_json::Value,
) -> Result<T, SessionError> {
    let resp = gloo_net::http::Request::post(&format!("{API_BASE}{path}"))
        .credentials(web_sys::RequestCredentials::Include)
        .json(body)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    if !resp.ok() {
        return Err(error_from_response(resp).await);
    }
    resp.json::<T>().await.map_err(network)
}

/// `POST /register` — the service sends the verification code as a side
/// effect of a successful registration.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn register(
    name: &str,
    email: &str,
    password: &str,
) -> Result<AuthResponse, SessionError> {
    #[cfg(feature = "hydrate")]
    {
        post_json(
            "/register",
            &serde_json::json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (name, email, password);
        Err(unavailable())
    }
}

/// `POST /verify-email`.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn verify_email(code: &str) -> Result<AuthResponse, SessionError> {
    #[cfg(feature = "hydrate")]
    {
        post_json("/verify-email", &serde_json::json!({ "code": code })).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = code;
        Err(unavailable())
    }
}

/// `POST /login`.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn login(email: &str, password: &str) -> Result<AuthResponse, SessionError> {
    #[cfg(feature = "hydrate")]
    {
        post_json(
            "/login",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password);
        Err(unavailable())
    }
}

/// `GET /get-me` — the probe. An auth failure here just means "anonymous";
/// the caller decides what to surface. A bearer token may be supplied when
/// probing with an OAuth access token instead of the cookie channel.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn get_me(bearer: Option<&str>) -> Result<User, SessionError> {
    #[cfg(feature = "hydrate")]
    {
        let mut req = gloo_net::http::Request::get(&format!("{API_BASE}/get-me"))
            .credentials(web_sys::RequestCredentials::Include);
        if let Some(token) = bearer {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }
        let resp = req.send().await.map_err(network)?;
        if !resp.ok() {
            return Err(error_from_response(resp).await);
        }
        let body: AuthResponse = resp.json().await.map_err(network)?;
        Ok(body.user)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = bearer;
        Err(unavailable())
    }
}

/// `POST /refresh-token`. Every failure is a `SessionExpired`.
///
/// # Errors
///
/// Returns `SessionError::SessionExpired` on any failure.
pub async fn refresh_token() -> Result<RefreshResponse, SessionError> {
    #[cfg(feature = "hydrate")]
    {
        post_json::<RefreshResponse>("/refresh-token", &serde_json::json!({}))
            .await
            .map_err(|err| {
                leptos::logging::warn!("token refresh failed: {err}");
                SessionError::SessionExpired
            })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(SessionError::SessionExpired)
    }
}

/// `POST /resend-email` — bodyless acknowledgement.
///
/// # Errors
///
/// See the module-level error mapping.
pub async fn resend_email() -> Result<(), SessionError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(&format!("{API_BASE}/resend-email"))
            .credentials(web_sys::RequestCredentials::Include)
            .json(&serde_json::json!({}))
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        if !resp.ok() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(unavailable())
    }
}

/// `POST /logout` — best-effort revoke. The caller clears local state no
/// matter what, so failures are only logged.
pub async fn logout() {
    #[cfg(feature = "hydrate")]
    {
        let sent = gloo_net::http::Request::post(&format!("{API_BASE}/logout"))
            .credentials(web_sys::RequestCredentials::Include)
            .send()
            .await;
        if let Err(err) = sent {
            leptos::logging::warn!("remote logout failed: {err}");
        }
    }
}
