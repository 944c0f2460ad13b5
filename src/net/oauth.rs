//! Popup-based OAuth provider handshake.
//!
//! The provider flow runs in a popup window; on completion the popup posts
//! `{ token }` back to the opener. This module models that exchange as a
//! one-shot channel: open the popup, await a single `message` event from
//! our own origin carrying a token string, then tear everything down. A
//! timeout bounds the wait so an abandoned popup cannot leak a listener.

#![allow(clippy::unused_async)]

use crate::state::session::SessionError;

/// How long the user gets to finish the provider flow.
#[cfg(feature = "hydrate")]
const HANDSHAKE_TIMEOUT_SECS: u64 = 120;

/// Open the provider flow and await the posted-back token.
///
/// # Errors
///
/// Returns `SessionError::Network` when the popup cannot be opened, the
/// handshake times out, or the browser environment is missing.
#[cfg(feature = "hydrate")]
pub async fn popup_handshake(provider: &str) -> Result<String, SessionError> {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use futures::future::{Either, select};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let window =
        web_sys::window().ok_or_else(|| SessionError::Network("no browser window".to_owned()))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| SessionError::Network("cannot determine page origin".to_owned()))?;

    let popup = window
        .open_with_url_and_target_and_features(
            &format!("/api/auth/{provider}"),
            "_blank",
            "popup,width=500,height=640",
        )
        .ok()
        .flatten()
        .ok_or_else(|| SessionError::Network("sign-in window was blocked".to_owned()))?;

    let (tx, rx) = oneshot::channel::<String>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let expected_origin = origin.clone();
    let on_message = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
        move |event: web_sys::MessageEvent| {
            // Only the app's own origin may complete the handshake.
            if event.origin() != expected_origin {
                return;
            }
            let Ok(value) = js_sys::Reflect::get(
                &event.data(),
                &wasm_bindgen::JsValue::from_str("token"),
            ) else {
                return;
            };
            if let Some(token) = value.as_string() {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(token);
                }
            }
        },
    );
    window
        .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
        .map_err(|_| SessionError::Network("cannot listen for the sign-in result".to_owned()))?;

    let timeout = gloo_timers::future::sleep(std::time::Duration::from_secs(
        HANDSHAKE_TIMEOUT_SECS,
    ));
    let result = match select(rx, Box::pin(timeout)).await {
        Either::Left((Ok(token), _)) => Ok(token),
        Either::Left((Err(_), _)) => {
            Err(SessionError::Network("sign-in was interrupted".to_owned()))
        }
        Either::Right(((), _)) => Err(SessionError::Network("sign-in timed out".to_owned())),
    };

    // Tear down the one-shot listener and the popup regardless of outcome.
    let _ = window
        .remove_event_listener_with_callback("message", on_message.as_ref().unchecked_ref());
    drop(on_message);
    let _ = popup.close();

    result
}

/// Server-side stub: the handshake only exists in the browser.
///
/// # Errors
///
/// Always returns `SessionError::Network`.
#[cfg(not(feature = "hydrate"))]
pub async fn popup_handshake(provider: &str) -> Result<String, SessionError> {
    let _ = provider;
    Err(SessionError::Network("not available on server".to_owned()))
}
