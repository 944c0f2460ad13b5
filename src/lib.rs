//! # auth-client
//!
//! Leptos + WASM frontend for a credential-based web application.
//!
//! The crate is organized around a browser-resident session core: a plain,
//! natively-testable state machine in `state/`, thin HTTP plumbing in `net/`
//! gated behind the `hydrate` feature, durable credential slots in `util/`,
//! and presentation pages and route guards that only call into the core.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
