//! Remote-service plumbing: wire types, HTTP calls, the OAuth popup
//! handshake, and the async operations that drive the session state.

pub mod api;
pub mod oauth;
pub mod session_ops;
pub mod types;
