//! Durable credential slots in `localStorage`.
//!
//! Two string slots carry the access and refresh credentials across page
//! reloads. Written on login and refresh, cleared on logout or refresh
//! failure. Requires a browser environment; the non-hydrate fallbacks are
//! inert so native tests exercise the in-memory mirror instead.

#[cfg(feature = "hydrate")]
const ACCESS_KEY: &str = "auth_access_credential";
#[cfg(feature = "hydrate")]
const REFRESH_KEY: &str = "auth_refresh_credential";

#[cfg(feature = "hydrate")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Read the stored access credential, if any.
#[must_use]
pub fn load_access() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        storage().and_then(|s| s.get_item(ACCESS_KEY).ok().flatten())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Read the stored refresh credential, if any.
#[must_use]
pub fn load_refresh() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        storage().and_then(|s| s.get_item(REFRESH_KEY).ok().flatten())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

pub fn store_access(token: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(s) = storage() {
            let _ = s.set_item(ACCESS_KEY, token);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
    }
}

pub fn store_refresh(token: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(s) = storage() {
            let _ = s.set_item(REFRESH_KEY, token);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
    }
}

/// Remove both slots.
pub fn clear() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(s) = storage() {
            let _ = s.remove_item(ACCESS_KEY);
            let _ = s.remove_item(REFRESH_KEY);
        }
    }
}
