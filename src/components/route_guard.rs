//! Route boundary components wrapping the pure admission decision.
//!
//! Both variants re-evaluate reactively on every session-status change.
//! While the status is `Checking` or `Refreshing` they render a neutral
//! placeholder instead of redirecting, so the initial probe never causes a
//! flash-redirect away from a route the user is actually allowed on.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::state::SessionContext;
use crate::state::guard::{Admission, GuardKind, admission};

/// Admits its children only for an authenticated session; anyone else is
/// sent to the login entry point.
#[component]
pub fn Protected(children: ChildrenFn) -> impl IntoView {
    guard_view(GuardKind::Protected, children)
}

/// Admits its children only while not authenticated; an authenticated
/// session is sent to the dashboard.
#[component]
pub fn AnonymousOnly(children: ChildrenFn) -> impl IntoView {
    guard_view(GuardKind::AnonymousOnly, children)
}

fn guard_view(kind: GuardKind, children: ChildrenFn) -> impl IntoView {
    let cx = expect_context::<SessionContext>();
    move || match admission(cx.state.get().status, kind) {
        Admission::Admit => children().into_any(),
        Admission::Pending => view! {
            <div class="session-gate">
                <p>"Checking session..."</p>
            </div>
        }
        .into_any(),
        Admission::Redirect(path) => view! { <Redirect path=path/> }.into_any(),
    }
}
