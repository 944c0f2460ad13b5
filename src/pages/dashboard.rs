//! Dashboard page: the authenticated landing.

use leptos::prelude::*;

use crate::state::SessionContext;

/// Dashboard page — shows the signed-in identity and a logout button.
/// Lives behind the `Protected` guard; once logout drops the session to
/// anonymous, the guard redirects back to the login entry point.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let cx = expect_context::<SessionContext>();

    let user = move || cx.state.get().user;

    let on_logout = move |_ev: leptos::ev::MouseEvent| {
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(async move {
                crate::net::session_ops::logout(cx).await;
            });
        }
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1>"Dashboard"</h1>
                <button class="btn" on:click=on_logout>
                    "Log out"
                </button>
            </header>

            {move || {
                user()
                    .map(|u| {
                        view! {
                            <div class="dashboard-page__profile">
                                <p class="dashboard-page__name">{u.name}</p>
                                <p class="dashboard-page__email">{u.email}</p>
                                {u
                                    .last_login
                                    .map(|ts| {
                                        view! {
                                            <p class="dashboard-page__last-login">
                                                "Last login: " {ts}
                                            </p>
                                        }
                                    })}
                            </div>
                        }
                    })
            }}
        </div>
    }
}
