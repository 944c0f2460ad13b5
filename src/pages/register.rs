//! Registration page: name/email/password form.

use leptos::prelude::*;

use crate::state::SessionContext;
use crate::state::session::Status;

/// Registration page. A successful registration sends the verification
/// code server-side, so the page moves straight on to `/verify-email`.
#[component]
pub fn RegisterPage() -> impl IntoView {
    let cx = expect_context::<SessionContext>();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    let busy = move || cx.state.get().status == Status::Authenticating;
    let error = move || cx.state.get().last_error.map(|e| e.to_string());

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let registered = crate::net::session_ops::register(
                    cx,
                    &name.get_untracked(),
                    &email.get_untracked(),
                    &password.get_untracked(),
                )
                .await;
                if registered.is_ok() {
                    navigate("/verify-email", leptos_router::NavigateOptions::default());
                }
            });
        }
    };

    view! {
        <div class="register-page">
            <h2>"Create your account"</h2>

            <form class="auth-form" on:submit=on_submit>
                <label>
                    "Name"
                    <input
                        type="text"
                        placeholder="Your name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Email"
                    <input
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        placeholder="At least 6 characters"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>

                {move || error().map(|msg| view! { <p class="auth-form__error">{msg}</p> })}

                <button class="btn btn--primary" type="submit" disabled=busy>
                    {move || if busy() { "Creating account..." } else { "Register" }}
                </button>
            </form>

            <p class="register-page__alt">
                "Already registered? " <a href="/">"Sign in"</a>
            </p>
        </div>
    }
}
