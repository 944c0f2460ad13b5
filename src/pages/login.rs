//! Login page: email/password form plus OAuth provider buttons.

use leptos::prelude::*;

use crate::state::SessionContext;
use crate::state::session::Status;

/// Login page — the anonymous entry point. A successful login flips the
/// session to authenticated and the `AnonymousOnly` guard around this
/// route redirects to the dashboard on its own.
#[component]
pub fn LoginPage() -> impl IntoView {
    let cx = expect_context::<SessionContext>();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let remember = RwSignal::new(false);

    let busy = move || cx.state.get().status == Status::Authenticating;
    let error = move || cx.state.get().last_error.map(|e| e.to_string());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(async move {
                let _ = crate::net::session_ops::login(
                    cx,
                    &email.get_untracked(),
                    &password.get_untracked(),
                )
                .await;
            });
        }
    };

    let oauth = move |provider: &'static str| {
        move |_ev: leptos::ev::MouseEvent| {
            #[cfg(feature = "hydrate")]
            {
                leptos::task::spawn_local(async move {
                    match crate::net::oauth::popup_handshake(provider).await {
                        Ok(token) => {
                            let _ =
                                crate::net::session_ops::oauth_login(cx, &token, provider).await;
                        }
                        Err(err) => cx.state.update(|s| s.reject(&err)),
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = provider;
            }
        }
    };

    view! {
        <div class="login-page">
            <h2>"Welcome Back"</h2>

            <form class="auth-form" on:submit=on_submit>
                <label>
                    "Email"
                    <input
                        type="email"
                        placeholder="Enter your email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        placeholder="Enter your password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <label class="auth-form__remember">
                    <input
                        type="checkbox"
                        prop:checked=move || remember.get()
                        on:change=move |ev| remember.set(event_target_checked(&ev))
                    />
                    "Remember me"
                </label>

                {move || error().map(|msg| view! { <p class="auth-form__error">{msg}</p> })}

                <button class="btn btn--primary" type="submit" disabled=busy>
                    {move || if busy() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>

            <div class="login-page__oauth">
                <button class="btn" on:click=oauth("google")>
                    "Continue with Google"
                </button>
                <button class="btn" on:click=oauth("github")>
                    "Continue with GitHub"
                </button>
            </div>

            <p class="login-page__alt">
                "No account? " <a href="/register">"Register"</a>
            </p>
        </div>
    }
}
