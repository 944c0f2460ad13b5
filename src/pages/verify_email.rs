//! Email verification page: 6-digit code entry with resend.

use leptos::prelude::*;

use crate::state::SessionContext;
use crate::state::session::Status;
use crate::state::verification::Stage;

/// Verification page. A correct code moves the flow to `Verified` and
/// hands off to the login entry point; it does not log the user in.
#[component]
pub fn VerifyEmailPage() -> impl IntoView {
    let cx = expect_context::<SessionContext>();

    let code = RwSignal::new(String::new());

    let busy = move || cx.state.get().status == Status::Verifying;
    let error = move || cx.state.get().last_error.map(|e| e.to_string());
    let attempts_left = move || cx.flow.get().attempts_left();

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let verified =
                    crate::net::session_ops::verify_email(cx, code.get_untracked().trim()).await;
                if verified.is_ok() {
                    navigate("/", leptos_router::NavigateOptions::default());
                }
            });
        }
    };

    let on_resend = move |_ev: leptos::ev::MouseEvent| {
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(async move {
                crate::net::session_ops::resend_verification_code(cx).await;
            });
        }
    };

    view! {
        <div class="verify-page">
            <h2>"Verify your email"</h2>
            <p>"Six digit code sent to your email"</p>

            <form class="auth-form" on:submit=on_submit>
                <label>
                    "Your code"
                    <input
                        type="text"
                        inputmode="numeric"
                        maxlength="6"
                        placeholder="000000"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(event_target_value(&ev))
                    />
                </label>

                {move || error().map(|msg| view! { <p class="auth-form__error">{msg}</p> })}

                <Show when=move || {
                    cx.flow.get().stage == Stage::CodeSent && attempts_left() < 3
                }>
                    <p class="verify-page__hint">
                        {move || format!("{} attempts left", attempts_left())}
                    </p>
                </Show>

                <button class="btn btn--primary" type="submit" disabled=busy>
                    {move || if busy() { "Verifying..." } else { "Verify" }}
                </button>
            </form>

            <button class="btn btn--link" on:click=on_resend>
                "Resend code"
            </button>
        </div>
    }
}
