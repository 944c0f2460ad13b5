//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::route_guard::{AnonymousOnly, Protected};
use crate::pages::{
    dashboard::DashboardPage, login::LoginPage, not_found::NotFoundPage, register::RegisterPage,
    verify_email::VerifyEmailPage,
};
use crate::state::SessionContext;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session context, kicks off the initial probe (the session
/// stays in `Checking` until it answers), and runs the credential-refresh
/// scheduler for the lifetime of the app.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let cx = SessionContext::new();
    provide_context(cx);

    #[cfg(feature = "hydrate")]
    {
        use crate::net::session_ops::{self, RefreshScheduler};

        session_ops::bootstrap(cx);
        leptos::task::spawn_local(async move {
            session_ops::fetch_current_user(cx).await;
        });

        let scheduler = RefreshScheduler::new();
        scheduler.start(cx);
        on_cleanup(move || scheduler.stop());
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/auth-client.css"/>
        <Title text="Account"/>

        <Router>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route
                    path=StaticSegment("")
                    view=|| view! { <AnonymousOnly><LoginPage/></AnonymousOnly> }
                />
                <Route
                    path=StaticSegment("register")
                    view=|| view! { <AnonymousOnly><RegisterPage/></AnonymousOnly> }
                />
                <Route path=StaticSegment("verify-email") view=VerifyEmailPage/>
                <Route
                    path=StaticSegment("dashboard")
                    view=|| view! { <Protected><DashboardPage/></Protected> }
                />
            </Routes>
        </Router>
    }
}
