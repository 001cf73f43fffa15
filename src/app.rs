//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::pages::order_chat::OrderChatPage;
use crate::state::auth::AuthState;
use crate::util::auth::load_stored_session;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="es">
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
/// Provides the client configuration and auth session, and sets up routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    provide_context(ClientConfig::from_build_env());

    // Server render and first hydration pass see `loading`; the stored
    // session is read once the app is live in the browser.
    let auth = RwSignal::new(AuthState { loading: true, ..AuthState::default() });
    provide_context(auth);
    Effect::new(move || auth.set(load_stored_session()));

    view! {
        <Stylesheet id="leptos" href="/pkg/findmyworker.css"/>
        <Title text="FindMyWorker"/>

        <Router>
            <Routes fallback=|| "Página no encontrada.".into_view()>
                <Route
                    path=(StaticSegment("orders"), ParamSegment("id"), StaticSegment("chat"))
                    view=OrderChatPage
                />
            </Routes>
        </Router>
    }
}
