use dioxus::prelude::*;

use ui::Destination;
use views::{Dashboard, Home, Login, NoteDetail};

mod views;

const MAIN_CSS: Asset = asset!("/assets/main.css");

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/dashboard")]
    Dashboard {},
    #[route("/notes/:id")]
    NoteDetail { id: String },
}

impl From<Destination> for Route {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Entry => Route::Home {},
            Destination::Login => Route::Login {},
            Destination::Dashboard => Route::Dashboard {},
            Destination::Note(id) => Route::NoteDetail { id },
        }
    }
}

fn main() {
    #[cfg(feature = "server")]
    {
        if let Err(e) = run_server() {
            eprintln!("server error: {e:#}");
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
fn run_server() -> anyhow::Result<()> {
    use anyhow::Context;

    tokio::runtime::Runtime::new()
        .context("failed to start tokio runtime")?
        .block_on(launch_server())
}

#[cfg(feature = "server")]
async fn launch_server() -> anyhow::Result<()> {
    use anyhow::Context;
    use tower_sessions::cookie::SameSite;
    use tower_sessions::{MemoryStore, SessionManagerLayer};
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("tracing init failed: {e}");
    }

    let settings = api::Settings::new().context("failed to load settings")?;
    let context = settings
        .app_context()
        .context("failed to configure backend")?;
    tracing::info!(
        backend = ?settings.backend.kind,
        callback = %context.email_redirect_to,
        "settings loaded"
    );

    // Sessions hold backend tokens, so they live in server memory only
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(settings.session.secure)
        .with_same_site(SameSite::Lax);

    let serve_config =
        ServeConfig::new().map_err(|e| anyhow::anyhow!("failed to load index.html: {e:?}"))?;

    let router = axum::Router::new()
        .serve_dioxus_application(serve_config, App)
        .layer(axum::Extension(context))
        .layer(session_layer);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus_cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .context("server stopped")?;
    Ok(())
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Note Taker" }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        Router::<Route> {}
    }
}

#[cfg(test)]
mod tests {
    const STYLESHEET: &str = include_str!("../assets/main.css");

    #[test]
    fn stylesheet_covers_shared_view_classes() {
        for class in [
            ".auth-page",
            ".dashboard-page",
            ".notes-grid",
            ".card",
            ".skeleton",
            ".modal-backdrop",
            ".btn-primary",
            ".note-detail",
        ] {
            assert!(STYLESHEET.contains(class), "missing {class}");
        }
    }
}
