use dioxus::prelude::*;
use dioxus_primitives::toast::ToastProvider;
use shared_types::FeatureFlags;

mod auth;
mod components;
mod format_helpers;
mod query;
mod routes;
mod widgets;

use auth::AuthState;
use query::QueryCache;
use routes::Route;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        server::config::load_feature_flags();
        let flags = server::config::feature_flags();

        if flags.telemetry {
            server::telemetry::init_telemetry();
        }
        server::health::record_start_time();

        // Shares the server-function pool; runs migrations on first use.
        let pool = server::db::get_db().await.clone();
        if let Err(e) = server::auth::session::bootstrap_director(&pool).await {
            tracing::error!(error = %e, "Failed to bootstrap the director account");
        }

        // Background task: purge stale refresh tokens every hour
        let cleanup_pool = pool.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
            loop {
                interval.tick().await;
                match server::repo::refresh_token::purge_stale(&cleanup_pool).await {
                    Ok(0) => {}
                    Ok(n) => tracing::debug!(purged = n, "Purged stale refresh tokens"),
                    Err(e) => tracing::warn!(error = %e, "Refresh token purge failed"),
                }
            }
        });

        let store = server::db::get_store();
        store.prepare().await;
        tracing::info!(backend = store.backend_name(), "Submission store ready");

        let state = server::db::AppState {
            pool: pool.clone(),
            store,
        };

        let mut router =
            dioxus::server::router(App).merge(server::openapi::api_router(state.clone()));

        if flags.telemetry {
            router = router.layer(server::telemetry::OtelTraceLayer);
        }

        // Server functions carry submission files base64-encoded.
        let max_body = server::config::max_upload_bytes() / 3 * 4 + 64 * 1024;

        let router = router
            .layer(axum::extract::DefaultBodyLimit::max(max_body))
            .layer(axum::middleware::from_fn_with_state(
                pool,
                server::auth::middleware::auth_middleware,
            ))
            .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
            .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
                tower_http::request_id::MakeRequestUuid,
            ));
        Ok(router)
    });

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

/// Detect the client platform from compile-time feature flags.
pub fn client_platform() -> &'static str {
    if cfg!(feature = "web") {
        "web"
    } else if cfg!(feature = "desktop") {
        "desktop"
    } else if cfg!(feature = "mobile") {
        "mobile"
    } else {
        "unknown"
    }
}

#[component]
fn App() -> Element {
    // Set the X-Client-Platform header on all server function calls
    use_hook(|| {
        use dioxus::fullstack::{set_request_headers, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-client-platform",
            HeaderValue::from_static(client_platform()),
        );
        set_request_headers(headers);
    });

    // Fetch feature flags once and provide via context (defaults all-off on error)
    let flags_resource =
        use_server_future(move || async move { server::api::get_feature_flags().await })?;

    let flags = flags_resource
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(Ok(FeatureFlags::default()))
        .unwrap_or_default();

    use_context_provider(|| flags);
    use_context_provider(AuthState::new);
    use_context_provider(QueryCache::new);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        ToastProvider {
            SuspenseBoundary {
                fallback: |_| rsx! {
                    div { class: "auth-guard-loading",
                        p { "Loading..." }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
