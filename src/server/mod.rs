//! HTTP serving surface
//!
//! Three routes, mirroring the NuGet v3 registration protocol surface the
//! bridge exposes:
//!
//! - `GET /index.json` - the static service-discovery document
//! - `GET /{id}/index.json` - the synthesized registration index
//! - `GET /{id}/page/{page}.json` - a named page as a standalone document

pub mod error;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use url::Url;

use crate::registration::error::PageError;
use crate::server::error::BridgeError;
use crate::service::synthesizer::RegistrationService;

/// Cache-Control applied to every successful document response
const CACHE_CONTROL: &str = "max-age=86400";

pub struct AppState {
    service: RegistrationService,
    public_base: Option<Url>,
}

impl AppState {
    pub fn new(service: RegistrationService, public_base: Option<Url>) -> Self {
        Self {
            service,
            public_base,
        }
    }

    /// The base every `@id` URI is built from: the configured public base when
    /// set, otherwise the request's Host header with an http scheme.
    fn base_url(&self, headers: &HeaderMap) -> Result<Url, BridgeError> {
        if let Some(base) = &self.public_base {
            return Ok(base.clone());
        }
        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| BridgeError::BadRequest("missing Host header".to_string()))?;
        Url::parse(&format!("http://{host}"))
            .map_err(|e| BridgeError::BadRequest(format!("bad Host header: {e}")))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/index.json", get(service_index))
        .route("/{id}/index.json", get(registration_index))
        .route("/{id}/page/{page}", get(registration_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds and serves until the process is stopped.
pub async fn run(state: Arc<AppState>, listen_addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("gallery-bridge listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// The NuGet v3 service-discovery document. Static apart from the base URI.
async fn service_index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, BridgeError> {
    let base = state.base_url(&headers)?;
    let base = base.as_str().trim_end_matches('/');

    let index = json!({
        "version": "3.0.0",
        "resources": [
            {
                "@id": base,
                "@type": "RegistrationsBaseUrl/3.6.0",
                "comment": "Package registration info synthesized from the upstream v2 feed, includes SemVer 2.0.0 packages",
            }
        ]
    });
    Ok(Json(index).into_response())
}

async fn registration_index(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, BridgeError> {
    let base = state.base_url(&headers)?;
    let index = state.service.registration_index(&base, &id).await?;

    Ok((
        [(header::CACHE_CONTROL, CACHE_CONTROL)],
        Json(index),
    )
        .into_response())
}

async fn registration_page(
    State(state): State<Arc<AppState>>,
    Path((id, page)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, BridgeError> {
    let base = state.base_url(&headers)?;
    let Some(name) = page.strip_suffix(".json") else {
        return Err(BridgeError::Page(PageError::NotFound(page)));
    };

    let document = state.service.registration_page(&base, &id, name).await?;

    Ok((
        [(header::CACHE_CONTROL, CACHE_CONTROL)],
        Json(document),
    )
        .into_response())
}
