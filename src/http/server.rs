//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler
//! - Wire up middleware (request ID, tracing, timeout, observation)
//! - Bind server to listener
//! - Forward observed requests to the upstream

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::HOST,
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ObserverConfig;
use crate::http::middleware::{observe_request, RequestObserver};
use crate::http::request::RequestUuid;
use crate::lifecycle::ShutdownSignal;
use crate::telemetry::{self, TelemetryEmitter, TelemetryError, TelemetrySink};

/// Errors raised while building the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid upstream address '{0}'")]
    InvalidUpstream(String),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// State for the forwarding handler.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream: Authority,
}

/// HTTP server for the observing proxy.
pub struct HttpServer {
    router: Router,
    config: ObserverConfig,
}

impl HttpServer {
    /// Create a server using the telemetry sink named in the configuration.
    pub fn new(config: ObserverConfig) -> Result<Self, ServerError> {
        let sink = telemetry::sink_from_config(&config.telemetry)?;
        Self::with_sink(config, sink)
    }

    /// Create a server that submits telemetry to `sink`.
    pub fn with_sink(config: ObserverConfig, sink: Arc<dyn TelemetrySink>) -> Result<Self, ServerError> {
        let upstream: Authority = config
            .upstream
            .address
            .parse()
            .map_err(|_| ServerError::InvalidUpstream(config.upstream.address.clone()))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.upstream.connect_timeout_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let emitter = TelemetryEmitter::new(sink, config.telemetry.tracked_paths.clone());
        let observer = Arc::new(RequestObserver::new(emitter, config.capture.max_body_bytes));

        let router = Self::build_router(&config, AppState { client, upstream }, observer);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ObserverConfig, state: AppState, observer: Arc<RequestObserver>) -> Router {
        Router::new()
            .fallback(forward_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(observer, observe_request))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(RequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.triggered().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }
}

/// Forward the request, body untouched, to the upstream.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot build upstream URI");
            return (StatusCode::BAD_REQUEST, "Invalid request URI").into_response();
        }
    };
    // The client derives Host from the upstream URI.
    parts.headers.remove(HOST);
    parts.version = Version::HTTP_11;

    let path = parts.uri.path().to_string();
    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            tracing::debug!(path = %path, status = %response.status(), "Upstream responded");
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(upstream = %state.upstream, path = %path, error = %e, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
