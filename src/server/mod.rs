// * HTTP front end
// * Thin routing layer: decodes query parameters, hands them to the orchestrator
// * and writes the JSON payload back. No transformation logic lives here.

use crate::engine::orchestrator::{Operation, Orchestrator, TransformRequest};
use crate::ops::telemetry;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Server handle for graceful shutdown
pub struct ServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    running: Arc<AtomicBool>,
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server actually bound (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns true if the server is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Signals the server to shut down and waits for in-flight requests to drain
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            error!(error = %e, "Server task ended abnormally");
        }
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Binds the HTTP server and starts serving in the background
///
/// # Example
/// ```ignore
/// let handle = server::start_server(orchestrator, "127.0.0.1:4567".parse()?).await?;
/// // ...
/// handle.shutdown().await;
/// ```
pub async fn start_server(
    orchestrator: Orchestrator,
    addr: SocketAddr,
) -> Result<ServerHandle, hyper::Error> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    let orchestrator = Arc::new(orchestrator);

    let make_svc = make_service_fn(move |_conn| {
        let orchestrator = orchestrator.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let orchestrator = orchestrator.clone();
                async move { handle_request(&orchestrator, req).await }
            }))
        }
    });

    let server = hyper::Server::try_bind(&addr)?.serve(make_svc);
    let local_addr = server.local_addr();
    let server = server.with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
    });

    info!(addr = %local_addr, "HTTP server started");

    let task = tokio::spawn(async move {
        if let Err(e) = server.await {
            error!(error = %e, "HTTP server error");
        }

        running_clone.store(false, Ordering::Relaxed);
        info!("HTTP server stopped");
    });

    Ok(ServerHandle {
        shutdown_tx: Some(shutdown_tx),
        running,
        local_addr,
        task,
    })
}

/// Handles one incoming HTTP request
pub async fn handle_request(
    orchestrator: &Orchestrator,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let path = req.uri().path().to_string();
    debug!(method = %req.method(), path = %path, "Incoming request");

    let operation = match path.as_str() {
        "/expand" => Operation::Expand,
        "/shorten_amazon" => Operation::ShortenAmazon,
        "/clean" => Operation::Clean,
        "/health" => return Ok(respond(StatusCode::OK, TEXT_CONTENT_TYPE, "OK")),
        "/ready" => return Ok(respond(StatusCode::OK, TEXT_CONTENT_TYPE, "READY")),
        "/metrics" => {
            return Ok(respond(
                StatusCode::OK,
                PROMETHEUS_CONTENT_TYPE,
                telemetry::get_metrics_string(),
            ))
        }
        _ => return Ok(respond(StatusCode::NOT_FOUND, TEXT_CONTENT_TYPE, "Not Found")),
    };

    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Ok(respond(
            StatusCode::METHOD_NOT_ALLOWED,
            TEXT_CONTENT_TYPE,
            "Method Not Allowed",
        ));
    }

    let transform = request_from_query(req.uri().query());
    let result = orchestrator.run(operation, &transform).await;

    let body = serde_json::to_string(&result).unwrap_or_else(|e| {
        serde_json::json!({ "error": e.to_string() }).to_string()
    });

    Ok(respond(StatusCode::OK, JSON_CONTENT_TYPE, body))
}

/// Decodes a request query string into a transform request.
/// Repeated keys: the last value wins.
pub fn request_from_query(query: Option<&str>) -> TransformRequest {
    let mut params: HashMap<String, String> = HashMap::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.insert(key.into_owned(), value.into_owned());
        }
    }

    TransformRequest {
        original_url: params.remove("url"),
        clean: params.remove("clean"),
        tidy_amazon: params.remove("tidy_amazon"),
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: impl Into<Body>) -> Response<Body> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
