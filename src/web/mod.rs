//! Embedded web dashboard for mldash.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with Dashboard, Models, Visualizations and
//!   API Explorer screens
//! - JSON API endpoints that drive one live page controller
//!
//! Launched via `mldash web` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::warn;

use crate::client::Transport;
use crate::config::DashConfig;

pub use api::DashboardState;

type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Requests are handled one at a time, so the
/// single page controller is never touched concurrently. Errors are
/// reported per request without stopping the server.
pub fn serve(addr: &str, cfg: &DashConfig, open: bool) -> Result<()> {
    let server = tiny_http::Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let mut state = DashboardState::from_config(cfg);

    println!("mldash dashboard running at http://{addr}");
    println!("Inference API: {}", cfg.api.base_url);
    println!("Press Ctrl+C to stop.\n");

    if open && let Err(e) = open_browser(&format!("http://{addr}")) {
        warn!(error = %e, "could not open browser");
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();
        let file_name = header_value(&request, "X-File-Name");

        let resp = handle(
            &mut state,
            &method,
            &url,
            file_name.as_deref(),
            request.as_reader(),
        );
        let _ = request.respond(resp);

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

/// Read the body and dispatch. A body that cannot be read in full is
/// rejected with a 400 and never reaches a handler.
fn handle<T: Transport>(
    state: &mut DashboardState<T>,
    method: &Method,
    url: &str,
    file_name: Option<&str>,
    reader: &mut dyn Read,
) -> HttpResponse {
    // Uploads are binary, so bodies are read as raw bytes
    let mut body = Vec::new();
    if matches!(method, Method::Post | Method::Put)
        && let Err(e) = reader.read_to_end(&mut body)
    {
        warn!(url = %url, error = %e, read = body.len(), "failed to read request body");
        return api::error_response(400, &format!("failed to read request body: {e}"));
    }

    match dispatch(state, method, url, file_name, &body) {
        Ok(resp) => resp,
        Err(e) => api::error_response(500, &format!("{e:#}")),
    }
}

fn header_value(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub fn dispatch<T: Transport>(
    state: &mut DashboardState<T>,
    method: &Method,
    url: &str,
    file_name: Option<&str>,
    body: &[u8],
) -> Result<HttpResponse> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API: registry
        (&Method::Get, "/api/endpoints") => api::get_endpoints(state),
        (&Method::Get, "/api/catalogue") => api::get_catalogue(),

        // API: page controller
        (&Method::Post, "/api/navigate") => api::post_navigate(state, url),
        (&Method::Get, "/api/page") => api::get_page(state),
        (&Method::Post, "/api/page/endpoint") => api::post_endpoint(state, url),
        (&Method::Post, "/api/page/file") => api::post_file(state, file_name, body),
        (&Method::Post, "/api/page/chart") => api::post_chart(state, url),
        (&Method::Post, "/api/page/run") => api::post_run(state),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> HttpResponse {
    let html = frontend::INDEX_HTML;
    with_content_type(
        Response::from_data(html.as_bytes().to_vec()),
        "text/html; charset=utf-8",
    )
    .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> HttpResponse {
    api::error_response(404, "not found")
}

/// Tag a response as JSON.
pub(crate) fn content_type_json(resp: HttpResponse) -> HttpResponse {
    with_content_type(resp, "application/json; charset=utf-8")
}

fn with_content_type(resp: HttpResponse, value: &str) -> HttpResponse {
    match Header::from_bytes("Content-Type", value) {
        Ok(header) => resp.with_header(header),
        Err(()) => resp,
    }
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
