//! JSON API handlers for the web dashboard.
//!
//! The server holds exactly one live [`PageController`]; navigating
//! replaces it. Every mutating handler answers with the resulting page view
//! so the frontend re-renders from a single source of truth.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tiny_http::{Response, StatusCode};

use crate::client::{OutcomeStatus, RequestExecutor, Transport, UploadFile, UreqTransport};
use crate::config::DashConfig;
use crate::controller::{Page, PageController, PageState};
use crate::projector::{
    CaptionResult, ChartData, ChartKind, ConfidenceBand, PredictionRow, RadarPoint,
    SummaryAggregate,
};
use crate::registry::{self, EndpointDescriptor, ModelInfo};

use super::content_type_json;

type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server-side state
// ---------------------------------------------------------------------------

/// Everything the dashboard server keeps between requests.
pub struct DashboardState<T: Transport = UreqTransport> {
    executor: RequestExecutor<T>,
    default_chart: ChartKind,
    controller: PageController,
}

impl DashboardState<UreqTransport> {
    pub fn from_config(cfg: &DashConfig) -> Self {
        Self::new(RequestExecutor::from_config(cfg), cfg.display.default_chart)
    }
}

impl<T: Transport> DashboardState<T> {
    pub fn new(executor: RequestExecutor<T>, default_chart: ChartKind) -> Self {
        Self {
            executor,
            default_chart,
            controller: PageController::new(Page::Dashboard, default_chart),
        }
    }

    pub fn controller(&self) -> &PageController {
        &self.controller
    }
}

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EndpointsResponse {
    base_url: String,
    endpoints: &'static [EndpointDescriptor],
}

#[derive(Serialize)]
struct CatalogueResponse {
    models: &'static [ModelInfo],
}

#[derive(Serialize)]
struct OutcomeView<'a> {
    status: OutcomeStatus,
    elapsed_ms: u64,
    error: Option<String>,
    payload: Option<&'a Value>,
}

/// Everything the frontend needs to draw the current page.
#[derive(Serialize)]
struct PageView<'a> {
    page: Page,
    state: PageState,
    can_run: bool,
    model: Option<&'static ModelInfo>,
    endpoint: Option<&'static EndpointDescriptor>,
    accept: &'static str,
    file_name: Option<&'a str>,
    chart: ChartKind,
    outcome: Option<OutcomeView<'a>>,
    rows: Vec<PredictionRow>,
    summary: SummaryAggregate,
    total_predictions: u64,
    histogram: Option<[ConfidenceBand; 4]>,
    chart_data: Option<ChartData>,
    radar: Vec<RadarPoint>,
    caption: Option<CaptionResult>,
    curl: Option<String>,
}

impl<'a> PageView<'a> {
    fn of(ctl: &'a PageController, base_url: &str) -> Self {
        Self {
            page: ctl.page(),
            state: ctl.state(),
            can_run: ctl.can_run(),
            model: ctl.model(),
            endpoint: ctl.endpoint(),
            accept: ctl.file_kind().accept_attr(),
            file_name: ctl.file().map(|f| f.file_name.as_str()),
            chart: ctl.chart(),
            outcome: ctl.outcome().map(|o| OutcomeView {
                status: o.status,
                elapsed_ms: o.elapsed_ms,
                error: o.error_message(),
                payload: o.payload(),
            }),
            rows: ctl.rows(),
            summary: ctl.summary_cards(),
            total_predictions: ctl.total_predictions(),
            histogram: ctl.histogram(),
            chart_data: ctl.chart_data(),
            radar: ctl.radar(),
            caption: ctl.caption(),
            curl: ctl.curl(base_url),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(content_type_json(Response::from_data(body.into_bytes())).with_status_code(StatusCode(200)))
}

/// `{ "error": ... }` with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    content_type_json(Response::from_data(body.into_bytes())).with_status_code(StatusCode(status))
}

fn bad_request(message: impl std::fmt::Display) -> Result<HttpResponse> {
    Ok(error_response(400, &message.to_string()))
}

/// Extract one query parameter from a URL.
fn query_param<'u>(url: &'u str, key: &str) -> Option<&'u str> {
    url.split_once('?')?.1.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key && !v.is_empty()).then_some(v)
    })
}

/// Decode `%XX` escapes from `encodeURIComponent`.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = match bytes.get(i..i + 3) {
            Some([b'%', hi, lo]) => hex_digit(*hi).zip(hex_digit(*lo)),
            _ => None,
        };
        match escaped {
            Some((hi, lo)) => {
                out.push(hi << 4 | lo);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn page_response<T: Transport>(state: &DashboardState<T>) -> Result<HttpResponse> {
    json_response(&PageView::of(&state.controller, state.executor.base_url()))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/endpoints`: the endpoint registry.
pub fn get_endpoints<T: Transport>(state: &DashboardState<T>) -> Result<HttpResponse> {
    json_response(&EndpointsResponse {
        base_url: state.executor.base_url().to_string(),
        endpoints: registry::all(),
    })
}

/// `GET /api/catalogue`: the static model catalogue.
pub fn get_catalogue() -> Result<HttpResponse> {
    json_response(&CatalogueResponse {
        models: registry::catalogue(),
    })
}

/// `POST /api/navigate?page=<page>[&model=<id>]`: swap in a fresh controller.
pub fn post_navigate<T: Transport>(state: &mut DashboardState<T>, url: &str) -> Result<HttpResponse> {
    let Some(raw) = query_param(url, "page") else {
        return bad_request("missing 'page' parameter");
    };
    let page = match raw.parse::<Page>() {
        Ok(p) => p,
        Err(e) => return bad_request(e),
    };

    let next = if page == Page::ModelDetail {
        let Some(model) = query_param(url, "model") else {
            return bad_request("missing 'model' parameter");
        };
        match PageController::model_detail(model, state.default_chart) {
            Ok(ctl) => ctl,
            Err(e) => return bad_request(e),
        }
    } else {
        PageController::new(page, state.default_chart)
    };

    state.controller.leave();
    state.controller = next;
    page_response(state)
}

/// `GET /api/page`: the current page view.
pub fn get_page<T: Transport>(state: &DashboardState<T>) -> Result<HttpResponse> {
    page_response(state)
}

/// `POST /api/page/endpoint?id=<id>`
pub fn post_endpoint<T: Transport>(state: &mut DashboardState<T>, url: &str) -> Result<HttpResponse> {
    let Some(id) = query_param(url, "id") else {
        return bad_request("missing 'id' parameter");
    };
    if let Err(e) = state.controller.select_endpoint(id) {
        return bad_request(e);
    }
    page_response(state)
}

/// `POST /api/page/file`: raw file bytes, name in `X-File-Name`.
pub fn post_file<T: Transport>(
    state: &mut DashboardState<T>,
    file_name: Option<&str>,
    body: &[u8],
) -> Result<HttpResponse> {
    let Some(name) = file_name.map(percent_decode).filter(|n| !n.is_empty()) else {
        return bad_request("missing X-File-Name header");
    };
    if body.is_empty() {
        return bad_request(format!("{name} is empty"));
    }
    state.controller.select_file(UploadFile::new(name, body.to_vec()));
    page_response(state)
}

/// `POST /api/page/chart?kind=<kind>`
pub fn post_chart<T: Transport>(state: &mut DashboardState<T>, url: &str) -> Result<HttpResponse> {
    let kind = match query_param(url, "kind").map(str::parse::<ChartKind>) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => return bad_request(e),
        None => return bad_request("missing 'kind' parameter"),
    };
    state.controller.set_chart(kind);
    page_response(state)
}

/// `POST /api/page/run`: execute the current selection.
///
/// A failed request is still a 200; the failure lives on the page view.
pub fn post_run<T: Transport>(state: &mut DashboardState<T>) -> Result<HttpResponse> {
    if let Err(e) = state.controller.run(&state.executor) {
        return bad_request(e);
    }
    page_response(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Read;

    use super::*;
    use crate::client::{HttpRequest, HttpResponse as ApiResponse};

    struct Canned {
        calls: Cell<usize>,
        body: &'static str,
    }

    impl Transport for Canned {
        fn send(&self, _request: &HttpRequest) -> Result<ApiResponse, String> {
            self.calls.set(self.calls.get() + 1);
            Ok(ApiResponse {
                status: 200,
                body: self.body.to_string(),
            })
        }
    }

    fn state(body: &'static str) -> DashboardState<Canned> {
        let transport = Canned {
            calls: Cell::new(0),
            body,
        };
        DashboardState::new(
            RequestExecutor::new("http://api.test", transport),
            ChartKind::Pie,
        )
    }

    fn body_json(resp: HttpResponse) -> Value {
        let mut text = String::new();
        resp.into_reader().read_to_string(&mut text).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn query_param_extracts_value() {
        assert_eq!(query_param("/api/navigate?page=models", "page"), Some("models"));
        assert_eq!(
            query_param("/api/navigate?page=model-detail&model=x", "model"),
            Some("x")
        );
        assert_eq!(query_param("/api/navigate", "page"), None);
        assert_eq!(query_param("/api/navigate?page=", "page"), None);
    }

    #[test]
    fn percent_decode_handles_escapes() {
        assert_eq!(percent_decode("my%20reviews.csv"), "my reviews.csv");
        assert_eq!(percent_decode("caf%C3%A9.png"), "café.png");
        assert_eq!(percent_decode("100%"), "100%");
    }

    #[test]
    fn navigate_replaces_controller() {
        let mut st = state("{}");
        let view = body_json(post_navigate(&mut st, "/api/navigate?page=api-explorer").unwrap());
        assert_eq!(view["page"], "api-explorer");
        assert_eq!(view["endpoint"]["id"], "health");
        assert_eq!(view["state"], "configuring");

        let view = body_json(
            post_navigate(
                &mut st,
                "/api/navigate?page=model-detail&model=sentiment-analysis",
            )
            .unwrap(),
        );
        assert_eq!(view["model"]["id"], "sentiment-analysis");
        assert_eq!(view["accept"], ".csv");
    }

    #[test]
    fn navigate_rejects_bad_input() {
        let mut st = state("{}");
        let resp = post_navigate(&mut st, "/api/navigate?page=nowhere").unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
        let resp = post_navigate(&mut st, "/api/navigate?page=model-detail").unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
        assert_eq!(st.controller().page(), Page::Dashboard);
    }

    #[test]
    fn upload_then_run_projects_results() {
        let mut st = state(
            r#"{"summary":{"positive":1,"negative":0},"total_predictions":1,
                "predictions":[{"id":1,"text":"great","prediction":"positive","confidence":0.93}]}"#,
        );
        post_navigate(&mut st, "/api/navigate?page=visualizations").unwrap();
        post_file(&mut st, Some("r.csv"), b"text\ngreat\n").unwrap();
        let view = body_json(post_run(&mut st).unwrap());

        assert_eq!(view["state"], "succeeded");
        assert_eq!(view["rows"][0]["label"], "positive");
        assert_eq!(view["chart_data"]["kind"], "pie");
        assert_eq!(view["chart_data"]["series"].as_array().unwrap().len(), 1);
        assert_eq!(view["histogram"][0]["count"], 1);
        assert_eq!(st.executor.transport().calls.get(), 1);
    }

    #[test]
    fn run_without_file_fails_without_calling() {
        let mut st = state("{}");
        post_navigate(&mut st, "/api/navigate?page=visualizations").unwrap();
        let view = body_json(post_run(&mut st).unwrap());
        assert_eq!(view["state"], "failed");
        assert_eq!(view["outcome"]["error"], "Please upload a file first");
        assert_eq!(st.executor.transport().calls.get(), 0);
    }

    #[test]
    fn run_on_static_page_is_bad_request() {
        let mut st = state("{}");
        let resp = post_run(&mut st).unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
    }

    #[test]
    fn visualizations_reject_non_tabular_endpoints() {
        let mut st = state("{}");
        post_navigate(&mut st, "/api/navigate?page=visualizations").unwrap();
        let resp = post_endpoint(&mut st, "/api/page/endpoint?id=image-caption").unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
        assert_eq!(
            st.controller().endpoint().map(|e| e.id),
            Some("text-classification")
        );
    }

    #[test]
    fn file_requires_name() {
        let mut st = state("{}");
        let resp = post_file(&mut st, None, b"x").unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
    }

    #[test]
    fn chart_kind_is_validated() {
        let mut st = state("{}");
        let resp = post_chart(&mut st, "/api/page/chart?kind=donut").unwrap();
        assert_eq!(resp.status_code(), StatusCode(400));
        let view = body_json(post_chart(&mut st, "/api/page/chart?kind=radar").unwrap());
        assert_eq!(view["chart"], "radar");
    }
}
