//! Per-screen page controllers.
//!
//! A [`PageController`] owns everything transient about one screen: the
//! selected endpoint, the uploaded file, the chart type, and the outcome of
//! the last run. It is a small state machine:
//!
//! ```text
//! Idle ──select──▶ Configuring ──run──▶ Running ──▶ Succeeded | Failed
//!   ▲                  ▲                                │
//!   └──── leave ───────┴────────── select / run ────────┘
//! ```
//!
//! Runs are split into [`PageController::begin_run`] and
//! [`PageController::complete`] so a response that arrives after the user
//! moved on can be recognised and dropped. Each begin, selection or
//! `leave` bumps a generation counter; a [`RunTicket`] from an older
//! generation no longer applies.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::client::{RequestExecutor, RequestOutcome, Transport, UploadFile};
use crate::projector::{
    self, CaptionResult, ChartData, ChartKind, ConfidenceBand, PredictionRow, RadarPoint,
    SummaryAggregate,
};
use crate::registry::{self, EndpointDescriptor, FileKind, ModelInfo, RegistryError};

// ---------------------------------------------------------------------------
// Pages and states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Models,
    ModelDetail,
    Visualizations,
    ApiExplorer,
}

/// Endpoints the Visualizations page can chart. Both return tabular
/// predictions with a summary.
pub const VISUALIZATION_TASKS: [&str; 2] = ["text-classification", "sentiment-analysis"];

impl Page {
    /// Whether this screen ever issues requests.
    pub fn runs_requests(self) -> bool {
        matches!(
            self,
            Self::ModelDetail | Self::Visualizations | Self::ApiExplorer
        )
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => write!(f, "dashboard"),
            Self::Models => write!(f, "models"),
            Self::ModelDetail => write!(f, "model-detail"),
            Self::Visualizations => write!(f, "visualizations"),
            Self::ApiExplorer => write!(f, "api-explorer"),
        }
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Self::Dashboard),
            "models" => Ok(Self::Models),
            "model-detail" => Ok(Self::ModelDetail),
            "visualizations" => Ok(Self::Visualizations),
            "api-explorer" => Ok(Self::ApiExplorer),
            other => Err(format!("unknown page: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageState {
    Idle,
    Configuring,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("the {0} page does not run requests")]
    NotRunnable(Page),
    #[error("select an endpoint before running")]
    NothingSelected,
    #[error("the {page} page cannot run {endpoint}")]
    NotOffered { page: Page, endpoint: String },
    #[error("{0} is empty")]
    EmptyFile(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Proof that a run was started, stamped with the generation it belongs to.
#[derive(Debug, Clone)]
pub struct RunTicket {
    generation: u64,
    endpoint: &'static EndpointDescriptor,
    file: Option<UploadFile>,
}

impl RunTicket {
    pub fn endpoint(&self) -> &'static EndpointDescriptor {
        self.endpoint
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PageController {
    page: Page,
    state: PageState,
    model: Option<&'static ModelInfo>,
    endpoint: Option<&'static EndpointDescriptor>,
    file: Option<UploadFile>,
    chart: ChartKind,
    outcome: Option<RequestOutcome>,
    generation: u64,
}

impl PageController {
    /// A fresh controller for `page` with its default selection.
    ///
    /// Pages that pre-select an endpoint (API Explorer, Visualizations) start
    /// in `Configuring`; the rest start `Idle`. Use
    /// [`PageController::model_detail`] for the model detail page.
    pub fn new(page: Page, default_chart: ChartKind) -> Self {
        let mut ctl = Self {
            page,
            state: PageState::Idle,
            model: None,
            endpoint: None,
            file: None,
            chart: default_chart,
            outcome: None,
            generation: 0,
        };

        let preselect = match page {
            Page::ApiExplorer => Some("health"),
            Page::Visualizations => Some("text-classification"),
            _ => None,
        };
        if let Some(id) = preselect
            && let Ok(ep) = registry::lookup(id)
        {
            ctl.endpoint = Some(ep);
            ctl.state = PageState::Configuring;
        }

        ctl
    }

    /// The detail page for one catalogue model, with its endpoint selected.
    pub fn model_detail(model_id: &str, default_chart: ChartKind) -> Result<Self, ControllerError> {
        let model = registry::model(model_id)?;
        let endpoint = model.endpoint()?;
        let mut ctl = Self::new(Page::ModelDetail, default_chart);
        ctl.model = Some(model);
        ctl.endpoint = Some(endpoint);
        ctl.state = PageState::Configuring;
        Ok(ctl)
    }

    // -- accessors ----------------------------------------------------------

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn model(&self) -> Option<&'static ModelInfo> {
        self.model
    }

    pub fn endpoint(&self) -> Option<&'static EndpointDescriptor> {
        self.endpoint
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn chart(&self) -> ChartKind {
        self.chart
    }

    pub fn outcome(&self) -> Option<&RequestOutcome> {
        self.outcome.as_ref()
    }

    /// Whether the run control should be enabled.
    pub fn can_run(&self) -> bool {
        self.page.runs_requests()
            && self.endpoint.is_some()
            && !matches!(self.state, PageState::Idle | PageState::Running)
    }

    // -- transitions --------------------------------------------------------

    /// Whether this page lets the user pick `endpoint`.
    fn offers(&self, endpoint: &EndpointDescriptor) -> bool {
        match self.page {
            Page::Dashboard | Page::Models => false,
            Page::ModelDetail => self.model.is_some_and(|m| m.endpoint_id == endpoint.id),
            Page::Visualizations => VISUALIZATION_TASKS.contains(&endpoint.id),
            Page::ApiExplorer => true,
        }
    }

    /// Select an endpoint by id. Drops the current file if it is the wrong
    /// kind for the new endpoint.
    pub fn select_endpoint(&mut self, id: &str) -> Result<(), ControllerError> {
        if !self.page.runs_requests() {
            return Err(ControllerError::NotRunnable(self.page));
        }
        let endpoint = registry::lookup(id)?;
        if !self.offers(endpoint) {
            return Err(ControllerError::NotOffered {
                page: self.page,
                endpoint: endpoint.id.to_string(),
            });
        }

        if let Some(file) = &self.file
            && !endpoint.file_kind.accepts(file)
        {
            self.file = None;
        }

        self.endpoint = Some(endpoint);
        self.reconfigure();
        Ok(())
    }

    pub fn select_file(&mut self, file: UploadFile) {
        self.file = Some(file);
        self.reconfigure();
    }

    pub fn set_chart(&mut self, chart: ChartKind) {
        self.chart = chart;
    }

    /// Navigate away: forget everything and invalidate any run in flight.
    pub fn leave(&mut self) {
        self.generation += 1;
        self.file = None;
        self.outcome = None;
        self.state = PageState::Idle;
        debug!(page = %self.page, "left page");
    }

    fn reconfigure(&mut self) {
        self.generation += 1;
        self.outcome = None;
        self.state = PageState::Configuring;
        debug!(page = %self.page, generation = self.generation, "configuring");
    }

    /// Enter `Running` and hand out a ticket for the request to make.
    ///
    /// Starting a run while one is in flight supersedes it; the older
    /// ticket's result will be discarded.
    pub fn begin_run(&mut self) -> Result<RunTicket, ControllerError> {
        if !self.page.runs_requests() {
            return Err(ControllerError::NotRunnable(self.page));
        }
        let endpoint = self.endpoint.ok_or(ControllerError::NothingSelected)?;
        if self.state == PageState::Idle {
            return Err(ControllerError::NothingSelected);
        }
        if endpoint.accepts_file
            && let Some(file) = &self.file
            && file.is_empty()
        {
            return Err(ControllerError::EmptyFile(file.file_name.clone()));
        }

        self.generation += 1;
        self.outcome = None;
        self.state = PageState::Running;
        debug!(page = %self.page, endpoint = endpoint.id, generation = self.generation, "running");

        Ok(RunTicket {
            generation: self.generation,
            endpoint,
            file: self.file.clone(),
        })
    }

    /// Apply the outcome of a run. Returns `false` (and drops the outcome)
    /// if the ticket is stale.
    pub fn complete(&mut self, ticket: RunTicket, outcome: RequestOutcome) -> bool {
        if ticket.generation != self.generation || self.state != PageState::Running {
            debug!(
                page = %self.page,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale response"
            );
            return false;
        }

        self.settle(outcome);
        true
    }

    fn settle(&mut self, outcome: RequestOutcome) -> &RequestOutcome {
        self.state = if outcome.is_success() {
            PageState::Succeeded
        } else {
            PageState::Failed
        };
        self.outcome.insert(outcome)
    }

    /// Begin, execute and complete in one step.
    ///
    /// `&mut self` is held throughout, so the ticket cannot go stale.
    pub fn run<T: Transport>(
        &mut self,
        executor: &RequestExecutor<T>,
    ) -> Result<&RequestOutcome, ControllerError> {
        let ticket = self.begin_run()?;
        let outcome = executor.execute(ticket.endpoint, ticket.file());
        Ok(self.settle(outcome))
    }

    // -- derived views ------------------------------------------------------

    fn payload(&self) -> Option<&serde_json::Value> {
        self.outcome.as_ref().and_then(RequestOutcome::payload)
    }

    pub fn rows(&self) -> Vec<PredictionRow> {
        self.payload().map(projector::to_rows).unwrap_or_default()
    }

    pub fn summary(&self) -> SummaryAggregate {
        self.payload().map(projector::to_summary).unwrap_or_default()
    }

    /// Summary including zero counts, for the summary cards.
    pub fn summary_cards(&self) -> SummaryAggregate {
        self.payload()
            .map(projector::summary_entries)
            .unwrap_or_default()
    }

    pub fn total_predictions(&self) -> u64 {
        self.payload()
            .map(projector::total_predictions)
            .unwrap_or(0)
    }

    pub fn histogram(&self) -> Option<[ConfidenceBand; 4]> {
        let rows = self.rows();
        (!rows.is_empty()).then(|| projector::to_confidence_histogram(&rows))
    }

    pub fn radar(&self) -> Vec<RadarPoint> {
        projector::to_radar_series(&self.summary_cards(), self.total_predictions())
    }

    pub fn chart_data(&self) -> Option<ChartData> {
        self.payload()
            .map(|p| projector::chart_data(self.chart, p))
    }

    pub fn caption(&self) -> Option<CaptionResult> {
        self.payload().and_then(projector::to_caption)
    }

    pub fn curl(&self, base_url: &str) -> Option<String> {
        self.endpoint.map(|ep| registry::curl_command(base_url, ep))
    }

    /// Accepted file kind for the upload control.
    pub fn file_kind(&self) -> FileKind {
        self.endpoint.map(|e| e.file_kind).unwrap_or(FileKind::None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
