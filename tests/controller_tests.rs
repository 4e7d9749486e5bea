/// Page controller tests.
///
/// Covers the per-page state machine and the handling of responses that
/// arrive after the user has moved on.
mod common;

use common::{CLASSIFICATION_BODY, FakeTransport};
use mldash::client::{RequestExecutor, UploadFile};
use mldash::controller::{ControllerError, Page, PageController, PageState};
use mldash::projector::{ChartData, ChartKind};

fn csv() -> UploadFile {
    UploadFile::new("reviews.csv", b"text\ngreat\n".to_vec())
}

fn executor(transport: FakeTransport) -> RequestExecutor<FakeTransport> {
    RequestExecutor::new("http://api.test", transport)
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn visualizations_run_succeeds_and_projects() {
    let exec = executor(FakeTransport::new().reply(200, CLASSIFICATION_BODY));
    let mut ctl = PageController::new(Page::Visualizations, ChartKind::Pie);
    ctl.select_file(csv());
    assert_eq!(ctl.state(), PageState::Configuring);

    let outcome = ctl.run(&exec).unwrap();
    assert!(outcome.is_success());
    assert_eq!(ctl.state(), PageState::Succeeded);

    let rows = ctl.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "positive");
    assert_eq!(ctl.total_predictions(), 1);
    assert_eq!(ctl.summary().len(), 1);
    assert_eq!(ctl.summary_cards().len(), 2);
    assert_eq!(ctl.histogram().unwrap()[0].count, 1);
    assert_eq!(ctl.radar()[0].percent_of_total, 100.0);

    ctl.set_chart(ChartKind::Bar);
    assert!(matches!(ctl.chart_data(), Some(ChartData::Bar(s)) if s.len() == 1));
}

#[test]
fn run_without_file_fails_without_network() {
    let exec = executor(FakeTransport::new());
    let mut ctl = PageController::model_detail("sentiment-analysis", ChartKind::Pie).unwrap();

    let outcome = ctl.run(&exec).unwrap();
    assert_eq!(
        outcome.error_message().as_deref(),
        Some("Please upload a file first")
    );
    assert_eq!(ctl.state(), PageState::Failed);
    assert_eq!(exec.transport().calls(), 0);
}

#[test]
fn empty_file_never_reaches_transport() {
    let exec = executor(FakeTransport::new().reply(200, CLASSIFICATION_BODY));
    let mut ctl = PageController::new(Page::Visualizations, ChartKind::Pie);
    ctl.select_file(UploadFile::new("empty.csv", Vec::new()));

    assert_eq!(
        ctl.run(&exec).unwrap_err(),
        ControllerError::EmptyFile("empty.csv".to_string())
    );
    assert_eq!(ctl.state(), PageState::Configuring);
    assert!(ctl.outcome().is_none());
    assert_eq!(exec.transport().calls(), 0);

    ctl.select_file(csv());
    assert!(ctl.run(&exec).unwrap().is_success());
    assert_eq!(exec.transport().calls(), 1);
}

#[test]
fn visualizations_only_chart_tabular_tasks() {
    let mut ctl = PageController::new(Page::Visualizations, ChartKind::Pie);
    assert!(ctl.select_endpoint("health").is_err());
    assert!(ctl.select_endpoint("image-caption").is_err());
    ctl.select_endpoint("sentiment-analysis").unwrap();
    assert_eq!(ctl.endpoint().unwrap().id, "sentiment-analysis");
}

#[test]
fn failed_run_can_be_retried() {
    let exec = executor(
        FakeTransport::new()
            .fail("Connection refused")
            .reply(200, r#"{"status":"healthy"}"#),
    );
    let mut ctl = PageController::new(Page::ApiExplorer, ChartKind::Pie);

    ctl.run(&exec).unwrap();
    assert_eq!(ctl.state(), PageState::Failed);
    assert!(ctl.rows().is_empty());
    assert!(ctl.histogram().is_none());

    ctl.run(&exec).unwrap();
    assert_eq!(ctl.state(), PageState::Succeeded);
    assert_eq!(exec.transport().calls(), 2);
}

#[test]
fn caption_page_projects_caption() {
    let exec = executor(
        FakeTransport::new().reply(200, r#"{"caption":"a red bicycle","model_name":"BLIP","confidence":0.95}"#),
    );
    let mut ctl = PageController::model_detail("image-captioning", ChartKind::Pie).unwrap();
    ctl.select_file(UploadFile::new("bike.jpg", vec![0xff, 0xd8, 0xff]));
    ctl.run(&exec).unwrap();

    let caption = ctl.caption().unwrap();
    assert_eq!(caption.caption, "a red bicycle");
    assert!(ctl.rows().is_empty());
    assert!(ctl.histogram().is_none());
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[test]
fn new_selection_clears_previous_outcome() {
    let exec = executor(FakeTransport::new().reply(200, CLASSIFICATION_BODY));
    let mut ctl = PageController::new(Page::Visualizations, ChartKind::Pie);
    ctl.select_file(csv());
    ctl.run(&exec).unwrap();
    assert!(ctl.outcome().is_some());

    ctl.select_file(csv());
    assert_eq!(ctl.state(), PageState::Configuring);
    assert!(ctl.outcome().is_none());
    assert!(ctl.rows().is_empty());
}

#[test]
fn static_pages_cannot_run() {
    let exec = executor(FakeTransport::new());
    for page in [Page::Dashboard, Page::Models] {
        let mut ctl = PageController::new(page, ChartKind::Pie);
        assert_eq!(ctl.state(), PageState::Idle);
        assert!(!ctl.can_run());
        assert_eq!(
            ctl.run(&exec).unwrap_err(),
            ControllerError::NotRunnable(page)
        );
    }
    assert_eq!(exec.transport().calls(), 0);
}

#[test]
fn idle_after_leave_refuses_to_run() {
    let mut ctl = PageController::new(Page::ApiExplorer, ChartKind::Pie);
    ctl.leave();
    assert_eq!(ctl.state(), PageState::Idle);
    assert!(!ctl.can_run());
    assert_eq!(ctl.begin_run().unwrap_err(), ControllerError::NothingSelected);

    ctl.select_endpoint("models").unwrap();
    assert!(ctl.can_run());
}

#[test]
fn curl_follows_selected_endpoint() {
    let mut ctl = PageController::new(Page::ApiExplorer, ChartKind::Pie);
    assert!(ctl.curl("http://api.test").unwrap().contains("GET 'http://api.test/health'"));
    ctl.select_endpoint("image-caption").unwrap();
    let curl = ctl.curl("http://api.test").unwrap();
    assert!(curl.contains("POST 'http://api.test/api/predict/image-caption'"));
    assert!(curl.contains("file=@your_file.jpg"));
}

// ---------------------------------------------------------------------------
// Stale responses
// ---------------------------------------------------------------------------

#[test]
fn response_after_leave_is_discarded() {
    let exec = executor(FakeTransport::new().reply(200, CLASSIFICATION_BODY));
    let mut ctl = PageController::new(Page::Visualizations, ChartKind::Pie);
    ctl.select_file(csv());

    let ticket = ctl.begin_run().unwrap();
    assert_eq!(ctl.state(), PageState::Running);
    assert!(!ctl.can_run());

    ctl.leave();
    let outcome = exec.execute(ticket.endpoint(), ticket.file());
    assert!(!ctl.complete(ticket, outcome));
    assert_eq!(ctl.state(), PageState::Idle);
    assert!(ctl.outcome().is_none());
}

#[test]
fn superseded_run_is_discarded() {
    let exec = executor(
        FakeTransport::new()
            .reply(200, r#"{"status":"first"}"#)
            .reply(200, r#"{"status":"second"}"#),
    );
    let mut ctl = PageController::new(Page::ApiExplorer, ChartKind::Pie);

    let first = ctl.begin_run().unwrap();
    let first_outcome = exec.execute(first.endpoint(), first.file());
    let second = ctl.begin_run().unwrap();
    let second_outcome = exec.execute(second.endpoint(), second.file());

    assert!(!ctl.complete(first, first_outcome));
    assert_eq!(ctl.state(), PageState::Running);
    assert!(ctl.complete(second, second_outcome));
    assert_eq!(
        ctl.outcome().and_then(|o| o.payload()).unwrap()["status"],
        "second"
    );
}

#[test]
fn selection_during_run_invalidates_ticket() {
    let exec = executor(FakeTransport::new());
    let mut ctl = PageController::new(Page::ApiExplorer, ChartKind::Pie);
    let ticket = ctl.begin_run().unwrap();
    ctl.select_endpoint("models").unwrap();
    let outcome = exec.execute(ticket.endpoint(), ticket.file());
    assert!(!ctl.complete(ticket, outcome));
    assert_eq!(ctl.state(), PageState::Configuring);
}
