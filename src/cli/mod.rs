//! CLI command implementations.
//!
//! Each subcommand builds the page controller for its screen, drives it,
//! and renders the result to the terminal:
//! - `mldash endpoints` / `mldash models`: static registry and catalogue
//! - `mldash model <id>`: model detail page, optionally running a file
//! - `mldash health`: API reachability
//! - `mldash explore <endpoint>`: API explorer with curl and raw JSON
//! - `mldash visualize <task>`: charts and prediction table
//! - `mldash config show|init|set|reset`: configuration management

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::client::{RequestExecutor, RequestOutcome, UploadFile};
use crate::config::{self, DashConfig};
use crate::controller::{Page, PageController};
use crate::projector::{
    ChartData, ChartKind, ConfidenceTier, PredictionRow, average_confidence, confidence_percent,
};
use crate::registry::{self, HttpMethod, ModelInfo};
use crate::utils::format::{bar, csv_field, format_ms, scaled_bar, truncate};

/// Output format for commands that print results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// mldash endpoints
// ---------------------------------------------------------------------------

/// List every endpoint the dashboard knows about.
pub fn run_endpoints(cfg: &DashConfig) -> Result<()> {
    println!("{}", "Inference API Endpoints".bold().cyan());
    println!("  {}", cfg.api.base_url.dimmed());
    println!("{}", "=".repeat(72));
    println!(
        "  {:<6} {:<36} {:<22} File",
        "Method", "Path", "Id"
    );
    println!("  {}", "-".repeat(70));

    for ep in registry::all() {
        let method = match ep.method {
            HttpMethod::Get => ep.method.to_string().green(),
            HttpMethod::Post => ep.method.to_string().blue(),
        };
        println!(
            "  {:<6} {:<36} {:<22} {}",
            method, ep.path, ep.id, ep.file_kind
        );
        println!("         {}", ep.description.dimmed());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// mldash models
// ---------------------------------------------------------------------------

/// Show the model catalogue.
pub fn run_models(format: OutputFormat) -> Result<()> {
    let models = registry::catalogue();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(models)?);
        return Ok(());
    }

    println!("{}", "Available Models".bold().cyan());
    println!("{}", "=".repeat(60));
    for m in models {
        print_model_card(m);
        println!();
    }
    println!(
        "  {}",
        "Run `mldash model <id> --file <path>` to try one.".dimmed()
    );
    Ok(())
}

fn print_model_card(m: &ModelInfo) {
    println!(
        "  {} {} {}",
        m.name.bold(),
        format!("({} · {})", m.model, m.org).dimmed(),
        format!("[{}]", m.kind).cyan()
    );
    println!("    {:<10} {}", "id".dimmed(), m.id);
    println!("    {:<10} {}", "accepts".dimmed(), m.accepts);
    println!("    {:<10} {}", "output".dimmed(), m.output);
    println!(
        "    {:<10} {}  ·  {}",
        "speed".dimmed(),
        m.speed,
        m.accuracy
    );
}

// ---------------------------------------------------------------------------
// mldash model <id>
// ---------------------------------------------------------------------------

/// Model detail page: describe the model and, given a file, run it.
pub fn run_model(
    cfg: &DashConfig,
    model_id: &str,
    file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut ctl = PageController::model_detail(model_id, cfg.display.default_chart)?;
    let model = ctl.model().context("model detail page without a model")?;

    let Some(path) = file else {
        println!("{}", model.name.bold().cyan());
        println!("{}", "=".repeat(50));
        println!("  {}", model.description);
        println!();
        print_model_card(model);
        println!("    {:<10} {}", "use cases".dimmed(), model.use_cases.join(", "));
        return Ok(());
    };

    ctl.select_file(UploadFile::from_path(path)?);
    let executor = RequestExecutor::from_config(cfg);
    let outcome = ctl.run(&executor)?.clone();

    render_prediction_page(cfg, &ctl, &outcome, format, false)
}

// ---------------------------------------------------------------------------
// mldash health
// ---------------------------------------------------------------------------

/// Check that the inference API answers `/health`.
pub fn run_health(cfg: &DashConfig) -> Result<()> {
    println!("{}", "mldash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.mldash/config.toml found"
        } else {
            "not found (run `mldash config init` to create)"
        },
    );
    print_health_item("API base URL", true, &cfg.api.base_url);

    let mut ctl = PageController::new(Page::ApiExplorer, cfg.display.default_chart);
    ctl.select_endpoint("health")?;
    let executor = RequestExecutor::from_config(cfg);
    let outcome = ctl.run(&executor)?;

    match outcome.payload() {
        Some(payload) => {
            let status = payload
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("ok");
            print_health_item(
                "Inference API",
                true,
                &format!("{status} ({})", format_ms(outcome.elapsed_ms)),
            );
            if let Some(loaded) = payload.get("models_loaded").and_then(|v| v.as_bool()) {
                print_health_item(
                    "Models loaded",
                    loaded,
                    if loaded { "yes" } else { "no" },
                );
            }
        }
        None => {
            let msg = outcome.error_message().unwrap_or_default();
            print_health_item("Inference API", false, &msg);
            anyhow::bail!("inference API is not reachable at {}", cfg.api.base_url);
        }
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// mldash explore <endpoint>
// ---------------------------------------------------------------------------

/// API explorer: show the curl command, run it, dump the response.
pub fn run_explore(cfg: &DashConfig, endpoint_id: &str, file: Option<&Path>) -> Result<()> {
    let mut ctl = PageController::new(Page::ApiExplorer, cfg.display.default_chart);
    ctl.select_endpoint(endpoint_id)?;
    if let Some(path) = file {
        ctl.select_file(UploadFile::from_path(path)?);
    }

    let endpoint = ctl.endpoint().context("no endpoint selected")?;
    println!(
        "{} {}{}",
        endpoint.method.to_string().bold(),
        cfg.api.base_url.trim_end_matches('/'),
        endpoint.path
    );
    println!("  {}", endpoint.description.dimmed());
    println!();
    if let Some(curl) = ctl.curl(&cfg.api.base_url) {
        println!("{}", "--- curl ---".dimmed());
        println!("{curl}");
        println!();
    }

    let executor = RequestExecutor::from_config(cfg);
    let outcome = ctl.run(&executor)?;

    print_status_line(outcome);
    match outcome.payload() {
        Some(payload) => {
            println!("{}", "--- Response ---".dimmed());
            println!("{}", serde_json::to_string_pretty(payload)?);
            Ok(())
        }
        None => anyhow::bail!(outcome.error_message().unwrap_or_default()),
    }
}

fn print_status_line(outcome: &RequestOutcome) {
    let status = if outcome.is_success() {
        "success".green().bold()
    } else {
        "error".red().bold()
    };
    println!(
        "  {} {}  {}",
        "Status:".bold(),
        status,
        format_ms(outcome.elapsed_ms).dimmed()
    );
}

// ---------------------------------------------------------------------------
// mldash visualize <task>
// ---------------------------------------------------------------------------

/// Visualizations page: summary, chart, histogram, predictions.
pub fn run_visualize(
    cfg: &DashConfig,
    task: &str,
    file: &Path,
    chart: Option<ChartKind>,
    format: OutputFormat,
) -> Result<()> {
    let mut ctl = PageController::new(Page::Visualizations, cfg.display.default_chart);
    ctl.select_endpoint(task)?;
    if let Some(kind) = chart {
        ctl.set_chart(kind);
    }
    ctl.select_file(UploadFile::from_path(file)?);

    let executor = RequestExecutor::from_config(cfg);
    let outcome = ctl.run(&executor)?.clone();

    render_prediction_page(cfg, &ctl, &outcome, format, true)
}

// ---------------------------------------------------------------------------
// Shared result rendering
// ---------------------------------------------------------------------------

fn render_prediction_page(
    cfg: &DashConfig,
    ctl: &PageController,
    outcome: &RequestOutcome,
    format: OutputFormat,
    with_charts: bool,
) -> Result<()> {
    let Some(payload) = outcome.payload() else {
        anyhow::bail!(outcome.error_message().unwrap_or_default());
    };

    let rows = ctl.rows();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(payload)?);
            return Ok(());
        }
        OutputFormat::Csv => {
            print_rows_csv(&rows);
            return Ok(());
        }
        OutputFormat::Table => {}
    }

    let title = ctl
        .endpoint()
        .map(|e| e.display_name)
        .unwrap_or("Results");
    println!("{}", format!("{title} Results").bold().cyan());
    println!("{}", "=".repeat(60));
    print_status_line(outcome);

    if let Some(caption) = ctl.caption() {
        println!();
        println!("  {} {}", "Caption:".bold(), caption.caption.italic());
        if let Some(model) = caption.model_name {
            println!("  {} {}", "Model:  ".bold(), model.dimmed());
        }
        return Ok(());
    }

    // Summary cards
    let cards = ctl.summary_cards();
    if !cards.is_empty() {
        println!();
        let line: Vec<String> = cards
            .entries()
            .iter()
            .map(|e| format!("{} {}", colorize_label(&e.label), e.count))
            .collect();
        println!(
            "  {} {}   {} {}",
            "Total:".bold(),
            ctl.total_predictions(),
            "By label:".bold(),
            line.join("  ")
        );
        if let Some(avg) = average_confidence(&rows) {
            println!("  {} {:.0}%", "Avg confidence:".bold(), avg);
        }
    }

    if with_charts {
        if let Some(data) = ctl.chart_data() {
            println!();
            println!("{}", ctl.chart().title().bold().cyan());
            print_chart(&data);
        }
        if let Some(bands) = ctl.histogram() {
            println!();
            println!("{}", "Confidence Distribution".bold().cyan());
            let max = bands.iter().map(|b| b.count as u64).max().unwrap_or(0);
            for band in bands {
                println!(
                    "  {:<8} {} {}",
                    band.range_label,
                    scaled_bar(band.count as u64, max, 24),
                    band.count
                );
            }
        }
    } else if let Some(data) = ctl.chart_data() {
        println!();
        print_chart(&data);
    }

    print_rows_table(&rows, cfg.display.max_rows);
    Ok(())
}

fn print_rows_table(rows: &[PredictionRow], max_rows: usize) {
    if rows.is_empty() {
        return;
    }
    println!();
    println!("{}", "Predictions".bold().cyan());
    println!(
        "  {:>4} {:<40} {:<10} Confidence",
        "#", "Text", "Label"
    );
    println!("  {}", "-".repeat(72));

    for row in rows.iter().take(max_rows) {
        let pct = confidence_percent(row.confidence_score);
        let meter = bar(f64::from(pct), 12);
        let meter = match ConfidenceTier::of(row.confidence_score) {
            ConfidenceTier::High => meter.green(),
            ConfidenceTier::Medium => meter.yellow(),
            ConfidenceTier::Low => meter.red(),
        };
        println!(
            "  {:>4} {:<40} {:<10} {} {:>3}%",
            row.index,
            truncate(row.input_text.as_deref().unwrap_or("—"), 40),
            colorize_label(&row.label),
            meter,
            pct
        );
    }

    if rows.len() > max_rows {
        println!(
            "  {}",
            format!("… {} more (raise display.max_rows to see them)", rows.len() - max_rows)
                .dimmed()
        );
    }
}

fn print_rows_csv(rows: &[PredictionRow]) {
    println!("index,text,label,confidence");
    for row in rows {
        println!(
            "{},{},{},{:.2}",
            row.index,
            csv_field(row.input_text.as_deref().unwrap_or("")),
            csv_field(&row.label),
            row.confidence_score
        );
    }
}

fn print_chart(data: &ChartData) {
    if data.is_empty() {
        println!("  {}", "nothing to chart".dimmed());
        return;
    }

    match data {
        ChartData::Pie(slices) => {
            let total: u64 = slices.iter().map(|s| s.value).sum();
            for s in slices {
                let pct = s.value as f64 / total as f64 * 100.0;
                println!(
                    "  {:<10} {} {:>3.0}%",
                    colorize_label(&s.label),
                    bar(pct, 24),
                    pct
                );
            }
        }
        ChartData::Bar(slices) => {
            let max = slices.iter().map(|s| s.value).max().unwrap_or(0);
            for s in slices {
                println!(
                    "  {:<10} {} {}",
                    colorize_label(&s.label),
                    scaled_bar(s.value, max, 24),
                    s.value
                );
            }
        }
        ChartData::Line(points) => {
            for p in points {
                println!(
                    "  #{:<4} {} {:>5.1}%  {}",
                    p.index,
                    bar(p.confidence_pct, 24),
                    p.confidence_pct,
                    p.label.dimmed()
                );
            }
        }
        ChartData::Radar(points) => {
            for p in points {
                println!(
                    "  {:<10} {} {:>5.1}%  ({})",
                    colorize_label(&p.label),
                    bar(p.percent_of_total, 24),
                    p.percent_of_total,
                    p.count
                );
            }
        }
    }
}

/// Colorize a sentiment label.
fn colorize_label(label: &str) -> colored::ColoredString {
    match label {
        "positive" => label.green(),
        "negative" => label.red(),
        "neutral" => label.yellow(),
        _ => label.normal(),
    }
}

// ---------------------------------------------------------------------------
// mldash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show(cfg: &DashConfig) -> Result<()> {
    let toml_str = config::show_effective_config(cfg)?;
    println!("{}", "Effective mldash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.mldash/config.toml", global_exists);
    print_source(".mldash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "MLDASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
