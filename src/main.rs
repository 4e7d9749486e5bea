use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use mldash::projector::ChartKind;
use mldash::{cli, config, utils, web};

#[derive(Debug, Parser)]
#[command(name = "mldash")]
#[command(about = "Dashboard for an ML inference API: classify, analyse and caption from the terminal")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the inference API endpoints
    Endpoints,
    /// Show the model catalogue
    Models {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one model and optionally run it on a file
    Model {
        /// Model id (text-classification, sentiment-analysis, image-captioning)
        id: String,
        /// CSV or image file to send
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check that the inference API is reachable
    Health,
    /// Call one endpoint and print the raw response
    Explore {
        /// Endpoint id, e.g. health or sentiment-analysis
        endpoint: String,
        /// File to upload for POST endpoints
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Run a prediction task and chart the results
    Visualize {
        /// Task endpoint: text-classification or sentiment-analysis
        task: String,
        /// CSV file with a `text` column
        #[arg(long)]
        file: PathBuf,
        /// Chart type: pie, bar, line, radar (default from config)
        #[arg(long)]
        chart: Option<ChartKind>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Launch the web dashboard
    Web {
        /// Listen address (default from config, 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
        /// Don't open a browser window
        #[arg(long)]
        no_browser: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default config to ~/.mldash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `mldash config set api.base_url http://host:8000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    utils::logging::init(&cfg.logging.level);

    match app.command {
        Commands::Endpoints => cli::run_endpoints(&cfg),
        Commands::Models { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_models(fmt)
        }
        Commands::Model { id, file, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_model(&cfg, &id, file.as_deref(), fmt)
        }
        Commands::Health => cli::run_health(&cfg),
        Commands::Explore { endpoint, file } => cli::run_explore(&cfg, &endpoint, file.as_deref()),
        Commands::Visualize {
            task,
            file,
            chart,
            format,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_visualize(&cfg, &task, &file, chart, fmt)
        }
        Commands::Web { addr, no_browser } => {
            let addr = addr.unwrap_or_else(|| cfg.web.addr.clone());
            let open = cfg.web.open_browser && !no_browser;
            web::serve(&addr, &cfg, open)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(&cfg),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
