//! ChemViz CLI
//!
//! Command-line front end for the equipment analysis dashboard:
//! - Analyze a CSV and print the overview or explorer
//! - Run an interactive dashboard session
//! - Open or download the PDF report
//! - Generate a config file

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chemviz::client::{AnalysisService, ApiClient};
use chemviz::config::{generate_default_config, Config, LoggingConfig};
use chemviz::render::{explorer_csv, Renderer};
use chemviz::report::{self, SystemBrowser, UrlOpener};
use chemviz::session::{Action, Store, Tab};
use chemviz::shell::Shell;
use chemviz::upload::submit_upload;
use chemviz::view;

#[derive(Parser)]
#[command(name = "chemviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Equipment health dashboard for the ChemViz analysis service")]
#[command(long_about = "ChemViz uploads a CSV of equipment readings to the analysis service\nand shows the result as summary charts or a searchable table.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Analysis service base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a CSV and print the analysis
    Analyze {
        /// Path to CSV file
        file: PathBuf,
        /// View to print (overview, explorer)
        #[arg(short, long, default_value = "overview")]
        view: Tab,
        /// Filter explorer rows by name or type
        #[arg(short, long, default_value = "")]
        search: String,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Interactive dashboard session
    Shell {
        /// CSV file to pre-select
        file: Option<PathBuf>,
    },

    /// Open the report for the latest upload
    Report {
        /// Save the report here instead of opening a browser
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only print the report URL
        #[arg(long)]
        print_url: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, load_error) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => match Config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::from_env(), Some(e)),
        },
    };
    if let Some(url) = &cli.api_url {
        config.server.base_url = url.clone();
    }
    if cli.no_color {
        config.display.color = false;
    }

    init_tracing(&config.logging);

    if let Some(e) = load_error {
        eprintln!("warning: {}; using defaults", e);
    }

    let renderer = Renderer::new(&config.display);

    match cli.command {
        Commands::Analyze {
            file,
            view: tab,
            search,
            format,
        } => {
            let client = ApiClient::new(config.server.clone())?;
            let mut store = Store::new();
            store.dispatch(Action::SelectFile(file));

            let analysis = match submit_upload(&mut store, &client).await {
                Ok(analysis) => analysis,
                Err(e) => anyhow::bail!("{}", e.notice().message()),
            };

            store.dispatch(Action::SetSearch(search));
            store.dispatch(Action::SwitchTab(tab));
            let state = store.state();

            match (format, tab) {
                (OutputFormat::Table, _) => {
                    print!("{}", renderer.render_session(state));
                }
                (OutputFormat::Json, Tab::Dashboard) => {
                    println!("{}", serde_json::to_string_pretty(&analysis)?);
                }
                (OutputFormat::Json, Tab::Explorer) => {
                    let model = view::explorer(&analysis.full_data, &state.search_term);
                    println!("{}", serde_json::to_string_pretty(&model.rows)?);
                }
                (OutputFormat::Csv, Tab::Explorer) => {
                    let model = view::explorer(&analysis.full_data, &state.search_term);
                    print!("{}", explorer_csv(&model)?);
                }
                (OutputFormat::Csv, Tab::Dashboard) => {
                    anyhow::bail!("CSV output is only available for the explorer view");
                }
            }
        }

        Commands::Shell { file } => {
            let client: Arc<dyn AnalysisService> = Arc::new(ApiClient::new(config.server.clone())?);
            let mut shell = Shell::new(client, renderer);
            if let Some(path) = file {
                shell.select_file(path);
            }

            println!("Type 'help' for commands.");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            shell.run(stdin, &mut stdout).await?;
        }

        Commands::Report { output, print_url } => {
            let client = ApiClient::new(config.server.clone())?;

            if print_url {
                println!("{}", client.report_url());
            } else if let Some(path) = output {
                let bytes = report::save_report(&client, &path)
                    .await
                    .with_context(|| format!("Could not download report from {}", client.report_url()))?;
                println!("Saved report to {:?} ({} bytes)", path, bytes);
            } else {
                let url = client.report_url();
                SystemBrowser
                    .open(&url)
                    .with_context(|| format!("Could not open {}", url))?;
                println!("Opened {}", url);
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so rendered views on stdout stay pipeable
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chemviz={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
