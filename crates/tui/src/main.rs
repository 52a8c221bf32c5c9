mod app;
mod renderer;
mod ui;

use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;

use anyhow::{Context, Result};
use bubblescope_core::model::YearRange;
use bubblescope_core::parsers::{self, LoadReport};
use bubblescope_core::state::GameType;
use bubblescope_core::{ChartDashboard, DashboardConfig};
use clap::{ArgAction, Parser, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explore a Steam games export as linked charts", long_about = None)]
struct Cli {
    /// Steam games CSV export
    #[arg(value_hint = ValueHint::FilePath)]
    csv: PathBuf,

    /// Write both charts to an SVG file instead of opening the terminal UI
    #[arg(long, value_hint = ValueHint::FilePath)]
    svg: Option<PathBuf>,

    /// Print load and filter counts instead of opening the terminal UI
    #[arg(long, action = ArgAction::SetTrue)]
    summary: bool,

    /// JSON config overriding the defaults
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Required genre; repeat for several (replaces the configured defaults)
    #[arg(long = "genre")]
    genres: Vec<String>,

    /// Start on studio games instead of indie games
    #[arg(long, action = ArgAction::SetTrue)]
    studio: bool,

    /// Show indie and studio games together
    #[arg(long, action = ArgAction::SetTrue)]
    compare: bool,

    /// Restrict the bubble chart to release years START..=END
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    years: Option<Vec<i32>>,

    /// Render the SVG with the dark palette
    #[arg(long, action = ArgAction::SetTrue)]
    dark: bool,

    /// Log file for the interactive UI (the terminal itself is taken)
    #[arg(long, value_hint = ValueHint::FilePath)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn interactive(&self) -> bool {
        self.svg.is_none() && !self.summary
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match (&cli.log_file, cli.interactive()) {
        (Some(path), _) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, false) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        // Drawing the UI; nowhere to log to.
        (None, true) => {}
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if !cli.genres.is_empty() {
        config.default_genres = cli.genres.clone();
    }
    if cli.studio {
        config.default_game_type = GameType::Studio;
    }
    config.validate()?;
    Ok(config)
}

fn build_dashboard(cli: &Cli, config: DashboardConfig) -> Result<(ChartDashboard, LoadReport)> {
    let (dataset, report) = parsers::load_path(&cli.csv)
        .with_context(|| format!("loading {}", cli.csv.display()))?;
    let mut dashboard = ChartDashboard::with_charts(Rc::new(dataset), config)?;
    if cli.compare {
        dashboard.set_compare_mode(true)?;
    }
    if let Some([start, end]) = cli.years.as_deref() {
        dashboard.set_year_range(YearRange::from_years(*start, *end))?;
    }
    Ok((dashboard, report))
}

fn write_summary(dashboard: &ChartDashboard, report: &LoadReport) -> Result<()> {
    let state = dashboard.state();
    let stats = dashboard.stats();
    let genres: Vec<&str> = state.required_genres.iter().map(|g| g.as_str()).collect();
    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "records: {} ({} rows skipped, {} unparseable fields)",
        dashboard.dataset().len(),
        report.rows_skipped,
        report.total_unparseable()
    )?;
    writeln!(
        out,
        "selection: {} | genres: {} | compare: {} | years: {}",
        state.game_type.label(),
        genres.join(", "),
        state.compare_mode,
        state.year_range
    )?;
    writeln!(
        out,
        "timeline: {} | bubbles: {} (indie {}, studio {})",
        stats.timeline,
        stats.bubble_total(),
        stats.indie,
        stats.studio
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = load_config(&cli)?;
    let (dashboard, report) = build_dashboard(&cli, config)?;
    info!(records = dashboard.dataset().len(), "dashboard ready");

    if let Some(path) = &cli.svg {
        std::fs::write(path, dashboard.render_svg(cli.dark))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote svg");
    }
    if cli.summary {
        write_summary(&dashboard, &report)?;
    }
    if cli.interactive() {
        ui::run(app::App::new(dashboard))?;
    }
    Ok(())
}
