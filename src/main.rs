use std::io::{IsTerminal, stdout};
use std::path::PathBuf;

use acctop::app::{self, StopReason};
use acctop::config::{Overrides, Panel, Settings, load_config, load_config_from_path};
use acctop::{logging, runtime};
use acctop::system::source::{MetricSource, SysinfoSource};
use acctop::ui::{self, View, theme::Theme};
use clap::Parser;
use color_eyre::Result;

/// Headless frame size when stdout is not a terminal.
const FALLBACK_SIZE: (u16, u16) = (100, 40);

#[derive(Parser)]
#[command(
    name = "acctop",
    version,
    about = "Real-time terminal system resource monitor"
)]
struct Cli {
    /// Refresh interval in seconds
    #[arg(long, value_name = "SECONDS")]
    interval: Option<f64>,

    /// Show per-interface network activity
    #[arg(long)]
    show_network: bool,

    /// Show load averages
    #[arg(long)]
    show_load: bool,

    /// Show host, OS, kernel and uptime
    #[arg(long)]
    show_system: bool,

    /// Show filesystem usage
    #[arg(long)]
    show_disk: bool,

    /// Show per-user CPU and memory
    #[arg(long)]
    show_users: bool,

    /// Show every panel
    #[arg(long)]
    show_all: bool,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color theme: dark, light, mono
    #[arg(long)]
    theme: Option<String>,

    /// Upper bound for a single metric query, in milliseconds
    #[arg(long, value_name = "MS")]
    query_timeout_ms: Option<u64>,

    /// Write JSON-lines logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Take one sample, print one frame and exit
    #[arg(long)]
    once: bool,

    /// With --once, print the snapshot as JSON instead of a frame
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let show = [
            (self.show_network, Panel::Network),
            (self.show_load, Panel::Load),
            (self.show_system, Panel::System),
            (self.show_disk, Panel::Disk),
            (self.show_users, Panel::Users),
        ]
        .into_iter()
        .filter_map(|(on, panel)| on.then_some(panel))
        .collect();

        Overrides {
            interval_secs: self.interval,
            query_timeout_ms: self.query_timeout_ms,
            theme: self.theme.clone(),
            show,
            show_all: self.show_all,
        }
    }

    fn headless(&self) -> bool {
        self.once || self.json
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init_json_file(path)?;
    }

    let config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => load_config(),
    };
    let settings = Settings::resolve(&config, &cli.overrides())?;
    tracing::info!(
        interval_ms = settings.interval.as_millis() as u64,
        panels = ?settings.panels,
        "starting"
    );

    let source = SysinfoSource::for_panels(&settings.panels);
    if cli.headless() {
        return runtime::block_on_detached(print_once(&settings, source, cli.json))?;
    }

    let reason = runtime::block_on_detached(app::run(settings, source))??;
    if let StopReason::Signal(signal) = reason {
        tracing::info!(signal, "stopped by signal");
    }
    Ok(())
}

async fn print_once(settings: &Settings, source: SysinfoSource, json: bool) -> Result<()> {
    let host_name = source.host_name();
    let snapshot = app::sample_once(settings, source).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let (width, height) = if stdout().is_terminal() {
        crossterm::terminal::size().unwrap_or(FALLBACK_SIZE)
    } else {
        FALLBACK_SIZE
    };
    let theme = Theme::from_name(settings.theme);
    let view = View {
        snapshot: Some(&snapshot),
        host_name: host_name.as_deref(),
        panels: &settings.panels,
        interval: settings.interval,
        theme: &theme,
    };
    println!("{}", ui::render_text(view, width, height));
    Ok(())
}
