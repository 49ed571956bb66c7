use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ui::theme::ThemeName;

/// One dashboard section. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Cpu,
    Memory,
    Disk,
    Users,
    Network,
    Load,
    System,
}

impl Panel {
    pub const ALL: [Panel; 7] = [
        Panel::Cpu,
        Panel::Memory,
        Panel::Disk,
        Panel::Users,
        Panel::Network,
        Panel::Load,
        Panel::System,
    ];

    /// Section title shown in the frame.
    pub fn title(self) -> &'static str {
        match self {
            Panel::Cpu => "CPU",
            Panel::Memory => "Memory",
            Panel::Disk => "Disk",
            Panel::Users => "Users",
            Panel::Network => "Network",
            Panel::Load => "Load",
            Panel::System => "System",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Panel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Panel::Cpu),
            "memory" | "mem" => Ok(Panel::Memory),
            "disk" => Ok(Panel::Disk),
            "users" | "user" => Ok(Panel::Users),
            "network" | "net" => Ok(Panel::Network),
            "load" => Ok(Panel::Load),
            "system" | "sys" => Ok(Panel::System),
            other => Err(ConfigError::UnknownPanel(other.to_string())),
        }
    }
}

pub type PanelSet = BTreeSet<Panel>;

pub fn default_panels() -> PanelSet {
    PanelSet::from([Panel::Cpu, Panel::Memory])
}

pub fn all_panels() -> PanelSet {
    Panel::ALL.into_iter().collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub colors: ColorsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub interval_secs: f64,
    pub query_timeout_ms: u64,
    pub panels: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            interval_secs: 2.5,
            query_timeout_ms: 1000,
            panels: vec!["cpu".to_string(), "memory".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

/// Command-line values layered over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub interval_secs: Option<f64>,
    pub query_timeout_ms: Option<u64>,
    pub theme: Option<String>,
    pub show: Vec<Panel>,
    pub show_all: bool,
}

/// Immutable runtime configuration, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub interval: Duration,
    pub query_timeout: Duration,
    pub panels: PanelSet,
    pub theme: ThemeName,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            interval: Duration::from_millis(2500),
            query_timeout: Duration::from_millis(1000),
            panels: default_panels(),
            theme: ThemeName::Dark,
        }
    }
}

impl Settings {
    pub fn resolve(config: &Config, overrides: &Overrides) -> Result<Settings, ConfigError> {
        let interval_secs = overrides
            .interval_secs
            .unwrap_or(config.general.interval_secs);
        let interval = parse_interval(interval_secs)?;

        let timeout_ms = overrides
            .query_timeout_ms
            .unwrap_or(config.general.query_timeout_ms);
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidQueryTimeout);
        }

        let mut panels = config
            .general
            .panels
            .iter()
            .map(|name| name.parse::<Panel>())
            .collect::<Result<PanelSet, _>>()?;
        panels.extend(overrides.show.iter().copied());
        if overrides.show_all {
            panels = all_panels();
        }

        let theme_name = overrides
            .theme
            .as_deref()
            .unwrap_or(&config.colors.theme);
        let theme = theme_name.parse::<ThemeName>()?;

        Ok(Settings {
            interval,
            query_timeout: Duration::from_millis(timeout_ms),
            panels,
            theme,
        })
    }
}

/// Longest accepted refresh interval: one day.
pub const MAX_INTERVAL_SECS: f64 = 86_400.0;

fn parse_interval(secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 || secs > MAX_INTERVAL_SECS {
        return Err(ConfigError::InvalidInterval(secs));
    }
    let interval =
        Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidInterval(secs))?;
    if interval.is_zero() {
        return Err(ConfigError::InvalidInterval(secs));
    }
    Ok(interval)
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("acctop").join("config.toml"))
}

/// Loads the config from the default location.
///
/// A missing or broken file falls back to defaults; an explicit `--config`
/// goes through [`load_config_from_path`] and fails loudly instead.
pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => match load_config_from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring config file, using defaults");
                Config::default()
            }
        },
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
