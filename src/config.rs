//! Command-line options and the optional settings file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(
    name = "firewall",
    about = "FIREWALL: Chronicles of the NetGuard - security awareness training",
    version
)]
pub struct Cli {
    /// Directory holding <role>/chapter_NN.toml content files
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// Save file location
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Optional TOML settings file
    #[arg(short, long, default_value = "firewall.toml")]
    pub config: PathBuf,

    /// Where log output goes (the terminal belongs to the game)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "firewall=debug"; RUST_LOG wins when set
    #[arg(long)]
    pub log_level: Option<String>,

    /// Validate the content tree, print a summary and exit
    #[arg(long)]
    pub check: bool,
}

/// Pauses between automatic screen transitions, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Delays {
    pub briefing_ms: u64,
    pub scenario_feedback_ms: u64,
    pub boss_feedback_ms: u64,
    pub game_over_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Delays {
            briefing_ms: 1500,
            scenario_feedback_ms: 3000,
            boss_feedback_ms: 2000,
            game_over_ms: 1500,
        }
    }
}

impl Delays {
    pub fn briefing(&self) -> Duration {
        Duration::from_millis(self.briefing_ms)
    }

    pub fn scenario_feedback(&self) -> Duration {
        Duration::from_millis(self.scenario_feedback_ms)
    }

    pub fn boss_feedback(&self) -> Duration {
        Duration::from_millis(self.boss_feedback_ms)
    }

    pub fn game_over(&self) -> Duration {
        Duration::from_millis(self.game_over_ms)
    }
}

/// Shape of `firewall.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    content_dir: Option<PathBuf>,
    save_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    delays: Delays,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub content_dir: PathBuf,
    pub save_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub delays: Delays,
    pub check_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            content_dir: PathBuf::from("content"),
            save_file: PathBuf::from("firewall_save.json"),
            log_file: PathBuf::from("firewall.log"),
            log_level: "info".to_string(),
            delays: Delays::default(),
            check_only: false,
        }
    }
}

impl Settings {
    /// Defaults, then the settings file (if present), then CLI flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = read_settings_file(&cli.config)?;
        let mut settings = Settings::default();

        if let Some(file) = file {
            if let Some(dir) = file.content_dir {
                settings.content_dir = dir;
            }
            if let Some(save) = file.save_file {
                settings.save_file = save;
            }
            if let Some(log) = file.log_file {
                settings.log_file = log;
            }
            if let Some(level) = file.log_level {
                settings.log_level = level;
            }
            settings.delays = file.delays;
        }

        if let Some(dir) = &cli.content {
            settings.content_dir = dir.clone();
        }
        if let Some(save) = &cli.save {
            settings.save_file = save.clone();
        }
        if let Some(log) = &cli.log_file {
            settings.log_file = log.clone();
        }
        if let Some(level) = &cli.log_level {
            settings.log_level = level.clone();
        }
        settings.check_only = cli.check;
        Ok(settings)
    }
}

fn read_settings_file(path: &Path) -> Result<Option<SettingsFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings {}", path.display()))?;
    let file = toml::from_str(&text)
        .with_context(|| format!("parsing settings {}", path.display()))?;
    Ok(Some(file))
}
