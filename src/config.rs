use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sequencer: SequencerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Timing of the simulated agent runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Upper bound of the random extra delay added to every step (0 disables)
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,

    /// Per-character typing speed of build log lines
    #[serde(default = "default_build_typing_ms")]
    pub build_typing_ms: u64,

    /// Per-character typing speed of assessment log lines
    #[serde(default = "default_assessment_typing_ms")]
    pub assessment_typing_ms: u64,

    /// Pause between the end of the build and the Generate step
    #[serde(default = "default_build_complete_pause_ms")]
    pub build_complete_pause_ms: u64,

    /// Duration of the "Formatting and rendering report..." line
    #[serde(default = "default_render_pause_ms")]
    pub render_pause_ms: u64,
}

fn default_max_jitter_ms() -> u64 {
    300
}

fn default_build_typing_ms() -> u64 {
    25
}

fn default_assessment_typing_ms() -> u64 {
    15
}

fn default_build_complete_pause_ms() -> u64 {
    2000
}

fn default_render_pause_ms() -> u64 {
    2000
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_jitter_ms: default_max_jitter_ms(),
            build_typing_ms: default_build_typing_ms(),
            assessment_typing_ms: default_assessment_typing_ms(),
            build_complete_pause_ms: default_build_complete_pause_ms(),
            render_pause_ms: default_render_pause_ms(),
        }
    }
}

impl SequencerConfig {
    /// Same timing with typing and jitter switched off
    pub fn fast(&self) -> Self {
        Self {
            max_jitter_ms: 0,
            build_typing_ms: 0,
            assessment_typing_ms: 0,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u64,

    /// Rows below the scroll offset that still count as "in view" for the
    /// report sidebar highlight
    #[serde(default = "default_scrollspy_lookahead")]
    pub scrollspy_lookahead: usize,

    /// Rows left above a section when jumping to it
    #[serde(default = "default_scroll_margin")]
    pub scroll_margin: usize,

    #[serde(default = "default_true")]
    pub show_title_slide: bool,

    /// Show the debug status bar
    #[serde(default = "default_true")]
    pub debug: bool,
}

fn default_refresh_rate_ms() -> u64 {
    50
}

fn default_scrollspy_lookahead() -> usize {
    3
}

fn default_scroll_margin() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate_ms(),
            scrollspy_lookahead: default_scrollspy_lookahead(),
            scroll_margin: default_scroll_margin(),
            show_title_slide: true,
            debug: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Markdown analysis to show instead of the built-in report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_path: Option<PathBuf>,

    #[serde(default = "default_report_date")]
    pub report_date: String,
}

fn default_report_date() -> String {
    "May 2025".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            analysis_path: None,
            report_date: default_report_date(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_true")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    ".agentic-credit".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

impl Config {
    /// Project config file, relative to the working directory
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".agentic-credit/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Embedded defaults first so the demo runs without any config file
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let project_config = Self::project_config_path();
        if project_config.exists() {
            builder = builder.add_source(config::File::from(project_config));
        }

        // User config in ~/.config/agentic-credit/
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("agentic-credit").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("AGENTIC_CREDIT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .agentic-credit/config.toml
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::project_config_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        std::fs::write(config_path, self.to_toml()?).context("Failed to write config file")?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sequencer.max_jitter_ms, 300);
        assert_eq!(config.sequencer.build_typing_ms, 25);
        assert_eq!(config.sequencer.assessment_typing_ms, 15);
        assert_eq!(config.ui.scrollspy_lookahead, 3);
        assert_eq!(config.ui.scroll_margin, 1);
        assert!(config.ui.show_title_slide);
        assert_eq!(config.report.report_date, "May 2025");
        assert!(config.report.analysis_path.is_none());
        assert_eq!(config.paths.state, ".agentic-credit");
    }

    #[test]
    fn test_fast_disables_typing_and_jitter() {
        let fast = SequencerConfig::default().fast();
        assert_eq!(fast.max_jitter_ms, 0);
        assert_eq!(fast.build_typing_ms, 0);
        assert_eq!(fast.render_pause_ms, 2000);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[sequencer]\nmax_jitter_ms = 0\n\n[report]\nanalysis_path = \"analysis.md\"\n",
        )
        .unwrap();

        let config = Config::load(path.to_str()).unwrap();

        assert_eq!(config.sequencer.max_jitter_ms, 0);
        // untouched keys keep their defaults
        assert_eq!(config.sequencer.build_typing_ms, 25);
        assert_eq!(
            config.report.analysis_path,
            Some(PathBuf::from("analysis.md"))
        );
    }

    #[test]
    fn test_partial_toml_deserializes_with_defaults() {
        let config: Config = toml::from_str("[ui]\ndebug = false\n").unwrap();
        assert!(!config.ui.debug);
        assert_eq!(config.ui.refresh_rate_ms, 50);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_to_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ui.scrollspy_lookahead = 7;
        config.save_to(&path).unwrap();

        let loaded: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.ui.scrollspy_lookahead, 7);
    }

    #[test]
    fn test_logs_path_under_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();

        assert!(config.logs_path().ends_with("logs"));
        assert!(config.logs_path().starts_with(temp_dir.path()));
    }
}
