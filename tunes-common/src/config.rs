//! Bootstrap configuration
//!
//! Every field has a compiled default, so the tool runs with no config file
//! at all. Resolution priority:
//! 1. Explicit path from the command line (must exist and parse)
//! 2. `<config dir>/tunes/config.toml` when present
//! 3. Compiled defaults
//!
//! Each component receives only its own section at construction time.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Placeholder substituted into the picker argv with the round's prompt
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

/// Where a resolved configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file found; compiled defaults
    Defaults,
}

/// External command as an argv list (`["ps2pdf", "-", "-"]`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CommandSpec {
    argv: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Program and its arguments
    pub fn split(&self) -> Result<(&str, &[String])> {
        match self.argv.split_first() {
            Some((program, args)) => Ok((program.as_str(), args)),
            None => Err(Error::Config("command must not be empty".to_string())),
        }
    }

    /// Copy with every occurrence of `placeholder` in the arguments replaced
    pub fn substitute(&self, placeholder: &str, value: &str) -> Self {
        Self {
            argv: self
                .argv
                .iter()
                .map(|arg| arg.replace(placeholder, value))
                .collect(),
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub catalog: CatalogConfig,
    pub picker: PickerConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Remote catalog site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Site root; endpoint paths are appended to it
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout. Unset means the request may block indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://thesession.org".to_string(),
            user_agent: concat!("tunes/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

/// Interactive line picker
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Picker argv; `{prompt}` is replaced with the round's prompt
    pub command: CommandSpec,
    pub tune_prompt: String,
    pub setting_prompt: String,
    /// Leading marker on each tune menu line
    pub tune_marker: String,
    /// Leading marker on each setting menu line
    pub setting_marker: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            command: CommandSpec::new([
                "rofi",
                "-dmenu",
                "-i",
                "-format",
                "i:s",
                "-p",
                PROMPT_PLACEHOLDER,
            ]),
            tune_prompt: "tune: ".to_string(),
            setting_prompt: "setting: ".to_string(),
            tune_marker: "♫".to_string(),
            setting_marker: "♬".to_string(),
        }
    }
}

/// Conversion chain and viewer
///
/// All three commands must read stdin; the two converters must write stdout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Notation to page description (abcm2ps writes PostScript)
    pub notation_to_intermediate: CommandSpec,
    /// Page description to final document (PostScript to PDF)
    pub intermediate_to_document: CommandSpec,
    pub viewer: CommandSpec,
    /// Wait for the viewer to exit instead of leaving it running
    pub wait_for_viewer: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            notation_to_intermediate: CommandSpec::new(["abcm2ps", "-", "-O", "-"]),
            intermediate_to_document: CommandSpec::new(["ps2pdf", "-", "-"]),
            viewer: CommandSpec::new(["zathura", "-"]),
            wait_for_viewer: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a specific config file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read {} failed: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve configuration by priority (explicit path, default file, defaults)
    ///
    /// Nothing is logged here: this runs before the subscriber exists, so the
    /// caller reports the returned source once logging is up.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            let config = Self::load_file(path)?;
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                let config = Self::load_file(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            _ => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    /// Platform config file location (`~/.config/tunes/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tunes").join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        let commands = [
            ("picker.command", &self.picker.command),
            ("render.notation_to_intermediate", &self.render.notation_to_intermediate),
            ("render.intermediate_to_document", &self.render.intermediate_to_document),
            ("render.viewer", &self.render.viewer),
        ];
        for (name, command) in commands {
            if command.argv().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", name)));
            }
        }

        if self.catalog.base_url.trim().is_empty() {
            return Err(Error::Config("catalog.base_url must not be empty".to_string()));
        }

        Ok(())
    }
}
