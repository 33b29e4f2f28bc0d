//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/theramatch/theramatch.toml`
//! 3. Local config: `./.theramatch.toml` (or the file passed with `--config`)
//! 4. Environment variables: `THERAMATCH_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{DuplicateIdPolicy, DEFAULT_SUMMARY_HEADER};

/// Document consulted when no source is given on the command line.
pub const DEFAULT_SOURCE: &str = "./EntscheidungsbaumTheraMatch.json";

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".theramatch.toml";

/// Which interactive selector `walk` uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorKind {
    /// Fuzzy finder (skim)
    #[default]
    Skim,
    /// Numbered menu on stdin
    Prompt,
}

/// Raw settings for intermediate parsing (every field optional).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub source: Option<String>,
    pub duplicate_ids: Option<DuplicateIdPolicy>,
    pub http_timeout_secs: Option<u64>,
    pub summary_header: Option<String>,
    pub selector: Option<SelectorKind>,
}

/// Unified configuration for theramatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Decision-tree document: file path or http(s) URL
    pub source: String,
    /// Handling of nodes sharing an id
    pub duplicate_ids: DuplicateIdPolicy,
    /// Timeout for fetching documents over HTTP
    pub http_timeout_secs: u64,
    /// First line of the copied summary
    pub summary_header: String,
    /// Interactive selector for `walk`
    pub selector: SelectorKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            duplicate_ids: DuplicateIdPolicy::default(),
            http_timeout_secs: 30,
            summary_header: DEFAULT_SUMMARY_HEADER.to_string(),
            selector: SelectorKind::default(),
        }
    }
}

/// Get the XDG config directory for theramatch.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "theramatch").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("theramatch.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a location string.
///
/// URLs are left alone.
pub fn expand_location(location: &str) -> String {
    if crate::infrastructure::traits::is_url(location) {
        return location.to_string();
    }
    shellexpand::full(location)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| location.to_string())
}

impl Settings {
    /// Overlay: fields present in `raw` win.
    fn merge_with(&self, raw: &RawSettings) -> Self {
        Self {
            source: raw.source.clone().unwrap_or_else(|| self.source.clone()),
            duplicate_ids: raw.duplicate_ids.unwrap_or(self.duplicate_ids),
            http_timeout_secs: raw.http_timeout_secs.unwrap_or(self.http_timeout_secs),
            summary_header: raw
                .summary_header
                .clone()
                .unwrap_or_else(|| self.summary_header.clone()),
            selector: raw.selector.unwrap_or(self.selector),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit config file (`--config`). When `None`,
    ///   `./.theramatch.toml` is used if it exists.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/theramatch/theramatch.toml`
    /// 3. Local config
    /// 4. Environment variables: `THERAMATCH_*` prefix
    ///
    /// An explicit `local` file must exist; the implicit one is optional.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let local = match local {
            Some(path) if !path.exists() => {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(local_config_path(Path::new("."))).filter(|p| p.exists()),
        };
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Layer the given files (if any) and the environment over the defaults.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        for path in [global, local].into_iter().flatten() {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.source = expand_location(&current.source);
        Ok(current)
    }

    /// Apply THERAMATCH_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("THERAMATCH").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("source") {
            settings.source = val;
        }
        if let Ok(val) = config.get_string("duplicate_ids") {
            settings.duplicate_ids = parse_enum(&val, "duplicate_ids")?;
        }
        if let Ok(val) = config.get_string("http_timeout_secs") {
            settings.http_timeout_secs = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("THERAMATCH_HTTP_TIMEOUT_SECS: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("summary_header") {
            settings.summary_header = val;
        }
        if let Ok(val) = config.get_string("selector") {
            settings.selector = parse_enum(&val, "selector")?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# theramatch configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/theramatch/theramatch.toml
#   Local:  ./.theramatch.toml (or --config <file>)
#   Env:    THERAMATCH_* environment variables

# Decision-tree document: file path (~ and $VAR expanded) or http(s) URL
# source = "./EntscheidungsbaumTheraMatch.json"

# Nodes sharing an id: "last-wins" (later node replaces earlier) or "reject"
# duplicate_ids = "last-wins"

# Timeout in seconds when fetching the document over HTTP
# http_timeout_secs = 30

# First line of the copied summary
# summary_header = "TheraMatch – Summary"

# Interactive selector for `walk`: "skim" (fuzzy finder) or "prompt" (numbered menu)
# selector = "skim"
"#
        .to_string()
    }
}

/// Parse a kebab-case enum value the same way TOML files spell it.
fn parse_enum<T: serde::de::DeserializeOwned>(val: &str, key: &str) -> Result<T, ApplicationError> {
    use serde::de::IntoDeserializer;

    let de: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        val.into_deserializer();
    T::deserialize(de).map_err(|e| ApplicationError::Config {
            message: format!("{key}: {e}"),
        })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
