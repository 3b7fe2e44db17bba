/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load the process-wide footer configuration from TOML, apply
    environment overrides, and expose resolved paths.

  Security / Safety Notes:
    Configuration is read once at startup and never mutated
    afterwards. No secrets are expected in this file.

  Dependencies:
    serde + toml for parsing, dirs for XDG locations.

  Operational Scope:
    Consumed by the runtime, the HTTP clients and the footer
    view builder.

  Revision History:
    2026-10-16 COD  Authored footer configuration layer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Sensible defaults with explicit override order
    - Validation at load time, never at render time
============================================================*/

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FooterError, Result};

const APP_DIR: &str = "explorer-footer";

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FooterCoreConfig {
    pub footer: FooterConfig,
    pub indexing_alert: IndexingAlertConfig,
    pub api: ApiConfig,
    pub brand: BrandConfig,
    pub repositories: RepositoryConfig,
    pub paths: PathsConfig,
}

/// `[footer]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub frontend_version: Option<String>,
    pub frontend_commit: Option<String>,
    /// Remote custom links document; empty means the feature is off.
    pub links: Option<String>,
}

impl FooterConfig {
    /// The custom links URL, if one is configured and non-blank.
    pub fn links_url(&self) -> Option<&str> {
        non_blank(self.links.as_deref())
    }

    pub fn frontend_version(&self) -> Option<&str> {
        non_blank(self.frontend_version.as_deref())
    }

    pub fn frontend_commit(&self) -> Option<&str> {
        non_blank(self.frontend_commit.as_deref())
    }
}

/// `[indexing_alert]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndexingAlertConfig {
    pub is_hidden: bool,
}

/// `[api]` table: backend location and fetch behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    pub max_retries: usize,
    /// How long the runtime waits for pending sources before rendering.
    pub wait_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".into(),
            timeout: 10,
            max_retries: 3,
            wait_ms: 5_000,
        }
    }
}

/// `[brand]` table: the static brand block text.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    pub name: String,
    pub site_url: String,
    pub site_label: String,
    pub description: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "Doric Network".into(),
            site_url: "https://doric.network/".into(),
            site_label: "doric.network".into(),
            description: "Blockchain explorer for Doric Network.".into(),
        }
    }
}

/// `[repositories]` table: source hosting used for version and issue links.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub backend: String,
    pub frontend: String,
    pub issues: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            backend: "https://github.com/blockscout/blockscout".into(),
            frontend: "https://github.com/blockscout/frontend".into(),
            issues: "https://github.com/blockscout/blockscout".into(),
        }
    }
}

/// `[paths]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub output: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl FooterCoreConfig {
    /// Load configuration from `path`, or from the default location when
    /// `None`. A missing default file yields defaults; a missing explicit
    /// file is an error. Environment overrides are applied afterwards.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(explicit) => Self::load_file(explicit)?,
            None => match default_config_path() {
                Some(candidate) if candidate.is_file() => Self::load_file(&candidate)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            FooterError::Config(format!("Failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&raw)
            .map_err(|err| FooterError::Config(format!("{}: {err}", path.display())))
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply `FOOTER_*` overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FOOTER_FRONTEND_VERSION") {
            self.footer.frontend_version = Some(value);
        }
        if let Some(value) = lookup("FOOTER_FRONTEND_COMMIT") {
            self.footer.frontend_commit = Some(value);
        }
        if let Some(value) = lookup("FOOTER_LINKS_URL") {
            self.footer.links = Some(value);
        }
        if let Some(value) = lookup("FOOTER_API_BASE_URL") {
            self.api.base_url = value;
        }
        if let Some(value) = lookup("FOOTER_INDEXING_ALERT_HIDDEN") {
            self.indexing_alert.is_hidden = parse_flag("FOOTER_INDEXING_ALERT_HIDDEN", &value)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(FooterError::Config("api.base_url must not be empty".into()));
        }
        if let Some(url) = self.footer.links_url() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(FooterError::Config(format!(
                    "footer.links must be an http(s) URL, got `{url}`"
                )));
            }
        }
        Ok(())
    }

    /// Where the rendered footer is written when no `--output` is given.
    pub fn output_path(&self) -> PathBuf {
        self.paths.output.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("footer.html")
        })
    }

    /// Directory for session log files.
    pub fn log_dir(&self) -> PathBuf {
        self.paths.log_dir.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("logs")
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(FooterError::Config(format!(
            "{key} expects a boolean, got `{other}`"
        ))),
    }
}
