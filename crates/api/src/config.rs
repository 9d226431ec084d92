use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use extract::{CommandEngine, ExtractionEngine, HttpEngine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// `*` allows any origin.
    pub allowed_origins: Vec<String>,
    pub max_upload_mb: usize,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Bridge script shipped in `scripts/`, located from this crate's source
/// directory. Deployments that move the binary should set `EIC_ENGINE_ARGS`.
pub const DEFAULT_BRIDGE_SCRIPT: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../scripts/masscube_eic.py");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
    pub program: String,
    /// Passed before the raw file path. Relative paths resolve against the
    /// working directory of the server process.
    pub args: Vec<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Command, // Spawn `program` per request
    Http,    // POST to `url`
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            allowed_origins: vec!["*".to_string()],
            max_upload_mb: 512,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Command,
            program: "python3".to_string(),
            args: vec![DEFAULT_BRIDGE_SCRIPT.to_string()],
            url: None,
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl AppConfig {
    /// Defaults, then the JSON file named by `EIC_CONFIG`, then `EIC_*`
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("EIC_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(addr) = lookup("EIC_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(origins) = lookup("EIC_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(mb) = lookup("EIC_MAX_UPLOAD_MB") {
            self.server.max_upload_mb = mb
                .trim()
                .parse()
                .with_context(|| format!("EIC_MAX_UPLOAD_MB is not a whole number: {mb}"))?;
        }
        if let Some(format) = lookup("EIC_LOG_FORMAT") {
            self.server.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => bail!("EIC_LOG_FORMAT must be json or pretty, got {other}"),
            };
        }
        if let Some(kind) = lookup("EIC_ENGINE") {
            self.engine.kind = match kind.trim().to_ascii_lowercase().as_str() {
                "command" => EngineKind::Command,
                "http" => EngineKind::Http,
                other => bail!("EIC_ENGINE must be command or http, got {other}"),
            };
        }
        if let Some(program) = lookup("EIC_ENGINE_PROGRAM") {
            self.engine.program = program;
        }
        if let Some(args) = lookup("EIC_ENGINE_ARGS") {
            self.engine.args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(url) = lookup("EIC_ENGINE_URL") {
            self.engine.url = Some(url);
        }
        Ok(())
    }

    pub fn build_engine(&self) -> Result<Arc<dyn ExtractionEngine>> {
        match self.engine.kind {
            EngineKind::Command => {
                if self.engine.program.trim().is_empty() {
                    bail!("Command engine requires a program");
                }
                Ok(Arc::new(CommandEngine::new(
                    self.engine.program.clone(),
                    self.engine.args.clone(),
                )))
            }
            EngineKind::Http => {
                let url = self
                    .engine
                    .url
                    .clone()
                    .context("HTTP engine requires EIC_ENGINE_URL")?;
                Ok(Arc::new(HttpEngine::new(url)))
            }
        }
    }
}
