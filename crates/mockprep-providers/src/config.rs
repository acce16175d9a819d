//! Configuration loading and service factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mockprep_core::model::Personality;
use mockprep_core::traits::{EvaluationService, QuestionService};

use crate::api::ApiGatewayService;
use crate::ollama::{OllamaService, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable that points mockprep at an API gateway.
pub const API_URL_ENV: &str = "MOCKPREP_API_URL";

/// The backend behind both capabilities.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServiceConfig {
    Api {
        base_url: String,
        #[serde(default)]
        api_key: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
    },
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceConfig::Api { base_url, api_key } => f
                .debug_struct("Api")
                .field("base_url", base_url)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
                .finish(),
            ServiceConfig::Ollama { base_url, model } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_ollama_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Top-level mockprep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockprepConfig {
    /// Interviewer style forwarded to the services.
    #[serde(default)]
    pub personality: Personality,
    /// Bound on question generation.
    #[serde(default = "default_question_timeout")]
    pub question_timeout_secs: u64,
    /// Bound on answer evaluation.
    #[serde(default = "default_evaluation_timeout")]
    pub evaluation_timeout_secs: u64,
    /// Catalog file replacing the built-in reference data.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// The file this config was read from, `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
    /// No service means offline mode.
    #[serde(default)]
    pub service: Option<ServiceConfig>,
}

fn default_question_timeout() -> u64 {
    10
}
fn default_evaluation_timeout() -> u64 {
    15
}

impl Default for MockprepConfig {
    fn default() -> Self {
        Self {
            personality: Personality::default(),
            question_timeout_secs: default_question_timeout(),
            evaluation_timeout_secs: default_evaluation_timeout(),
            catalog: None,
            source: None,
            service: None,
        }
    }
}

impl MockprepConfig {
    pub fn question_timeout(&self) -> Duration {
        Duration::from_secs(self.question_timeout_secs)
    }

    pub fn evaluation_timeout(&self) -> Duration {
        Duration::from_secs(self.evaluation_timeout_secs)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

/// Resolve env vars in a service config.
fn resolve_service_config(config: &ServiceConfig) -> ServiceConfig {
    match config {
        ServiceConfig::Api { base_url, api_key } => ServiceConfig::Api {
            base_url: resolve_env_vars(base_url),
            api_key: api_key.as_ref().map(|k| resolve_env_vars(k)),
        },
        ServiceConfig::Ollama { base_url, model } => ServiceConfig::Ollama {
            base_url: resolve_env_vars(base_url),
            model: resolve_env_vars(model),
        },
    }
}

/// Load config from an explicit path, or search the well-known paths:
/// 1. `mockprep.toml` in the current directory
/// 2. `~/.config/mockprep/config.toml`
///
/// A relative `catalog` is resolved against the directory of the file that
/// names it. `MOCKPREP_API_URL` overrides (or creates) an `api` service.
pub fn load_config_from(path: Option<&Path>) -> Result<MockprepConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mockprep.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => MockprepConfig::default(),
    };

    Ok(finalize(config, std::env::var(API_URL_ENV).ok()))
}

fn parse_config_file(path: &Path) -> Result<MockprepConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = toml::from_str::<MockprepConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    if let Some(catalog) = config.catalog.take() {
        config.catalog = Some(relative_to(path, catalog));
    }
    config.source = Some(path.to_path_buf());

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// `target` as written in `config_file`, relative paths anchored at its directory.
fn relative_to(config_file: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    match config_file.parent() {
        Some(dir) => dir.join(target),
        None => target,
    }
}

/// Apply the API URL override and resolve `${VAR}` references. A service
/// whose URL resolves to nothing is dropped, leaving offline mode.
fn finalize(mut config: MockprepConfig, api_url: Option<String>) -> MockprepConfig {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        let api_key = match config.service.take() {
            Some(ServiceConfig::Api { api_key, .. }) => api_key,
            _ => None,
        };
        config.service = Some(ServiceConfig::Api {
            base_url: url.trim().to_string(),
            api_key,
        });
    }

    config.service = config.service.as_ref().map(resolve_service_config);
    if let Some(ServiceConfig::Api { base_url, .. }) = &config.service {
        if base_url.trim().is_empty() {
            tracing::warn!("api service has an empty base_url, running offline");
            config.service = None;
        }
    }

    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mockprep"))
}

/// Both capabilities, `None` when running offline.
#[derive(Clone, Default)]
pub struct Services {
    pub questions: Option<Arc<dyn QuestionService>>,
    pub evaluation: Option<Arc<dyn EvaluationService>>,
}

impl Services {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn is_offline(&self) -> bool {
        self.questions.is_none() && self.evaluation.is_none()
    }
}

/// Create the service instances for a configuration.
pub fn create_services(config: Option<&ServiceConfig>) -> Result<Services> {
    let Some(config) = config else {
        return Ok(Services::offline());
    };

    match config {
        ServiceConfig::Api { base_url, api_key } => {
            let service = Arc::new(ApiGatewayService::new(base_url, api_key.clone())?);
            tracing::info!(base_url = %service.base_url(), "using api service");
            Ok(Services {
                questions: Some(service.clone() as Arc<dyn QuestionService>),
                evaluation: Some(service as Arc<dyn EvaluationService>),
            })
        }
        ServiceConfig::Ollama { base_url, model } => {
            let service = Arc::new(OllamaService::new(base_url, model)?);
            tracing::info!(model = %service.model(), "using ollama service");
            Ok(Services {
                questions: Some(service.clone() as Arc<dyn QuestionService>),
                evaluation: Some(service as Arc<dyn EvaluationService>),
            })
        }
    }
}
