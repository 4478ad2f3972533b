use crate::adapters::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::core::aggregation::{DEFAULT_LABEL_MAX_LEN, DEFAULT_TOP_N};
use crate::core::export::DEFAULT_EXPORT_FILENAME;
use crate::domain::catalog;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EstimatorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Environment variables consulted, in order, when no key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub ai: AiConfig,
    pub export: ExportConfig,
    pub charts: ChartsConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub model: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    pub timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: String,
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    pub top_n: usize,
    pub label_max_len: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            label_max_len: DEFAULT_LABEL_MAX_LEN,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub region: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            region: catalog::default_region().to_string(),
        }
    }
}

impl EstimatorConfig {
    /// Loads `path` if given, otherwise defaults; then fills the API key from
    /// the environment when the file did not provide one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_credentials())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EstimatorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| EstimatorError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        // An unset `${VAR}` survives substitution verbatim; that is not a key.
        if config
            .ai
            .api_key
            .as_ref()
            .is_some_and(|key| is_placeholder(key.expose_secret()))
        {
            config.ai.api_key = None;
        }

        Ok(config)
    }

    /// Replaces `${VAR_NAME}` with the variable's value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EstimatorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn with_env_credentials(mut self) -> Self {
        if self.api_key().is_none() {
            self.ai.api_key = API_KEY_ENV_VARS
                .iter()
                .filter_map(|name| std::env::var(name).ok())
                .find(|value| !value.trim().is_empty())
                .map(SecretString::from);
        }
        self
    }

    pub fn top_n(&self) -> usize {
        self.charts.top_n
    }

    pub fn label_max_len(&self) -> usize {
        self.charts.label_max_len
    }

    pub fn default_region(&self) -> &str {
        &self.defaults.region
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || (value.starts_with("${") && value.ends_with('}'))
}

impl ConfigProvider for EstimatorConfig {
    fn ai_endpoint(&self) -> &str {
        &self.ai.endpoint
    }

    fn ai_model(&self) -> &str {
        &self.ai.model
    }

    fn api_key(&self) -> Option<&SecretString> {
        self.ai
            .api_key
            .as_ref()
            .filter(|key| !is_placeholder(key.expose_secret()))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.ai.timeout_seconds)
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn export_filename(&self) -> &str {
        &self.export.filename
    }
}

impl Validate for EstimatorConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("ai.endpoint", &self.ai.endpoint)?;
        validation::validate_non_empty_string("ai.model", &self.ai.model)?;
        validation::validate_range("ai.timeout_seconds", self.ai.timeout_seconds, 1, 600)?;
        validation::validate_path("export.output_path", &self.export.output_path)?;
        validation::validate_file_name("export.filename", &self.export.filename, &["csv"])?;
        validation::validate_positive_number("charts.top_n", self.charts.top_n, 1)?;
        validation::validate_positive_number("charts.label_max_len", self.charts.label_max_len, 1)?;
        validation::validate_non_empty_string("defaults.region", &self.defaults.region)?;
        Ok(())
    }
}
