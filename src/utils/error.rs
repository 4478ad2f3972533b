use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("API Key is missing.")]
    MissingCredential { provider: String },

    #[error("Failed to generate BOM from AI. Please try again.")]
    GenerationFailed { reason: String },

    #[error("A BOM generation request is already in progress")]
    GenerationInProgress,

    #[error("Unknown catalog service: {service_id}")]
    UnknownService { service_id: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EstimatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredential { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::GenerationFailed { .. }
            | Self::GenerationInProgress
            | Self::ApiError(_)
            | Self::UpstreamStatus { .. }
            | Self::SerializationError(_) => ErrorCategory::Upstream,
            Self::UnknownService { .. } | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::CsvError(_) | Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::GenerationInProgress => ErrorSeverity::Low,
            Self::GenerationFailed { .. }
            | Self::ApiError(_)
            | Self::UpstreamStatus { .. }
            | Self::SerializationError(_) => ErrorSeverity::Medium,
            Self::MissingCredential { .. }
            | Self::UnknownService { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::CsvError(_) | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Message shown to the person running the estimator.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingCredential { provider } => {
                format!("API Key is missing. No credential configured for {provider}.")
            }
            Self::UnknownService { service_id } => {
                format!("'{service_id}' is not in the service catalog.")
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for '{field}': {reason}")
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } => {
                "Set GEMINI_API_KEY (or API_KEY), or put api_key under [ai] in the config file"
            }
            Self::GenerationFailed { .. } | Self::ApiError(_) | Self::UpstreamStatus { .. } => {
                "Check network access and re-run the generation"
            }
            Self::SerializationError(_) => "The AI response was not valid JSON; try again",
            Self::GenerationInProgress => "Wait for the pending generation to finish",
            Self::UnknownService { .. } => "Run `bom-estimator catalog` to list valid service ids",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file and try again"
            }
            Self::ValidationError { .. } => "Check the supplied arguments",
            Self::CsvError(_) | Self::IoError(_) => {
                "Check that the output path exists and is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
