use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Cannot read {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid country pattern for '{country}': {source}")]
    InvalidCountryPattern {
        country: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid band thresholds: critical {critical}, high {high}, medium {medium}")]
    InvalidThresholds { critical: u8, high: u8, medium: u8 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RiskResult<T> = Result<T, RiskError>;
