use thiserror::Error;

/// Errors raised while reading environment configuration or branding profiles.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profile file {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile file {path}: {source}")]
    ProfileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid profile {path}: {}", .problems.join("; "))]
    ProfileValidation { path: String, problems: Vec<String> },
}

/// Errors raised while loading the recipient table. All of them are fatal to a run.
#[derive(Debug, Error)]
pub enum RecipientError {
    #[error("failed to read recipient table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed recipient table: {0}")]
    Csv(#[from] csv::Error),

    #[error("recipient table is missing required columns: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("row {row}: telegram_id '{value}' is not a positive integer")]
    InvalidIdentifier { row: usize, value: String },
}
