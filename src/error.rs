use thiserror::Error;

/// Errors raised at the I/O boundary of the crate.
///
/// The aggregation core itself is total over its input and never returns
/// these; they come from loading rows, reading registry overrides and
/// writing report files.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A registry override file could not be parsed.
    #[error("Registry file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The input has no header for a column the dataset requires.
    #[error("Missing column '{column}' for dataset '{dataset}'")]
    MissingColumn {
        /// Header name that was expected.
        column: String,
        /// Dataset being loaded.
        dataset: String,
    },

    /// No dataset is registered under the given name.
    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),

    /// A ward or category selector could not be parsed.
    #[error("Invalid selection '{value}': {message}")]
    InvalidSelection {
        /// Raw input.
        value: String,
        /// What was wrong with it.
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ProfileError>;
