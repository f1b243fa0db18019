//! Unified error type for infogen.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing or running a generation batch.
///
/// Inside the batch loop every variant is caught per job and recorded as a
/// failed outcome. Outside it (argument validation, config, output directory)
/// they are fatal.
#[derive(Debug, Error)]
pub enum ImageError {
    /// An API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output directory could not be created.
    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// Configuration or job manifest error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// A cassette could not serve the requested interaction.
    #[error("Replay error: {0}")]
    Replay(String),

    /// No API key configured for the provider.
    #[error("No API key for {provider}. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The provider name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_message_names_path() {
        let err = ImageError::OutputDir {
            path: PathBuf::from("/readonly/images"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("Cannot create output directory /readonly/images"));
    }

    #[test]
    fn missing_key_mentions_env_var() {
        let err = ImageError::MissingApiKey {
            provider: "Gemini".into(),
            env_var: "GEMINI_API_KEY".into(),
        };
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
