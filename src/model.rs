//! Model alias resolution and provider detection.

use std::fmt;

use crate::error::ImageError;

/// Alias used when neither the command line nor the config names a model.
pub const DEFAULT_MODEL: &str = "nano-banana-pro";

/// Supported API providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Google Gemini API.
    Gemini,
    /// `OpenAI` API.
    OpenAi,
}

impl Provider {
    /// Environment variable holding this provider's API key.
    #[must_use]
    pub fn key_env_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
        })
    }
}

/// Short names accepted in place of full model identifiers.
const ALIASES: &[(&str, &str)] = &[
    ("nano-banana", "gemini-3.1-flash-image-preview"),
    ("nano-banana-pro", "gemini-3-pro-image-preview"),
    ("gpt-1.5", "gpt-image-1.5"),
    ("gpt-1", "gpt-image-1"),
    ("gpt-1-mini", "gpt-image-1-mini"),
];

/// A model identifier together with the provider that serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    /// Full model identifier sent to the API.
    pub id: String,
    /// Provider that hosts the model.
    pub provider: Provider,
}

impl ResolvedModel {
    /// Resolve an alias or exact model name.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidArgument`] when the model does not belong
    /// to a known provider.
    pub fn resolve(name: &str) -> Result<Self, ImageError> {
        let id = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, full)| *full)
            .to_string();

        let provider = if id.starts_with("gemini") {
            Provider::Gemini
        } else if id.starts_with("gpt-image") {
            Provider::OpenAi
        } else {
            return Err(ImageError::InvalidArgument(format!(
                "Unknown provider for model '{id}'. Expected 'gemini-*' or 'gpt-image-*'."
            )));
        };

        Ok(Self { id, provider })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_gemini_pro() {
        let model = ResolvedModel::resolve(DEFAULT_MODEL).unwrap();
        assert_eq!(model.id, "gemini-3-pro-image-preview");
        assert_eq!(model.provider, Provider::Gemini);
    }

    #[test]
    fn gpt_aliases() {
        assert_eq!(ResolvedModel::resolve("gpt-1.5").unwrap().id, "gpt-image-1.5");
        assert_eq!(ResolvedModel::resolve("gpt-1").unwrap().id, "gpt-image-1");
        let mini = ResolvedModel::resolve("gpt-1-mini").unwrap();
        assert_eq!(mini.id, "gpt-image-1-mini");
        assert_eq!(mini.provider, Provider::OpenAi);
    }

    #[test]
    fn exact_names_pass_through() {
        let model = ResolvedModel::resolve("gemini-3.1-flash-image-preview").unwrap();
        assert_eq!(model.id, "gemini-3.1-flash-image-preview");
        assert_eq!(model.provider, Provider::Gemini);
    }

    #[test]
    fn unknown_provider_rejected() {
        let err = ResolvedModel::resolve("dall-e-3").unwrap_err();
        assert!(err.to_string().contains("Unknown provider for model 'dall-e-3'"));
    }

    #[test]
    fn key_env_vars() {
        assert_eq!(Provider::Gemini.key_env_var(), "GEMINI_API_KEY");
        assert_eq!(Provider::OpenAi.key_env_var(), "OPENAI_API_KEY");
    }
}
