//! Rendering parameters shared by the CLI, the config file and the adapters.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// Encoding of the written artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG, written with a `.jpg` extension.
    Jpeg,
    /// PNG.
    Png,
    /// WebP.
    Webp,
}

impl OutputFormat {
    /// File extension used for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// MIME type an API returns for this format.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Matching `image` crate encoder.
    #[must_use]
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        })
    }
}

/// Requested output resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum ImageSize {
    /// Roughly 1024px on the long edge.
    #[value(name = "1K")]
    #[serde(rename = "1K")]
    OneK,
    /// Roughly 2048px.
    #[value(name = "2K")]
    #[serde(rename = "2K")]
    TwoK,
    /// Roughly 4096px.
    #[value(name = "4K")]
    #[serde(rename = "4K")]
    FourK,
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        })
    }
}

/// Rendering quality (`OpenAI` only; ignored by Gemini).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Let the service decide.
    Auto,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Aspect ratios both providers accept.
const ASPECT_RATIOS: &[&str] =
    &["1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9"];

/// Validate an aspect ratio string.
///
/// # Errors
///
/// Returns an error if the ratio is not recognized.
pub fn validate_aspect_ratio(ratio: &str) -> Result<(), ImageError> {
    if ASPECT_RATIOS.contains(&ratio) {
        Ok(())
    } else {
        Err(ImageError::InvalidArgument(format!(
            "Unsupported aspect ratio '{ratio}'. Valid: {}",
            ASPECT_RATIOS.join(", ")
        )))
    }
}

/// Translate an aspect ratio to `OpenAI` pixel dimensions.
///
/// `OpenAI` only knows `1024x1024`, `1536x1024`, `1024x1536` and `auto`.
#[must_use]
pub fn openai_size(ratio: &str, size: ImageSize) -> &'static str {
    // 2K/4K have no fixed OpenAI dimensions
    if size != ImageSize::OneK {
        return "auto";
    }
    match ratio {
        "1:1" => "1024x1024",
        "16:9" | "3:2" | "4:3" | "21:9" | "5:4" => "1536x1024",
        "9:16" | "2:3" | "3:4" | "4:5" => "1024x1536",
        _ => "auto",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_extensions() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Webp.extension(), "webp");
    }

    #[test]
    fn format_mime_types() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Webp.mime_type(), "image/webp");
    }

    #[test]
    fn size_parses_from_cli_value() {
        assert_eq!(ImageSize::from_str("2K", false).unwrap(), ImageSize::TwoK);
        assert!(ImageSize::from_str("8K", false).is_err());
    }

    #[test]
    fn serde_names_match_api_values() {
        assert_eq!(serde_json::to_string(&ImageSize::FourK).unwrap(), "\"4K\"");
        assert_eq!(serde_json::to_string(&Quality::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&OutputFormat::Webp).unwrap(), "\"webp\"");
    }

    #[test]
    fn aspect_ratio_validation() {
        assert!(validate_aspect_ratio("16:9").is_ok());
        assert!(validate_aspect_ratio("21:9").is_ok());
        let err = validate_aspect_ratio("100:200").unwrap_err();
        assert!(err.to_string().contains("Unsupported aspect ratio"));
    }

    #[test]
    fn openai_dimensions() {
        assert_eq!(openai_size("1:1", ImageSize::OneK), "1024x1024");
        assert_eq!(openai_size("16:9", ImageSize::OneK), "1536x1024");
        assert_eq!(openai_size("9:16", ImageSize::OneK), "1024x1536");
        assert_eq!(openai_size("16:9", ImageSize::TwoK), "auto");
    }
}
