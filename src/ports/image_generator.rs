//! Image generator port for AI image generation APIs.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::params::{ImageSize, OutputFormat, Quality};

/// A single generation call as sent to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    /// The resolved model identifier (e.g., `"gemini-3-pro-image-preview"`).
    pub model: String,
    /// Fully composed prompt, theme included.
    pub prompt: String,
    /// Aspect ratio (e.g., `"16:9"`).
    pub aspect_ratio: String,
    /// Resolution tier.
    pub size: ImageSize,
    /// Quality level.
    pub quality: Quality,
    /// Requested encoding.
    pub format: OutputFormat,
    /// Number of images to generate.
    pub count: u32,
}

/// A single generated image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Raw image bytes (decoded from base64).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
}

/// Images returned for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    /// The generated images.
    pub images: Vec<GeneratedImage>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageResponse, ImageError>> + Send + 'a>>;

/// Generates images from text prompts via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Generate images for the given request.
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_>;
}

/// Cassettes store image bytes as base64 strings.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_api_names() {
        let request = ImageRequest {
            model: "gemini-3-pro-image-preview".into(),
            prompt: "a rack of servers".into(),
            aspect_ratio: "16:9".into(),
            size: ImageSize::TwoK,
            quality: Quality::Auto,
            format: OutputFormat::Png,
            count: 1,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["size"], "2K");
        assert_eq!(json["format"], "png");
        assert_eq!(json["count"], 1);
    }

    #[test]
    fn image_data_is_base64_in_yaml() {
        let response = ImageResponse {
            images: vec![GeneratedImage { data: vec![0x89, 0x50, 0x4E, 0x47], mime_type: "image/png".into() }],
        };
        let yaml = serde_yaml::to_string(&response).unwrap();
        assert!(yaml.contains("iVBORw=="));
        let back: ImageResponse = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.images[0].data, vec![0x89, 0x50, 0x4E, 0x47]);
    }
}
