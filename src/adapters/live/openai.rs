//! Live adapter for the `OpenAI` image generation API.

use reqwest::Client;
use serde::Deserialize;

use super::{check_status, decode_image, no_images, parse_body};
use crate::error::ImageError;
use crate::params::openai_size;
use crate::ports::image_generator::{
    GenerateFuture, GeneratedImage, ImageGenerator, ImageRequest, ImageResponse,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/images/generations";

/// Calls the `OpenAI` Images API.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
}

impl OpenAiGenerator {
    /// Create a new `OpenAI` generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

fn request_body(request: &ImageRequest) -> serde_json::Value {
    serde_json::json!({
        "model": request.model,
        "prompt": request.prompt,
        "n": request.count,
        "size": openai_size(&request.aspect_ratio, request.size),
        "quality": request.quality,
        "output_format": request.format,
    })
}

impl ImageGenerator for OpenAiGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let body = request_body(request);
        let mime_type = request.format.mime_type();
        Box::pin(async move {
            let response = self
                .client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await?;
            check_status(status, &text)?;

            let parsed: OpenAiResponse = parse_body(&text)?;
            let images = parsed
                .data
                .iter()
                .map(|item| {
                    Ok(GeneratedImage {
                        data: decode_image(&item.b64_json)?,
                        mime_type: mime_type.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, ImageError>>()?;

            if images.is_empty() {
                return Err(no_images(&text));
            }
            Ok(ImageResponse { images })
        })
    }
}

// --- OpenAI API response types ---

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    b64_json: String,
}
