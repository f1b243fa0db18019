//! Live adapter for the Gemini image generation API.

use reqwest::Client;
use serde::Deserialize;

use super::{check_status, decode_image, no_images, parse_body};
use crate::ports::image_generator::{
    GenerateFuture, GeneratedImage, ImageGenerator, ImageRequest, ImageResponse,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Calls `generateContent` on a Gemini image model.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

/// Build the `generateContent` body.
///
/// Gemini returns one image per candidate, so the count maps to
/// `candidateCount`.
fn request_body(request: &ImageRequest) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [{"text": request.prompt}]
        }],
        "generationConfig": {
            "responseModalities": ["IMAGE"],
            "candidateCount": request.count,
            "imageConfig": {
                "aspectRatio": request.aspect_ratio,
                "imageSize": request.size,
            }
        }
    })
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", request.model);
        let body = request_body(request);
        Box::pin(async move {
            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await?;
            check_status(status, &text)?;

            let parsed: GeminiResponse = parse_body(&text)?;
            let mut images = Vec::new();
            for part in parsed.candidates.into_iter().flat_map(|c| c.content.parts) {
                if let Some(inline) = part.inline_data {
                    images.push(GeneratedImage {
                        data: decode_image(&inline.data)?,
                        mime_type: inline.mime_type,
                    });
                }
            }

            if images.is_empty() {
                return Err(no_images(&text));
            }
            Ok(ImageResponse { images })
        })
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}
