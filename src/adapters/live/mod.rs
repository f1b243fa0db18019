//! Live adapters that call provider HTTP APIs.

pub mod gemini;
pub mod openai;

use base64::Engine;

use crate::error::ImageError;

/// Longest slice of a response body echoed back in error messages.
const BODY_EXCERPT_LEN: usize = 500;

/// Turn a non-success HTTP status into an API error carrying the body.
pub(crate) fn check_status(status: reqwest::StatusCode, body: &str) -> Result<(), ImageError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ImageError::Api { status: status.as_u16(), message: body.to_string() })
    }
}

/// Parse a successful JSON body into the provider's response type.
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ImageError> {
    serde_json::from_str(body).map_err(|e| ImageError::Api {
        status: 200,
        message: format!("Failed to parse response: {e}"),
    })
}

/// Decode one base64 image payload.
pub(crate) fn decode_image(b64: &str) -> Result<Vec<u8>, ImageError> {
    base64::engine::general_purpose::STANDARD.decode(b64).map_err(|e| ImageError::Api {
        status: 200,
        message: format!("Failed to decode base64: {e}"),
    })
}

/// Error for a 200 response that carried no image parts.
pub(crate) fn no_images(body: &str) -> ImageError {
    let excerpt = if body.len() > BODY_EXCERPT_LEN {
        let mut end = BODY_EXCERPT_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    };
    ImageError::Api { status: 200, message: format!("No images in response. Body: {excerpt}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_status_is_api_error() {
        let err = check_status(reqwest::StatusCode::BAD_REQUEST, "quota exceeded").unwrap_err();
        assert_eq!(err.to_string(), "API error (400): quota exceeded");
        assert!(check_status(reqwest::StatusCode::OK, "").is_ok());
    }

    #[test]
    fn no_images_truncates_long_bodies() {
        let body = "x".repeat(2_000);
        let msg = no_images(&body).to_string();
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 600);
    }

    #[test]
    fn no_images_respects_char_boundaries() {
        let body = "é".repeat(400);
        assert!(no_images(&body).to_string().ends_with("..."));
    }

    #[test]
    fn bad_base64_is_reported() {
        assert!(decode_image("not base64!!").is_err());
        assert_eq!(decode_image("AQID").unwrap(), vec![1, 2, 3]);
    }
}
