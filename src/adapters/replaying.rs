//! Replaying adapter for the `ImageGenerator` port.

use std::sync::Mutex;

use crate::cassette::replayer::{replay_result, CassetteReplayer};
use crate::error::ImageError;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResponse};

/// Answers each call with the next recorded `image_generator::generate` outcome.
pub struct ReplayingImageGenerator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next_response(&self) -> Result<ImageResponse, ImageError> {
        let interaction = self
            .replayer
            .lock()
            .map_err(|e| ImageError::Replay(format!("replayer lock poisoned: {e}")))?
            .next_interaction("image_generator", "generate")?;
        replay_result(interaction.output)
    }
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, _request: &ImageRequest) -> GenerateFuture<'_> {
        let result = self.next_response();
        Box::pin(async move { result })
    }
}
