//! Recording adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest};

/// Delegates to an inner generator and records every call.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Wrap `inner`, appending its calls to `recorder`.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            match self.recorder.lock() {
                Ok(mut recorder) => {
                    if let Err(e) = recorder.record("image_generator", "generate", &request, &result)
                    {
                        warn!(error = %e, "Failed to record interaction");
                    }
                }
                Err(e) => warn!(error = %e, "Recorder lock poisoned; interaction not recorded"),
            }
            result
        })
    }
}
