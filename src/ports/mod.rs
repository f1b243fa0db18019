//! Port traits defining external boundaries.
//!
//! The image generation API is the only external system the batch talks to.
//! Implementations live in `src/adapters/`.

pub mod image_generator;

pub use image_generator::{GenerateFuture, GeneratedImage, ImageGenerator, ImageRequest, ImageResponse};
