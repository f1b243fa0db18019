//! Record/replay of image generation calls as YAML cassettes.
//!
//! A recorded batch can be replayed without network access, which is how the
//! integration tests drive the binary.

pub mod recorder;
pub mod replayer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session: every interaction of one batch run, in call order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Recorded calls.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One recorded call and its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the recording, starting at zero.
    pub seq: u64,
    /// Port the call went through (e.g. `image_generator`).
    pub port: String,
    /// Method on the port (e.g. `generate`).
    pub method: String,
    /// Serialized request.
    #[serde(default)]
    pub input: serde_json::Value,
    /// `{"Ok": value}` or `{"Err": message}`.
    pub output: serde_json::Value,
}
