//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use serde::de::DeserializeOwned;

use super::{Cassette, Interaction};
use crate::error::ImageError;

/// Replays a cassette, one queue per `port::method` pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Build a replayer over an in-memory cassette.
    #[must_use]
    pub fn new(cassette: Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction);
        }
        Self { queues }
    }

    /// Load a cassette file.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ImageError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImageError::Config(format!("Failed to read cassette {}: {e}", path.display()))
        })?;
        let cassette: Cassette = serde_yaml::from_str(&content).map_err(|e| {
            ImageError::Config(format!("Failed to parse cassette {}: {e}", path.display()))
        })?;
        Ok(Self::new(cassette))
    }

    /// Pop the next recorded interaction for `port::method`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Replay`] when the cassette holds no further
    /// interactions for the pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, ImageError> {
        self.queues
            .get_mut(&(port.to_string(), method.to_string()))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                ImageError::Replay(format!("cassette exhausted for {port}::{method}"))
            })
    }
}

/// Decode a recorded `{"Ok": ..}` / `{"Err": ..}` output.
///
/// # Errors
///
/// A recorded `Err` comes back as [`ImageError::Replay`] carrying the original
/// message, as does an `Ok` value that no longer deserializes.
pub fn replay_result<T: DeserializeOwned>(output: serde_json::Value) -> Result<T, ImageError> {
    if let Some(err) = output.get("Err") {
        return Err(ImageError::Replay(err.as_str().unwrap_or("recorded error").to_string()));
    }
    let value = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| ImageError::Replay(format!("unreadable recorded output: {e}")))
}
