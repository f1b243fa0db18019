//! Chooses the image generator implementation for a run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::live::openai::OpenAiGenerator;
use crate::adapters::recording::RecordingImageGenerator;
use crate::adapters::replaying::ReplayingImageGenerator;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::error::ImageError;
use crate::model::Provider;
use crate::ports::ImageGenerator;

/// Replays a cassette instead of calling the API.
pub const REPLAY_ENV: &str = "INFOGEN_REPLAY";
/// Records live calls to a cassette when set to `1` or `true`.
pub const RECORD_ENV: &str = "INFOGEN_REC";

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the cassette to disk.
    ///
    /// Call after the batch has finished and the context has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder is still shared or the file cannot be
    /// written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        let count = recorder.interaction_count();
        let path = recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))?;
        info!(path = %path.display(), interactions = count, "Cassette written");
        Ok(path)
    }
}

impl ServiceContext {
    /// Pick live, recording or replaying mode from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing (live and recording) or the
    /// cassette cannot be loaded (replaying).
    pub fn from_env(
        provider: Provider,
        config: &Config,
    ) -> Result<(Self, Option<RecordingSession>), ImageError> {
        if let Ok(cassette) = std::env::var(REPLAY_ENV) {
            info!(cassette = %cassette, "Replaying generator calls");
            return Ok((Self::replaying(Path::new(&cassette))?, None));
        }
        if std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1") {
            info!("Recording generator calls");
            let (ctx, session) = Self::recording(provider, config)?;
            return Ok((ctx, Some(session)));
        }
        Ok((Self::live(provider, config)?, None))
    }

    /// Create a live context for the given provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured.
    pub fn live(provider: Provider, config: &Config) -> Result<Self, ImageError> {
        let key = config.api_key(provider).ok_or_else(|| ImageError::MissingApiKey {
            provider: provider.to_string(),
            env_var: provider.key_env_var().to_string(),
        })?;
        let generator: Box<dyn ImageGenerator> = match provider {
            Provider::Gemini => Box::new(GeminiGenerator::new(key)),
            Provider::OpenAi => Box::new(OpenAiGenerator::new(key)),
        };
        Ok(Self { generator })
    }

    /// Wrap a live context so every call lands in a timestamped cassette
    /// under `.infogen/cassettes/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(
        provider: Provider,
        config: &Config,
    ) -> Result<(Self, RecordingSession), ImageError> {
        let live = Self::live(provider, config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".infogen/cassettes")
            .join(&timestamp)
            .join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-batch"),
            commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live.generator, Arc::clone(&recorder));
        Ok((Self { generator: Box::new(generator) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ImageError> {
        let replayer = CassetteReplayer::load(path)?;
        Ok(Self { generator: Box::new(ReplayingImageGenerator::new(replayer)) })
    }
}

/// Current git commit, or `"unknown"` outside a repository.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
