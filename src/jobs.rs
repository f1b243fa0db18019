//! Job manifests: named prompts plus the theme they share.
//!
//! A manifest is TOML:
//!
//! ```toml
//! theme = "Style: flat, navy and teal"
//!
//! [[jobs]]
//! name = "docker-deployment"
//! prompt = """
//! Docker Compose architecture...
//! {theme}
//! """
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ImageError;

/// Marker in a prompt that is replaced by the theme.
pub const THEME_PLACEHOLDER: &str = "{theme}";

/// PromSNMP deployment infographics, used when no manifest is given.
const BUILTIN_CATALOG: &str = include_str!("../catalog/promsnmp.toml");

/// One named generation request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// Identifies the job in output and names its artifacts.
    pub name: String,
    /// Prompt text, possibly containing [`THEME_PLACEHOLDER`].
    pub prompt: String,
}

#[cfg(test)]
impl Job {
    /// Create a job.
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self { name: name.into(), prompt: prompt.into() }
    }
}

/// An ordered list of jobs and the theme composed into each of them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSet {
    /// Shared style fragment.
    #[serde(default)]
    pub theme: String,
    /// Jobs in run order.
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl JobSet {
    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded manifest is malformed.
    pub fn builtin() -> Result<Self, ImageError> {
        Self::parse(BUILTIN_CATALOG, "built-in catalog")
    }

    /// Read a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ImageError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ImageError::Config(format!("Failed to read job manifest {}: {e}", path.display()))
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parse manifest text; `origin` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Config`] on invalid TOML or unknown keys.
    pub fn parse(text: &str, origin: &str) -> Result<Self, ImageError> {
        toml::from_str(text)
            .map_err(|e| ImageError::Config(format!("Failed to parse job manifest {origin}: {e}")))
    }

    /// The full prompt sent for `job`.
    ///
    /// Every [`THEME_PLACEHOLDER`] is replaced by the theme. A prompt without
    /// the placeholder gets the theme appended after a blank line.
    #[must_use]
    pub fn compose(&self, job: &Job) -> String {
        let theme = self.theme.trim();
        if job.prompt.contains(THEME_PLACEHOLDER) {
            job.prompt.replace(THEME_PLACEHOLDER, theme)
        } else if theme.is_empty() {
            job.prompt.clone()
        } else {
            format!("{}\n\n{theme}", job.prompt.trim_end())
        }
    }

    /// Keep only the named jobs, in manifest order. An empty filter keeps all.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidArgument`] for a name not in the manifest.
    pub fn select(mut self, only: &[String]) -> Result<Self, ImageError> {
        if only.is_empty() {
            return Ok(self);
        }
        if let Some(unknown) = only.iter().find(|n| !self.jobs.iter().any(|j| &j.name == *n)) {
            return Err(ImageError::InvalidArgument(format!(
                "Unknown job '{unknown}'. Available: {}",
                self.names().join(", ")
            )));
        }
        self.jobs.retain(|j| only.contains(&j.name));
        Ok(self)
    }

    /// Job names in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.name.as_str()).collect()
    }

    /// Names that occur more than once, each reported once.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut dups: Vec<&str> = Vec::new();
        for (i, job) in self.jobs.iter().enumerate() {
            let seen_before = self.jobs[..i].iter().any(|j| j.name == job.name);
            if seen_before && !dups.contains(&job.name.as_str()) {
                dups.push(&job.name);
            }
        }
        dups
    }
}
