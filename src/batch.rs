//! Sequential batch generation with per-job failure isolation.
//!
//! [`BatchGenerator::run_all`] walks the job list in order, sends one request
//! per job, writes the returned images and records an [`Outcome`] under the
//! job's name. A failing job is reported and recorded; it never stops the
//! jobs after it. Only an unusable output directory aborts the batch, and it
//! does so before the first request.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::ImageError;
use crate::jobs::{Job, JobSet};
use crate::output::{ensure_output_dir, write_artifacts, Artifacts};
use crate::params::{ImageSize, OutputFormat, Quality};
use crate::ports::{ImageGenerator, ImageRequest};

/// Width of the `=` rules framing progress markers and the summary.
const RULE_WIDTH: usize = 60;

/// Request parameters shared by every job of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Resolved model identifier.
    pub model: String,
    /// Aspect ratio.
    pub aspect_ratio: String,
    /// Resolution tier.
    pub size: ImageSize,
    /// Quality level.
    pub quality: Quality,
    /// Encoding of written files.
    pub format: OutputFormat,
    /// Images requested per job.
    pub count: u32,
}

impl RenderSettings {
    fn request(&self, prompt: String) -> ImageRequest {
        ImageRequest {
            model: self.model.clone(),
            prompt,
            aspect_ratio: self.aspect_ratio.clone(),
            size: self.size,
            quality: self.quality,
            format: self.format,
            count: self.count,
        }
    }
}

/// What happened to one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Images were generated and written.
    Generated(Artifacts),
    /// The job failed; holds the error description.
    Failed(String),
}

impl Outcome {
    /// Whether the job failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generated(artifacts) => write!(f, "{artifacts}"),
            Self::Failed(message) => write!(f, "ERROR: {message}"),
        }
    }
}

/// Job name → outcome, in the order jobs ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    entries: Vec<(String, Outcome)>,
}

impl BatchReport {
    /// Record `outcome` for `name`. A name seen before keeps its position and
    /// takes the new outcome.
    pub fn record(&mut self, name: &str, outcome: Outcome) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = outcome;
        } else {
            self.entries.push((name.to_string(), outcome));
        }
    }

    /// Outcome recorded for `name`.
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    /// Entries in run order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }

    /// Number of distinct job names recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failed jobs.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_failure()).count()
    }
}

/// Runs a job set against one image generator.
pub struct BatchGenerator<'a> {
    generator: &'a dyn ImageGenerator,
    settings: RenderSettings,
    out_dir: PathBuf,
}

impl<'a> BatchGenerator<'a> {
    /// Create a batch generator writing into `out_dir`.
    pub fn new(
        generator: &'a dyn ImageGenerator,
        settings: RenderSettings,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self { generator, settings, out_dir: out_dir.into() }
    }

    /// Generate every job in order, printing progress and the summary to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::OutputDir`] if the output directory cannot be
    /// created. Generation failures are never returned; they are recorded in
    /// the report. Write errors on `out` are logged and the batch goes on.
    pub async fn run_all<W: Write>(
        &self,
        jobs: &JobSet,
        out: &mut W,
    ) -> Result<BatchReport, ImageError> {
        ensure_output_dir(&self.out_dir)?;
        info!(
            jobs = jobs.jobs.len(),
            model = %self.settings.model,
            out_dir = %self.out_dir.display(),
            "Starting batch"
        );

        let mut report = BatchReport::default();
        for job in &jobs.jobs {
            let rule = "=".repeat(RULE_WIDTH);
            emit(out, format_args!("\n{rule}\nGenerating: {}\n{rule}", job.name));

            let outcome = match self.generate(jobs, job).await {
                Ok(artifacts) => {
                    emit(out, format_args!("Result: {artifacts}"));
                    info!(job = %job.name, artifacts = artifacts.paths.len(), "Job finished");
                    Outcome::Generated(artifacts)
                }
                Err(e) => {
                    emit(out, format_args!("Error generating {}: {e}", job.name));
                    warn!(job = %job.name, error = %e, "Job failed");
                    Outcome::Failed(e.to_string())
                }
            };
            report.record(&job.name, outcome);
        }

        if let Err(e) = write_summary(&report, out) {
            warn!(error = %e, "Failed to write summary");
        }
        info!(recorded = report.len(), failed = report.failures(), "Batch complete");
        Ok(report)
    }

    async fn generate(&self, jobs: &JobSet, job: &Job) -> Result<Artifacts, ImageError> {
        let request = self.settings.request(jobs.compose(job));
        debug!(job = %job.name, prompt_len = request.prompt.len(), "Sending request");
        let response = self.generator.generate(&request).await?;
        write_artifacts(&self.out_dir, &job.name, &response.images, self.settings.format)
    }
}

/// Write one progress line. Failures are logged, never returned.
fn emit<W: Write>(out: &mut W, line: fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{line}") {
        warn!(error = %e, "Failed to write progress");
    }
}

/// Print the closing summary: framing header, then one line per job.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_summary<W: Write>(report: &BatchReport, out: &mut W) -> Result<(), ImageError> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "\n{rule}\nGENERATION COMPLETE\n{rule}")?;
    for (name, outcome) in report.iter() {
        writeln!(out, "  {name}: {outcome}")?;
    }
    Ok(())
}
