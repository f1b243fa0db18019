//! Merges command-line flags, the config file and built-in defaults.
//!
//! Precedence is flag, then `[batch]` config, then the defaults below.

use std::path::PathBuf;

use crate::batch::RenderSettings;
use crate::cli::Cli;
use crate::config::BatchConfig;
use crate::error::ImageError;
use crate::model::{Provider, ResolvedModel, DEFAULT_MODEL};
use crate::params::{validate_aspect_ratio, ImageSize, OutputFormat, Quality};

const DEFAULT_OUT_DIR: &str = "docs/images";
const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Everything a batch run needs besides the jobs and the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Request parameters.
    pub render: RenderSettings,
    /// Provider serving `render.model`.
    pub provider: Provider,
    /// Output directory.
    pub out_dir: PathBuf,
}

impl RunSettings {
    /// Resolve and validate the run settings.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidArgument`] for an unknown model, an
    /// unsupported aspect ratio or a zero image count.
    pub fn resolve(cli: &Cli, config: &BatchConfig) -> Result<Self, ImageError> {
        let model_name = cli.model.as_deref().or(config.model.as_deref()).unwrap_or(DEFAULT_MODEL);
        let model = ResolvedModel::resolve(model_name)?;

        let aspect_ratio = cli
            .aspect_ratio
            .clone()
            .or_else(|| config.aspect_ratio.clone())
            .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string());
        validate_aspect_ratio(&aspect_ratio)?;

        let count = cli.count.or(config.count).unwrap_or(1);
        if count == 0 {
            return Err(ImageError::InvalidArgument("Image count must be at least 1".into()));
        }

        let render = RenderSettings {
            model: model.id,
            aspect_ratio,
            size: cli.size.or(config.size).unwrap_or(ImageSize::TwoK),
            quality: cli.quality.or(config.quality).unwrap_or(Quality::Auto),
            format: cli.format.or(config.format).unwrap_or(OutputFormat::Png),
            count,
        };
        let out_dir = cli
            .out_dir
            .clone()
            .or_else(|| config.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

        Ok(Self { render, provider: model.provider, out_dir })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("infogen").chain(args.iter().copied()))
    }

    #[test]
    fn built_in_defaults() {
        let settings = RunSettings::resolve(&cli(&[]), &BatchConfig::default()).unwrap();
        assert_eq!(settings.render.model, "gemini-3-pro-image-preview");
        assert_eq!(settings.provider, Provider::Gemini);
        assert_eq!(settings.render.aspect_ratio, "16:9");
        assert_eq!(settings.render.size, ImageSize::TwoK);
        assert_eq!(settings.render.quality, Quality::Auto);
        assert_eq!(settings.render.format, OutputFormat::Png);
        assert_eq!(settings.render.count, 1);
        assert_eq!(settings.out_dir, PathBuf::from("docs/images"));
    }

    #[test]
    fn config_fills_unset_flags() {
        let config = BatchConfig {
            out_dir: Some("site/img".into()),
            model: Some("gpt-1".into()),
            format: Some(OutputFormat::Jpeg),
            count: Some(2),
            ..BatchConfig::default()
        };
        let settings = RunSettings::resolve(&cli(&[]), &config).unwrap();
        assert_eq!(settings.render.model, "gpt-image-1");
        assert_eq!(settings.provider, Provider::OpenAi);
        assert_eq!(settings.render.format, OutputFormat::Jpeg);
        assert_eq!(settings.render.count, 2);
        assert_eq!(settings.out_dir, PathBuf::from("site/img"));
    }

    #[test]
    fn flags_beat_config() {
        let config = BatchConfig {
            model: Some("gpt-1".into()),
            aspect_ratio: Some("1:1".into()),
            ..BatchConfig::default()
        };
        let settings =
            RunSettings::resolve(&cli(&["-m", "nano-banana", "-a", "9:16", "-o", "x"]), &config)
                .unwrap();
        assert_eq!(settings.render.model, "gemini-3.1-flash-image-preview");
        assert_eq!(settings.render.aspect_ratio, "9:16");
        assert_eq!(settings.out_dir, PathBuf::from("x"));
    }

    #[test]
    fn invalid_values_rejected() {
        let defaults = BatchConfig::default();
        assert!(RunSettings::resolve(&cli(&["-m", "dall-e-3"]), &defaults).is_err());
        assert!(RunSettings::resolve(&cli(&["-a", "100:200"]), &defaults).is_err());
        let zero = BatchConfig { count: Some(0), ..BatchConfig::default() };
        assert!(RunSettings::resolve(&cli(&[]), &zero).is_err());
    }
}
