//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{ImageSize, OutputFormat, Quality};

/// Generate a batch of architecture infographics with Gemini or `OpenAI` image models.
///
/// Without `--jobs` the built-in PromSNMP deployment catalog is used.
#[derive(Parser, Debug)]
#[command(name = "infogen", version, about)]
pub struct Cli {
    /// TOML job manifest (`theme` plus `[[jobs]]` with `name` and `prompt`).
    #[arg(short, long)]
    pub jobs: Option<PathBuf>,

    /// Directory the images are written to [default: docs/images].
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Model name or short alias [default: nano-banana-pro].
    #[arg(short, long)]
    pub model: Option<String>,

    /// Images generated per job [default: 1].
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: Option<u32>,

    /// Output format [default: png].
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Aspect ratio, e.g. 16:9 or 1:1 [default: 16:9].
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Image size [default: 2K].
    #[arg(short, long, value_enum)]
    pub size: Option<ImageSize>,

    /// Quality (`OpenAI` only) [default: auto].
    #[arg(short, long, value_enum)]
    pub quality: Option<Quality>,

    /// Only run the named job. Repeat to pick several.
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// List job names and exit.
    #[arg(short, long)]
    pub list: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug-level logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_uses_defaults_elsewhere() {
        let cli = Cli::parse_from(["infogen"]);
        assert!(cli.jobs.is_none());
        assert!(cli.out_dir.is_none());
        assert!(cli.model.is_none());
        assert!(cli.count.is_none());
        assert!(cli.only.is_empty());
        assert!(!cli.list);
        assert!(!cli.verbose);
    }

    #[test]
    fn all_options() {
        let cli = Cli::parse_from([
            "infogen",
            "-j",
            "jobs.toml",
            "-o",
            "site/img",
            "-m",
            "gpt-1",
            "-n",
            "3",
            "-f",
            "webp",
            "-a",
            "1:1",
            "-s",
            "4K",
            "-q",
            "high",
            "--only",
            "docker-deployment",
            "--only",
            "kubernetes-deployment",
            "-v",
        ]);
        assert_eq!(cli.jobs, Some(PathBuf::from("jobs.toml")));
        assert_eq!(cli.out_dir, Some(PathBuf::from("site/img")));
        assert_eq!(cli.model.as_deref(), Some("gpt-1"));
        assert_eq!(cli.count, Some(3));
        assert_eq!(cli.format, Some(OutputFormat::Webp));
        assert_eq!(cli.aspect_ratio.as_deref(), Some("1:1"));
        assert_eq!(cli.size, Some(ImageSize::FourK));
        assert_eq!(cli.quality, Some(Quality::High));
        assert_eq!(cli.only, ["docker-deployment", "kubernetes-deployment"]);
        assert!(cli.verbose);
    }

    #[test]
    fn zero_count_rejected() {
        assert!(Cli::try_parse_from(["infogen", "-n", "0"]).is_err());
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(Cli::try_parse_from(["infogen", "--format", "gif"]).is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
