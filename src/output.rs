//! Writing generated images into the output directory.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ImageError;
use crate::params::OutputFormat;
use crate::ports::GeneratedImage;

/// Files written for one job, in the order the API returned the images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    /// Written file paths.
    pub paths: Vec<PathBuf>,
}

impl fmt::Display for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.paths.is_empty() {
            return f.write_str("no images");
        }
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Longest file stem derived from a job name.
const SLUG_MAX_LEN: usize = 80;

/// Create the output directory and any missing parents.
///
/// # Errors
///
/// Returns [`ImageError::OutputDir`] if the directory cannot be created.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ImageError> {
    std::fs::create_dir_all(dir)
        .map_err(|source| ImageError::OutputDir { path: dir.to_path_buf(), source })
}

/// Lowercase kebab-case form of `input`, at most `max_len` bytes.
///
/// Runs of non-alphanumeric characters collapse into one hyphen; leading
/// and trailing hyphens are dropped.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(max_len);
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                if slug.len() + 2 > max_len {
                    break;
                }
                slug.push('-');
            }
            if slug.len() >= max_len {
                break;
            }
            slug.push(ch.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "infographic".to_string()
    } else {
        slug
    }
}

/// Path for image `index` of `count` returned for `job_name`.
///
/// A single image is `<slug>.<ext>`; several are numbered from 1.
#[must_use]
pub fn artifact_path(
    out_dir: &Path,
    job_name: &str,
    index: usize,
    count: usize,
    format: OutputFormat,
) -> PathBuf {
    let slug = sanitize_for_filename(job_name, SLUG_MAX_LEN);
    let ext = format.extension();
    if count > 1 {
        out_dir.join(format!("{slug}-{}.{ext}", index + 1))
    } else {
        out_dir.join(format!("{slug}.{ext}"))
    }
}

/// Reject distinct job names whose artifacts would share a file name.
///
/// Repeats of the same name are allowed; the later run replaces the earlier.
///
/// # Errors
///
/// Returns [`ImageError::InvalidArgument`] naming the first colliding pair.
pub fn check_distinct_slugs(names: &[&str]) -> Result<(), ImageError> {
    let mut seen: Vec<(&str, String)> = Vec::with_capacity(names.len());
    for &name in names {
        let slug = sanitize_for_filename(name, SLUG_MAX_LEN);
        if let Some((other, _)) = seen.iter().find(|(n, s)| *s == slug && *n != name) {
            return Err(ImageError::InvalidArgument(format!(
                "Jobs '{other}' and '{name}' would both write files named '{slug}'"
            )));
        }
        seen.push((name, slug));
    }
    Ok(())
}

/// Write every image of a job, converting to `format` where the API
/// returned something else.
///
/// # Errors
///
/// Returns an error if a file cannot be written or an image cannot be
/// converted. Images written before the failure stay on disk.
pub fn write_artifacts(
    out_dir: &Path,
    job_name: &str,
    images: &[GeneratedImage],
    format: OutputFormat,
) -> Result<Artifacts, ImageError> {
    let mut artifacts = Artifacts::default();
    for (i, image) in images.iter().enumerate() {
        let path = artifact_path(out_dir, job_name, i, images.len(), format);
        save_image(&image.data, &image.mime_type, format, &path)?;
        artifacts.paths.push(path);
    }
    Ok(artifacts)
}

/// Save raw bytes, re-encoding when the MIME type does not match `format`.
fn save_image(
    data: &[u8],
    source_mime: &str,
    format: OutputFormat,
    path: &Path,
) -> Result<(), ImageError> {
    if source_mime == format.mime_type() {
        return std::fs::write(path, data).map_err(ImageError::Io);
    }

    let decoded = image::load_from_memory(data)
        .map_err(|e| ImageError::ImageConversion(format!("Failed to decode image: {e}")))?;
    // JPEG has no alpha channel
    let decoded = if format == OutputFormat::Jpeg {
        image::DynamicImage::ImageRgb8(decoded.to_rgb8())
    } else {
        decoded
    };
    decoded
        .save_with_format(path, format.image_format())
        .map_err(|e| ImageError::ImageConversion(format!("Failed to save as {format}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_basic() {
        assert_eq!(sanitize_for_filename("Docker Deployment", 50), "docker-deployment");
    }

    #[test]
    fn sanitize_special_chars() {
        assert_eq!(sanitize_for_filename("  K8s // HA!! setup..", 50), "k8s-ha-setup");
    }

    #[test]
    fn sanitize_truncates_without_trailing_hyphen() {
        let slug = sanitize_for_filename("abcde fghij", 6);
        assert_eq!(slug, "abcde");
        assert!(sanitize_for_filename(&"a".repeat(100), 10).len() <= 10);
    }

    #[test]
    fn sanitize_empty_falls_back() {
        assert_eq!(sanitize_for_filename("", 50), "infographic");
        assert_eq!(sanitize_for_filename("!!!", 50), "infographic");
    }

    #[test]
    fn single_image_path_uses_job_name() {
        let path = artifact_path(Path::new("docs/images"), "docker-deployment", 0, 1, OutputFormat::Png);
        assert_eq!(path, PathBuf::from("docs/images/docker-deployment.png"));
    }

    #[test]
    fn multiple_images_are_numbered() {
        let path = artifact_path(Path::new("out"), "k8s", 1, 3, OutputFormat::Jpeg);
        assert_eq!(path, PathBuf::from("out/k8s-2.jpg"));
    }

    #[test]
    fn matching_mime_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![GeneratedImage { data: b"not really a png".to_vec(), mime_type: "image/png".into() }];
        let artifacts = write_artifacts(dir.path(), "raw", &images, OutputFormat::Png).unwrap();
        assert_eq!(artifacts.paths, vec![dir.path().join("raw.png")]);
        assert_eq!(std::fs::read(&artifacts.paths[0]).unwrap(), b"not really a png");
    }

    #[test]
    fn mismatched_mime_is_converted() {
        let png = {
            let img = image::DynamicImage::new_rgba8(2, 2);
            let mut buf = std::io::Cursor::new(Vec::new());
            img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
            buf.into_inner()
        };
        let dir = tempfile::tempdir().unwrap();
        let images = vec![GeneratedImage { data: png, mime_type: "image/png".into() }];
        let artifacts = write_artifacts(dir.path(), "converted", &images, OutputFormat::Jpeg).unwrap();
        let written = std::fs::read(&artifacts.paths[0]).unwrap();
        assert_eq!(&written[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn undecodable_bytes_fail_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![GeneratedImage { data: vec![1, 2, 3], mime_type: "image/webp".into() }];
        let err = write_artifacts(dir.path(), "bad", &images, OutputFormat::Png).unwrap_err();
        assert!(matches!(err, ImageError::ImageConversion(_)));
    }

    #[test]
    fn colliding_job_names_rejected() {
        let err = check_distinct_slugs(&["Docker Deployment", "k8s", "docker-deployment"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: Jobs 'Docker Deployment' and 'docker-deployment' would both \
             write files named 'docker-deployment'"
        );
    }

    #[test]
    fn repeated_or_distinct_names_accepted() {
        check_distinct_slugs(&["a", "b", "a"]).unwrap();
        check_distinct_slugs(&[]).unwrap();
    }

    #[test]
    fn artifacts_display() {
        assert_eq!(Artifacts::default().to_string(), "no images");
        let two = Artifacts { paths: vec![PathBuf::from("a.png"), PathBuf::from("b.png")] };
        assert_eq!(two.to_string(), "a.png, b.png");
    }

    #[test]
    fn output_dir_created_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs/images/deploy");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn output_dir_under_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "x").unwrap();
        let err = ensure_output_dir(&file.join("images")).unwrap_err();
        assert!(matches!(err, ImageError::OutputDir { .. }));
    }
}
