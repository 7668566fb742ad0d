use crate::error::ProcessingError;
use crate::image::{encode_jpeg, flatten_onto_white};
use crate::naming::build_output_path;
use std::path::{Path, PathBuf};
use webimg_core::{ImageJob, NormalizeOptions};

/// Turns one source file into its web-ready output.
pub trait Normalizer: Send + Sync {
    /// Returns the final path of the output. On error the source is left where
    /// it was.
    fn normalize(
        &self,
        job: &ImageJob,
        options: &NormalizeOptions,
    ) -> Result<PathBuf, ProcessingError>;
}

/// Filesystem normalizer: flatten onto white and re-encode as JPEG, or keep
/// PNG files when asked to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer;

impl ImageNormalizer {
    pub fn new() -> Self {
        Self
    }

    fn is_png(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"))
    }

    /// PNG passthrough, optionally renamed with the enriched name.
    fn keep_png(job: &ImageJob, options: &NormalizeOptions) -> Result<PathBuf, ProcessingError> {
        if !options.enhance_filenames {
            return Ok(job.source_path.clone());
        }

        let destination =
            build_output_path(&job.source_path, ".png", true, job.sku.as_deref());
        if destination != job.source_path {
            std::fs::rename(&job.source_path, &destination)
                .map_err(|e| ProcessingError::io(&job.source_path, e))?;
        }
        Ok(destination)
    }

    fn convert(job: &ImageJob, options: &NormalizeOptions) -> Result<PathBuf, ProcessingError> {
        let source = &job.source_path;

        let bytes = std::fs::read(source).map_err(|e| ProcessingError::io(source, e))?;
        let img = image::load_from_memory(&bytes).map_err(|e| ProcessingError::Decode {
            path: source.clone(),
            source: e,
        })?;

        let rgb = flatten_onto_white(&img);
        let data = encode_jpeg(&rgb, options.quality)?;

        let sku = if options.enhance_filenames {
            job.sku.as_deref()
        } else {
            None
        };
        let destination = build_output_path(source, ".jpg", options.enhance_filenames, sku);

        std::fs::write(&destination, &data).map_err(|e| ProcessingError::io(&destination, e))?;

        std::fs::remove_file(source).map_err(|e| ProcessingError::io(source, e))?;

        Ok(destination)
    }
}

impl Normalizer for ImageNormalizer {
    fn normalize(
        &self,
        job: &ImageJob,
        options: &NormalizeOptions,
    ) -> Result<PathBuf, ProcessingError> {
        let result = if options.keep_png && Self::is_png(&job.source_path) {
            Self::keep_png(job, options)
        } else {
            Self::convert(job, options)
        };

        match &result {
            Ok(output) => tracing::debug!(
                source = %job.source_path.display(),
                output = %output.display(),
                quality = options.quality.value(),
                "Image normalized"
            ),
            Err(e) => tracing::warn!(
                source = %job.source_path.display(),
                error = %e,
                "Image normalization failed"
            ),
        }

        result
    }
}
