pub(crate) mod render;
pub(crate) mod source;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use futures::future;
use resvg::usvg;
use thiserror::Error;
use tokio::fs;

use crate::icon::source::{ImageMetadata, SourceFormat, SourceImage};

/// A single file to produce from a source image.
#[derive(Debug, Clone)]
pub struct OutputSpec {
    /// Where the PNG ends up
    pub file_path: PathBuf,

    /// The requested output size
    pub size: SizeSpec,

    /// Composite onto an opaque background and drop the alpha channel
    pub flatten_alpha: bool,
}

/// The requested size of an output image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    /// A fixed size in pixels, must match the source's aspect ratio
    Absolute { width: f32, height: f32 },

    /// A multiple of the source's intrinsic pixel size
    Relative { scale: f32 },
}

/// Generates every requested output from one source image.
///
/// The source is read and parsed once; the outputs run concurrently and
/// the first failure fails the whole batch. Returns the paths that were
/// actually written, excluding outputs skipped as up to date.
pub async fn generate_pngs(
    source_path: &Path,
    outputs: Vec<OutputSpec>,
) -> Result<Vec<PathBuf>, IconGenError> {
    let source = SourceImage::load(source_path).await?;

    let written =
        future::try_join_all(outputs.iter().map(|output| generate_png(&source, output))).await?;

    Ok(written.into_iter().flatten().collect())
}

async fn generate_png(
    source: &SourceImage,
    output: &OutputSpec,
) -> Result<Option<PathBuf>, IconGenError> {
    if let Some(parent) = output.file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let (tree, metadata) = source.vector_data()?;
    let density = target_density(&metadata, &output.size)?;

    if is_up_to_date(&output.file_path, source.modified()).await {
        tracing::debug!("Skipping up-to-date output {}", output.file_path.display());
        return Ok(None);
    }

    let encoded = render::render_png(tree, &metadata, density, output.flatten_alpha)?;
    fs::write(&output.file_path, encoded).await?;

    tracing::debug!("Wrote {}", output.file_path.display());
    Ok(Some(output.file_path.clone()))
}

/// Computes the density to rasterize at for the requested output size.
///
/// Absolute sizes must match the source's aspect ratio exactly; relative
/// sizes are proportional by construction.
fn target_density(metadata: &ImageMetadata, size: &SizeSpec) -> Result<f32, IconGenError> {
    match *size {
        SizeSpec::Absolute { width, height } => {
            let input_ratio = metadata.width / metadata.height;
            let output_ratio = width / height;
            if input_ratio != output_ratio {
                return Err(IconGenError::AspectRatioMismatch {
                    expected: output_ratio,
                    actual: input_ratio,
                });
            }

            Ok((width / metadata.width) * metadata.density)
        }
        SizeSpec::Relative { scale } => Ok(scale * metadata.density),
    }
}

/// True if `path` exists and is at least as new as the source.
pub(crate) async fn is_up_to_date(path: &Path, source_modified: Option<SystemTime>) -> bool {
    let Some(source_modified) = source_modified else {
        return false;
    };

    match fs::metadata(path).await {
        Ok(meta) => meta
            .modified()
            .map(|modified| modified >= source_modified)
            .unwrap_or(false),
        Err(_) => false,
    }
}

#[derive(Debug, Error)]
pub enum IconGenError {
    #[error("an I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse SVG: {0}")]
    SvgParse(usvg::Error),

    #[error("unsupported image format {0}, only SVG images are supported")]
    UnsupportedFormat(SourceFormat),

    #[error("unsupported image, missing size and density")]
    MissingDimensions,

    #[error("incompatible image aspect ratio: expected 1:{expected}, got 1:{actual}")]
    AspectRatioMismatch { expected: f32, actual: f32 },

    #[error("the pixmap dimensions are invalid: {width}x{height}")]
    InvalidPixmapDimensions { width: u32, height: u32 },

    #[error("an error occurred while encoding the PNG: {0}")]
    PngEncoding(#[from] png::EncodingError),

    #[error("failed to encode the iconset manifest: {0}")]
    ManifestEncoding(#[from] serde_json::Error),
}
