use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::SystemTime;

use resvg::usvg;
use resvg::usvg::TreeParsing;
use tokio::fs;

use crate::icon::IconGenError;

/// The intrinsic density assigned to vector sources, in pixels per inch.
///
/// Rendering at this density reproduces the SVG at its intrinsic pixel
/// size; target densities scale relative to it.
pub const SVG_DENSITY: f32 = 72.0;

/// Image format sniffed from the leading bytes of a source file.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceFormat {
    Svg,
    Png,
    Jpeg,
    Gif,
    WebP,
    Unknown,
}

impl SourceFormat {
    /// Detects the format from the file's magic bytes.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            SourceFormat::Png
        } else if data.starts_with(&[0xff, 0xd8, 0xff]) {
            SourceFormat::Jpeg
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            SourceFormat::Gif
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            SourceFormat::WebP
        } else if looks_like_svg(data) {
            SourceFormat::Svg
        } else {
            SourceFormat::Unknown
        }
    }
}

impl Display for SourceFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceFormat::Svg => "svg",
            SourceFormat::Png => "png",
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Gif => "gif",
            SourceFormat::WebP => "webp",
            SourceFormat::Unknown => "unknown",
        };

        f.write_str(name)
    }
}

// SVG has no magic bytes; accept anything whose leading chunk mentions
// an <svg root element.
fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(1024)];
    String::from_utf8_lossy(head).contains("<svg")
}

/// The intrinsic size and density of a source image.
#[derive(Debug, Clone, Copy)]
pub struct ImageMetadata {
    pub width: f32,
    pub height: f32,
    pub density: f32,
}

/// A source image read and parsed once, shared by all outputs of a batch.
pub struct SourceImage {
    format: SourceFormat,
    svg: Option<usvg::Tree>,
    modified: Option<SystemTime>,
}

impl SourceImage {
    /// Reads and parses the source file.
    ///
    /// Only I/O and SVG parse problems fail here; the format and
    /// dimension constraints are checked per output via
    /// [`Self::vector_data`].
    pub async fn load(path: &Path) -> Result<Self, IconGenError> {
        let data = fs::read(path).await?;
        let modified = fs::metadata(path).await?.modified().ok();

        let format = SourceFormat::detect(&data);
        let svg = if format == SourceFormat::Svg {
            let text = String::from_utf8_lossy(&data);
            let tree = usvg::Tree::from_str(&text, &usvg::Options::default())
                .map_err(IconGenError::SvgParse)?;

            Some(tree)
        } else {
            None
        };

        Ok(Self {
            format,
            svg,
            modified,
        })
    }

    /// When the source was last modified, if the filesystem reports it.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Returns the parsed vector tree and its intrinsic metadata.
    pub fn vector_data(&self) -> Result<(&usvg::Tree, ImageMetadata), IconGenError> {
        let Some(tree) = &self.svg else {
            return Err(IconGenError::UnsupportedFormat(self.format));
        };

        let size = tree.size;
        if !(size.width() > 0.0 && size.height() > 0.0) {
            return Err(IconGenError::MissingDimensions);
        }

        Ok((
            tree,
            ImageMetadata {
                width: size.width(),
                height: size.height(),
                density: SVG_DENSITY,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_png_magic() {
        assert_eq!(
            SourceFormat::detect(b"\x89PNG\r\n\x1a\n0000"),
            SourceFormat::Png
        );
    }

    #[test]
    fn detects_jpeg_magic() {
        assert_eq!(
            SourceFormat::detect(&[0xff, 0xd8, 0xff, 0xe0]),
            SourceFormat::Jpeg
        );
    }

    #[test]
    fn detects_webp_magic() {
        assert_eq!(
            SourceFormat::detect(b"RIFF\x00\x00\x00\x00WEBPVP8 "),
            SourceFormat::WebP
        );
    }

    #[test]
    fn detects_svg_markup() {
        assert_eq!(
            SourceFormat::detect(b"<?xml version=\"1.0\"?>\n<svg xmlns=\"a\"/>"),
            SourceFormat::Svg
        );
    }

    #[test]
    fn unrecognized_data_is_unknown() {
        assert_eq!(SourceFormat::detect(b"hello world"), SourceFormat::Unknown);
    }
}
