use resvg::{tiny_skia, usvg};

use crate::icon::source::ImageMetadata;
use crate::icon::IconGenError;

/// Renders the SVG at the given density and encodes it as a PNG.
///
/// The render scale is the ratio of the target density to the source's
/// intrinsic density; output pixel dimensions round to the nearest pixel.
pub fn render_png(
    tree: &usvg::Tree,
    metadata: &ImageMetadata,
    target_density: f32,
    flatten_alpha: bool,
) -> Result<Vec<u8>, IconGenError> {
    let scale = target_density / metadata.density;
    let width = (metadata.width * scale).round() as u32;
    let height = (metadata.height * scale).round() as u32;

    let pixmap = render_svg_to_pixmap(&resvg::Tree::from_usvg(tree), width, height)?;
    encode_png(&pixmap, flatten_alpha)
}

fn render_svg_to_pixmap(
    render_tree: &resvg::Tree,
    target_width: u32,
    target_height: u32,
) -> Result<tiny_skia::Pixmap, IconGenError> {
    // Construct a pixmap to render to
    let mut pixmap = tiny_skia::Pixmap::new(target_width, target_height).ok_or(
        IconGenError::InvalidPixmapDimensions {
            width: target_width,
            height: target_height,
        },
    )?;

    render_svg_into_pixmap(
        render_tree,
        &mut pixmap.as_mut(),
        target_width,
        target_height,
    );

    Ok(pixmap)
}

fn render_svg_into_pixmap(
    render_tree: &resvg::Tree,
    pixmap: &mut tiny_skia::PixmapMut,
    width: u32,
    height: u32,
) {
    // Compute the scale factor
    let x_scale = width as f32 / render_tree.size.width();
    let y_scale = height as f32 / render_tree.size.height();

    let transform = tiny_skia::Transform {
        sx: x_scale,
        sy: y_scale,
        ..Default::default()
    };

    // Render the SVG to the pixmap
    render_tree.render(transform, pixmap);
}

/// Encodes a pixmap with fixed settings: non-adaptive filtering and best
/// compression.
///
/// Flattening composites onto an opaque black background and drops the
/// alpha channel from the encoded image; otherwise straight-alpha RGBA
/// pixels are written.
fn encode_png(pixmap: &tiny_skia::Pixmap, flatten_alpha: bool) -> Result<Vec<u8>, IconGenError> {
    let mut data = Vec::new();

    let mut encoder = png::Encoder::new(&mut data, pixmap.width(), pixmap.height());
    encoder.set_color(if flatten_alpha {
        png::ColorType::Rgb
    } else {
        png::ColorType::Rgba
    });
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);
    encoder.set_filter(png::FilterType::NoFilter);

    let mut writer = encoder.write_header()?;

    let pixels = pixmap.pixels();
    let image_data = if flatten_alpha {
        // Premultiplied pixels composited over black are the premultiplied
        // channel values themselves.
        let mut buf = Vec::with_capacity(pixels.len() * 3);
        for pixel in pixels {
            buf.extend_from_slice(&[pixel.red(), pixel.green(), pixel.blue()]);
        }

        buf
    } else {
        let mut buf = Vec::with_capacity(pixels.len() * 4);
        for pixel in pixels {
            let color = pixel.demultiply();
            buf.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }

        buf
    };

    writer.write_image_data(&image_data)?;
    writer.finish()?;

    Ok(data)
}
