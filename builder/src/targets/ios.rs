use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::IosConfig;
use crate::icon::{self, IconGenError, OutputSpec, SizeSpec};

struct IosIcon {
    idiom: &'static str,
    scale: u32,
    size: f32,
    flatten_alpha: bool,
}

impl IosIcon {
    const fn new(idiom: &'static str, scale: u32, size: f32) -> Self {
        Self {
            idiom,
            scale,
            size,
            flatten_alpha: false,
        }
    }
}

/// Every icon variant an app iconset must carry, in manifest order.
///
/// The App Store marketing icon is the only entry rendered without an
/// alpha channel.
const ICONS: [IosIcon; 18] = [
    IosIcon::new("iphone", 2, 20.0),
    IosIcon::new("iphone", 3, 20.0),
    IosIcon::new("iphone", 2, 29.0),
    IosIcon::new("iphone", 3, 29.0),
    IosIcon::new("iphone", 2, 40.0),
    IosIcon::new("iphone", 3, 40.0),
    IosIcon::new("iphone", 2, 60.0),
    IosIcon::new("iphone", 3, 60.0),
    IosIcon::new("ipad", 1, 20.0),
    IosIcon::new("ipad", 2, 20.0),
    IosIcon::new("ipad", 1, 29.0),
    IosIcon::new("ipad", 2, 29.0),
    IosIcon::new("ipad", 1, 40.0),
    IosIcon::new("ipad", 2, 40.0),
    IosIcon::new("ipad", 1, 76.0),
    IosIcon::new("ipad", 2, 76.0),
    IosIcon::new("ipad", 2, 83.5),
    IosIcon {
        idiom: "ios-marketing",
        scale: 1,
        size: 1024.0,
        flatten_alpha: true,
    },
];

/// Renders the app iconset and its `Contents.json` manifest.
pub async fn generate(config: Option<&IosConfig>) -> Result<Vec<PathBuf>, IconGenError> {
    let Some(config) = config else {
        return Ok(Vec::new());
    };

    let iconset_dir = config.output_dir.join("AppIcon.appiconset");

    let (images, manifest) = tokio::try_join!(
        generate_images(&config.icon, &iconset_dir),
        write_manifest(&config.icon, &iconset_dir),
    )?;

    Ok([images, manifest].concat())
}

async fn generate_images(
    source_icon: &Path,
    iconset_dir: &Path,
) -> Result<Vec<PathBuf>, IconGenError> {
    let outputs = ICONS
        .iter()
        .map(|icon| {
            let pixels = icon.size * icon.scale as f32;

            OutputSpec {
                file_path: iconset_dir.join(icon_filename(icon)),
                size: SizeSpec::Absolute {
                    width: pixels,
                    height: pixels,
                },
                flatten_alpha: icon.flatten_alpha,
            }
        })
        .collect();

    icon::generate_pngs(source_icon, outputs).await
}

fn icon_filename(icon: &IosIcon) -> String {
    format!("{}-{}@{}x.png", icon.idiom, icon.size, icon.scale)
}

#[derive(Serialize)]
struct Manifest {
    images: Vec<ManifestImage>,
    info: ManifestInfo,
}

#[derive(Serialize)]
struct ManifestImage {
    filename: String,
    idiom: &'static str,
    scale: String,
    size: String,
}

#[derive(Serialize)]
struct ManifestInfo {
    author: &'static str,
    version: u32,
}

fn build_manifest() -> Manifest {
    Manifest {
        images: ICONS
            .iter()
            .map(|icon| ManifestImage {
                filename: icon_filename(icon),
                idiom: icon.idiom,
                scale: format!("{}x", icon.scale),
                size: format!("{0}x{0}", icon.size),
            })
            .collect(),
        info: ManifestInfo {
            author: env!("CARGO_PKG_NAME"),
            version: 1,
        },
    }
}

/// Writes `Contents.json` listing every image in the iconset.
///
/// The manifest follows the same freshness rule as the images it
/// describes, so an unchanged source leaves it untouched.
async fn write_manifest(
    source_icon: &Path,
    iconset_dir: &Path,
) -> Result<Vec<PathBuf>, IconGenError> {
    let file_path = iconset_dir.join("Contents.json");

    tokio::fs::create_dir_all(iconset_dir).await?;

    let source_modified = tokio::fs::metadata(source_icon)
        .await
        .ok()
        .and_then(|meta| meta.modified().ok());
    if icon::is_up_to_date(&file_path, source_modified).await {
        return Ok(Vec::new());
    }

    let data = serde_json::to_vec_pretty(&build_manifest())?;
    tokio::fs::write(&file_path, data).await?;

    Ok(vec![file_path])
}
