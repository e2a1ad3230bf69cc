use std::path::PathBuf;

use crate::config::AndroidConfig;
use crate::icon::{self, IconGenError, OutputSpec, SizeSpec};

/// Launcher icon size at mdpi, in pixels.
const ICON_BASE_SIZE: f32 = 48.0;

struct Density {
    name: &'static str,
    scale: f32,
}

const DENSITIES: [Density; 6] = [
    Density { name: "ldpi", scale: 0.75 },
    Density { name: "mdpi", scale: 1.0 },
    Density { name: "hdpi", scale: 1.5 },
    Density { name: "xhdpi", scale: 2.0 },
    Density { name: "xxhdpi", scale: 3.0 },
    Density { name: "xxxhdpi", scale: 4.0 },
];

/// Renders the launcher icon into every Android density bucket.
pub async fn generate(config: Option<&AndroidConfig>) -> Result<Vec<PathBuf>, IconGenError> {
    let Some(config) = config else {
        return Ok(Vec::new());
    };

    let outputs = DENSITIES
        .iter()
        .map(|density| {
            let size = ICON_BASE_SIZE * density.scale;

            OutputSpec {
                file_path: config
                    .output_dir
                    .join(format!("mipmap-{}", density.name))
                    .join("ic_launcher.png"),
                size: SizeSpec::Absolute {
                    width: size,
                    height: size,
                },
                flatten_alpha: false,
            }
        })
        .collect();

    icon::generate_pngs(&config.icon, outputs).await
}
