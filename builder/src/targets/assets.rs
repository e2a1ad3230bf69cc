use std::path::PathBuf;

use futures::future;
use walkdir::WalkDir;

use crate::config::AssetsConfig;
use crate::icon::{self, IconGenError, OutputSpec, SizeSpec};

struct AssetScale {
    scale: f32,
    suffix: &'static str,
}

const SCALES: [AssetScale; 3] = [
    AssetScale { scale: 1.0, suffix: "" },
    AssetScale { scale: 2.0, suffix: "@2x" },
    AssetScale { scale: 3.0, suffix: "@3x" },
];

/// Renders every SVG below the input directory at 1x, 2x and 3x,
/// mirroring the directory structure below the output directory.
pub async fn generate(config: Option<&AssetsConfig>) -> Result<Vec<PathBuf>, IconGenError> {
    let Some(config) = config else {
        return Ok(Vec::new());
    };

    let output_dir = config.output_dir.as_ref().unwrap_or(&config.input_dir);

    let mut jobs = Vec::new();
    for entry in WalkDir::new(&config.input_dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file = entry.path();
        if file.extension().and_then(|ext| ext.to_str()) != Some("svg") {
            continue;
        }

        // Mirror the source file's position relative to the input directory
        let target_dir = match file
            .parent()
            .and_then(|dir| dir.strip_prefix(&config.input_dir).ok())
        {
            Some(relative) => output_dir.join(relative),
            None => output_dir.to_path_buf(),
        };

        jobs.push(generate_asset(file.to_path_buf(), target_dir));
    }

    let written = future::try_join_all(jobs).await?;
    Ok(written.concat())
}

async fn generate_asset(file: PathBuf, target_dir: PathBuf) -> Result<Vec<PathBuf>, IconGenError> {
    let stem = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    let outputs = SCALES
        .iter()
        .map(|asset_scale| OutputSpec {
            file_path: target_dir.join(format!("{}{}.png", stem, asset_scale.suffix)),
            size: SizeSpec::Relative {
                scale: asset_scale.scale,
            },
            flatten_alpha: false,
        })
        .collect();

    icon::generate_pngs(&file, outputs).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_suffixes_match_the_asset_convention() {
        let suffixes: Vec<&str> = SCALES.iter().map(|scale| scale.suffix).collect();
        assert_eq!(suffixes, ["", "@2x", "@3x"]);

        let scales: Vec<f32> = SCALES.iter().map(|scale| scale.scale).collect();
        assert_eq!(scales, [1.0, 2.0, 3.0]);
    }
}
