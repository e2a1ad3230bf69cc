use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which icon sets to build and where to put them.
///
/// Every section is optional; a missing section skips that platform
/// entirely. Unknown fields are rejected at every nesting level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Android launcher icon settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,

    /// iOS app iconset settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<IosConfig>,

    /// Framework image asset settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetsConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AndroidConfig {
    /// The source SVG icon
    pub icon: PathBuf,

    /// The Android resource directory receiving the mipmap buckets
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IosConfig {
    /// The source SVG icon
    pub icon: PathBuf,

    /// The directory receiving the `AppIcon.appiconset` bundle
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssetsConfig {
    /// The directory scanned recursively for `.svg` sources
    pub input_dir: PathBuf,

    /// Where to write the generated images, defaults to the input directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

/// Reads and decodes the configuration file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    decode_config(&raw)
}

/// Decodes a configuration from raw JSON text.
///
/// Malformed JSON and schema mismatches are reported as distinct error
/// kinds; the schema error message names the offending field and the
/// expected shape.
pub fn decode_config(raw: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(raw).map_err(|err| match err.classify() {
        serde_json::error::Category::Data => ConfigError::Validation(err),
        _ => ConfigError::Parse(err),
    })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config file is not valid JSON: {0}")]
    Parse(serde_json::Error),

    #[error("invalid config: {0}")]
    Validation(serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_config() {
        let config = decode_config(
            r#"{
                "android": { "icon": "icon.svg", "outputDir": "android/res" },
                "ios": { "icon": "icon.svg", "outputDir": "ios/Images.xcassets" },
                "assets": { "inputDir": "assets" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.android,
            Some(AndroidConfig {
                icon: PathBuf::from("icon.svg"),
                output_dir: PathBuf::from("android/res"),
            })
        );
        assert_eq!(
            config.assets,
            Some(AssetsConfig {
                input_dir: PathBuf::from("assets"),
                output_dir: None,
            })
        );
    }

    #[test]
    fn decodes_empty_config() {
        let config = decode_config("{}").unwrap();
        assert_eq!(config.android, None);
        assert_eq!(config.ios, None);
        assert_eq!(config.assets, None);
    }

    #[test]
    fn rejects_unknown_top_level_field() {
        let err = decode_config(r#"{ "windows": { "icon": "icon.svg" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("windows"));
    }

    #[test]
    fn rejects_unknown_nested_field() {
        let err = decode_config(r#"{ "android": { "iosIcon": 9 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("iosIcon"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = decode_config(r#"{ "ios": { "icon": "icon.svg" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("outputDir"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = decode_config("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn round_trips_valid_config() {
        let config = decode_config(
            r#"{
                "ios": { "icon": "icon.svg", "outputDir": "out" },
                "assets": { "inputDir": "in", "outputDir": "out" }
            }"#,
        )
        .unwrap();

        let encoded = serde_json::to_string(&config).unwrap();
        assert_eq!(decode_config(&encoded).unwrap(), config);
    }
}
