mod android;
mod assets;
mod ios;

use std::path::PathBuf;

use crate::config::Config;
use crate::icon::IconGenError;

/// Runs every configured platform generator and collects the written
/// files.
///
/// The generators run concurrently; the first failure aborts the batch.
pub async fn generate_all(config: &Config) -> Result<Vec<PathBuf>, IconGenError> {
    let (android, ios, assets) = tokio::try_join!(
        android::generate(config.android.as_ref()),
        ios::generate(config.ios.as_ref()),
        assets::generate(config.assets.as_ref()),
    )?;

    Ok([android, ios, assets].concat())
}
