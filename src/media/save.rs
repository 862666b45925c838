use super::error::ResolveError;
use crate::utils::{download_filename, format_bytes};
use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct SavedMedia {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Downloads `media_url` into `dir` under a fresh timestamped filename.
pub async fn save_media(
    client: &reqwest::Client,
    media_url: &str,
    dir: &Path,
) -> Result<SavedMedia> {
    info!("Download initiated: {}", media_url);

    let mut response = client
        .get(media_url)
        .header(ACCEPT, "video/*, */*")
        .send()
        .await
        .map_err(ResolveError::network)?;

    if !response.status().is_success() {
        return Err(ResolveError::HttpStatus(response.status().as_u16()).into());
    }

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(download_filename(SystemTime::now()));
    let file = tokio::fs::File::create(&path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let bytes = match write_body(&mut response, file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Download failed, removing {}: {}", path.display(), e);
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                warn!("Failed to remove {}: {}", path.display(), remove_err);
            }
            return Err(e);
        }
    };

    debug!("Wrote {} bytes to {}", bytes, path.display());
    info!("Saved {} to {}", format_bytes(bytes), path.display());
    Ok(SavedMedia { path, bytes })
}

async fn write_body(response: &mut reqwest::Response, mut file: tokio::fs::File) -> Result<u64> {
    let mut bytes = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(ResolveError::network)? {
        file.write_all(&chunk)
            .await
            .context("Failed to write media data")?;
        bytes += chunk.len() as u64;
    }
    file.flush().await.context("Failed to flush media file")?;
    Ok(bytes)
}
