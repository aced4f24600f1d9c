use crate::{
    error::{FlowgenError, Result},
    models::{ImageReference, ImageSource},
};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use std::path::PathBuf;

/// File name every saved flowchart is written under.
pub const SAVE_FILE_NAME: &str = "flowchart.png";

/// Host-side primitive that persists the referenced image.
#[async_trait]
pub trait ImageSaver: Send + Sync {
    async fn save(&self, image: &ImageReference, file_name: &str) -> Result<PathBuf>;
}

/// Writes images into a directory on the local filesystem.
#[derive(Clone)]
pub struct FileImageSaver {
    client: Client,
    output_dir: PathBuf,
}

impl FileImageSaver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            output_dir: output_dir.into(),
        }
    }

    async fn fetch(&self, image: &ImageReference) -> Result<Vec<u8>> {
        match image.source() {
            ImageSource::DataUrl => decode_data_url(image.as_str()),
            ImageSource::Remote => self.download(image.as_str()).await,
            ImageSource::LocalPath => Ok(tokio::fs::read(image.as_str()).await?),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FlowgenError::Save(format!(
                "download of {} failed with status {}",
                url,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageSaver for FileImageSaver {
    async fn save(&self, image: &ImageReference, file_name: &str) -> Result<PathBuf> {
        let bytes = self.fetch(image).await?;
        if bytes.is_empty() {
            return Err(FlowgenError::Save(format!("{} resolved to no data", image)));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;

        log::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (header, data) = url
        .split_once(',')
        .ok_or_else(|| FlowgenError::Save("data URL has no payload".into()))?;

    if !header.ends_with(";base64") {
        return Err(FlowgenError::Save(
            "only base64 data URLs can be saved".into(),
        ));
    }

    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| FlowgenError::Save(format!("failed to decode image data: {}", e)))
}
