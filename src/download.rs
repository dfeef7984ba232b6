use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Every variant implies the destination file has already been cleaned up.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Failed to request label: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Label download failed (status {status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Label stream interrupted: {0}")]
    Stream(#[source] reqwest::Error),
    #[error("Failed to write label file: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetches a purchased label and stores it at a local path.
#[async_trait]
pub trait LabelDownloader: Send + Sync {
    async fn download(&self, url: &str, dest: &Path) -> Result<PathBuf, DownloadError>;
}

pub struct HttpDownloader {
    http_client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self, DownloadError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl LabelDownloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<PathBuf, DownloadError> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DownloadError::Status { status, body });
        }

        let stream = Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(DownloadError::Stream)),
        );

        write_stream_to_file(stream, dest).await?;

        Ok(dest.to_path_buf())
    }
}

/// Writes a byte stream to `dest` chunk by chunk. On any failure the partial
/// file is removed (best-effort) before the error is returned.
pub async fn write_stream_to_file<S>(mut stream: S, dest: &Path) -> Result<(), DownloadError>
where
    S: Stream<Item = Result<Bytes, DownloadError>> + Unpin,
{
    let result = copy_to_file(&mut stream, dest).await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(dest).await;
    }

    result
}

async fn copy_to_file<S>(stream: &mut S, dest: &Path) -> Result<(), DownloadError>
where
    S: Stream<Item = Result<Bytes, DownloadError>> + Unpin,
{
    let mut file = File::create(dest).await?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;

    Ok(())
}
