use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.goshippo.com";
pub const DEFAULT_LABEL_FILE_TYPE: &str = "PDF_4x6";
pub const DEFAULT_ORDER_METADATA: &str = "Order ID #12345";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub shippo_api_key: String,
    pub api_base_url: String,
    pub label_file_type: String,
    pub order_metadata: String,
    pub download_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    /// - `SHIPPO_API_KEY`: Required - Your Shippo API key
    /// - `SHIPPO_API_URL`: Optional - API base URL (default: "https://api.goshippo.com")
    /// - `LABEL_FILE_TYPE`: Optional - Label file format token (default: "PDF_4x6")
    /// - `ORDER_METADATA`: Optional - Free-text note attached to the purchase
    /// - `DOWNLOAD_DIR`: Optional - Where labels are written (default: "<home>/Downloads")
    pub fn from_env() -> Result<Self> {
        // Parse API key (required)
        let shippo_api_key = env::var("SHIPPO_API_KEY")
            .context("SHIPPO_API_KEY not set")?;

        if shippo_api_key.trim().is_empty() {
            bail!("SHIPPO_API_KEY cannot be empty");
        }

        // Parse API base URL (optional, has default)
        let api_base_url = env::var("SHIPPO_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        if api_base_url.trim().is_empty() {
            bail!("SHIPPO_API_URL cannot be empty");
        }

        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        // Parse label file format (optional, has default)
        let label_file_type = env::var("LABEL_FILE_TYPE")
            .unwrap_or_else(|_| DEFAULT_LABEL_FILE_TYPE.to_string());

        if label_file_type.trim().is_empty() {
            bail!("LABEL_FILE_TYPE cannot be empty");
        }

        // Parse order metadata (optional, has default)
        let order_metadata = env::var("ORDER_METADATA")
            .unwrap_or_else(|_| DEFAULT_ORDER_METADATA.to_string());

        // Parse download directory (optional, defaults to the user's Downloads folder)
        let download_dir = match env::var("DOWNLOAD_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_download_dir()?,
        };

        Ok(Config {
            shippo_api_key,
            api_base_url,
            label_file_type,
            order_metadata,
            download_dir,
        })
    }
}

fn default_download_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .context("Could not resolve the user home directory for DOWNLOAD_DIR")?;
    Ok(home.join("Downloads"))
}
