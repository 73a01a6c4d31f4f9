use crate::indicators::DEFAULT_RSI_PERIOD;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

// CONFIGURATION STRUCTS
// storage/config.json maps onto these; any missing field falls back to its default.

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MarketConfig {
    pub base_url: String,    // e.g., "https://api.coingecko.com/api/v3"
    pub coin_id: String,     // e.g., "dogecoin"
    pub vs_currency: String, // e.g., "usd"
    pub days: u32,           // lookback window
    pub interval: String,    // e.g., "daily"
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            coin_id: "dogecoin".to_string(),
            vs_currency: "usd".to_string(),
            days: 30,
            interval: "daily".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub rsi_period: usize,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            rsi_period: DEFAULT_RSI_PERIOD,
            output_dir: PathBuf::from("."),
        }
    }
}

// STORAGE MANAGER

pub struct AsyncStorageManager {
    pub base_dir: PathBuf,
}

impl AsyncStorageManager {
    /// Manager rooted at `relative_path` next to the running executable.
    /// The directory itself is created lazily on the first write.
    pub fn new_relative<P: AsRef<Path>>(relative_path: P) -> anyhow::Result<Self> {
        let exe_path = std::env::current_exe()?;

        let base_dir = exe_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Could not find binary directory"))?
            .join(relative_path);

        Ok(Self { base_dir })
    }

    pub fn at<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Reads `<filename>.json` into `T`.
    pub async fn load<T: DeserializeOwned>(&self, filename: &str) -> anyhow::Result<T> {
        let path = self.base_dir.join(format!("{}.json", filename));

        // serde_json validates the bytes itself, so skip the UTF-8 pass of read_to_string.
        let content = fs::read(path).await?;

        let data = serde_json::from_slice(&content)?;
        Ok(data)
    }

    /// Like `load`, but a missing file yields `T::default()`.
    pub async fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        filename: &str,
    ) -> anyhow::Result<T> {
        let path = self.base_dir.join(format!("{}.json", filename));
        if !fs::try_exists(&path).await? {
            debug!(?path, "no stored {}, using defaults", filename);
            return Ok(T::default());
        }
        self.load(filename).await
    }

    /// Writes `bytes` to `file_name` through a `.tmp` sibling and a rename, so a
    /// crash mid-write never leaves a truncated file under the final name.
    pub async fn write_atomic(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.base_dir).await?;

        let final_path = self.base_dir.join(file_name);
        let tmp_path = self.base_dir.join(format!("{}.tmp", file_name));

        fs::write(&tmp_path, bytes).await?;
        if let Err(e) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e);
        }

        Ok(final_path)
    }
}
