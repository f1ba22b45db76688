use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Which persistence backend the store mounts at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Records live in process memory only and are lost on exit.
    Memory,
    /// Records are mirrored to a whole-file JSON document after every mutation.
    File,
}

/// Application configuration loaded from environment variables.
/// Every variable has a local-first default; the binary runs with no env at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub storage: StorageMode,
    pub data_file: PathBuf,
    pub upload_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage = match std::env::var("CV_STORAGE").as_deref() {
            Ok("memory") => StorageMode::Memory,
            Ok("file") | Err(_) => StorageMode::File,
            Ok(other) => bail!("CV_STORAGE must be 'file' or 'memory', got '{other}'"),
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            storage,
            data_file: std::env::var("CV_DATA_FILE")
                .unwrap_or_else(|_| "cv-data.json".to_string())
                .into(),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
