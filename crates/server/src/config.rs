use std::path::PathBuf;
use std::time::Duration;

use pose_stream_core::pipeline::pose_stream_use_case::DEFAULT_PAUSE_POLL;

/// Runtime configuration for the HTTP service.
///
/// Built from the command line in `main.rs`; tests construct it directly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Where uploaded videos are saved.
    pub upload_dir: PathBuf,
    /// Sleep between pause-flag checks while a stream is paused.
    pub pause_poll: Duration,
    /// Request body limit for uploads, in bytes.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            pause_poll: DEFAULT_PAUSE_POLL,
            max_upload_bytes: 512 * 1024 * 1024,
        }
    }
}
