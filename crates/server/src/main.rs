use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use pose_stream_core::detection::infrastructure::onnx_yolo_detector::DEFAULT_CONFIDENCE;
use pose_stream_core::shared::constants::{
    DEFAULT_JPEG_QUALITY, DEFAULT_POSE_CONFIDENCE, DETECTOR_MODEL_NAME, POSE_MODEL_NAME,
};
use pose_stream_core::shared::model_resolver;
use pose_stream_server::config::ServerConfig;
use pose_stream_server::pipeline_factory::{
    OnnxPipelineFactory, OnnxPipelineSettings, PipelineFactory,
};
use pose_stream_server::router::build_router;
use pose_stream_server::session_registry::SessionRegistry;
use pose_stream_server::state::AppState;

/// Upload a video and watch it stream back with pose landmarks and joint
/// angles drawn on every detected person.
#[derive(Parser)]
#[command(name = "pose-stream-server")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value = "5000")]
    port: u16,

    /// Directory uploaded videos are saved to.
    #[arg(long, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Person detector ONNX model (YOLO). Resolved by name when omitted.
    #[arg(long)]
    detector_model: Option<PathBuf>,

    /// URL to download the detector model from when it is not cached.
    #[arg(long)]
    detector_model_url: Option<String>,

    /// Pose landmark ONNX model (BlazePose). Resolved by name when omitted.
    #[arg(long)]
    pose_model: Option<PathBuf>,

    /// URL to download the pose model from when it is not cached.
    #[arg(long)]
    pose_model_url: Option<String>,

    /// Extra directory searched for models before the user cache.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Person detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    detector_confidence: f64,

    /// Pose presence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_POSE_CONFIDENCE)]
    pose_confidence: f64,

    /// JPEG quality of streamed frames (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    jpeg_quality: u8,

    /// Milliseconds between pause-flag checks of a paused stream.
    #[arg(long, default_value = "10")]
    pause_poll_ms: u64,

    /// Maximum upload size in MiB.
    #[arg(long, default_value = "512")]
    max_upload_mb: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = OnnxPipelineSettings {
        detector_model: locate_model(
            cli.detector_model.as_deref(),
            DETECTOR_MODEL_NAME,
            cli.detector_model_url.as_deref(),
            cli.models_dir.as_deref(),
        )?,
        pose_model: locate_model(
            cli.pose_model.as_deref(),
            POSE_MODEL_NAME,
            cli.pose_model_url.as_deref(),
            cli.models_dir.as_deref(),
        )?,
        detector_confidence: cli.detector_confidence,
        pose_confidence: cli.pose_confidence,
        jpeg_quality: cli.jpeg_quality,
    };
    log::info!(
        "Models: detector {}, pose {}",
        settings.detector_model.display(),
        settings.pose_model.display()
    );

    let factory = OnnxPipelineFactory::new(settings);
    // Fail at startup rather than on the first upload.
    factory.create()?;

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        upload_dir: cli.upload_dir,
        pause_poll: Duration::from_millis(cli.pause_poll_ms),
        max_upload_bytes: cli.max_upload_mb.saturating_mul(1024 * 1024),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config, Arc::new(factory)))
}

async fn serve(
    config: ServerConfig,
    factory: Arc<dyn PipelineFactory>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_address();
    let state = AppState::new(config, factory);
    let sessions = state.sessions.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sessions))
        .await?;

    log::info!("Server shut down");
    Ok(())
}

/// Resolves on ctrl-c after cancelling every running stream, so open
/// responses end and the graceful shutdown can complete.
async fn shutdown_signal(sessions: Arc<SessionRegistry>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received, cancelling {} stream(s)", sessions.len());
    sessions.cancel_all();
}

fn locate_model(
    explicit: Option<&Path>,
    name: &str,
    url: Option<&str>,
    models_dir: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    log::info!("Resolving model: {name}");
    let path = model_resolver::resolve(name, url, models_dir, Some(Box::new(download_progress)))?;
    if url.is_some() {
        eprintln!();
    }
    Ok(path)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for (flag, path) in [
        ("--detector-model", &cli.detector_model),
        ("--pose-model", &cli.pose_model),
    ] {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(format!("{flag} not found: {}", path.display()).into());
            }
        }
    }
    if let Some(dir) = &cli.models_dir {
        if !dir.is_dir() {
            return Err(format!("Models directory not found: {}", dir.display()).into());
        }
    }
    if !(0.0..=1.0).contains(&cli.detector_confidence) {
        return Err(format!(
            "Detector confidence must be between 0.0 and 1.0, got {}",
            cli.detector_confidence
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.pose_confidence) {
        return Err(format!(
            "Pose confidence must be between 0.0 and 1.0, got {}",
            cli.pose_confidence
        )
        .into());
    }
    if !(1..=100).contains(&cli.jpeg_quality) {
        return Err(format!("JPEG quality must be between 1 and 100, got {}", cli.jpeg_quality).into());
    }
    if cli.max_upload_mb == 0 {
        return Err("Maximum upload size must be at least 1 MiB".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
