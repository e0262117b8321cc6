//! Posture Feedback - command-line entry point.
//!
//! Handles configuration loading, logging initialization, and driving
//! the core pipeline in one of three ways: a live camera session, an
//! offline video scan, or a single-image analysis with report export.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;

use pfb_core::capture::{encode_jpeg, CameraOpener, CameraSource, FfmpegCamera, FfmpegVideo, VideoSource};
use pfb_core::config::{ConfigManager, ConfigSection};
use pfb_core::correlate::{ApplyTarget, ResultCorrelator};
use pfb_core::inference::{FrameEvaluator, InferenceClient};
use pfb_core::logging::{init_tracing, LogLevel};
use pfb_core::models::{
    display_confidence, FeedbackReport, Frame, InferenceResult, PostureMode, SourceContext,
};
use pfb_core::overlay::{OverlayRenderer, OverlayTarget};
use pfb_core::session::{LiveSampler, VideoWalker};

#[derive(Parser, Debug)]
#[command(name = "posture-feedback", version, about = "Posture feedback against a remote pose service")]
struct Args {
    /// Posture mode: squat, desk, pushup, lunge, yoga_tpose
    #[arg(long, default_value = "squat")]
    mode: String,

    /// Analyze one image file and export a feedback report
    #[arg(long, conflicts_with = "video")]
    image: Option<PathBuf>,

    /// Scan a video file frame by frame
    #[arg(long)]
    video: Option<PathBuf>,

    /// Config file path
    #[arg(long, default_value = ".config/settings.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (needed for the log level).
    let mut config = ConfigManager::new(&args.config);
    if let Err(e) = config.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }
    init_tracing(LogLevel::from_str(&config.settings().logging.level));
    config
        .ensure_dirs_exist()
        .context("Failed to create report directory")?;

    let mode = PostureMode::from_wire(&args.mode)
        .with_context(|| format!("Unknown mode '{}' (expected one of: squat, desk, pushup, lunge, yoga_tpose)", args.mode))?;

    let client = Arc::new(
        InferenceClient::new(&config.settings().inference)
            .context("Failed to build inference client")?,
    );
    tracing::info!(
        "Posture Feedback {} - endpoint {}",
        pfb_core::version(),
        client.endpoint_url()
    );

    let correlator = Arc::new(ResultCorrelator::new());

    if let Some(path) = args.image {
        run_image(&mut config, client, correlator, mode, &path).await
    } else if let Some(path) = args.video {
        run_video(&mut config, client, correlator, mode, &path).await
    } else {
        run_live(&config, client, correlator, mode).await
    }
}

/// Print one result as user-facing feedback lines.
fn print_feedback(result: &InferenceResult) {
    for (i, message) in result.feedback_messages.iter().enumerate() {
        match result.confidence_for(i) {
            Some(c) => println!("  {} ({})", message, display_confidence(c)),
            None => println!("  {}", message),
        }
    }
}

/// Analyze a single image, export the report, and render the overlay
/// next to it.
async fn run_image(
    config: &mut ConfigManager,
    client: Arc<InferenceClient>,
    correlator: Arc<ResultCorrelator>,
    mode: PostureMode,
    path: &PathBuf,
) -> Result<()> {
    let image = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let jpeg = encode_jpeg(&image, config.settings().inference.jpeg_quality)?;
    let frame = Frame::new(jpeg, mode, SourceContext::SingleImage);

    let result = client.evaluate(&frame).await;
    correlator.apply(result, ApplyTarget::SingleImage);

    let result = correlator
        .report()
        .context("one-shot result missing after apply")?;
    println!("Feedback ({}):", mode);
    print_feedback(&result);

    // Skeleton overlay at the image's own resolution.
    let renderer = OverlayRenderer::new();
    let mut target = OverlayTarget::new(image.width(), image.height());
    target.bind(mode, SourceContext::SingleImage);
    target.render(&renderer, &result, mode, SourceContext::SingleImage);

    let report_dir = config.report_folder();
    let overlay_path = report_dir.join("posture_overlay.png");
    target
        .surface()
        .save(&overlay_path)
        .with_context(|| format!("Failed to save {}", overlay_path.display()))?;

    let report = FeedbackReport::from_result(mode, &result);
    let report_path = report.save(&report_dir)?;
    println!("Report: {}", report_path.display());
    println!("Overlay: {}", overlay_path.display());

    config.settings_mut().paths.last_image_path = path.display().to_string();
    let _ = config.update_section(ConfigSection::Paths);

    Ok(())
}

/// Scan a video frame by frame and print the accumulated log.
async fn run_video(
    config: &mut ConfigManager,
    client: Arc<InferenceClient>,
    correlator: Arc<ResultCorrelator>,
    mode: PostureMode,
    path: &PathBuf,
) -> Result<()> {
    let video = Arc::new(
        FfmpegVideo::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    ) as Arc<dyn VideoSource>;

    let rate = config.settings().scan.frames_per_second;
    let walker = VideoWalker::new(
        config.settings(),
        client as Arc<dyn FrameEvaluator>,
        Arc::clone(&correlator),
    );

    let outcome = walker.run(video, mode).await;
    tracing::info!("Scan outcome: {:?}", outcome);

    if let Some(walk) = correlator.walk_snapshot() {
        println!(
            "Scanned {}/{} frames ({}):",
            walk.entries().len(),
            walk.total_frames(),
            mode
        );
        for entry in walk.entries() {
            let time_secs = entry.frame_index as f64 / rate;
            println!("frame {:>4} [{:>6.2}s]", entry.frame_index, time_secs);
            print_feedback(&entry.result);
        }
    }

    config.settings_mut().paths.last_video_path = path.display().to_string();
    let _ = config.update_section(ConfigSection::Paths);

    Ok(())
}

/// Run a live camera session until interrupted.
async fn run_live(
    config: &ConfigManager,
    client: Arc<InferenceClient>,
    correlator: Arc<ResultCorrelator>,
    mode: PostureMode,
) -> Result<()> {
    // Feedback is printed as results are accepted for the live surface.
    correlator.set_repaint_callback(Box::new(|_surface, result| {
        print_feedback(result);
    }));

    let device = config.settings().live.camera_device.clone();
    let opener: CameraOpener = Box::new(move || {
        FfmpegCamera::open(&device).map(|c| Arc::new(c) as Arc<dyn CameraSource>)
    });

    let sampler = Arc::new(LiveSampler::new(
        config.settings(),
        opener,
        client as Arc<dyn FrameEvaluator>,
        Arc::clone(&correlator),
    ));
    sampler.set_mode(mode);

    sampler
        .start()
        .context("Could not start live session (camera unavailable)")?;
    println!("Live session running ({}). Press Ctrl-C to stop.", mode);

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;

    // Snapshot the last shown result before stop clears the overlay.
    let last = correlator.live_result();
    sampler.stop();

    if let Some(result) = last {
        let report = FeedbackReport::from_result(mode, &result);
        let report_path = report.save(&config.report_folder())?;
        println!("Report: {}", report_path.display());
    }

    Ok(())
}
