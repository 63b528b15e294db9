//! Standalone CLI for the point cloud visualizer
//!
//! Reads JSON-lines messages from a file (first argument or POINTCLOUD_INPUT)
//! or stdin, applies them frame by frame and logs particle stats.
//!
//! Run with: cargo run --features cli --bin pointcloud-cli -- frames.jsonl

use pointcloud_vis::{
    parse_message, MemorySink, Message, Mode, ParticleRecord, PointCloudManager, Settings,
};
use serde::Serialize;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Env var naming the input file (overridden by the first CLI argument)
const INPUT_ENV: &str = "POINTCLOUD_INPUT";
/// Env var naming a file to write the final particle snapshot to
const SNAPSHOT_ENV: &str = "POINTCLOUD_SNAPSHOT";
/// Messages buffered between the reader task and the frame loop
const CHANNEL_CAPACITY: usize = 256;

#[derive(Serialize)]
struct CloudSnapshot<'a> {
    trackable_id: &'a str,
    mode: Mode,
    total_points: usize,
    particles: Vec<&'a ParticleRecord>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pointcloud_vis=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let settings = Settings::from_env()?;
    let input = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(INPUT_ENV).ok());

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &input {
        Some(path) => {
            info!(path = %path, "Reading observations from file");
            Box::new(BufReader::new(tokio::fs::File::open(path).await?))
        }
        None => {
            info!("Reading observations from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };

    // Decoding runs off the frame loop; only complete messages cross the channel
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
    let reader_task = tokio::spawn(read_messages(reader, tx));

    let mut manager = PointCloudManager::new(settings, |_| MemorySink::new());
    let start_time = Instant::now();
    let mut messages_last_interval = 0u64;
    let mut stats_interval = tokio::time::interval(std::time::Duration::from_secs(5));

    info!(mode = settings.mode.label(), "Visualizer ready, waiting for frames...");

    loop {
        tokio::select! {
            msg = rx.recv() => {
                match msg {
                    Some(msg) => {
                        manager.handle(&msg)?;
                        messages_last_interval += 1;
                        if matches!(msg, Message::SetMode { .. } | Message::ToggleMode) {
                            for line in manager.status_lines() {
                                info!("{line}");
                            }
                        }
                    }
                    None => {
                        info!("Input closed");
                        break;
                    }
                }
            }
            _ = stats_interval.tick() => {
                let stats = manager.stats();
                info!(
                    clouds = manager.cloud_count(),
                    points = manager.total_point_count(),
                    particles = manager.active_particle_count(),
                    frames = stats.frames,
                    "/sec" = format!("{:.1}", messages_last_interval as f64 / 5.0),
                    mode = manager.mode().label(),
                    "stats"
                );
                messages_last_interval = 0;
            }
        }
    }

    match reader_task.await {
        Ok(Ok(parsed)) => info!(parsed, "Reader finished"),
        Ok(Err(e)) => error!(error = %e, "Reader failed"),
        Err(e) => error!(error = %e, "Reader task panicked"),
    }

    let stats = manager.stats();
    for line in manager.status_lines() {
        info!("{line}");
    }
    info!(
        elapsed = format!("{:.2}s", start_time.elapsed().as_secs_f64()),
        frames = stats.frames,
        ignored = stats.ignored_frames,
        observations = stats.observations,
        removed_reported = stats.removed_reported,
        "Session finished"
    );

    if let Some(path) = std::env::var_os(SNAPSHOT_ENV) {
        write_snapshot(&manager, std::path::Path::new(&path))?;
    }
    Ok(())
}

/// Decode lines into messages and hand them to the frame loop
async fn read_messages(
    reader: Box<dyn AsyncBufRead + Unpin + Send>,
    tx: mpsc::Sender<Message>,
) -> std::io::Result<u64> {
    let mut lines = reader.lines();
    let mut parsed = 0u64;

    while let Some(line) = lines.next_line().await? {
        let Some(msg) = parse_message(&line) else {
            continue;
        };
        if tx.send(msg).await.is_err() {
            warn!("Frame loop stopped, dropping remaining input");
            break;
        }
        parsed += 1;
    }
    Ok(parsed)
}

/// Write the live particles of every cloud as JSON
fn write_snapshot(
    manager: &PointCloudManager<MemorySink>,
    path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut clouds: Vec<CloudSnapshot<'_>> = manager
        .clouds()
        .map(|(id, visualizer)| CloudSnapshot {
            trackable_id: id,
            mode: visualizer.mode(),
            total_points: visualizer.total_point_count(),
            particles: visualizer.sink().alive().collect(),
        })
        .collect();
    clouds.sort_by(|a, b| a.trackable_id.cmp(b.trackable_id));

    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &clouds)?;
    info!(path = %path.display(), clouds = clouds.len(), "Snapshot written");
    Ok(())
}
