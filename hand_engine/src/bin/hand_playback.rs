//! 回放外部追踪进程写出的关键点，逐帧重建手部网格

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use hand_engine::config::{self, SessionConfig};
use hand_engine::skinning::SkinningContext;
use hand_engine::HandSession;

/// Hand mesh playback driven by a landmark file
#[derive(Debug, clap::Parser)]
#[command(version)]
struct Args {
    /// Directory holding current.json, done.flag and the baked meshes
    #[arg(default_value = "assets")]
    asset_dir: PathBuf,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 33)]
    tick_ms: u64,

    /// Render a single frame and exit
    #[arg(long)]
    once: bool,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Write the latest reconstructed frame as JSON
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Convert dumped frames to the rasterizer's view space
    #[arg(long, requires = "dump")]
    view_space: bool,

    /// Reconstruct vertices in parallel
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder().init();
    let args = <Args as clap::Parser>::parse();

    let mut session_config = SessionConfig::with_asset_dir(&args.asset_dir);
    session_config.tick_interval = Duration::from_millis(args.tick_ms);

    let mut session = HandSession::open(session_config);
    let mut deform = config::get_config();
    deform.parallel = args.parallel;
    session.context = SkinningContext::new(deform);

    let limit = if args.once { Some(1) } else { args.max_frames };
    let mut count = 0u64;
    let mut dump_error = None;

    let frames = session.run(|renders| {
        count += 1;
        let vertices: usize = renders
            .iter()
            .filter_map(|r| r.mesh.as_ref())
            .map(|m| m.visible_count())
            .sum();
        log::info!("frame {}: {} hand(s), {} visible vertices", count, renders.len(), vertices);

        if let Some(path) = &args.dump {
            let dumped: Vec<_> = if args.view_space {
                renders.iter().map(|r| r.in_view_space()).collect()
            } else {
                renders.to_vec()
            };
            let written = serde_json::to_string(&dumped)
                .map_err(|e| e.to_string())
                .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
            if let Err(e) = written {
                dump_error = Some(e);
                return false;
            }
        }

        limit.map_or(true, |max| count < max)
    })?;

    if let Some(e) = dump_error {
        return Err(format!("failed to write frame dump: {}", e).into());
    }

    log::info!("playback finished after {} frame(s)", frames);
    Ok(())
}
