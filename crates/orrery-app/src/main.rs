//! Headless orrery: steps the solar system and camera for a number of frames,
//! logging a summary and optionally dumping every frame as JSON lines.
//!
//! Run with: `cargo run -p orrery-app -- --frames 600 --tour`

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use orrery_app::{AppError, FrameSink, JsonLinesSink, LogSink, Orrery, PlatformDirs};
use orrery_camera::ModeKind;
use orrery_config::{CliArgs, Config};
use tracing::{error, info, warn};

/// CLI arguments for the headless orrery.
#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Headless solar-system orrery")]
struct OrreryArgs {
    #[command(flatten)]
    common: CliArgs,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Wall-clock seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f64,

    /// Pace frames against the real clock instead of stepping instantly.
    #[arg(long)]
    realtime: bool,

    /// Initial camera mode (free, follow, overview).
    #[arg(long)]
    mode: Option<ModeKind>,

    /// Body to follow; implies follow mode.
    #[arg(long)]
    follow: Option<String>,

    /// Body to frame in a close-up.
    #[arg(long)]
    zoom: Option<String>,

    /// Play the cinematic camera tour.
    #[arg(long)]
    tour: bool,

    /// Write every frame as a JSON line to this file.
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Write the effective configuration back to `config.ron`.
    #[arg(long)]
    save_config: bool,
}

fn main() -> ExitCode {
    let args = OrreryArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("orrery: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: OrreryArgs) -> Result<(), AppError> {
    let dirs = match &args.common.config {
        Some(root) => PlatformDirs::with_root(root),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args.common);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!("Orrery starting");
    info!("  config: {}", dirs.config_dir.display());
    info!("  logs:   {}", dirs.log_dir.display());

    if args.save_config {
        config.save(&dirs.config_dir)?;
        info!("Saved effective configuration");
    }

    let log_every = config.debug.log_every_n_frames;
    let mut app = Orrery::new(config)?;
    apply_camera_requests(&mut app, &args);

    let mut log_sink = LogSink::new(log_every);
    match &args.dump {
        Some(path) => {
            let file = File::create(path)?;
            let mut json = JsonLinesSink::new(BufWriter::new(file));
            drive(&mut app, &args, &mut (&mut log_sink, &mut json));
            let frames = json.written();
            json.finish()?;
            info!("Wrote {frames} frames to {}", path.display());
        }
        None => drive(&mut app, &args, &mut log_sink),
    }

    let camera = app.camera().info(app.system());
    info!(
        "Finished after {} frames, {:.1} simulated seconds, camera {} at distance {:.1}",
        app.clock().frame_count(),
        app.system().elapsed(),
        camera.mode,
        camera.distance
    );
    Ok(())
}

/// Camera requests from the command line. A bad body name is reported and
/// the run continues with the camera as it was.
fn apply_camera_requests(app: &mut Orrery, args: &OrreryArgs) {
    let mode = match (&args.follow, args.mode) {
        (Some(_), _) => Some(ModeKind::Follow),
        (None, mode) => mode,
    };
    if let Some(mode) = mode
        && let Err(err) = app.set_camera_mode(mode, args.follow.as_deref())
    {
        warn!("Camera mode request ignored: {err}");
    }
    if let Some(name) = &args.zoom
        && let Err(err) = app.zoom_to_body(name)
    {
        warn!("Zoom request ignored: {err}");
    }
    if args.tour {
        app.start_tour();
    }
}

fn drive<S: FrameSink>(app: &mut Orrery, args: &OrreryArgs, sink: &mut S) {
    if !args.realtime {
        app.run(args.frames, args.frame_dt, sink);
        return;
    }
    let pace = Duration::try_from_secs_f64(args.frame_dt).unwrap_or_default();
    for _ in 0..args.frames {
        let frame = app.tick();
        sink.present(&frame);
        std::thread::sleep(pace);
    }
}
