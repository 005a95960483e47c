use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use clap::Parser;
use glam::DVec2;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tramline_core::clock::FixedWallClock;
use tramline_core::loader::AnySource;
use tramline_core::playback::{spawn_frames, spawn_heartbeat};
use tramline_core::transit::DayType;
use tramline_core::{EngineConfig, PlaybackDriver, RenderContext, SystemWallClock, WallClock};

mod sink;

use sink::TextSink;

#[derive(Parser, Debug)]
#[command(
    name = "tramline",
    author,
    version,
    about = "Play back scheduled tram positions without a display",
    long_about = "Loads a schedule document for one day type, runs simulated playback for a \
                  while against a text renderer and prints the last frame.\n\n\
                  Locations starting with http:// or https:// are fetched over the network, \
                  anything else is read from disk."
)]
struct Args {
    /// JSON engine configuration; command line options override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Weekday document location
    #[arg(long)]
    weekday: Option<String>,

    /// Holiday document location
    #[arg(long)]
    holiday: Option<String>,

    /// Day type to load (weekday or holiday); derived from today otherwise
    #[arg(short, long)]
    day_type: Option<DayType>,

    /// Speed multiplier
    #[arg(short, long)]
    speed: Option<f64>,

    /// Pretend the wall clock reads this time (HH:MM:SS)
    #[arg(long)]
    at: Option<NaiveTime>,

    /// Real seconds of playback before stopping
    #[arg(long, default_value_t = 3.0)]
    duration: f64,

    /// Frame ticks per second
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    #[arg(long, default_value_t = 320.0)]
    height: f64,

    /// Inspect the vehicle under a point at the end, as `context:x,y`
    /// (e.g. `main:540,146`)
    #[arg(long)]
    pick: Option<String>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_pick(spec: &str) -> Result<(RenderContext, DVec2)> {
    let (context, point) = spec
        .split_once(':')
        .with_context(|| format!("Pick must look like context:x,y, got {spec:?}"))?;
    let context: RenderContext = context
        .parse()
        .with_context(|| format!("Unknown render context {context:?}"))?;
    let (x, y) = point
        .split_once(',')
        .with_context(|| format!("Pick point must be x,y, got {point:?}"))?;
    let x: f64 = x.trim().parse().context("Invalid pick x")?;
    let y: f64 = y.trim().parse().context("Invalid pick y")?;
    Ok((context, DVec2::new(x, y)))
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            EngineConfig::from_json(&text).context("Failed to parse configuration")?
        }
        None => EngineConfig::default(),
    };

    if let Some(weekday) = &args.weekday {
        config.sources.weekday = weekday.clone();
    }
    if let Some(holiday) = &args.holiday {
        config.sources.holiday = holiday.clone();
    }
    if args.day_type.is_some() {
        config.day_type = args.day_type;
    }
    if let Some(speed) = args.speed {
        config.speed_multiplier = speed;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .init();

    if !(args.duration.is_finite() && args.duration >= 0.0) {
        bail!("Duration must be a non-negative number of seconds");
    }

    let config = load_config(&args)?;
    let pick = args.pick.as_deref().map(parse_pick).transpose()?;

    let wall: Arc<dyn WallClock> = match args.at {
        Some(time) => Arc::new(FixedWallClock {
            date: SystemWallClock.today(),
            time,
        }),
        None => Arc::new(SystemWallClock),
    };

    info!("=== Tramline playback ===");
    info!("Weekday: {}", config.sources.weekday);
    info!("Holiday: {}", config.sources.holiday);

    let heartbeat_period = config.heartbeat_interval();
    let (driver, handle) = PlaybackDriver::new(
        config,
        TextSink::new(args.width, args.height),
        Arc::new(AnySource::default()),
        wall,
    )
    .context("Failed to start playback")?;
    info!("Day type: {}", driver.state().day_type());

    let engine = tokio::spawn(driver.run());
    let heartbeat = spawn_heartbeat(handle.clone(), heartbeat_period);
    let frames = spawn_frames(handle.clone(), args.fps);

    tokio::time::sleep(Duration::from_secs_f64(args.duration)).await;
    frames.abort();
    heartbeat.abort();

    let detail = match pick {
        Some((context, point)) => Some((context, point, handle.pick(context, point).await)),
        None => None,
    };

    handle.shutdown();
    let driver = engine.await.context("Playback task failed")?;
    let sink = driver.sink();

    info!("Rendered {} frames", sink.frames);
    println!("{}", sink.status_line());
    for line in &sink.frame {
        println!("{line}");
    }

    if let Some((context, point, detail)) = detail {
        println!();
        match detail {
            Some(detail) => {
                println!("{} ({})", detail.title, detail.status);
                for row in &detail.rows {
                    let marker = if row.major { "*" } else { " " };
                    println!("  {marker} {:<24} {}", row.station, row.time);
                }
            }
            None => println!("No vehicle at {context} ({}, {})", point.x, point.y),
        }
    }

    Ok(())
}
