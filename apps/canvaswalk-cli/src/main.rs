use anyhow::Context;
use canvaswalk_driver::{FrameDriver, GameConfig, RunSummary, ScriptedHost};
use canvaswalk_render::{CellSurface, RecordingSurface};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

mod script;
mod terminal;

use script::HoldSpec;

#[derive(Parser)]
#[command(name = "canvaswalk", about = "Walk rectangles around a 2D surface")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Game config (JSON); the built-in demo scene when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Validate a config and list its entities
    CheckConfig,
    /// Print the effective config as JSON
    DumpConfig,
    /// Run frames headlessly with scripted input and print the last frame
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "10")]
        frames: u32,
        /// Held input, ACTION:FROM-TO with ACTION one of left, right, abort
        #[arg(long = "hold", value_name = "ACTION:FROM-TO")]
        holds: Vec<HoldSpec>,
        /// Print the last frame as a character grid instead of draw calls
        #[arg(long)]
        grid: bool,
    },
    /// Play interactively in the terminal (A/D or arrows walk, Esc quits)
    Play {
        /// Pixels per terminal column
        #[arg(long, default_value = "8")]
        scale: f32,
        /// Write logs to this file; otherwise only errors are shown on exit
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool, log_file: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    let filter = match (verbose, quiet && log_file.is_none()) {
        (_, true) => "error",
        (true, false) => "debug",
        (false, false) => "info",
    };
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::new(filter));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    match path {
        Some(path) => Ok(GameConfig::load(path)?),
        None => Ok(GameConfig::default()),
    }
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Frames: {}  Outcome: {:?}",
        summary.frames, summary.outcome
    );
    for entity in summary.store.iter() {
        let p = entity.position.origin();
        println!(
            "  [{}] pos=({:.2}, {:.2}) speed={:.2}",
            entity.id,
            p.x,
            p.y,
            entity.speed()
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (log_file, quiet) = match &cli.command {
        Commands::Play { log_file, .. } => (log_file.as_deref(), true),
        _ => (None, false),
    };
    init_tracing(cli.verbose, log_file, quiet)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("canvaswalk v{}", env!("CARGO_PKG_VERSION"));
            for info in [
                canvaswalk_common::crate_info(),
                canvaswalk_input::crate_info(),
                canvaswalk_kernel::crate_info(),
                canvaswalk_render::crate_info(),
                canvaswalk_driver::crate_info(),
            ] {
                println!("  {info}");
            }
            println!(
                "config: fps={} entities={} sheet={}",
                config.fps,
                config.entities.len(),
                config
                    .sheet
                    .as_ref()
                    .map_or("none", |sheet| sheet.name.as_str())
            );
        }
        Commands::CheckConfig => {
            let store = config.initial_store()?;
            println!("Config OK: {} entities at {} fps", store.len(), config.fps);
            for entity in store.iter() {
                println!(
                    "  [{}] {}x{} at ({}, {}) walk_speed={} color={}",
                    entity.id,
                    entity.position.width(),
                    entity.position.height(),
                    entity.position.origin().x,
                    entity.position.origin().y,
                    entity.walk_speed,
                    entity.color.as_str()
                );
            }
        }
        Commands::DumpConfig => {
            println!("{}", config.to_json_pretty()?);
        }
        Commands::Run {
            frames,
            holds,
            grid,
        } => {
            let store = config.initial_store()?;
            let host = ScriptedHost::new(config.frame_interval()?).close_after(frames);
            let mut host = script::apply(host, &holds, &config.bindings)?;
            let mut driver = FrameDriver::from_config(&config)?;

            if grid {
                let mut surface = CellSurface::new(40, 12, 8.0);
                let summary = driver.run(&mut host, &mut surface, config.sheet.as_ref(), store)?;
                print!("{}", surface.to_text());
                print_summary(&summary);
            } else {
                let mut surface = RecordingSurface::new();
                let summary = driver.run(&mut host, &mut surface, config.sheet.as_ref(), store)?;
                print!("{}", surface.to_debug_text());
                print_summary(&summary);
            }
        }
        Commands::Play { scale, .. } => {
            let store = config.initial_store()?;
            let mut driver = FrameDriver::from_config(&config)?;
            let mut host = terminal::TerminalHost::new(config.frame_interval()?);
            let mut surface = terminal::TerminalSurface::new(scale)?;
            let summary = driver.run(&mut host, &mut surface, config.sheet.as_ref(), store)?;
            print_summary(&summary);
        }
    }

    Ok(())
}
