//! Pi Collision entry point
//!
//! Runs a scenario headless with a fixed tick until no block can collide any
//! more, then prints the collision counts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pi_collision::capture::CaptureRecorder;
use pi_collision::sim::Engine;
use pi_collision::{FramePolicy, Scenario, Settings, SimError, TimeSource};

/// Stop even if the scenario never settles
const MAX_FRAMES: u64 = 10_000_000;

/// Count block collisions; the classic layout spells the digits of pi
#[derive(Debug, Parser)]
#[command(name = "pi-collision", version, about, long_about = None)]
struct Args {
    /// Digits of pi to compute with the classic layout
    #[arg(default_value_t = 3)]
    digits: u32,

    /// How the rest of a frame is spent after a collision (rescan, sweep)
    #[arg(long, value_parser = parse_policy)]
    policy: Option<FramePolicy>,

    /// Settings JSON file
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Scenario JSON file, used instead of the classic layout
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Write every frame to this capture file
    #[arg(long, value_name = "FILE")]
    capture: Option<PathBuf>,
}

fn parse_policy(name: &str) -> Result<FramePolicy, String> {
    FramePolicy::from_str(name).ok_or_else(|| format!("unknown policy '{name}' (expected rescan or sweep)"))
}

fn run(args: Args) -> Result<(), SimError> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    // Headless runs are deterministic
    settings.time_source = TimeSource::Fixed;
    if let Some(policy) = args.policy {
        settings.policy = policy;
    }

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::classic(args.digits),
    };

    let mut engine = Engine::from_scenario(&scenario, settings)?;
    let recorder = std::sync::Arc::new(std::sync::Mutex::new(CaptureRecorder::new()));
    if args.capture.is_some() {
        engine.observe(recorder.clone());
    }

    while !engine.is_settled() && engine.frames() < MAX_FRAMES {
        engine.update()?;
    }
    if !engine.is_settled() {
        log::warn!("Stopped after {} frames without settling", engine.frames());
    }

    println!("Scenario: {}", scenario.name);
    println!("Frames: {}", engine.frames());
    println!("Total collisions: {}", engine.total_collisions());
    for (index, object) in engine.objects().iter().enumerate() {
        if let Some(block) = object.as_block() {
            println!(
                "  block {index}: mass={} velocity={:.6} collisions={}",
                block.mass(),
                block.velocity(),
                block.collisions()
            );
        }
    }

    if let Some(path) = &args.capture {
        let recorder = recorder.lock().unwrap_or_else(|e| e.into_inner());
        recorder.capture().save(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::init();
    log::info!("Pi Collision starting...");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Simulation failed: {err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
