//! SpinDeck headless simulator
//!
//! Usage:
//!   sd-sim                          - 10 spins, normal timing
//!   sd-sim --spins 50 --seed 7      - reproducible run
//!   sd-sim --profile turbo --json   - stage trace as JSON
//!   sd-sim --config machine.yaml    - custom machine

use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use sd_core::{FRAME_MS, Size};
use sd_game::Game;
use sd_media::{AssetCatalog, PlaybackKind, SoundBank};
use sd_reels::{DEFAULT_SEED, MachineConfig};
use sd_stage::StageTrace;

/// Upper bound on frames per spin before the run is declared stuck
const MAX_FRAMES_PER_SPIN: u32 = 60 * 60;

#[derive(Parser)]
#[command(name = "sd-sim", about = "SpinDeck headless spin simulator")]
struct Cli {
    /// Machine config (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Timing profile: normal, turbo, instant
    #[arg(short, long)]
    profile: Option<String>,

    /// RNG seed (defaults to the config seed, then the system clock)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of spins
    #[arg(short = 'n', long, default_value_t = 10)]
    spins: u32,

    /// Print the report and stage trace as JSON
    #[arg(long)]
    json: bool,

    /// Screen width in pixels
    #[arg(long, default_value_t = 1920.0)]
    width: f64,

    /// Screen height in pixels
    #[arg(long, default_value_t = 1080.0)]
    height: f64,
}

#[derive(Serialize)]
struct SimReport {
    seed: u64,
    spins: u32,
    wins: u64,
    virtual_ms: f64,
    win_sounds: usize,
    trace: StageTrace,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MachineConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MachineConfig::default(),
    };
    if let Some(name) = &cli.profile {
        config = config.with_profile_name(name)?;
    }
    let seed = cli.seed.or(config.seed).unwrap_or_else(clock_seed);
    let win_alias = config.sounds.win.clone();

    let catalog = Rc::new(AssetCatalog::demo());
    let bank = Rc::new(SoundBank::new());
    catalog.register_sounds(bank.as_ref());

    let mut game = Game::new(
        config,
        Size::new(cli.width, cli.height),
        bank.clone(),
        catalog,
        seed,
    )?;
    game.machine_mut().record_trace(format!("sd-sim-{seed}"));

    for spin in 1..=cli.spins {
        if !game.tap_spin_button() || !game.machine().is_busy() {
            bail!("Spin {spin} was not accepted");
        }
        let mut frames = 0;
        while game.machine().is_busy() {
            game.update(1.0);
            frames += 1;
            if frames > MAX_FRAMES_PER_SPIN {
                bail!("Spin {spin} did not finish within {MAX_FRAMES_PER_SPIN} frames");
            }
        }
        log::info!(
            "spin {}: {} after {:.0}ms",
            spin,
            if game.machine().last_outcome() == Some(true) { "win" } else { "no win" },
            frames as f64 * FRAME_MS
        );
    }

    let trace = game
        .machine_mut()
        .take_trace()
        .context("Stage trace was not recorded")?;
    trace.validate().map_err(anyhow::Error::msg)?;

    let report = SimReport {
        seed,
        spins: cli.spins,
        wins: game.machine().win_count(),
        virtual_ms: game.machine().clock_ms(),
        win_sounds: bank.count(&win_alias, PlaybackKind::Play),
        trace,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("seed        {}", report.seed);
        println!("spins       {}", report.spins);
        println!(
            "wins        {} ({:.1}%)",
            report.wins,
            100.0 * report.wins as f64 / report.spins.max(1) as f64
        );
        println!("virtual     {:.1}s", report.virtual_ms / 1000.0);
        println!("stages      {}", report.trace.len());
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(DEFAULT_SEED)
}
