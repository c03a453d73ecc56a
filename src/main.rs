//! Scene tour headless runner.
//!
//! Drives a guided tour of sequential scenes with:
//! - **bevy_ecs** for the entity-component-system world and schedules
//! - **configparser** for the INI configuration
//! - **serde_json** manifests describing each scene's content
//!
//! There is no window: every tick advances the world by a fixed delta, and
//! the built-in scripted actions play the visitor (the intro moves on, a
//! planet gets picked, the inspection step resets).
//!
//! # Main Loop
//!
//! 1. Load the configuration (defaults when the file is missing)
//! 2. Insert resources, persistent entities and observers
//! 3. Trigger the first advance out of `Start`
//! 4. Tick until the requested number of resets has completed
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --laps 2 --realtime
//! ```

use std::path::PathBuf;
use std::time::Duration;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info};

use scenetour::game;
use scenetour::resources::freelook::FreeLookCamera;
use scenetour::resources::loader::ContentLoader;
use scenetour::resources::tour::Tour;
use scenetour::resources::tourconfig::TourConfig;
use scenetour::systems::time::update_world_time;

const DEFAULT_CONFIG_PATH: &str = "./scenetour.ini";

/// Scene tour runner
#[derive(Parser)]
#[command(version, about = "Runs a scripted scene tour without a window.")]
struct Cli {
    /// Configuration file (default: ./scenetour.ini, optional).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read bundle manifests from DIR instead of the built-in ones.
    #[arg(long, value_name = "DIR")]
    bundles: Option<PathBuf>,

    /// Stop after this many completed resets.
    #[arg(long, default_value_t = 1)]
    laps: u64,

    /// Stop after this many ticks regardless of progress.
    #[arg(long, value_name = "N")]
    max_ticks: Option<u64>,

    /// Sleep one tick period per tick.
    #[arg(long)]
    realtime: bool,

    /// Write the effective configuration and exit.
    /// Optionally provide a path (default: ./scenetour.ini).
    #[arg(long, value_name = "PATH")]
    write_config: Option<Option<PathBuf>>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let explicit_config = cli.config.is_some();
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = TourConfig::with_path(&config_path);
    if let Err(e) = config.load_from_file() {
        if explicit_config {
            error!("{}", e);
            std::process::exit(1);
        }
        info!("No config loaded ({}), using defaults", e);
    }
    if let Some(dir) = cli.bundles {
        config.bundles_dir = Some(dir);
    }

    // Early-exit: write the configuration and quit
    if let Some(maybe_path) = cli.write_config {
        config.config_path = maybe_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", config.config_path.display());
        return;
    }

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    let loader = game::default_loader(&config);
    if let Err(e) = game::setup(&mut world, &config, loader) {
        error!("Setup failed: {}", e);
        std::process::exit(1);
    }

    let mut update = game::update_schedule();
    if let Err(e) = update.initialize(&mut world) {
        error!("Failed to initialize schedule: {}", e);
        std::process::exit(1);
    }

    game::bootstrap(&mut world);

    // --------------- Main loop ---------------
    let dt = config.tick_period();
    let mut ticks: u64 = 0;
    while world.resource::<Tour>().resets_completed() < cli.laps
        && cli.max_ticks.is_none_or(|max| ticks < max)
    {
        update_world_time(&mut world, dt);
        update.run(&mut world);
        world.clear_trackers();
        ticks += 1;

        // Stand-in for the camera controller: head home at once.
        let mut camera = world.resource_mut::<FreeLookCamera>();
        if camera.return_to_origin {
            info!("Camera returning to origin");
            camera.return_to_origin = false;
        }

        if cli.realtime {
            std::thread::sleep(Duration::from_secs_f32(dt));
        }
    }

    let tour = world.resource::<Tour>();
    info!(
        "Stopped after {} ticks at {}: {} transitions, {} resets",
        ticks,
        tour.current(),
        tour.transitions_completed(),
        tour.resets_completed()
    );
    // Dropping the loader joins its reader thread.
    world.remove_resource::<ContentLoader>();
}
