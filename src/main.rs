use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use bevy_egui::EguiPlugin;

mod audio;
mod config;
mod constants;
mod error;
mod frame_limiter;
mod hud;
mod particles;
mod simulation;
mod visualization;

use audio::ThrusterAudioPlugin;
use config::GameConfig;
use frame_limiter::FrameLimiterPlugin;
use simulation::{SimulationPlugin, SimulationSet};
use visualization::VisualizationPlugin;

fn main() -> AppExit {
    error::install_graphics_diagnostic();

    let loaded = GameConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Neon Lander".into(),
            resolution: WindowResolution::new(config.width(), config.height()),
            resizable: false,
            // Pacing comes from the frame limiter
            present_mode: PresentMode::AutoNoVsync,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(EguiPlugin);

    if let Err(e) = loaded {
        warn!("{e}; using built-in tuning");
    }

    // The config must exist before the simulation seeds its RNG.
    app.insert_resource(config)
        .add_plugins((
            SimulationPlugin,
            VisualizationPlugin,
            ThrusterAudioPlugin,
            FrameLimiterPlugin,
        ))
        .add_systems(Startup, announce_config)
        .add_systems(Update, hud::hud_system.after(SimulationSet))
        .run()
}

fn announce_config(config: Res<GameConfig>) {
    info!(
        "Neon Lander {}x{} @ {} fps, gravity {}, thrust {}, fuel {}",
        config.screen_size.0,
        config.screen_size.1,
        config.target_fps,
        config.gravity,
        config.thrust_force,
        config.fuel_capacity,
    );
    match config.rng_seed {
        Some(seed) => info!("Deterministic run with seed {seed}"),
        None => info!("Seeding from system entropy"),
    }
}
