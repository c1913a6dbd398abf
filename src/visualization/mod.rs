mod common;
mod viz_2d;

pub use common::*;

use bevy::prelude::*;

use crate::constants::{neon, BACKGROUND_DARK};
use crate::particles::draw_particles;
use crate::simulation::SimulationSet;

/// Draws every layer back to front after the simulation has run for the frame.
pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(neon(BACKGROUND_DARK)))
            .add_systems(
                Startup,
                (
                    spawn_camera,
                    viz_2d::background::spawn_background,
                    viz_2d::starfield::spawn_starfield,
                    viz_2d::systems::spawn_pad,
                    viz_2d::systems::spawn_ship,
                ),
            )
            .add_systems(
                Update,
                (
                    viz_2d::background::animate_skyline,
                    viz_2d::starfield::scroll_starfield,
                    viz_2d::systems::update_pad,
                    viz_2d::systems::update_ship,
                    viz_2d::systems::draw_ship_trim,
                    draw_particles,
                )
                    .after(SimulationSet),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
