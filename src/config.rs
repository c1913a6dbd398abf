use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

const EMBEDDED_CONFIG: &str = include_str!("../assets/config/game.ron");

/// Gameplay tuning. Inserted once at startup and never mutated afterwards.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_size: (u32, u32),
    pub target_fps: u32,
    pub gravity: f32,              // pixels per second^2, screen-down positive
    pub thrust_force: f32,         // pixels per second^2
    pub fuel_capacity: f32,
    pub fuel_burn_rate: f32,       // units per second while thrusting
    pub rotation_speed: f32,       // degrees per second
    pub landing_pad_width: u32,
    pub landing_pad_height: u32,
    pub max_landing_speed: f32,    // vertical speed threshold
    pub max_horizontal_speed: f32,
    pub max_landing_angle: f32,    // degrees
    pub star_count: usize,
    pub scanline_spacing: u32,
    pub spawn_height: f32,         // initial y of the lander
    pub thruster_volume: f32,
    pub thruster_fade_ms: u64,
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_size: (960, 720),
            target_fps: 60,
            gravity: 36.0,
            thrust_force: 120.0,
            fuel_capacity: 100.0,
            fuel_burn_rate: 22.0,
            rotation_speed: 90.0,
            landing_pad_width: 160,
            landing_pad_height: 12,
            max_landing_speed: 42.0,
            max_horizontal_speed: 32.0,
            max_landing_angle: 12.0,
            star_count: 120,
            scanline_spacing: 4,
            spawn_height: 140.0,
            thruster_volume: 0.45,
            thruster_fade_ms: 120,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_ron(content: &str) -> Result<Self, GameError> {
        Ok(ron::de::from_str::<GameConfig>(content)?)
    }

    /// Parses the tuning document baked into the binary.
    pub fn load() -> Result<Self, GameError> {
        Self::from_ron(EMBEDDED_CONFIG)
    }

    pub fn width(&self) -> f32 {
        self.screen_size.0 as f32
    }

    pub fn height(&self) -> f32 {
        self.screen_size.1 as f32
    }

    pub fn spawn_position(&self) -> Vec2 {
        Vec2::new(self.width() / 2.0, self.spawn_height)
    }
}
