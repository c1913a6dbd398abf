use std::time::Duration;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::constants::{BOTTOM_CRASH_MARGIN, LANDER_HITBOX, SIDE_MARGIN, THRUSTER_OFFSET};
use crate::particles::{spawn_exhaust, update_particles, Particle};

mod pad;

pub use pad::{inflate, overlaps, LandingPad};

const PAD_CONTACT_PADDING: Vec2 = Vec2::new(40.0, 12.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandingStatus {
    #[default]
    Flying,
    Landed,
    Crashed,
}

impl LandingStatus {
    pub fn is_terminal(self) -> bool {
        self != LandingStatus::Flying
    }
}

/// Pilot controls sampled for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PilotInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
}

impl PilotInput {
    pub fn from_keys(keys: &ButtonInput<KeyCode>) -> Self {
        Self {
            rotate_left: keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
            rotate_right: keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
            thrust: keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW, KeyCode::Space]),
        }
    }
}

/// Random source shared by pad placement, exhaust scatter and the starfield.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl FromWorld for GameRng {
    fn from_world(world: &mut World) -> Self {
        Self::new(world.get_resource::<GameConfig>().and_then(|c| c.rng_seed))
    }
}

// Screen coordinates: x right, y down, angle in degrees counter-clockwise on screen
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Lander {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub fuel: f32,
    pub thrusting: bool,
    pub status: LandingStatus,
    pub status_timer: f32,
    pub particles: Vec<Particle>,
}

impl Lander {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            position: config.spawn_position(),
            velocity: Vec2::ZERO,
            angle: 0.0,
            fuel: config.fuel_capacity,
            thrusting: false,
            status: LandingStatus::Flying,
            status_timer: 0.0,
            particles: Vec::new(),
        }
    }

    pub fn handle_input(&mut self, input: PilotInput, dt: f32, config: &GameConfig) {
        self.thrusting = false;
        if self.status.is_terminal() {
            return;
        }
        if input.rotate_left {
            self.angle += config.rotation_speed * dt;
        }
        if input.rotate_right {
            self.angle -= config.rotation_speed * dt;
        }
        if input.thrust && self.fuel > 0.0 {
            self.thrusting = true;
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, config: &GameConfig, rng: &mut R) {
        if self.status.is_terminal() {
            self.status_timer += dt;
            return;
        }

        let mut acceleration = Vec2::new(0.0, config.gravity);

        if self.thrusting && self.fuel > 0.0 {
            let thrust = self.thrust_vector(config);
            acceleration += thrust;
            self.fuel = (self.fuel - config.fuel_burn_rate * dt).max(0.0);
            self.emit_thruster_particles(thrust, rng);
        } else {
            self.thrusting = false;
        }

        // Semi-implicit Euler: velocity first, then position with the new velocity
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        // Velocity is left alone, so the ship keeps pressing against the wall.
        self.position.x = self
            .position
            .x
            .clamp(SIDE_MARGIN, config.width() - SIDE_MARGIN);

        if self.position.y > config.height() + BOTTOM_CRASH_MARGIN {
            self.status = LandingStatus::Crashed;
        }

        update_particles(&mut self.particles, dt);
    }

    pub fn thrust_vector(&self, config: &GameConfig) -> Vec2 {
        rotate_deg(Vec2::new(0.0, -config.thrust_force), -self.angle)
    }

    pub fn emit_thruster_particles<R: Rng + ?Sized>(&mut self, thrust: Vec2, rng: &mut R) {
        let origin = self.position + rotate_deg(Vec2::new(0.0, THRUSTER_OFFSET), -self.angle);
        self.particles.extend(spawn_exhaust(origin, thrust, rng));
    }

    pub fn hitbox(&self) -> Rect {
        Rect::from_center_size(self.position, Vec2::splat(LANDER_HITBOX))
    }

    /// Classifies a touchdown against `pad`. Returns the new status when this
    /// call moved the lander out of `Flying`.
    pub fn check_landing(
        &mut self,
        pad: &LandingPad,
        config: &GameConfig,
    ) -> Option<LandingStatus> {
        if self.status.is_terminal() {
            return None;
        }
        let hitbox = self.hitbox();
        if hitbox.max.y < pad.top() || !overlaps(hitbox, inflate(pad.rect, PAD_CONTACT_PADDING)) {
            return None;
        }

        let soft = self.velocity.y.abs() <= config.max_landing_speed
            && self.velocity.x.abs() <= config.max_horizontal_speed
            && normalize_angle(self.angle).abs() <= config.max_landing_angle;
        self.status = if soft {
            LandingStatus::Landed
        } else {
            LandingStatus::Crashed
        };
        self.status_timer = 0.0;
        Some(self.status)
    }

    pub fn fuel_fraction(&self, config: &GameConfig) -> f32 {
        if config.fuel_capacity > 0.0 {
            (self.fuel / config.fuel_capacity).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Thrust is armed, the ship is flying and there is fuel to burn.
    pub fn engine_firing(&self) -> bool {
        self.thrusting && self.status == LandingStatus::Flying && self.fuel > 0.0
    }
}

/// Rotates `v` by `degrees` using the standard (x right, y up) convention. On a
/// y-down screen a positive angle therefore turns clockwise.
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Wraps an angle in degrees into [-180, 180).
pub fn normalize_angle(degrees: f32) -> f32 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Integrate the whole wall-clock frame, however long it was.
        app.insert_resource(Time::<Virtual>::from_max_delta(Duration::MAX))
            .init_resource::<GameRng>()
            .add_systems(Startup, start_episode)
            .add_systems(
                Update,
                (
                    reset_episode,
                    pilot_input_system,
                    simulation_system,
                    landing_check_system,
                    pad_system,
                )
                    .chain()
                    .in_set(SimulationSet),
            );
    }
}

fn announce_pad(pad: &LandingPad) {
    info!(
        "New episode: pad centered at ({:.0}, {:.0})",
        pad.rect.center().x,
        pad.rect.center().y
    );
}

pub fn start_episode(mut commands: Commands, config: Res<GameConfig>, mut rng: ResMut<GameRng>) {
    let pad = LandingPad::generate(&config, &mut rng.0);
    announce_pad(&pad);
    commands.insert_resource(Lander::new(&config));
    commands.insert_resource(pad);
}

pub fn reset_episode(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut lander: ResMut<Lander>,
    mut pad: ResMut<LandingPad>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        info!("Reset requested");
        // Replace wholesale so nothing from the previous flight survives.
        *lander = Lander::new(&config);
        *pad = LandingPad::generate(&config, &mut rng.0);
        announce_pad(&pad);
    }
}

pub fn pilot_input_system(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    mut lander: ResMut<Lander>,
) {
    lander.handle_input(PilotInput::from_keys(&keys), time.delta_secs(), &config);
}

pub fn simulation_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut lander: ResMut<Lander>,
) {
    let was_flying = lander.status == LandingStatus::Flying;
    lander.update(time.delta_secs(), &config, &mut rng.0);
    if was_flying && lander.status == LandingStatus::Crashed {
        info!("Lander fell off the bottom of the screen");
    }
}

pub fn landing_check_system(
    config: Res<GameConfig>,
    pad: Res<LandingPad>,
    mut lander: ResMut<Lander>,
) {
    match lander.check_landing(&pad, &config) {
        Some(LandingStatus::Landed) => info!(
            "Touchdown: vx {:.1} vy {:.1} angle {:.1}",
            lander.velocity.x, lander.velocity.y, lander.angle
        ),
        Some(LandingStatus::Crashed) => info!(
            "Impact: vx {:.1} vy {:.1} angle {:.1}",
            lander.velocity.x, lander.velocity.y, lander.angle
        ),
        _ => {}
    }
}

pub fn pad_system(time: Res<Time>, mut pad: ResMut<LandingPad>) {
    pad.update(time.delta_secs());
}
