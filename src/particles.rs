use bevy::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::constants::{neon_alpha, THRUSTER_GLOW};
use crate::simulation::{rotate_deg, Lander};
use crate::visualization::screen_to_world;

// Constants for the exhaust plume
const PARTICLES_PER_EMIT: usize = 3;
const PARTICLE_SPREAD_DEG: f32 = 20.0;
const PARTICLE_SPEED_MIN: f32 = 60.0;
const PARTICLE_SPEED_MAX: f32 = 120.0;
const PARTICLE_SPEED_SCALE: f32 = -0.65; // shoots opposite the thrust
const PARTICLE_JITTER: f32 = 10.0;
const PARTICLE_LIFETIME_MIN: f32 = 0.3;
const PARTICLE_LIFETIME_MAX: f32 = 0.6;
const PARTICLE_SIZE_MIN: f32 = 2.0;
const PARTICLE_SIZE_MAX: f32 = 4.0;
const PARTICLE_SHRINK_RATE: f32 = 6.0; // size units per second

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2, // screen pixels
    pub velocity: Vec2, // pixels per second
    pub lifetime: f32,  // seconds remaining
    pub color: [u8; 3],
    pub size: f32,
}

impl Particle {
    /// Advances the particle and reports whether it is still alive.
    pub fn update(&mut self, dt: f32) -> bool {
        self.position += self.velocity * dt;
        self.lifetime -= dt;
        self.size = (self.size - dt * PARTICLE_SHRINK_RATE).max(0.0);
        self.lifetime > 0.0
    }

    pub fn alpha(&self) -> u8 {
        (255.0 * self.lifetime).clamp(0.0, 255.0) as u8
    }
}

/// Builds one burst of exhaust leaving `origin`, roughly opposite to `thrust`.
pub fn spawn_exhaust<R: Rng + ?Sized>(origin: Vec2, thrust: Vec2, rng: &mut R) -> Vec<Particle> {
    let direction = if thrust.length() > 0.0 {
        thrust.normalize()
    } else {
        Vec2::Y
    };

    (0..PARTICLES_PER_EMIT)
        .map(|_| {
            let spread = rng.gen_range(-PARTICLE_SPREAD_DEG..=PARTICLE_SPREAD_DEG);
            let speed = rng.gen_range(PARTICLE_SPEED_MIN..=PARTICLE_SPEED_MAX);
            let jitter = Vec2::new(
                rng.gen_range(-PARTICLE_JITTER..=PARTICLE_JITTER),
                rng.gen_range(-PARTICLE_JITTER..=PARTICLE_JITTER),
            );
            Particle {
                position: origin,
                velocity: rotate_deg(direction, spread) * speed * PARTICLE_SPEED_SCALE + jitter,
                lifetime: rng.gen_range(PARTICLE_LIFETIME_MIN..=PARTICLE_LIFETIME_MAX),
                color: THRUSTER_GLOW,
                size: rng.gen_range(PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX),
            }
        })
        .collect()
}

/// Ages every particle and drops the expired ones, keeping spawn order.
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    particles.retain_mut(|p| p.update(dt));
}

pub fn draw_particles(mut gizmos: Gizmos, lander: Res<Lander>, config: Res<GameConfig>) {
    for particle in lander.particles.iter().filter(|p| p.lifetime > 0.0) {
        gizmos.circle_2d(
            screen_to_world(particle.position, &config),
            particle.size.max(1.0),
            neon_alpha(particle.color, particle.alpha()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle(lifetime: f32) -> Particle {
        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::new(10.0, -20.0),
            lifetime,
            color: THRUSTER_GLOW,
            size: 3.0,
        }
    }

    #[test]
    fn particle_moves_at_constant_velocity_and_shrinks() {
        let mut p = particle(0.5);
        assert!(p.update(0.1));
        assert!((p.position - Vec2::new(1.0, -2.0)).length() < 1e-5);
        assert!((p.lifetime - 0.4).abs() < 1e-6);
        assert!((p.size - 2.4).abs() < 1e-5);
        assert_eq!(p.velocity, Vec2::new(10.0, -20.0));
    }

    #[test]
    fn size_never_goes_negative() {
        let mut p = particle(5.0);
        p.update(1.0);
        assert_eq!(p.size, 0.0);
    }

    #[test]
    fn particle_dies_when_lifetime_reaches_zero() {
        let mut p = particle(0.25);
        assert!(!p.update(0.25));
    }

    #[test]
    fn expired_particles_are_pruned() {
        let mut particles = vec![particle(0.1), particle(0.5), particle(0.2), particle(0.9)];
        update_particles(&mut particles, 0.2);
        assert_eq!(particles.len(), 2);
        assert!(particles.iter().all(|p| p.lifetime > 0.0));
        update_particles(&mut particles, 0.3);
        assert_eq!(particles.len(), 1);
    }

    #[test]
    fn exhaust_burst_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        let origin = Vec2::new(100.0, 200.0);
        let burst = spawn_exhaust(origin, Vec2::new(0.0, -120.0), &mut rng);

        assert_eq!(burst.len(), PARTICLES_PER_EMIT);
        for p in &burst {
            assert_eq!(p.position, origin);
            assert_eq!(p.color, THRUSTER_GLOW);
            assert!((PARTICLE_LIFETIME_MIN..=PARTICLE_LIFETIME_MAX).contains(&p.lifetime));
            assert!((PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX).contains(&p.size));
            // Upward thrust pushes exhaust downward on screen.
            assert!(p.velocity.y > 0.0);
            let max_speed = PARTICLE_SPEED_MAX * 0.65 + PARTICLE_JITTER * 2.0_f32.sqrt();
            assert!(p.velocity.length() <= max_speed + 1e-3);
        }
    }

    #[test]
    fn zero_thrust_falls_back_to_straight_down() {
        let mut rng = StdRng::seed_from_u64(3);
        let burst = spawn_exhaust(Vec2::ZERO, Vec2::ZERO, &mut rng);
        // Direction (0, 1) scaled by -0.65 points up; jitter cannot overturn it.
        for p in &burst {
            assert!(p.velocity.y < 0.0);
        }
    }

    #[test]
    fn alpha_tracks_remaining_lifetime() {
        assert_eq!(particle(2.0).alpha(), 255);
        assert_eq!(particle(0.5).alpha(), 127);
        assert_eq!(particle(-0.1).alpha(), 0);
    }
}
