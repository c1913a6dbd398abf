use std::time::{Duration, Instant};

use bevy::prelude::*;

use crate::config::GameConfig;

/// Blocks at the end of each frame until the next frame boundary, capping the
/// loop at the configured rate. Physics still integrates the measured delta.
#[derive(Resource, Debug)]
pub struct FrameLimiter {
    period: Duration,
    last_tick: Option<Instant>,
}

impl FrameLimiter {
    pub fn new(target_fps: u32) -> Self {
        let period = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / target_fps as f64)
        };
        Self {
            period,
            last_tick: None,
        }
    }

    /// How long to block at `now`. The returned wait is folded into the tick
    /// time so the next frame is measured from the boundary.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let wait = match self.last_tick {
            Some(last) => self.period.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now + wait);
        wait
    }
}

pub fn frame_limiter_system(mut limiter: ResMut<FrameLimiter>) {
    let wait = limiter.tick(Instant::now());
    if !wait.is_zero() {
        std::thread::sleep(wait);
    }
}

pub struct FrameLimiterPlugin;

impl Plugin for FrameLimiterPlugin {
    fn build(&self, app: &mut App) {
        let target_fps = app
            .world()
            .get_resource::<GameConfig>()
            .map_or(GameConfig::default().target_fps, |c| c.target_fps);
        app.insert_resource(FrameLimiter::new(target_fps))
            .add_systems(Last, frame_limiter_system);
    }
}
