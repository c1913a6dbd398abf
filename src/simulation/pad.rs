use bevy::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::constants::SIDE_MARGIN;

const PAD_HEIGHT_MULTIPLE: f32 = 6.0; // pad center sits this many pad-heights above the bottom
const GLOW_BASE_ALPHA: f32 = 120.0;
const GLOW_PULSE_ALPHA: f32 = 60.0;
const GLOW_PULSE_RATE: f32 = 6.0; // radians per second

/// Landing target for one episode. A new pad is generated on every reset.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LandingPad {
    pub rect: Rect, // screen pixels, y down
    pub timer: f32, // drives the glow pulse only
}

impl LandingPad {
    pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let (width, height) = config.screen_size;
        let pad_width = config.landing_pad_width;
        let half = (pad_width / 2) as i64 + SIDE_MARGIN as i64;
        let x = rng.gen_range(half..=width as i64 - half) as f32;
        let y = height as f32 - config.landing_pad_height as f32 * PAD_HEIGHT_MULTIPLE;
        Self::centered_at(Vec2::new(x, y), config)
    }

    pub fn centered_at(center: Vec2, config: &GameConfig) -> Self {
        Self {
            rect: Rect::from_center_size(
                center,
                Vec2::new(
                    config.landing_pad_width as f32,
                    config.landing_pad_height as f32,
                ),
            ),
            timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.timer += dt;
    }

    pub fn top(&self) -> f32 {
        self.rect.min.y
    }

    pub fn glow_alpha(&self) -> u8 {
        (GLOW_BASE_ALPHA + GLOW_PULSE_ALPHA * (self.timer * GLOW_PULSE_RATE).sin()) as u8
    }
}

/// Grows `rect` by `amount` in total along each axis, keeping its center.
pub fn inflate(rect: Rect, amount: Vec2) -> Rect {
    Rect::from_center_size(rect.center(), rect.size() + amount)
}

/// True when the two rectangles share a non-zero area. Touching edges do not count.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    !a.intersect(b).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pad_stays_inside_the_margins() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let pad = LandingPad::generate(&config, &mut rng);
            assert!(pad.rect.min.x >= SIDE_MARGIN);
            assert!(pad.rect.max.x <= config.width() - SIDE_MARGIN);
            assert_eq!(pad.rect.width(), 160.0);
            assert_eq!(pad.rect.height(), 12.0);
            assert_eq!(pad.rect.center().y, 648.0);
            assert_eq!(pad.top(), 642.0);
            assert_eq!(pad.timer, 0.0);
        }
    }

    #[test]
    fn pulse_timer_only_affects_glow() {
        let config = GameConfig::default();
        let mut pad = LandingPad::centered_at(Vec2::new(300.0, 648.0), &config);
        let rect = pad.rect;
        assert_eq!(pad.glow_alpha(), 120);
        pad.update(0.25);
        assert_eq!(pad.rect, rect);
        assert!(pad.glow_alpha() > 120);
        assert!(pad.glow_alpha() <= 180);
    }

    #[test]
    fn inflate_grows_by_total_amount() {
        let rect = Rect::new(0.0, 0.0, 100.0, 10.0);
        let grown = inflate(rect, Vec2::new(40.0, 12.0));
        assert_eq!(grown.min, Vec2::new(-20.0, -6.0));
        assert_eq!(grown.max, Vec2::new(120.0, 16.0));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(overlaps(a, Rect::new(9.0, 9.0, 20.0, 20.0)));
    }
}
