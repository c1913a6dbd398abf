use bevy::prelude::*;
use rand::Rng;

use super::components::StarSprite;
use crate::config::GameConfig;
use crate::constants::neon;
use crate::simulation::GameRng;
use crate::visualization::common::{screen_to_world, Z_STARS};

const STAR_SIZE: f32 = 2.0;
const STAR_MIN_SPEED: f32 = 5.0;
const STAR_MAX_SPEED: f32 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub position: Vec2, // screen pixels, top-left of the star square
    pub speed: f32,     // pixels per second, downward
}

/// Slowly falling stars. Purely cosmetic; stars that leave the bottom are
/// recycled at the top.
#[derive(Resource, Debug, Clone)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    pub fn build<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let stars = (0..config.star_count)
            .map(|_| Star {
                position: Vec2::new(
                    rng.gen_range(0.0..=config.width()),
                    rng.gen_range(0.0..=config.height()),
                ),
                speed: rng.gen_range(STAR_MIN_SPEED..=STAR_MAX_SPEED),
            })
            .collect();
        Self { stars }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, config: &GameConfig, rng: &mut R) {
        for star in &mut self.stars {
            star.position.y += star.speed * dt;
            if star.position.y > config.height() {
                star.position.y = 0.0;
                star.position.x = rng.gen_range(0.0..=config.width());
            }
        }
    }
}

/// Faster stars glow brighter magenta.
pub fn star_color(speed: f32) -> [u8; 3] {
    let value = (120.0 + speed * 2.0).min(255.0) as u8;
    [value, 0, value]
}

fn star_translation(star: &Star, config: &GameConfig) -> Vec3 {
    screen_to_world(star.position.floor() + Vec2::splat(STAR_SIZE / 2.0), config).extend(Z_STARS)
}

pub fn spawn_starfield(mut commands: Commands, config: Res<GameConfig>, mut rng: ResMut<GameRng>) {
    let starfield = Starfield::build(&config, &mut rng.0);
    for (index, star) in starfield.stars.iter().enumerate() {
        commands.spawn((
            Sprite::from_color(neon(star_color(star.speed)), Vec2::splat(STAR_SIZE)),
            Transform::from_translation(star_translation(star, &config)),
            StarSprite(index),
        ));
    }
    commands.insert_resource(starfield);
}

pub fn scroll_starfield(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut starfield: ResMut<Starfield>,
    mut sprites: Query<(&StarSprite, &mut Transform)>,
) {
    starfield.advance(time.delta_secs(), &config, &mut rng.0);
    for (sprite, mut transform) in sprites.iter_mut() {
        if let Some(star) = starfield.stars.get(sprite.0) {
            transform.translation = star_translation(star, &config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn starfield_fills_the_screen() {
        let config = GameConfig::default();
        let starfield = Starfield::build(&config, &mut StdRng::seed_from_u64(9));
        assert_eq!(starfield.stars.len(), config.star_count);
        for star in &starfield.stars {
            assert!((0.0..=config.width()).contains(&star.position.x));
            assert!((0.0..=config.height()).contains(&star.position.y));
            assert!((STAR_MIN_SPEED..=STAR_MAX_SPEED).contains(&star.speed));
        }
    }

    #[test]
    fn stars_fall_and_wrap_to_the_top() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut starfield = Starfield {
            stars: vec![
                Star {
                    position: Vec2::new(100.0, 10.0),
                    speed: 10.0,
                },
                Star {
                    position: Vec2::new(200.0, 719.0),
                    speed: 20.0,
                },
            ],
        };
        starfield.advance(0.5, &config, &mut rng);

        assert_eq!(starfield.stars[0].position, Vec2::new(100.0, 15.0));
        assert_eq!(starfield.stars[1].position.y, 0.0);
        assert!((0.0..=config.width()).contains(&starfield.stars[1].position.x));
    }

    #[test]
    fn faster_stars_are_brighter() {
        assert_eq!(star_color(5.0), [130, 0, 130]);
        assert_eq!(star_color(20.0), [160, 0, 160]);
        assert_eq!(star_color(100.0), [255, 0, 255]);
    }
}
