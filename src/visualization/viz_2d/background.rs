use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::components::SkylineBuilding;
use crate::config::GameConfig;
use crate::constants::{neon, neon_alpha, BACKGROUND_DARK, BACKGROUND_HIGH, BACKGROUND_MID};
use crate::visualization::common::{
    rect_to_world, screen_to_world, Z_BACKGROUND, Z_SCANLINES, Z_SKYLINE,
};

const GRADIENT_BANDS: u32 = 24;
const SKYLINE_SEED: u64 = 42; // the skyline is identical every run
const SKYLINE_BUILDINGS: usize = 40;
const BUILDING_MIN_WIDTH: u32 = 24;
const BUILDING_MAX_WIDTH: u32 = 64;
const BUILDING_MIN_HEIGHT: u32 = 40;
const BUILDING_JITTER: i32 = 12;
const SKYLINE_PULSE_RATE: f32 = 0.6;
const SKYLINE_PULSE_AMPLITUDE: f32 = 40.0;
const SCANLINE_COLOR: [u8; 3] = [255, 0, 255];
const SCANLINE_ALPHA: u8 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingSpec {
    pub index: usize,
    pub rect: Rect, // screen pixels
}

pub fn skyline_layout(config: &GameConfig) -> Vec<BuildingSpec> {
    let mut rng = StdRng::seed_from_u64(SKYLINE_SEED);
    let (width, height) = config.screen_size;
    let max_height = (height / 3).max(BUILDING_MIN_HEIGHT);

    (0..SKYLINE_BUILDINGS)
        .map(|index| {
            let building_width = rng.gen_range(BUILDING_MIN_WIDTH..=BUILDING_MAX_WIDTH) as f32;
            let building_height = rng.gen_range(BUILDING_MIN_HEIGHT..=max_height) as f32;
            let x = (index as f32 / SKYLINE_BUILDINGS as f32 * width as f32) as i32
                + rng.gen_range(-BUILDING_JITTER..=BUILDING_JITTER);
            let x = x as f32;
            let bottom = height as f32;
            BuildingSpec {
                index,
                rect: Rect::new(x, bottom - building_height, x + building_width, bottom),
            }
        })
        .collect()
}

/// Building color at `elapsed` seconds; red and blue pulse out of phase per building.
pub fn building_color(index: usize, elapsed: f32) -> [u8; 3] {
    let phase = elapsed * SKYLINE_PULSE_RATE + index as f32;
    let shift = ((phase.sin() + 1.0) * SKYLINE_PULSE_AMPLITUDE) as u16;
    [
        (BACKGROUND_MID[0] as u16 + shift).min(255) as u8,
        BACKGROUND_MID[1],
        (BACKGROUND_MID[2] as u16 + shift).min(255) as u8,
    ]
}

/// Sky color at `blend` (0 top, 1 bottom).
pub fn gradient_color(blend: f32) -> [u8; 3] {
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * blend) as u8;
    [
        lerp(BACKGROUND_DARK[0], BACKGROUND_HIGH[0]),
        lerp(BACKGROUND_DARK[1], BACKGROUND_HIGH[1]),
        lerp(BACKGROUND_DARK[2], BACKGROUND_HIGH[2]),
    ]
}

fn gradient_mesh(config: &GameConfig) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());

    let mut positions = Vec::new();
    let mut colors = Vec::new();
    let mut uvs = Vec::new();
    for row in 0..=GRADIENT_BANDS {
        let blend = row as f32 / GRADIENT_BANDS as f32;
        let y = blend * config.height();
        let linear = neon(gradient_color(blend)).to_linear();
        for x in [0.0, config.width()] {
            positions.push(screen_to_world(Vec2::new(x, y), config).extend(0.0).to_array());
            colors.push([linear.red, linear.green, linear.blue, 1.0]);
            uvs.push([x / config.width(), blend]);
        }
    }

    // Two vertices per row: even = left, odd = right
    let mut indices = Vec::new();
    for band in 0..GRADIENT_BANDS {
        let top_left = band * 2;
        let (top_right, bottom_left, bottom_right) = (top_left + 1, top_left + 2, top_left + 3);
        indices.extend([bottom_left, bottom_right, top_right]);
        indices.extend([bottom_left, top_right, top_left]);
    }

    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

pub fn spawn_background(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    config: Res<GameConfig>,
) {
    commands.spawn((
        Mesh2d(meshes.add(gradient_mesh(&config))),
        MeshMaterial2d(materials.add(ColorMaterial::default())),
        Transform::from_xyz(0.0, 0.0, Z_BACKGROUND),
    ));

    for building in skyline_layout(&config) {
        commands.spawn((
            Sprite::from_color(neon(BACKGROUND_MID), building.rect.size()),
            Transform::from_translation(rect_to_world(building.rect, &config).extend(Z_SKYLINE)),
            SkylineBuilding(building.index),
        ));
    }

    let spacing = config.scanline_spacing.max(1) as usize;
    for y in (0..config.screen_size.1).step_by(spacing) {
        let center = screen_to_world(Vec2::new(config.width() / 2.0, y as f32 + 0.5), &config);
        commands.spawn((
            Sprite::from_color(
                neon_alpha(SCANLINE_COLOR, SCANLINE_ALPHA),
                Vec2::new(config.width(), 1.0),
            ),
            Transform::from_translation(center.extend(Z_SCANLINES)),
        ));
    }
}

pub fn animate_skyline(time: Res<Time>, mut buildings: Query<(&SkylineBuilding, &mut Sprite)>) {
    let elapsed = time.elapsed_secs();
    for (building, mut sprite) in buildings.iter_mut() {
        sprite.color = neon(building_color(building.0, elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skyline_is_deterministic() {
        let config = GameConfig::default();
        assert_eq!(skyline_layout(&config), skyline_layout(&config));
    }

    #[test]
    fn buildings_stand_on_the_bottom_edge() {
        let config = GameConfig::default();
        let layout = skyline_layout(&config);
        assert_eq!(layout.len(), SKYLINE_BUILDINGS);
        for building in &layout {
            assert_eq!(building.rect.max.y, 720.0);
            assert!((24.0..=64.0).contains(&building.rect.width()));
            assert!((40.0..=240.0).contains(&building.rect.height()));
        }
    }

    #[test]
    fn gradient_runs_dark_to_high() {
        assert_eq!(gradient_color(0.0), BACKGROUND_DARK);
        assert_eq!(gradient_color(1.0), BACKGROUND_HIGH);
        let mid = gradient_color(0.5);
        assert_eq!(mid, [3, 93, 118]);
    }

    #[test]
    fn building_pulse_stays_in_range() {
        for t in 0..200 {
            let color = building_color(7, t as f32 * 0.1);
            assert!(color[0] >= BACKGROUND_MID[0] && color[0] <= BACKGROUND_MID[0] + 80);
            assert_eq!(color[1], BACKGROUND_MID[1]);
            assert_eq!(color[0] - BACKGROUND_MID[0], color[2] - BACKGROUND_MID[2]);
        }
    }
}
