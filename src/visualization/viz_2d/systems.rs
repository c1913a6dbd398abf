use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use super::components::{PadGlow, PadSurface, Ship, ShipGlow, ThrusterFlame};
use crate::config::GameConfig;
use crate::constants::{
    neon, neon_alpha, HUD_SECONDARY, LANDER_PRIMARY, LANDER_SECONDARY, SHIP_SURFACE, THRUSTER_CORE,
};
use crate::simulation::{Lander, LandingPad};
use crate::visualization::common::{
    rect_to_world, screen_to_world, ship_local, Z_PAD, Z_PAD_GLOW, Z_SHIP,
};

// Ship outline on its 48x64 drawing canvas, y down
const HULL: [Vec2; 5] = [
    Vec2::new(24.0, 4.0),
    Vec2::new(40.0, 44.0),
    Vec2::new(32.0, 54.0),
    Vec2::new(16.0, 54.0),
    Vec2::new(8.0, 44.0),
];
const ACCENT: [Vec2; 4] = [
    Vec2::new(24.0, 12.0),
    Vec2::new(34.0, 42.0),
    Vec2::new(24.0, 48.0),
    Vec2::new(14.0, 42.0),
];
const LEGS: [(Vec2, Vec2); 2] = [
    (Vec2::new(12.0, 44.0), Vec2::new(6.0, 60.0)),
    (Vec2::new(36.0, 44.0), Vec2::new(42.0, 60.0)),
];
const FLAME: [Vec2; 4] = [
    Vec2::new(24.0, 56.0),
    Vec2::new(30.0, 60.0),
    Vec2::new(24.0, 62.0),
    Vec2::new(18.0, 60.0),
];
const SHIP_GLOW_PADDING: f32 = 20.0;
const SHIP_GLOW_ALPHA: u8 = 50;
const PAD_GLOW_PADDING: Vec2 = Vec2::new(24.0, 16.0);

/// Fills a convex polygon given in ship canvas coordinates.
fn polygon_mesh(canvas_points: &[Vec2]) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());

    let mut canvas = canvas_points.to_vec();
    let local = |points: &[Vec2]| -> Vec<Vec2> {
        points.iter().map(|p| ship_local(*p, SHIP_SURFACE)).collect()
    };
    // Keep counter-clockwise winding after the y flip.
    let flipped = local(&canvas);
    let doubled_area: f32 = flipped
        .iter()
        .zip(flipped.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum();
    if doubled_area < 0.0 {
        canvas.reverse();
    }
    let points = local(&canvas);

    let vertices: Vec<[f32; 3]> = points.iter().map(|p| [p.x, p.y, 0.0]).collect();
    let normals = vec![[0.0, 0.0, 1.0]; vertices.len()];
    let uvs: Vec<[f32; 2]> = canvas
        .iter()
        .map(|p| [p.x / SHIP_SURFACE.x, p.y / SHIP_SURFACE.y])
        .collect();
    let indices: Vec<u32> = (1..points.len() as u32 - 1)
        .flat_map(|i| [0, i, i + 1])
        .collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Glow ellipse extent: the axis-aligned bounds of the rotated ship canvas
/// plus padding. The glow itself never rotates.
pub fn glow_size(angle: f32) -> Vec2 {
    let (sin, cos) = angle.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    Vec2::new(
        SHIP_SURFACE.x * cos + SHIP_SURFACE.y * sin,
        SHIP_SURFACE.x * sin + SHIP_SURFACE.y * cos,
    ) + Vec2::splat(SHIP_GLOW_PADDING)
}

pub fn spawn_ship(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // Unit circle stretched to `glow_size` every frame
    commands.spawn((
        Mesh2d(meshes.add(Circle::new(0.5))),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(neon_alpha(
            LANDER_SECONDARY,
            SHIP_GLOW_ALPHA,
        )))),
        Transform::from_xyz(0.0, 0.0, Z_SHIP - 0.2).with_scale(glow_size(0.0).extend(1.0)),
        ShipGlow,
    ));

    commands
        .spawn((Transform::from_xyz(0.0, 0.0, Z_SHIP), Visibility::default(), Ship))
        .with_children(|ship| {
            ship.spawn((
                Mesh2d(meshes.add(polygon_mesh(&HULL))),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(neon(LANDER_PRIMARY)))),
                Transform::default(),
            ));
            ship.spawn((
                Mesh2d(meshes.add(polygon_mesh(&FLAME))),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(neon(THRUSTER_CORE)))),
                Transform::from_xyz(0.0, 0.0, 0.1),
                Visibility::Hidden,
                ThrusterFlame,
            ));
        });
}

pub fn spawn_pad(mut commands: Commands) {
    commands.spawn((
        Sprite::from_color(neon_alpha(HUD_SECONDARY, 120), Vec2::ONE),
        Transform::from_xyz(0.0, 0.0, Z_PAD_GLOW),
        PadGlow,
    ));
    commands.spawn((
        Sprite::from_color(neon(HUD_SECONDARY), Vec2::ONE),
        Transform::from_xyz(0.0, 0.0, Z_PAD),
        PadSurface,
    ));
}

pub fn update_ship(
    lander: Res<Lander>,
    config: Res<GameConfig>,
    mut ship_query: Query<&mut Transform, (With<Ship>, Without<ShipGlow>)>,
    mut glow_query: Query<&mut Transform, (With<ShipGlow>, Without<Ship>)>,
    mut flame_query: Query<&mut Visibility, With<ThrusterFlame>>,
) {
    let screen_pos = screen_to_world(lander.position, &config);

    if let Ok(mut transform) = ship_query.get_single_mut() {
        transform.translation.x = screen_pos.x;
        transform.translation.y = screen_pos.y;
        // Positive lander angle turns the ship counter-clockwise
        transform.rotation = Quat::from_rotation_z(lander.angle.to_radians());
    }

    if let Ok(mut transform) = glow_query.get_single_mut() {
        transform.translation.x = screen_pos.x;
        transform.translation.y = screen_pos.y;
        transform.scale = glow_size(lander.angle).extend(1.0);
    }

    let flame = if lander.thrusting && lander.fuel > 0.0 {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in flame_query.iter_mut() {
        *visibility = flame;
    }
}

/// Accent trim and landing legs, drawn as lines over the filled hull.
pub fn draw_ship_trim(mut gizmos: Gizmos, lander: Res<Lander>, config: Res<GameConfig>) {
    let center = screen_to_world(lander.position, &config);
    let rotation = Vec2::from_angle(lander.angle.to_radians());
    let to_world = |canvas: Vec2| center + rotation.rotate(ship_local(canvas, SHIP_SURFACE));
    let accent = neon(LANDER_SECONDARY);

    gizmos.linestrip_2d(
        ACCENT.iter().chain(ACCENT.first()).map(|p| to_world(*p)),
        accent,
    );
    for (hip, foot) in LEGS {
        gizmos.line_2d(to_world(hip), to_world(foot), accent);
    }
}

pub fn update_pad(
    pad: Res<LandingPad>,
    config: Res<GameConfig>,
    mut surface_query: Query<(&mut Transform, &mut Sprite), (With<PadSurface>, Without<PadGlow>)>,
    mut glow_query: Query<(&mut Transform, &mut Sprite), (With<PadGlow>, Without<PadSurface>)>,
) {
    let center = rect_to_world(pad.rect, &config);

    if let Ok((mut transform, mut sprite)) = surface_query.get_single_mut() {
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        sprite.custom_size = Some(pad.rect.size());
    }

    if let Ok((mut transform, mut sprite)) = glow_query.get_single_mut() {
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        sprite.custom_size = Some(pad.rect.size() + PAD_GLOW_PADDING);
        sprite.color = neon_alpha(HUD_SECONDARY, pad.glow_alpha());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    #[test]
    fn hull_mesh_is_a_triangle_fan() {
        let mesh = polygon_mesh(&HULL);
        assert_eq!(mesh.count_vertices(), 5);
        match mesh.indices() {
            Some(Indices::U32(indices)) => assert_eq!(indices.len(), 9),
            _ => panic!("expected u32 indices"),
        }
    }

    #[test]
    fn glow_wraps_the_rotated_ship() {
        assert!((glow_size(0.0) - Vec2::new(68.0, 84.0)).length() < 1e-4);
        assert!((glow_size(90.0) - Vec2::new(84.0, 68.0)).length() < 1e-3);
        assert!((glow_size(-90.0) - glow_size(90.0)).length() < 1e-3);

        let diagonal = glow_size(45.0);
        let expected = (48.0 + 64.0) * std::f32::consts::FRAC_1_SQRT_2 + 20.0;
        assert!((diagonal.x - expected).abs() < 1e-3);
        assert!((diagonal.y - expected).abs() < 1e-3);
    }

    #[test]
    fn hull_mesh_winds_counter_clockwise() {
        let mesh = polygon_mesh(&HULL);
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("expected positions");
        };
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        for triangle in indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec2::from_slice(&positions[triangle[i] as usize]));
            assert!((b - a).perp_dot(c - a) > 0.0);
        }
    }
}
