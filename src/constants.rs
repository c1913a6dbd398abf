use bevy::prelude::*;

// Neon palette, sRGB
pub const BACKGROUND_DARK: [u8; 3] = [6, 6, 20];
pub const BACKGROUND_MID: [u8; 3] = [16, 16, 40];
pub const BACKGROUND_HIGH: [u8; 3] = [0, 180, 216];
pub const LANDER_PRIMARY: [u8; 3] = [255, 0, 110];
pub const LANDER_SECONDARY: [u8; 3] = [0, 255, 200];
pub const THRUSTER_CORE: [u8; 3] = [255, 255, 0];
pub const THRUSTER_GLOW: [u8; 3] = [0, 255, 255];
pub const HUD_PRIMARY: [u8; 3] = [255, 0, 110];
pub const HUD_SECONDARY: [u8; 3] = [0, 255, 200];
pub const WARNING: [u8; 3] = [255, 94, 0];
pub const SUCCESS: [u8; 3] = [144, 238, 144];

// Ship geometry, screen pixels
pub const LANDER_HITBOX: f32 = 42.0; // side of the square collision box
pub const SHIP_SURFACE: Vec2 = Vec2::new(48.0, 64.0); // drawing canvas for the ship
pub const THRUSTER_OFFSET: f32 = 20.0; // exhaust origin below the ship center
pub const SIDE_MARGIN: f32 = 40.0; // horizontal clamp and pad margin
pub const BOTTOM_CRASH_MARGIN: f32 = 80.0; // falling this far below the screen is a crash

pub fn neon(rgb: [u8; 3]) -> Color {
    Color::srgb_u8(rgb[0], rgb[1], rgb[2])
}

pub fn neon_alpha(rgb: [u8; 3], alpha: u8) -> Color {
    Color::srgba_u8(rgb[0], rgb[1], rgb[2], alpha)
}
