use bevy::prelude::*;

use crate::config::GameConfig;

// Draw order, back to front
pub const Z_BACKGROUND: f32 = 0.0;
pub const Z_SKYLINE: f32 = 1.0;
pub const Z_SCANLINES: f32 = 2.0;
pub const Z_STARS: f32 = 3.0;
pub const Z_PAD_GLOW: f32 = 4.0;
pub const Z_PAD: f32 = 4.5;
pub const Z_SHIP: f32 = 5.0;

/// Converts simulation screen coordinates (origin top-left, y down) to the
/// centered, y-up coordinates of the 2D camera.
pub fn screen_to_world(pos: Vec2, config: &GameConfig) -> Vec2 {
    Vec2::new(pos.x - config.width() / 2.0, config.height() / 2.0 - pos.y)
}

/// Center of a screen-space rectangle in camera coordinates.
pub fn rect_to_world(rect: Rect, config: &GameConfig) -> Vec2 {
    screen_to_world(rect.center(), config)
}

/// Point on the ship drawing canvas (pixels, origin top-left of the canvas)
/// relative to the ship center, y up.
pub fn ship_local(canvas: Vec2, canvas_size: Vec2) -> Vec2 {
    Vec2::new(canvas.x - canvas_size.x / 2.0, canvas_size.y / 2.0 - canvas.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_corners_map_to_camera_space() {
        let config = GameConfig::default();
        assert_eq!(screen_to_world(Vec2::ZERO, &config), Vec2::new(-480.0, 360.0));
        assert_eq!(
            screen_to_world(Vec2::new(960.0, 720.0), &config),
            Vec2::new(480.0, -360.0)
        );
        assert_eq!(screen_to_world(Vec2::new(480.0, 360.0), &config), Vec2::ZERO);
    }

    #[test]
    fn ship_canvas_center_is_origin() {
        let size = Vec2::new(48.0, 64.0);
        assert_eq!(ship_local(Vec2::new(24.0, 32.0), size), Vec2::ZERO);
        assert_eq!(ship_local(Vec2::new(24.0, 4.0), size), Vec2::new(0.0, 28.0));
    }
}
