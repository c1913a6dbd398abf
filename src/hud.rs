use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::GameConfig;
use crate::constants::{HUD_PRIMARY, HUD_SECONDARY, SUCCESS, WARNING};
use crate::simulation::{Lander, LandingStatus};

const PANEL_ORIGIN: egui::Pos2 = egui::pos2(20.0, 20.0);
const PANEL_SIZE: egui::Vec2 = egui::vec2(240.0, 120.0);
const PANEL_TEXT_OFFSETS: [f32; 3] = [16.0, 48.0, 80.0];
const FUEL_BAR_ORIGIN: egui::Pos2 = egui::pos2(180.0, 32.0);
const FUEL_BAR_SIZE: egui::Vec2 = egui::vec2(600.0, 14.0);
const BANNER_Y: f32 = 80.0;
const GLITCH_RATE: f32 = 12.0;
const GLITCH_AMPLITUDE: f32 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: &'static str,
    pub color: [u8; 3],
    pub glitch_offset: f32,
}

/// Title banner for the current status. While flying it blinks on even seconds.
pub fn status_banner(status: LandingStatus, elapsed: f32) -> Option<Banner> {
    let (text, color) = match status {
        LandingStatus::Landed => ("Touchdown Achieved", SUCCESS),
        LandingStatus::Crashed => ("Impact Detected", WARNING),
        LandingStatus::Flying => ("Neon Descent", HUD_SECONDARY),
    };
    if status == LandingStatus::Flying && (elapsed as u64) % 2 != 0 {
        return None;
    }
    Some(Banner {
        text,
        color,
        glitch_offset: (elapsed * GLITCH_RATE).sin() * GLITCH_AMPLITUDE,
    })
}

pub fn telemetry_lines(lander: &Lander) -> [String; 3] {
    [
        format!("FUEL {:05.1}", lander.fuel),
        format!(
            "VEL X {:5.1} | Y {:5.1}",
            lander.velocity.x, lander.velocity.y
        ),
        format!("ANGLE {:5.1}", lander.angle),
    ]
}

fn rgb(color: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(color[0], color[1], color[2])
}

fn rgba(color: [u8; 3], alpha: u8) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], alpha)
}

pub fn hud_system(
    mut contexts: EguiContexts,
    time: Res<Time>,
    lander: Res<Lander>,
    config: Res<GameConfig>,
) {
    let ctx = contexts.ctx_mut();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("hud"),
    ));
    let accent = rgb(HUD_SECONDARY);

    // Telemetry panel
    let panel = egui::Rect::from_min_size(PANEL_ORIGIN, PANEL_SIZE);
    painter.rect_filled(panel, egui::Rounding::same(12.0), rgba(HUD_PRIMARY, 50));
    painter.rect_stroke(panel, egui::Rounding::same(12.0), egui::Stroke::new(2.0, accent));
    for (line, offset) in telemetry_lines(&lander).into_iter().zip(PANEL_TEXT_OFFSETS) {
        painter.text(
            PANEL_ORIGIN + egui::vec2(16.0, offset),
            egui::Align2::LEFT_TOP,
            line,
            egui::FontId::monospace(16.0),
            accent,
        );
    }

    // Fuel gauge
    let bar = egui::Rect::from_min_size(FUEL_BAR_ORIGIN, FUEL_BAR_SIZE);
    painter.rect_filled(bar, egui::Rounding::same(8.0), rgba(HUD_PRIMARY, 70));
    let filled = egui::Rect::from_min_size(
        FUEL_BAR_ORIGIN,
        egui::vec2(
            (FUEL_BAR_SIZE.x * lander.fuel_fraction(&config)).floor(),
            FUEL_BAR_SIZE.y,
        ),
    );
    painter.rect_filled(filled, egui::Rounding::same(8.0), accent);

    // Status banner with a two-pass glitch
    if let Some(banner) = status_banner(lander.status, time.elapsed_secs()) {
        let center_x = config.width() / 2.0;
        let font = egui::FontId::proportional(56.0);
        for (dx, alpha) in [(banner.glitch_offset, 255), (-banner.glitch_offset, 140)] {
            painter.text(
                egui::pos2(center_x + dx, BANNER_Y),
                egui::Align2::CENTER_CENTER,
                banner.text,
                font.clone(),
                rgba(banner.color, alpha),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flying_banner_blinks_on_even_seconds() {
        assert!(status_banner(LandingStatus::Flying, 0.5).is_some());
        assert!(status_banner(LandingStatus::Flying, 1.5).is_none());
        assert!(status_banner(LandingStatus::Flying, 2.1).is_some());
    }

    #[test]
    fn terminal_banners_always_show() {
        let landed = status_banner(LandingStatus::Landed, 1.5).unwrap();
        assert_eq!(landed.text, "Touchdown Achieved");
        assert_eq!(landed.color, SUCCESS);

        let crashed = status_banner(LandingStatus::Crashed, 3.5).unwrap();
        assert_eq!(crashed.text, "Impact Detected");
        assert_eq!(crashed.color, WARNING);
    }

    #[test]
    fn glitch_offset_is_bounded() {
        for step in 0..100 {
            let banner = status_banner(LandingStatus::Landed, step as f32 * 0.037).unwrap();
            assert!(banner.glitch_offset.abs() <= GLITCH_AMPLITUDE);
        }
    }

    #[test]
    fn telemetry_formatting() {
        let config = GameConfig::default();
        let mut lander = Lander::new(&config);
        lander.fuel = 7.3;
        lander.velocity = Vec2::new(-3.0, 41.26);
        lander.angle = 12.0;
        let [fuel, velocity, angle] = telemetry_lines(&lander);
        assert_eq!(fuel, "FUEL 007.3");
        assert_eq!(velocity, "VEL X  -3.0 | Y  41.3");
        assert_eq!(angle, "ANGLE  12.0");
    }
}
