//! Colors for game elements

use super::Color;

pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
pub const TEXT_DIM: Color = [0.8, 0.8, 0.85, 0.9];
pub const HIGHLIGHT: Color = [1.0, 0.84, 0.2, 1.0];
pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.55];

// Slip Runner
pub const RINK_ROLLER: Color = [0.45, 0.42, 0.4, 1.0];
pub const RINK_ICE: Color = [0.82, 0.92, 0.98, 1.0];
pub const SKATER: Color = [0.9, 0.25, 0.3, 1.0];
pub const SKATER_BUFFED: Color = [0.3, 0.75, 0.35, 1.0];
pub const SPEED_LINE: Color = [1.0, 0.85, 0.2, 0.8];
pub const CRACK: Color = [0.35, 0.45, 0.55, 0.6];
pub const SPIKE_SHOE: Color = [0.55, 0.3, 0.75, 1.0];
pub const TRAIL: Color = [1.0, 1.0, 1.0, 0.5];
pub const BALANCE_BAR: Color = [0.2, 0.8, 0.4, 1.0];
pub const BALANCE_LOW: Color = [0.95, 0.3, 0.2, 1.0];
pub const BAR_BACK: Color = [0.1, 0.1, 0.12, 0.7];

// Carpet Flight
pub const SKY: Color = [0.45, 0.68, 0.92, 1.0];
pub const CARPET: Color = [0.75, 0.2, 0.3, 1.0];
pub const CARPET_BOOST: Color = [1.0, 0.55, 0.1, 1.0];
pub const BIRD: Color = [0.2, 0.2, 0.25, 1.0];
pub const BALLOON: Color = [0.95, 0.4, 0.6, 1.0];
pub const TOWER: Color = [0.55, 0.45, 0.35, 1.0];
pub const STORM_CLOUD: Color = [0.35, 0.35, 0.45, 1.0];
pub const SPOOL: Color = [0.95, 0.8, 0.3, 1.0];
pub const WIND: Color = [1.0, 1.0, 1.0, 0.18];

// Glare Guard
pub const COUNTER: Color = [0.3, 0.2, 0.15, 1.0];
pub const ROLL: Color = [0.95, 0.95, 0.9, 1.0];
pub const ROLL_NORI: Color = [0.1, 0.2, 0.12, 1.0];
pub const GUARD: Color = [0.25, 0.45, 0.85, 1.0];
pub const GLARE_CONE: Color = [1.0, 0.95, 0.5, 0.25];
pub const GLARE_FLASH: Color = [1.0, 0.95, 0.5, 0.6];
pub const LUCKY: Color = [0.3, 0.9, 0.45, 0.35];
pub const THIEF: Color = [0.15, 0.15, 0.2, 1.0];
pub const THIEF_SURPRISED: Color = [0.95, 0.75, 0.2, 1.0];
pub const POPUP: Color = [1.0, 1.0, 0.6, 1.0];
pub const POPUP_COMBO: Color = [1.0, 0.5, 0.2, 1.0];

/// Same color with a new alpha
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string for canvas fill and stroke styles
pub fn css(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_string() {
        assert_eq!(css([1.0, 0.0, 0.5, 0.25]), "rgba(255, 0, 128, 0.250)");
        assert_eq!(css([2.0, -1.0, 0.0, 1.0]), "rgba(255, 0, 0, 1.000)");
    }
}
