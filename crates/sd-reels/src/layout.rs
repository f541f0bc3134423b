//! Machine layout — panel size and placement on screen

use serde::{Deserialize, Serialize};

use sd_core::{Point, Rect, Size};

use crate::config::MachineConfig;

/// Margin of the translucent backdrop around the reel panel
pub const BACKGROUND_MARGIN: f64 = 20.0;

/// Geometry derived from a config and a screen size.
///
/// All rectangles except `origin` are in machine-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineLayout {
    /// Top-left of the machine on screen
    pub origin: Point,
    /// Reel area; also the mask of the reel group
    pub panel: Rect,
    pub background: Rect,
    /// Anchor of the frame and win decorations
    pub decoration_anchor: Point,
}

impl MachineLayout {
    pub fn new(config: &MachineConfig, screen: Size) -> Self {
        let panel_size = Self::panel_size(config);
        let panel = Rect::from_origin_size(Point::ZERO, panel_size);
        Self {
            origin: Point::new(
                screen.width / 2.0 - panel_size.width / 2.0,
                screen.height / 2.0 - panel_size.height / 2.0,
            ),
            panel,
            background: panel.inflate(BACKGROUND_MARGIN),
            decoration_anchor: panel.center(),
        }
    }

    /// `size × symbols` wide, `size × reels + spacing × (reels - 1)` high
    pub fn panel_size(config: &MachineConfig) -> Size {
        let reels = config.reel_count as f64;
        Size::new(
            config.symbol_size * config.symbols_per_reel as f64,
            config.symbol_size * reels + config.reel_spacing * (reels - 1.0).max(0.0),
        )
    }

    /// Screen position of a machine-local point
    pub fn to_screen(&self, local: Point) -> Point {
        local.offset(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_layout() {
        let layout = MachineLayout::new(&MachineConfig::default(), Size::new(1920.0, 1080.0));
        assert_relative_eq!(layout.panel.width, 900.0);
        assert_relative_eq!(layout.panel.height, 630.0);
        assert_relative_eq!(layout.origin.x, 510.0);
        assert_relative_eq!(layout.origin.y, 225.0);
        assert_eq!(layout.background, Rect::new(-20.0, -20.0, 940.0, 670.0));
        assert_eq!(layout.decoration_anchor, Point::new(450.0, 315.0));
        assert_eq!(layout.to_screen(Point::ZERO), layout.origin);
    }
}
