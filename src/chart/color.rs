use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
    pub const GRAY: Rgba = Rgba([128, 128, 128, 255]);
    pub const LIGHT_GRAY: Rgba = Rgba([170, 170, 170, 255]);
    pub const DARK_GRAY: Rgba = Rgba([85, 85, 85, 255]);
    pub const BLUE: Rgba = Rgba([0, 0, 255, 255]);
    pub const GREEN: Rgba = Rgba([0, 255, 0, 255]);
    pub const RED: Rgba = Rgba([255, 0, 0, 255]);
    pub const YELLOW: Rgba = Rgba([255, 255, 0, 255]);
    pub const CYAN: Rgba = Rgba([0, 255, 255, 255]);
    pub const PURPLE: Rgba = Rgba([128, 0, 128, 255]);
    pub const ORANGE: Rgba = Rgba([255, 128, 0, 255]);
    pub const MAGENTA: Rgba = Rgba([255, 0, 255, 255]);

    pub fn with_opacity(self, opacity: f32) -> Rgba {
        let [r, g, b, _] = self.0;
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([r, g, b, a])
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }
}

/// Popped from the end, so the first author gets magenta.
pub const DEFAULT_PALETTE: [Rgba; 8] = [
    Rgba::BLUE,
    Rgba::GREEN,
    Rgba::RED,
    Rgba::YELLOW,
    Rgba::CYAN,
    Rgba::PURPLE,
    Rgba::ORANGE,
    Rgba::MAGENTA,
];

/// Step function from lines changed to fill opacity.
///
/// With `n` ascending thresholds, a count strictly above `k` of them maps to
/// `k / n`; anything at or below the first threshold is transparent.
pub fn opacity_for(count: u64, thresholds: &[u64]) -> f32 {
    if thresholds.is_empty() {
        return if count > 0 { 1.0 } else { 0.0 };
    }
    let steps = thresholds.iter().filter(|&&t| count > t).count();
    steps as f32 / thresholds.len() as f32
}

/// Gives each author a stable color for the whole render.
#[derive(Debug, Clone)]
pub struct ColorAssigner {
    palette: Vec<Rgba>,
    fallback: Rgba,
    assigned: HashMap<String, Rgba>,
}

impl ColorAssigner {
    pub fn new(palette: Vec<Rgba>, fallback: Rgba) -> Self {
        Self {
            palette,
            fallback,
            assigned: HashMap::new(),
        }
    }

    pub fn color_for(&mut self, author: &str) -> Rgba {
        if let Some(color) = self.assigned.get(author) {
            return *color;
        }
        let color = self.palette.pop().unwrap_or(self.fallback);
        self.assigned.insert(author.to_string(), color);
        color
    }

    pub fn assigned(&self) -> usize {
        self.assigned.len()
    }
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.to_vec(), Rgba::DARK_GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY: [u64; 5] = [0, 1000, 2500, 4000, 5000];

    #[test]
    fn daily_bands() {
        assert_eq!(opacity_for(0, &DAILY), 0.0);
        assert_eq!(opacity_for(1, &DAILY), 0.2);
        assert_eq!(opacity_for(1000, &DAILY), 0.2);
        assert_eq!(opacity_for(1001, &DAILY), 0.4);
        assert_eq!(opacity_for(4500, &DAILY), 0.8);
        assert_eq!(opacity_for(5001, &DAILY), 1.0);
    }

    #[test]
    fn opacity_is_monotonic() {
        let monthly = [0u64, 1500, 3000, 6000, 15000];
        let mut previous = 0.0;
        for count in (0..20_000).step_by(7) {
            let current = opacity_for(count, &monthly);
            assert!(current >= previous, "{count}: {current} < {previous}");
            previous = current;
        }
    }

    #[test]
    fn first_sighting_pops_palette_from_the_end() {
        let mut colors = ColorAssigner::default();
        assert_eq!(colors.color_for("a@x.org"), Rgba::MAGENTA);
        assert_eq!(colors.color_for("b@x.org"), Rgba::ORANGE);
        assert_eq!(colors.color_for("a@x.org"), Rgba::MAGENTA);
        assert_eq!(colors.assigned(), 2);
    }

    #[test]
    fn exhausted_palette_falls_back_to_gray() {
        let mut colors = ColorAssigner::new(vec![Rgba::BLUE], Rgba::DARK_GRAY);
        assert_eq!(colors.color_for("a"), Rgba::BLUE);
        assert_eq!(colors.color_for("b"), Rgba::DARK_GRAY);
        assert_eq!(colors.color_for("c"), Rgba::DARK_GRAY);
        assert_eq!(colors.color_for("a"), Rgba::BLUE);
    }

    #[test]
    fn opacity_scales_alpha() {
        assert_eq!(Rgba::RED.with_opacity(0.0), Rgba([255, 0, 0, 0]));
        assert_eq!(Rgba::RED.with_opacity(0.2).alpha(), 51);
        assert_eq!(Rgba::RED.with_opacity(1.0), Rgba::RED);
    }
}
