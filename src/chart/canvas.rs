use super::color::Rgba;
use super::layout::{ChartLayout, DrawCommand};
use crate::error::{HeatError, Result};
use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{ImageFormat, Pixel, RgbaImage};
use log::debug;
use std::path::{Path, PathBuf};

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Minimal 2D surface the chart is drawn onto.
pub trait DrawingSurface {
    fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32, stroke: Rgba, fill: Rgba);
    fn text(&mut self, text: &str, x: i32, y: i32, rotation: f32, color: Rgba);
}

pub fn draw<S: DrawingSurface>(layout: &ChartLayout, surface: &mut S) {
    for command in &layout.commands {
        match command {
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                stroke,
                fill,
            } => surface.rectangle(*x, *y, *width, *height, *stroke, *fill),
            DrawCommand::Text {
                text,
                x,
                y,
                rotation,
                color,
            } => surface.text(text, *x, *y, *rotation, *color),
        }
    }
}

pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path)
        .map_err(|e| HeatError::Font(format!("cannot read {}: {e}", path.display())))?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| HeatError::Font(format!("cannot parse {}: {e}", path.display())))
}

/// First readable font among the usual system locations.
pub fn find_system_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// RGBA raster backed by `image`, saved as PNG.
pub struct RasterCanvas {
    image: RgbaImage,
    font: Option<FontVec>,
    font_size: f32,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba(background.0)),
            font: None,
            font_size: 11.0,
        }
    }

    pub fn with_font(mut self, font: FontVec, size: f32) -> Self {
        self.font = Some(font);
        self.font_size = size;
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

impl DrawingSurface for RasterCanvas {
    fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32, stroke: Rgba, fill: Rgba) {
        if width == 0 || height == 0 {
            return;
        }
        let (w, h) = (width as i32, height as i32);
        if fill.alpha() > 0 {
            for py in y + 1..y + h - 1 {
                for px in x + 1..x + w - 1 {
                    blend(&mut self.image, px, py, fill, 1.0);
                }
            }
        }
        for px in x..x + w {
            blend(&mut self.image, px, y, stroke, 1.0);
            blend(&mut self.image, px, y + h - 1, stroke, 1.0);
        }
        for py in y + 1..y + h - 1 {
            blend(&mut self.image, x, py, stroke, 1.0);
            blend(&mut self.image, x + w - 1, py, stroke, 1.0);
        }
    }

    fn text(&mut self, text: &str, x: i32, y: i32, rotation: f32, color: Rgba) {
        let Self {
            image,
            font,
            font_size,
        } = self;
        let Some(font) = font.as_ref() else {
            debug!("No font loaded, skipping label '{text}'");
            return;
        };

        let scale = PxScale::from(*font_size);
        let scaled = font.as_scaled(scale);
        let (sin, cos) = rotation.to_radians().sin_cos();

        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let lx = bounds.min.x + gx as f32;
                let ly = bounds.min.y + gy as f32;
                let px = x + (lx * cos - ly * sin).round() as i32;
                let py = y + (lx * sin + ly * cos).round() as i32;
                blend(image, px, py, color, coverage);
            });
        }
    }
}

fn blend(image: &mut RgbaImage, x: i32, y: i32, color: Rgba, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= image.width() || y as u32 >= image.height() {
        return;
    }
    let alpha = f32::from(color.alpha()) / 255.0 * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let source = image::Rgba(color.with_opacity(alpha).0);
    image.get_pixel_mut(x as u32, y as u32).blend(&source);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl DrawingSurface for Recorder {
        fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32, _: Rgba, _: Rgba) {
            self.calls.push(format!("rect {x},{y} {width}x{height}"));
        }

        fn text(&mut self, text: &str, x: i32, y: i32, rotation: f32, _: Rgba) {
            self.calls.push(format!("text {text} {x},{y} {rotation}"));
        }
    }

    #[test]
    fn draw_replays_commands_in_order() {
        let layout = ChartLayout {
            width: 10,
            height: 10,
            commands: vec![
                DrawCommand::Text {
                    text: "core".to_string(),
                    x: 1,
                    y: 2,
                    rotation: -90.0,
                    color: Rgba::BLACK,
                },
                DrawCommand::Rect {
                    x: 3,
                    y: 4,
                    width: 5,
                    height: 6,
                    stroke: Rgba::LIGHT_GRAY,
                    fill: Rgba::TRANSPARENT,
                },
            ],
        };
        let mut recorder = Recorder::default();
        draw(&layout, &mut recorder);
        assert_eq!(recorder.calls, vec!["text core 1,2 -90", "rect 3,4 5x6"]);
    }

    #[test]
    fn rectangle_fills_inside_and_strokes_border() {
        let mut canvas = RasterCanvas::new(10, 10, Rgba::WHITE);
        canvas.rectangle(2, 2, 4, 4, Rgba::LIGHT_GRAY, Rgba::RED);
        let image = canvas.image();
        assert_eq!(image.get_pixel(2, 2).0, Rgba::LIGHT_GRAY.0);
        assert_eq!(image.get_pixel(5, 5).0, Rgba::LIGHT_GRAY.0);
        assert_eq!(image.get_pixel(3, 3).0, Rgba::RED.0);
        assert_eq!(image.get_pixel(0, 0).0, Rgba::WHITE.0);
    }

    #[test]
    fn transparent_fill_keeps_background() {
        let mut canvas = RasterCanvas::new(10, 10, Rgba::WHITE);
        canvas.rectangle(0, 0, 6, 6, Rgba::LIGHT_GRAY, Rgba::TRANSPARENT);
        assert_eq!(canvas.image().get_pixel(3, 3).0, Rgba::WHITE.0);
    }

    #[test]
    fn shapes_are_clipped_to_the_canvas() {
        let mut canvas = RasterCanvas::new(4, 4, Rgba::WHITE);
        canvas.rectangle(-3, -3, 20, 20, Rgba::BLACK, Rgba::BLUE);
        assert_eq!(canvas.image().get_pixel(1, 1).0, Rgba::BLUE.0);
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut canvas = RasterCanvas::new(8, 8, Rgba::WHITE);
        canvas.text("hello", 0, 0, 0.0, Rgba::BLACK);
        assert!(canvas.image().pixels().all(|p| p.0 == Rgba::WHITE.0));
    }

    #[test]
    fn save_writes_a_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("chart.png");
        RasterCanvas::new(12, 7, Rgba::WHITE).save(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }

    #[test]
    fn unreadable_font_is_a_font_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not-a-font.ttf");
        std::fs::write(&path, b"nope").unwrap();
        assert!(matches!(load_font(&path), Err(HeatError::Font(_))));
    }
}
