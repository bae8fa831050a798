//! Text drawn on an off-screen surface and sampled into particles.

use glam::{vec3, Vec3};
use log::{debug, warn};

use super::{random::seeded, PointCloud};

/// Alpha coverage produced by a [`Rasterizer`], row-major.
#[derive(Debug, Clone, Default)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub alpha: Vec<u8>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.alpha[y * self.width + x]
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for yy in y..(y + h).min(self.height) {
            for xx in x..(x + w).min(self.width) {
                self.alpha[yy * self.width + xx] = u8::MAX;
            }
        }
    }
}

/// Off-screen 2D drawing surface.
pub trait Rasterizer {
    fn rasterize(&self, lines: &[&str]) -> Mask;
}

/// Fits the rasterized text into this box, in world units.
const MAX_WIDTH: f32 = 22.0;
const MAX_HEIGHT: f32 = 9.0;
const SAMPLE_STRIDE: usize = 2;
const ALPHA_THRESHOLD: u8 = 128;
const JITTER: f32 = 0.06;

/// Samples `text` into `count` particles.
///
/// Without a rasterizer the result is all zeros. Sampled pixels are reused
/// modulo their count, each reuse nudged by a small jitter.
pub fn text(text: &str, count: usize, rasterizer: Option<&dyn Rasterizer>) -> PointCloud {
    let mut cloud = PointCloud::zeroed(count);
    let rasterizer = match rasterizer {
        Some(r) => r,
        None => {
            warn!("No rasterizer available, text shape left empty");
            return cloud;
        }
    };

    let lines: Vec<&str> = text.lines().collect();
    let mask = rasterizer.rasterize(&lines);
    let pixels = sample(&mask);
    debug!("Sampled {} text pixels from a {}x{} mask", pixels.len(), mask.width, mask.height);
    if pixels.is_empty() {
        return cloud;
    }

    let scale = (MAX_WIDTH / mask.width as f32).min(MAX_HEIGHT / mask.height as f32);
    for i in 0..count {
        let (px, py) = pixels[i % pixels.len()];
        let base = vec3(
            (px as f32 - mask.width as f32 * 0.5) * scale,
            (mask.height as f32 * 0.5 - py as f32) * scale,
            0.0,
        );
        let jitter = Vec3::new(seeded(i, 11), seeded(i, 12), seeded(i, 13)) - 0.5;
        cloud.set_point(i, base + jitter * JITTER * 2.0);
    }
    cloud
}

fn sample(mask: &Mask) -> Vec<(usize, usize)> {
    let mut pixels = Vec::new();
    for y in (0..mask.height).step_by(SAMPLE_STRIDE) {
        for x in (0..mask.width).step_by(SAMPLE_STRIDE) {
            if mask.get(x, y) > ALPHA_THRESHOLD {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

/// 3x5 bitmap font surface; every glyph cell becomes a `scale`-sized square.
#[derive(Debug, Copy, Clone)]
pub struct BitmapCanvas {
    pub scale: usize,
}

impl Default for BitmapCanvas {
    fn default() -> Self {
        Self { scale: 6 }
    }
}

const GLYPH_W: usize = 3;
const GLYPH_H: usize = 5;
const ADVANCE: usize = GLYPH_W + 1;
const LINE_HEIGHT: usize = GLYPH_H + 2;
const PADDING: usize = 1;

impl Rasterizer for BitmapCanvas {
    fn rasterize(&self, lines: &[&str]) -> Mask {
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if columns == 0 {
            return Mask::default();
        }
        let s = self.scale.max(1);
        let width = (columns * ADVANCE - 1 + PADDING * 2) * s;
        let height = (lines.len() * LINE_HEIGHT - 2 + PADDING * 2) * s;
        let mut mask = Mask::new(width, height);

        for (row, line) in lines.iter().enumerate() {
            // Center each line horizontally.
            let len = line.chars().count();
            let indent = (columns - len) * ADVANCE / 2;
            for (col, ch) in line.chars().enumerate() {
                let Some(rows) = glyph(ch) else { continue };
                let ox = PADDING + indent + col * ADVANCE;
                let oy = PADDING + row * LINE_HEIGHT;
                for (gy, bits) in rows.iter().enumerate() {
                    for gx in 0..GLYPH_W {
                        if bits & (0b100 >> gx) != 0 {
                            mask.fill_rect((ox + gx) * s, (oy + gy) * s, s, s);
                        }
                    }
                }
            }
        }
        mask
    }
}

fn glyph(ch: char) -> Option<[u8; GLYPH_H]> {
    let rows = match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b111, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rasterizer_yields_zeros() {
        let cloud = text("HELLO", 321, None);
        assert_eq!(cloud.len(), 321 * 3);
        assert!(cloud.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn blank_text_yields_zeros() {
        let canvas = BitmapCanvas::default();
        let cloud = text("   ", 50, Some(&canvas));
        assert!(cloud.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn text_fits_its_box_and_reuses_pixels_with_jitter() {
        let canvas = BitmapCanvas::default();
        let cloud = text("HI\nTHERE", 5000, Some(&canvas));
        for i in 0..cloud.count() {
            let p = cloud.point(i);
            assert!(p.x.abs() <= MAX_WIDTH * 0.5 + JITTER);
            assert!(p.y.abs() <= MAX_HEIGHT * 0.5 + JITTER);
        }
        // More particles than pixels: reused pixels must not coincide exactly.
        let pixels = sample(&canvas.rasterize(&["HI", "THERE"])).len();
        assert!(pixels < 5000);
        assert_ne!(cloud.point(0), cloud.point(pixels));
    }

    #[test]
    fn lines_are_centered() {
        let mask = BitmapCanvas { scale: 1 }.rasterize(&["I", "III"]);
        // "I" on the first line sits under the middle glyph of "III".
        let first_lit = (0..mask.width).find(|&x| mask.get(x, PADDING) > 0);
        assert_eq!(first_lit, Some(PADDING + ADVANCE));
    }
}
