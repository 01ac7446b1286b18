use crossterm::style::Color;

use super::shape::{Align, LOGICAL_HEIGHT, LOGICAL_WIDTH, Rgba, Shape, Surface};

/// How sub-cell pixels are turned into terminal characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    /// Half-block characters ▀ (1x2 pixels per cell, filled shapes look solid)
    HalfBlock,
    /// Unicode braille characters (2x4 dots per cell, sharper outlines)
    Braille,
}

impl RenderMode {
    /// Pixels per terminal cell as (columns, rows).
    pub fn cell_size(self) -> (usize, usize) {
        match self {
            RenderMode::HalfBlock => (1, 2),
            RenderMode::Braille => (2, 4),
        }
    }
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// No color — monochrome
    Mono,
    /// ANSI 16 colors
    Ansi16,
    /// 256-color palette
    Ansi256,
    /// 24-bit true color (RGB)
    TrueColor,
}

/// A text label pinned to one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub color: (u8, u8, u8),
}

/// Rasterizing surface. Logical 600x200 units are stretched over the
/// pixel grid of the terminal area the canvas was created for.
pub struct Canvas {
    /// Width in pixels (sub-cell)
    pub width: usize,
    /// Height in pixels (sub-cell)
    pub height: usize,
    /// Coverage per pixel: 0.0 = untouched, 1.0 = painted
    pub pixels: Vec<f64>,
    /// Per-pixel color
    pub colors: Vec<(u8, u8, u8)>,
    /// Text overlay in terminal-cell coordinates (cols x rows)
    pub glyphs: Vec<Option<Glyph>>,
    pub render_mode: RenderMode,
    pub color_mode: ColorMode,
    /// Color quantization step (0 = off, 4/8/16 = round RGB to nearest N).
    pub color_quant: u8,
    cols: usize,
    rows: usize,
}

impl Canvas {
    pub fn new(
        term_cols: usize,
        term_rows: usize,
        render_mode: RenderMode,
        color_mode: ColorMode,
    ) -> Self {
        let (cw, ch) = render_mode.cell_size();
        let (px_w, px_h) = (term_cols * cw, term_rows * ch);
        let size = px_w * px_h;
        Canvas {
            width: px_w,
            height: px_h,
            pixels: vec![0.0; size],
            colors: vec![(0, 0, 0); size],
            glyphs: vec![None; term_cols * term_rows],
            render_mode,
            color_mode,
            color_quant: 0,
            cols: term_cols,
            rows: term_rows,
        }
    }

    /// Terminal dimensions covered by this canvas
    pub fn term_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Render the canvas to a string buffer for output
    pub fn render(&self) -> String {
        match self.render_mode {
            RenderMode::HalfBlock => super::halfblock::render(self),
            RenderMode::Braille => super::braille::render(self),
        }
    }

    /// Glyph at terminal cell (col, row), if any label covers it.
    #[inline]
    pub fn glyph(&self, col: usize, row: usize) -> Option<Glyph> {
        if col < self.cols && row < self.rows {
            self.glyphs[row * self.cols + col]
        } else {
            None
        }
    }

    fn scale(&self) -> (f64, f64) {
        (
            self.width as f64 / LOGICAL_WIDTH,
            self.height as f64 / LOGICAL_HEIGHT,
        )
    }

    /// Blend a color into one pixel. Out-of-range pixels are ignored.
    #[inline]
    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        let a = color.a.clamp(0.0, 1.0);
        let (or, og, ob) = self.colors[idx];
        let mix = |old: u8, new: u8| (old as f64 * (1.0 - a) + new as f64 * a).round() as u8;
        self.colors[idx] = (mix(or, color.r), mix(og, color.g), mix(ob, color.b));
        self.pixels[idx] = (self.pixels[idx] + a).min(1.0);
    }

    /// Logical point to pixel coordinates.
    fn to_px(&self, x: f64, y: f64) -> (f64, f64) {
        let (sx, sy) = self.scale();
        (x * sx, y * sy)
    }

    /// Pixel range [start, end) covering the logical span [a, b].
    fn span(a: f64, b: f64, scale: f64) -> (i64, i64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let start = (lo * scale).round() as i64;
        let end = ((hi * scale).round() as i64).max(start + 1);
        (start, end)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        let (sx, sy) = self.scale();
        let (x0, x1) = Self::span(x, x + w, sx);
        let (y0, y1) = Self::span(y, y + h, sy);
        for py in y0.max(0)..y1.min(self.height as i64) {
            for px in x0.max(0)..x1.min(self.width as i64) {
                self.blend(px, py, color);
            }
        }
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba, line_width: f64) {
        let (sx, sy) = self.scale();
        let (x0, x1) = Self::span(x, x + w, sx);
        let (y0, y1) = Self::span(y, y + h, sy);
        let tx = ((line_width * sx).round() as i64).max(1);
        let ty = ((line_width * sy).round() as i64).max(1);
        for py in y0..y1 {
            for px in x0..x1 {
                let edge = py < y0 + ty || py >= y1 - ty || px < x0 + tx || px >= x1 - tx;
                if edge {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Fills pixels whose centers fall within `inner..=radius` of the center.
    fn ring(&mut self, cx: f64, cy: f64, inner: f64, radius: f64, color: Rgba) {
        let (sx, sy) = self.scale();
        let (x0, x1) = Self::span(cx - radius, cx + radius, sx);
        let (y0, y1) = Self::span(cy - radius, cy + radius, sy);
        for py in y0.max(0)..y1.min(self.height as i64) {
            for px in x0.max(0)..x1.min(self.width as i64) {
                let lx = (px as f64 + 0.5) / sx - cx;
                let ly = (py as f64 + 0.5) / sy - cy;
                let d = (lx * lx + ly * ly).sqrt();
                if d <= radius && d >= inner {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba) {
        let (x0, y0) = self.to_px(from.0, from.1);
        let (x1, y1) = self.to_px(to.0, to.1);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        let mut last = None;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let px = (x0 + (x1 - x0) * t).floor() as i64;
            let py = (y0 + (y1 - y0) * t).floor() as i64;
            // Avoid double-blending translucent strokes
            if last != Some((px, py)) {
                self.blend(px, py, color);
                last = Some((px, py));
            }
        }
    }

    fn triangle(&mut self, points: [(f64, f64); 3], color: Rgba) {
        let p: Vec<(f64, f64)> = points.iter().map(|&(x, y)| self.to_px(x, y)).collect();
        let min_x = p.iter().map(|q| q.0).fold(f64::INFINITY, f64::min).floor() as i64;
        let max_x = p.iter().map(|q| q.0).fold(f64::NEG_INFINITY, f64::max).ceil() as i64;
        let min_y = p.iter().map(|q| q.1).fold(f64::INFINITY, f64::min).floor() as i64;
        let max_y = p.iter().map(|q| q.1).fold(f64::NEG_INFINITY, f64::max).ceil() as i64;
        let edge = |a: (f64, f64), b: (f64, f64), c: (f64, f64)| {
            (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
        };
        let area = edge(p[0], p[1], p[2]);
        if area.abs() < f64::EPSILON {
            self.line(points[0], points[1], color);
            self.line(points[1], points[2], color);
            return;
        }
        let mut painted = false;
        for py in min_y.max(0)..=max_y.min(self.height as i64 - 1) {
            for px in min_x.max(0)..=max_x.min(self.width as i64 - 1) {
                let c = (px as f64 + 0.5, py as f64 + 0.5);
                let w0 = edge(p[1], p[2], c) / area;
                let w1 = edge(p[2], p[0], c) / area;
                let w2 = edge(p[0], p[1], c) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend(px, py, color);
                    painted = true;
                }
            }
        }
        // Pointer markers can be smaller than a pixel on narrow terminals
        if !painted {
            let cx = (p[0].0 + p[1].0 + p[2].0) / 3.0;
            let cy = (p[0].1 + p[1].1 + p[2].1) / 3.0;
            self.blend(cx.floor() as i64, cy.floor() as i64, color);
        }
    }

    fn quad_curve(&mut self, from: (f64, f64), ctrl: (f64, f64), to: (f64, f64), color: Rgba) {
        const SEGMENTS: usize = 24;
        let point = |t: f64| {
            let u = 1.0 - t;
            (
                u * u * from.0 + 2.0 * u * t * ctrl.0 + t * t * to.0,
                u * u * from.1 + 2.0 * u * t * ctrl.1 + t * t * to.1,
            )
        };
        let mut prev = from;
        for i in 1..=SEGMENTS {
            let next = point(i as f64 / SEGMENTS as f64);
            self.line(prev, next, color);
            prev = next;
        }
    }

    fn text(&mut self, x: f64, y: f64, text: &str, color: Rgba, align: Align) {
        let (cw, ch) = self.render_mode.cell_size();
        let (px, py) = self.to_px(x, y);
        let row = (py / ch as f64).floor() as i64;
        let col = (px / cw as f64).floor() as i64;
        let len = text.chars().count() as i64;
        let start = match align {
            Align::Left => col,
            Align::Center => col - len / 2,
            Align::Right => col - len,
        };
        if row < 0 || row >= self.rows as i64 {
            return;
        }
        for (i, c) in text.chars().enumerate() {
            let cx = start + i as i64;
            if cx < 0 || cx >= self.cols as i64 {
                continue;
            }
            self.glyphs[row as usize * self.cols + cx as usize] = Some(Glyph {
                ch: c,
                color: (color.r, color.g, color.b),
            });
        }
    }

    pub fn map_color(&self, r: u8, g: u8, b: u8) -> Color {
        // Coarser colors repeat more often, which keeps escape output short
        let (r, g, b) = if self.color_quant > 1 {
            let q = self.color_quant as u16;
            let round = |c: u8| ((c as u16 + q / 2) / q * q).min(255) as u8;
            (round(r), round(g), round(b))
        } else {
            (r, g, b)
        };
        match self.color_mode {
            ColorMode::Mono => Color::White,
            ColorMode::TrueColor => Color::Rgb { r, g, b },
            ColorMode::Ansi256 => {
                let idx = 16 + (36 * (r as u16 / 51)) + (6 * (g as u16 / 51)) + (b as u16 / 51);
                Color::AnsiValue(idx as u8)
            }
            ColorMode::Ansi16 => {
                let brightness = (r as u16 + g as u16 + b as u16) / 3;
                let bright = brightness > 150;
                if brightness < 24 {
                    Color::Black
                } else if r > g && r > b {
                    if bright { Color::Red } else { Color::DarkRed }
                } else if g > r && g > b {
                    if bright { Color::Green } else { Color::DarkGreen }
                } else if b > r && b > g {
                    if bright { Color::Blue } else { Color::DarkBlue }
                } else if bright {
                    Color::White
                } else {
                    Color::DarkGrey
                }
            }
        }
    }
}

impl Surface for Canvas {
    fn clear(&mut self) {
        self.pixels.fill(0.0);
        self.colors.fill((0, 0, 0));
        self.glyphs.fill(None);
    }

    fn draw(&mut self, shape: Shape) {
        match shape {
            Shape::FillRect { x, y, w, h, color } => self.fill_rect(x, y, w, h, color),
            Shape::StrokeRect {
                x,
                y,
                w,
                h,
                color,
                line_width,
            } => self.stroke_rect(x, y, w, h, color, line_width),
            Shape::FillCircle {
                cx,
                cy,
                radius,
                color,
            } => self.ring(cx, cy, 0.0, radius, color),
            Shape::StrokeCircle {
                cx,
                cy,
                radius,
                color,
                line_width,
            } => {
                let (sx, sy) = self.scale();
                let min_px = 1.0 / sx.min(sy).max(f64::EPSILON);
                let thickness = line_width.max(min_px);
                self.ring(cx, cy, radius - thickness, radius, color)
            }
            Shape::Line {
                from, to, color, ..
            } => self.line(from, to, color),
            Shape::Triangle { points, color } => self.triangle(points, color),
            Shape::QuadCurve {
                from,
                ctrl,
                to,
                color,
                ..
            } => self.quad_curve(from, ctrl, to, color),
            Shape::Text {
                x,
                y,
                text,
                color,
                align,
            } => self.text(x, y, &text, color, align),
        }
    }
}

pub fn color_to_fg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("38;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("38;5;{}", v),
        Color::Black => "30".into(),
        Color::DarkRed => "31".into(),
        Color::DarkGreen => "32".into(),
        Color::DarkBlue => "34".into(),
        Color::Grey => "37".into(),
        Color::DarkGrey => "90".into(),
        Color::Red => "91".into(),
        Color::Green => "92".into(),
        Color::Blue => "94".into(),
        Color::White => "97".into(),
        _ => "37".into(),
    }
}

pub fn color_to_bg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("48;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("48;5;{}", v),
        Color::Black => "40".into(),
        Color::DarkRed => "41".into(),
        Color::DarkGreen => "42".into(),
        Color::DarkBlue => "44".into(),
        Color::Grey => "47".into(),
        Color::DarkGrey => "100".into(),
        Color::Red => "101".into(),
        Color::Green => "102".into(),
        Color::Blue => "104".into(),
        Color::White => "107".into(),
        _ => "40".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        // 60 cols x 10 rows half-block = 60x20 px, scale 0.1 both ways
        Canvas::new(60, 10, RenderMode::HalfBlock, ColorMode::TrueColor)
    }

    #[test]
    fn test_fill_rect_scales_to_pixels() {
        let mut c = canvas();
        c.draw(Shape::FillRect {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 50.0,
            color: Rgba::rgb(255, 0, 0),
        });
        assert_eq!(c.pixels[0], 1.0);
        assert_eq!(c.colors[0], (255, 0, 0));
        // x = 10px is outside the 100-unit wide rect
        assert_eq!(c.pixels[10], 0.0);
        let painted = c.pixels.iter().filter(|&&p| p > 0.0).count();
        assert_eq!(painted, 10 * 5);
    }

    #[test]
    fn test_off_surface_shapes_are_clipped() {
        let mut c = canvas();
        c.draw(Shape::FillRect {
            x: -500.0,
            y: 900.0,
            w: 100.0,
            h: 100.0,
            color: Rgba::rgb(1, 1, 1),
        });
        c.draw(Shape::Text {
            x: 10_000.0,
            y: 10.0,
            text: "far away".into(),
            color: Rgba::rgb(1, 1, 1),
            align: Align::Center,
        });
        assert!(c.pixels.iter().all(|&p| p == 0.0));
        assert!(c.glyphs.iter().all(Option::is_none));
    }

    #[test]
    fn test_alpha_blends_over_existing_color() {
        let mut c = canvas();
        let rect = |color| Shape::FillRect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
            color,
        };
        c.draw(rect(Rgba::rgb(200, 0, 0)));
        c.draw(rect(Rgba::rgb(0, 0, 200).with_alpha(0.5)));
        assert_eq!(c.colors[0], (100, 0, 100));
    }

    #[test]
    fn test_centered_text_lands_in_cells() {
        let mut c = canvas();
        c.draw(Shape::Text {
            x: 300.0,
            y: 100.0,
            text: "abcd".into(),
            color: Rgba::rgb(9, 9, 9),
            align: Align::Center,
        });
        // x 300 -> px 30 -> col 30; y 100 -> px 10 -> row 5
        assert_eq!(c.glyph(28, 5).map(|g| g.ch), Some('a'));
        assert_eq!(c.glyph(31, 5).map(|g| g.ch), Some('d'));
        assert_eq!(c.glyph(32, 5), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut c = canvas();
        c.draw(Shape::FillCircle {
            cx: 300.0,
            cy: 100.0,
            radius: 40.0,
            color: Rgba::rgb(5, 5, 5),
        });
        assert!(c.pixels.iter().any(|&p| p > 0.0));
        c.clear();
        assert!(c.pixels.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_tiny_triangle_still_marks_a_pixel() {
        let mut c = canvas();
        c.draw(Shape::Triangle {
            points: [(300.0, 100.0), (301.0, 99.0), (302.0, 100.0)],
            color: Rgba::rgb(0, 255, 0),
        });
        assert_eq!(c.pixels.iter().filter(|&&p| p > 0.0).count(), 1);
    }
}
