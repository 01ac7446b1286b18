use super::canvas::{Canvas, ColorMode, color_to_fg};

/// Braille dot positions within a 2x4 cell:
/// (0,0) (1,0)    dot1 dot4
/// (0,1) (1,1)    dot2 dot5
/// (0,2) (1,2)    dot3 dot6
/// (0,3) (1,3)    dot7 dot8
///
/// Unicode braille: U+2800 + dot_bits
const BRAILLE_OFFSET: u32 = 0x2800;
const DOT_MAP: [(usize, usize, u32); 8] = [
    (0, 0, 0x01),
    (0, 1, 0x02),
    (0, 2, 0x04),
    (1, 0, 0x08),
    (1, 1, 0x10),
    (1, 2, 0x20),
    (0, 3, 0x40),
    (1, 3, 0x80),
];

/// Translucent tints (alpha 0.2) fall under this and stay as empty dots,
/// so only solid shapes and outlines show up in braille.
const THRESHOLD: f64 = 0.3;

pub fn render(canvas: &Canvas) -> String {
    let (term_cols, term_rows) = canvas.term_size();
    let mut out = String::with_capacity(term_cols * term_rows * 20);
    let colored = canvas.color_mode != ColorMode::Mono;

    for row in 0..term_rows {
        for col in 0..term_cols {
            if let Some(glyph) = canvas.glyph(col, row) {
                if colored {
                    let color = canvas.map_color(glyph.color.0, glyph.color.1, glyph.color.2);
                    out.push_str(&format!("\x1b[{}m{}", color_to_fg(color), glyph.ch));
                } else {
                    out.push(glyph.ch);
                }
                continue;
            }

            let (px, py) = (col * 2, row * 4);
            let mut bits: u32 = 0;
            let (mut total_r, mut total_g, mut total_b, mut lit) = (0u32, 0u32, 0u32, 0u32);

            for &(dx, dy, bit) in &DOT_MAP {
                let (x, y) = (px + dx, py + dy);
                if x < canvas.width && y < canvas.height {
                    let idx = y * canvas.width + x;
                    if canvas.pixels[idx] > THRESHOLD {
                        bits |= bit;
                        let (r, g, b) = canvas.colors[idx];
                        total_r += r as u32;
                        total_g += g as u32;
                        total_b += b as u32;
                        lit += 1;
                    }
                }
            }

            let ch = char::from_u32(BRAILLE_OFFSET + bits).unwrap_or(' ');
            if colored && lit > 0 {
                let color = canvas.map_color(
                    (total_r / lit) as u8,
                    (total_g / lit) as u8,
                    (total_b / lit) as u8,
                );
                out.push_str(&format!("\x1b[{}m{}", color_to_fg(color), ch));
            } else {
                out.push(ch);
            }
        }
        if colored {
            out.push_str("\x1b[0m");
        }
        out.push_str(&format!("\x1b[{};1H", row + 2));
    }
    out
}
