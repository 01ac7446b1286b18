use super::canvas::{Canvas, ColorMode, color_to_bg, color_to_fg};

/// Coverage below which a half-block pixel is left as terminal background.
/// Translucent tints start around 0.2, so anything under that is noise.
const DARK_THRESHOLD: f64 = 0.02;

/// Tracks the active SGR colors so repeated cells don't re-emit escapes.
#[derive(Default)]
struct Pen {
    fg: String,
    bg: String,
    active: bool,
}

impl Pen {
    fn set(&mut self, out: &mut String, fg: String, bg: String) {
        let fg_changed = fg != self.fg;
        let bg_changed = bg != self.bg;
        if fg_changed && bg_changed {
            out.push_str(&format!("\x1b[{};{}m", fg, bg));
        } else if fg_changed {
            out.push_str(&format!("\x1b[{}m", fg));
        } else if bg_changed {
            out.push_str(&format!("\x1b[{}m", bg));
        }
        self.fg = fg;
        self.bg = bg;
        self.active = true;
    }

    fn reset(&mut self, out: &mut String) {
        if self.active {
            out.push_str("\x1b[0m");
            self.active = false;
            self.fg.clear();
            self.bg.clear();
        }
    }
}

pub fn render(canvas: &Canvas) -> String {
    let (term_cols, term_rows) = canvas.term_size();
    let mut out = String::with_capacity(term_cols * term_rows * 10);
    let mut pen = Pen::default();
    let mono = canvas.color_mode == ColorMode::Mono;

    for row in 0..term_rows {
        for col in 0..term_cols {
            let top_idx = row * 2 * canvas.width + col;
            let bot_idx = (row * 2 + 1) * canvas.width + col;
            let top_lit = canvas.pixels[top_idx] >= DARK_THRESHOLD;
            let bot_lit = canvas.pixels[bot_idx] >= DARK_THRESHOLD;

            if let Some(glyph) = canvas.glyph(col, row) {
                if mono {
                    out.push(glyph.ch);
                    continue;
                }
                // Text sits on whatever the shape underneath blends to
                let fg = color_to_fg(canvas.map_color(glyph.color.0, glyph.color.1, glyph.color.2));
                let bg = if top_lit || bot_lit {
                    let (tr, tg, tb) = canvas.colors[top_idx];
                    let (br, bgc, bb) = canvas.colors[bot_idx];
                    let avg = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
                    color_to_bg(canvas.map_color(avg(tr, br), avg(tg, bgc), avg(tb, bb)))
                } else {
                    "49".to_string()
                };
                pen.set(&mut out, fg, bg);
                out.push(glyph.ch);
                continue;
            }

            if mono {
                match (top_lit, bot_lit) {
                    (true, true) => out.push('█'),
                    (true, false) => out.push('▀'),
                    (false, true) => out.push('▄'),
                    (false, false) => out.push(' '),
                }
            } else if !top_lit && !bot_lit {
                pen.reset(&mut out);
                out.push(' ');
            } else {
                let (tr, tg, tb) = canvas.colors[top_idx];
                let (br, bg, bb) = canvas.colors[bot_idx];
                if top_lit {
                    let fg = color_to_fg(canvas.map_color(tr, tg, tb));
                    let bg = if bot_lit {
                        color_to_bg(canvas.map_color(br, bg, bb))
                    } else {
                        "49".to_string()
                    };
                    pen.set(&mut out, fg, bg);
                    out.push('▀');
                } else {
                    // Only the lower half is lit: lower block in fg over default bg
                    let fg = color_to_fg(canvas.map_color(br, bg, bb));
                    pen.set(&mut out, fg, "49".to_string());
                    out.push('▄');
                }
            }
        }
        pen.reset(&mut out);
        // Cursor addressing instead of \n so a full-width row never wraps
        out.push_str(&format!("\x1b[{};1H", row + 2));
    }
    out
}
