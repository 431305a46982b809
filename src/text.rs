//! Text rendering: draws the laid-out blocks with the theme's glyph
//! treatment, plus the divider ornament between the English and Chinese
//! groups. Effects are extra fill passes at pixel offsets, drawn before the
//! main pass so the real glyphs land on top.

use kurbo::Shape as _;

use crate::layout::{CardLayout, TextBlock};
use crate::panel::bezpath_to_cpu;
use crate::theme::{Rgba8, TextEffect, ThemeSpec};

/// Divider length as a fraction of the canvas width, capped in pixels.
const DIVIDER_WIDTH_FRACTION: f64 = 0.4;
const DIVIDER_MAX_WIDTH: f64 = 200.0;
/// 1px divider rows, fading downward.
const DIVIDER_ROWS: u8 = 5;
const DIVIDER_TOP_ALPHA: u8 = 150;
const DIVIDER_ALPHA_STEP: u8 = 30;
/// Flanking dots: radius, horizontal gap from the line ends, and vertical
/// drop from the line top.
const DOT_RADIUS: f64 = 3.0;
const DOT_GAP: f64 = 15.0;
const DOT_DROP: f64 = 8.0;
const DOT_ALPHA: u8 = 180;

/// Draw the divider ornament into the gap between the Latin group (English
/// plus phonetic, if any) and the Chinese block: a short horizontal line
/// fading downward, flanked by a dot at each end. White, centered, drawn
/// before the text so glyphs land on top.
pub fn render_divider(ctx: &mut vello_cpu::RenderContext, layout: &CardLayout, canvas_w: f64) {
    if layout.blocks.len() < 2 {
        return;
    }
    let latin = &layout.blocks[layout.blocks.len() - 2];
    let top = latin.origin.y + f64::from(latin.height) + 4.0;

    let width = (canvas_w * DIVIDER_WIDTH_FRACTION).min(DIVIDER_MAX_WIDTH);
    let x0 = (canvas_w - width) / 2.0;
    let x1 = x0 + width;

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for row in 0..DIVIDER_ROWS {
        let alpha = DIVIDER_TOP_ALPHA - row * DIVIDER_ALPHA_STEP;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, alpha));
        let y = top + f64::from(row);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x0, y, x1, y + 1.0));
    }

    let dot_y = top + DOT_DROP;
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, DOT_ALPHA));
    for cx in [x0 - DOT_GAP, x1 + DOT_GAP] {
        let dot = kurbo::Circle::new((cx, dot_y), DOT_RADIUS).to_path(0.1);
        ctx.fill_path(&bezpath_to_cpu(&dot));
    }
}

pub fn render_text(ctx: &mut vello_cpu::RenderContext, layout: &CardLayout, theme: &ThemeSpec) {
    for block in &layout.blocks {
        match theme.effect {
            TextEffect::Shadow { offset, color } => {
                draw_block(ctx, block, offset, offset, Some(color));
            }
            TextEffect::Stroke { width, color } => {
                // Eight offset passes approximate an outline.
                for (dx, dy) in [
                    (-width, 0.0),
                    (width, 0.0),
                    (0.0, -width),
                    (0.0, width),
                    (-width, -width),
                    (width, -width),
                    (-width, width),
                    (width, width),
                ] {
                    draw_block(ctx, block, dx, dy, Some(color));
                }
            }
            TextEffect::None => {}
        }
        draw_block(ctx, block, 0.0, 0.0, None);
    }
}

/// One fill pass over a block. `override_color` replaces the per-run brush
/// for effect passes.
fn draw_block(
    ctx: &mut vello_cpu::RenderContext,
    block: &TextBlock,
    dx: f64,
    dy: f64,
    override_color: Option<Rgba8>,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        block.origin.x + dx,
        block.origin.y + dy,
    )));
    for (line_i, line) in block.layout.lines().enumerate() {
        let line_dx = block.line_offsets.get(line_i).copied().unwrap_or(0.0);
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            match override_color {
                Some(c) => {
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                }
                None => {
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                }
            }
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x + line_dx,
                y: g.y,
            });
            ctx.glyph_run(&block.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}
