//! Layout engine: wraps and measures the English / phonetic / Chinese text
//! fields, stacks them into a centered block, and derives the panel rect.
//!
//! Wrapping is width-constrained to 80% of the canvas. A field that still
//! exceeds the wrap width (an unbreakable run) shrinks its font size in
//! integer steps, floored at 50% of the requested size. The result is a pure
//! function of its inputs; the shaping contexts are reused scratch state.

use std::borrow::Cow;

use kurbo::{Point, Rect};

use crate::error::{LexicardError, LexicardResult};
use crate::font::{FontSet, ScaledSizes};
use crate::theme::{Rgba8, ThemeSpec};

/// Fraction of the canvas width available to each text field.
pub(crate) const WRAP_FRACTION: f64 = 0.8;
/// Font-size floor as a fraction of the requested size.
pub(crate) const MIN_SIZE_FRACTION: f32 = 0.5;
/// Minimum symmetric margin between the panel rect and the canvas edge.
pub(crate) const MIN_CANVAS_MARGIN: f64 = 12.0;

/// English-to-phonetic gap as a fraction of the phonetic size.
const PHONETIC_GAP_FRACTION: f32 = 0.2;
/// Gap above the Chinese group as a fraction of the Chinese size.
const CHINESE_GAP_FRACTION: f32 = 0.4;

/// RGBA8 brush carried through Parley styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Stateful helper owning the Parley font and layout contexts.
pub struct TextShaper {
    font_cx: parley::FontContext,
    layout_cx: parley::LayoutContext<TextBrush>,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        Self {
            font_cx: parley::FontContext::default(),
            layout_cx: parley::LayoutContext::new(),
        }
    }

    /// Register raw font bytes and return the family name they resolve to.
    pub fn register(&mut self, bytes: &[u8]) -> LexicardResult<String> {
        let families = self
            .font_cx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LexicardError::invalid_configuration("no font families registered from font bytes")
        })?;
        let name = self
            .font_cx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                LexicardError::invalid_configuration("registered font family has no name")
            })?
            .to_string();
        Ok(name)
    }

    fn shape(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        brush: TextBrush,
        max_width_px: f32,
    ) -> LexicardResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LexicardError::render_failure(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(Some(max_width_px));
        layout.align(
            Some(max_width_px),
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

/// One laid-out text field, positioned on the canvas.
pub struct TextBlock {
    pub layout: parley::Layout<TextBrush>,
    /// Per-line horizontal shift that centers each line within the block box.
    pub(crate) line_offsets: Vec<f32>,
    /// Top-left of the block box on the canvas.
    pub origin: Point,
    pub font: vello_cpu::peniko::FontData,
    pub width: f32,
    pub height: f32,
    /// Size actually used after any shrink steps.
    pub size_px: f32,
    /// True when the field still exceeds the wrap width at the size floor.
    pub clipped: bool,
}

impl std::fmt::Debug for TextBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBlock")
            .field("origin", &self.origin)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size_px", &self.size_px)
            .field("clipped", &self.clipped)
            .finish_non_exhaustive()
    }
}

/// Computed geometry for one card: text blocks in draw order plus the panel
/// rect that encloses them.
#[derive(Debug)]
pub struct CardLayout {
    pub panel_rect: Rect,
    pub blocks: Vec<TextBlock>,
}

/// The text fields of one card, in stacking order.
#[derive(Clone, Copy, Debug)]
pub struct CardText<'a> {
    pub english: &'a str,
    pub phonetic: Option<&'a str>,
    pub chinese: &'a str,
}

struct LineExtent {
    min_x: f32,
    width: f32,
}

fn measure_lines(layout: &parley::Layout<TextBrush>) -> (Vec<LineExtent>, f32) {
    let mut extents = Vec::new();
    let mut block_width = 0.0f32;
    for line in layout.lines() {
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            for g in run.glyphs() {
                min_x = min_x.min(g.x);
                max_x = max_x.max(g.x + g.advance);
            }
        }
        let extent = if max_x > min_x {
            LineExtent {
                min_x,
                width: max_x - min_x,
            }
        } else {
            LineExtent {
                min_x: 0.0,
                width: 0.0,
            }
        };
        block_width = block_width.max(extent.width);
        extents.push(extent);
    }
    (extents, block_width)
}

struct FittedField {
    layout: parley::Layout<TextBrush>,
    extents: Vec<LineExtent>,
    width: f32,
    height: f32,
    size_px: f32,
    clipped: bool,
}

/// Shape a field, shrinking the font size in integer steps until the widest
/// line fits `max_w`, floored at 50% of the requested size.
fn fit_field(
    shaper: &mut TextShaper,
    text: &str,
    family: &str,
    requested_px: f32,
    brush: TextBrush,
    max_w: f32,
) -> LexicardResult<FittedField> {
    let floor = (requested_px * MIN_SIZE_FRACTION).ceil().max(1.0);
    let mut size = requested_px.max(1.0);
    loop {
        let layout = shaper.shape(text, family, size, brush, max_w)?;
        let (extents, width) = measure_lines(&layout);
        let fits = width <= max_w;
        if fits || size <= floor {
            let height = layout.height();
            return Ok(FittedField {
                layout,
                extents,
                width,
                height,
                size_px: size,
                clipped: !fits,
            });
        }
        size -= 1.0;
    }
}

fn place_block(field: FittedField, canvas_w: f64, y: f64, font: vello_cpu::peniko::FontData) -> TextBlock {
    let width = field.width;
    let line_offsets = field
        .extents
        .iter()
        .map(|e| (width - e.width) / 2.0 - e.min_x)
        .collect();
    TextBlock {
        layout: field.layout,
        line_offsets,
        origin: Point::new((canvas_w - f64::from(width)) / 2.0, y),
        font,
        width,
        height: field.height,
        size_px: field.size_px,
        clipped: field.clipped,
    }
}

/// Compute the full card geometry: wrapped fields stacked English →
/// phonetic → Chinese, centered on the canvas, plus the theme-padded panel
/// rect clamped inside the canvas margin.
pub fn layout_card(
    shaper: &mut TextShaper,
    canvas_w: u32,
    canvas_h: u32,
    text: &CardText<'_>,
    fonts: &FontSet,
    sizes: &ScaledSizes,
    theme: &ThemeSpec,
) -> LexicardResult<CardLayout> {
    if canvas_w == 0 || canvas_h == 0 {
        return Err(LexicardError::invalid_geometry(
            "canvas dimensions must be > 0",
        ));
    }

    let max_w = (f64::from(canvas_w) * WRAP_FRACTION) as f32;
    let brush = TextBrush::from(theme.text_color);

    let english = fit_field(shaper, text.english, &fonts.en.family, sizes.en, brush, max_w)?;
    let phonetic = match text.phonetic {
        Some(p) if !p.is_empty() => Some(fit_field(
            shaper,
            p,
            &fonts.en.family,
            sizes.phonetic,
            brush,
            max_w,
        )?),
        _ => None,
    };
    let chinese = fit_field(shaper, text.chinese, &fonts.cn.family, sizes.cn, brush, max_w)?;

    let phonetic_gap = PHONETIC_GAP_FRACTION * sizes.phonetic;
    let chinese_gap = CHINESE_GAP_FRACTION * sizes.cn;

    let mut total_h = english.height + chinese.height + chinese_gap;
    if let Some(p) = &phonetic {
        total_h += p.height + phonetic_gap;
    }

    let canvas_w_f = f64::from(canvas_w);
    let mut y = (f64::from(canvas_h) - f64::from(total_h)) / 2.0;

    let mut blocks = Vec::with_capacity(3);
    let en_block = place_block(english, canvas_w_f, y, fonts.en.data.clone());
    y += f64::from(en_block.height);
    blocks.push(en_block);

    if let Some(p) = phonetic {
        y += f64::from(phonetic_gap);
        let block = place_block(p, canvas_w_f, y, fonts.en.data.clone());
        y += f64::from(block.height);
        blocks.push(block);
    }

    y += f64::from(chinese_gap);
    blocks.push(place_block(chinese, canvas_w_f, y, fonts.cn.data.clone()));

    let mut content: Option<Rect> = None;
    for b in &blocks {
        let r = Rect::new(
            b.origin.x,
            b.origin.y,
            b.origin.x + f64::from(b.width),
            b.origin.y + f64::from(b.height),
        );
        content = Some(match content {
            Some(c) => c.union(r),
            None => r,
        });
    }
    let content = content.unwrap_or_default();

    let padded = content.inflate(theme.padding, theme.padding);
    let panel_rect = Rect::new(
        padded.x0.max(MIN_CANVAS_MARGIN),
        padded.y0.max(MIN_CANVAS_MARGIN),
        padded.x1.min(canvas_w_f - MIN_CANVAS_MARGIN),
        padded.y1.min(f64::from(canvas_h) - MIN_CANVAS_MARGIN),
    );

    Ok(CardLayout { panel_rect, blocks })
}
