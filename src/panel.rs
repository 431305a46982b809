//! Panel rendering: the translucent backdrop drawn behind the card text.
//!
//! The outline is built in panel-local coordinates and filled via a transform,
//! so the same path works for every fill variant. The blurred fill samples the
//! prepared background underneath the panel rect, blurs that region, and
//! paints it back through the outline.

use std::sync::Arc;

use kurbo::{BezPath, Rect, RoundedRect, Shape};

use crate::blur::gaussian_blur_premul;
use crate::error::{LexicardError, LexicardResult};
use crate::theme::{BackgroundStyle, CornerStyle, PanelFill, Rgba8, ThemeSpec};

/// Corner radius for rounded panels, in pixels.
const CORNER_RADIUS: f64 = 30.0;
/// Wave amplitude as a fraction of the panel width, clamped to [6, 28] px.
const WAVE_AMPLITUDE_FRACTION: f64 = 0.03;
const WAVE_AMPLITUDE_MIN: f64 = 6.0;
const WAVE_AMPLITUDE_MAX: f64 = 28.0;
/// Polyline samples per wavy edge.
const WAVE_SAMPLES: usize = 64;
/// Blur parameters for the blurred panel fill.
const PANEL_BLUR_RADIUS: u32 = 8;
const PANEL_BLUR_SIGMA: f32 = 4.0;
/// Contrast overlay painted on top of the blurred region.
const BLUR_OVERLAY: Rgba8 = Rgba8::new(0, 0, 0, 60);

/// The prepared background the panel is composited over: premultiplied RGBA8
/// at canvas size.
pub struct Backdrop {
    pub width: u32,
    pub height: u32,
    pub premul: Vec<u8>,
}

/// Panel silhouette in panel-local coordinates (origin at the rect's
/// top-left).
pub fn outline_path(
    style: BackgroundStyle,
    corners: CornerStyle,
    width: f64,
    height: f64,
) -> BezPath {
    match style {
        BackgroundStyle::Rectangle => match corners {
            CornerStyle::Square => Rect::new(0.0, 0.0, width, height).to_path(0.1),
            CornerStyle::Rounded => {
                let radius = CORNER_RADIUS.min(width / 2.0).min(height / 2.0);
                RoundedRect::new(0.0, 0.0, width, height, radius).to_path(0.1)
            }
        },
        BackgroundStyle::Wave => wave_path(width, height),
    }
}

/// Closed polyline with a cosine top and bottom edge. The crest sits at the
/// horizontal center; the waves stay inside the panel rect.
fn wave_path(width: f64, height: f64) -> BezPath {
    let amplitude = (width * WAVE_AMPLITUDE_FRACTION)
        .clamp(WAVE_AMPLITUDE_MIN, WAVE_AMPLITUDE_MAX)
        .min(height / 4.0);
    let wavelength = (width / 2.0).max(1.0);
    let center_x = width / 2.0;
    let phase = |x: f64| (std::f64::consts::TAU * (x - center_x) / wavelength).cos();

    let mut path = BezPath::new();
    for i in 0..=WAVE_SAMPLES {
        let x = width * i as f64 / WAVE_SAMPLES as f64;
        let y = amplitude * (1.0 - phase(x));
        if i == 0 {
            path.move_to((x, y));
        } else {
            path.line_to((x, y));
        }
    }
    for i in (0..=WAVE_SAMPLES).rev() {
        let x = width * i as f64 / WAVE_SAMPLES as f64;
        let y = height - amplitude * (1.0 - phase(x));
        path.line_to((x, y));
    }
    path.close_path();
    path
}

/// Draw the panel for one card into `ctx`, which renders the overlay that is
/// later composited onto the backdrop.
pub fn render_panel(
    ctx: &mut vello_cpu::RenderContext,
    backdrop: &Backdrop,
    rect: Rect,
    theme: &ThemeSpec,
    style: BackgroundStyle,
) -> LexicardResult<()> {
    if matches!(theme.fill, PanelFill::None) {
        return Ok(());
    }

    let w = rect.width();
    let h = rect.height();
    if !w.is_finite() || !h.is_finite() || w < 1.0 || h < 1.0 {
        return Err(LexicardError::invalid_geometry(format!(
            "panel rect {w:.1}x{h:.1} is degenerate"
        )));
    }

    let path = bezpath_to_cpu(&outline_path(style, theme.corners, w, h));
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((rect.x0, rect.y0)));

    match theme.fill {
        PanelFill::Solid(c) => {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            ctx.fill_path(&path);
        }
        PanelFill::Gradient { top, bottom } => {
            let img = gradient_image(top, bottom, w.ceil() as u32, h.ceil() as u32)?;
            ctx.set_paint(img);
            ctx.fill_path(&path);
        }
        PanelFill::Blurred => {
            let (region, rw, rh) = extract_region(backdrop, rect)?;
            let blurred = gaussian_blur_premul(&region, rw, rh, PANEL_BLUR_RADIUS, PANEL_BLUR_SIGMA)?;
            let img = premul_image(&blurred, rw, rh)?;
            ctx.set_paint(img);
            ctx.fill_path(&path);
            let c = BLUR_OVERLAY;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            ctx.fill_path(&path);
        }
        PanelFill::None => {}
    }
    Ok(())
}

/// Copy the integer pixel region under `rect` out of the backdrop, clamped to
/// the canvas.
fn extract_region(backdrop: &Backdrop, rect: Rect) -> LexicardResult<(Vec<u8>, u32, u32)> {
    let x0 = rect.x0.floor().max(0.0) as u32;
    let y0 = rect.y0.floor().max(0.0) as u32;
    let x1 = (rect.x1.ceil() as u32).min(backdrop.width);
    let y1 = (rect.y1.ceil() as u32).min(backdrop.height);
    if x1 <= x0 || y1 <= y0 {
        return Err(LexicardError::invalid_geometry(
            "panel rect lies outside the canvas",
        ));
    }
    let (rw, rh) = (x1 - x0, y1 - y0);
    let stride = backdrop.width as usize * 4;
    let mut out = Vec::with_capacity(rw as usize * rh as usize * 4);
    for y in y0..y1 {
        let row = y as usize * stride;
        out.extend_from_slice(&backdrop.premul[row + x0 as usize * 4..row + x1 as usize * 4]);
    }
    Ok((out, rw, rh))
}

/// Vertical gradient between two straight-alpha colors, baked to a
/// premultiplied image paint.
fn gradient_image(top: Rgba8, bottom: Rgba8, w: u32, h: u32) -> LexicardResult<vello_cpu::Image> {
    let w = w.max(1);
    let h = h.max(1);
    let mut bytes = vec![0u8; w as usize * h as usize * 4];
    let h1 = (h - 1).max(1) as f32;
    for y in 0..h {
        let t = if h == 1 { 0.0 } else { y as f32 / h1 };
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        let a = lerp(top.a, bottom.a);
        let premul = |v: u8| ((v as u16 * a as u16 + 127) / 255) as u8;
        let px = [
            premul(lerp(top.r, bottom.r)),
            premul(lerp(top.g, bottom.g)),
            premul(lerp(top.b, bottom.b)),
            a,
        ];
        let row = y as usize * w as usize * 4;
        for chunk in bytes[row..row + w as usize * 4].chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }
    premul_image(&bytes, w, h)
}

/// Wrap premultiplied RGBA8 bytes as an image paint.
fn premul_image(bytes: &[u8], width: u32, height: u32) -> LexicardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LexicardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LexicardError::invalid_geometry("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LexicardError::invalid_geometry("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(LexicardError::invalid_geometry("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
