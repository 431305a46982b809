//! Single-card rendering: background preparation, overlay rasterization, and
//! the final composite.
//!
//! The panel and text are drawn into a transparent overlay pixmap, then
//! source-over composited onto the prepared (resized, dimmed, premultiplied)
//! background. The output is straight-alpha RGBA8 at canvas size.

use std::path::Path;

use crate::device::DeviceProfile;
use crate::error::{LexicardError, LexicardResult};
use crate::font::{FontSet, ScaledSizes};
use crate::layout::{CardText, TextShaper, layout_card};
use crate::panel::{Backdrop, render_panel};
use crate::pixel::{dim_in_place, over_in_place, premultiply_in_place, unpremultiply_in_place};
use crate::text::{render_divider, render_text};
use crate::theme::{BackgroundStyle, Theme};
use crate::words::WordEntry;

/// A finished card: straight-alpha RGBA8 pixels at canvas size.
#[derive(Debug)]
pub struct CardImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Everything needed to render one card.
pub struct RenderJob<'a> {
    pub entry: &'a WordEntry,
    pub phonetic: Option<&'a str>,
    pub background: &'a Path,
    pub profile: DeviceProfile,
    pub theme: Theme,
    pub style: BackgroundStyle,
    pub fonts: &'a FontSet,
    pub sizes: ScaledSizes,
}

pub fn render_card(shaper: &mut TextShaper, job: &RenderJob<'_>) -> LexicardResult<CardImage> {
    let decoded = image::open(job.background).map_err(|e| {
        LexicardError::unreadable_image(job.background.display().to_string(), e.to_string())
    })?;

    // Cover-fit to the device target, keeping aspect by center-cropping.
    let decoded = match job.profile.target {
        Some((tw, th)) => {
            decoded.resize_to_fill(tw, th, image::imageops::FilterType::Lanczos3)
        }
        None => decoded,
    };

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(LexicardError::unreadable_image(
            job.background.display().to_string(),
            "image has zero dimensions",
        ));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(LexicardError::invalid_geometry(format!(
            "canvas {width}x{height} exceeds the raster limit"
        )));
    }

    let spec = job.theme.spec();
    let mut premul = rgba.into_raw();
    premultiply_in_place(&mut premul);
    dim_in_place(&mut premul, spec.dim);
    let mut backdrop = Backdrop {
        width,
        height,
        premul,
    };

    let text = CardText {
        english: &job.entry.english,
        phonetic: job.phonetic,
        chinese: &job.entry.chinese,
    };
    let layout = layout_card(shaper, width, height, &text, job.fonts, &job.sizes, &spec)?;

    let mut ctx = vello_cpu::RenderContext::new(width as u16, height as u16);
    render_panel(&mut ctx, &backdrop, layout.panel_rect, &spec, job.style)?;
    if spec.decoration {
        render_divider(&mut ctx, &layout, f64::from(width));
    }
    render_text(&mut ctx, &layout, &spec);
    ctx.flush();

    let mut overlay = vello_cpu::Pixmap::new(width as u16, height as u16);
    ctx.render_to_pixmap(&mut overlay);

    over_in_place(&mut backdrop.premul, overlay.data_as_u8_slice())?;

    let mut rgba = backdrop.premul;
    unpremultiply_in_place(&mut rgba);
    Ok(CardImage {
        width,
        height,
        rgba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontSpec, HostOs, Script, load_font_set, resolve_font_bytes};

    fn write_test_background(dir: &Path, name: &str, w: u32, h: u32) -> std::path::PathBuf {
        let img = image::RgbaImage::from_fn(w, h, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
        });
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    fn setup(shaper: &mut TextShaper) -> Option<(FontSet, ScaledSizes)> {
        resolve_font_bytes(None, HostOs::current(), Script::Latin)
            .ok()
            .flatten()?;
        let spec = FontSpec {
            size_en: 60,
            size_cn: 45,
            ..FontSpec::default()
        };
        let fonts = load_font_set(shaper, &spec, HostOs::current()).ok()?;
        Some((fonts, spec.scaled(1.0)))
    }

    #[test]
    fn renders_at_background_size_in_auto_mode() {
        let mut shaper = TextShaper::new();
        let Some((fonts, sizes)) = setup(&mut shaper) else {
            eprintln!("skipping: no system font available");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let bg = write_test_background(dir.path(), "bg.png", 640, 480);
        let entry = WordEntry {
            english: "apple".into(),
            chinese: "苹果".into(),
        };
        let card = render_card(
            &mut shaper,
            &RenderJob {
                entry: &entry,
                phonetic: None,
                background: &bg,
                profile: crate::device::DeviceMode::Auto.resolve(),
                theme: Theme::Standard,
                style: BackgroundStyle::Rectangle,
                fonts: &fonts,
                sizes,
            },
        )
        .unwrap();
        assert_eq!((card.width, card.height), (640, 480));
        assert_eq!(card.rgba.len(), 640 * 480 * 4);
    }

    #[test]
    fn mobile_profile_resizes_to_portrait_target() {
        let mut shaper = TextShaper::new();
        let Some((fonts, sizes)) = setup(&mut shaper) else {
            eprintln!("skipping: no system font available");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let bg = write_test_background(dir.path(), "bg.png", 400, 300);
        let entry = WordEntry {
            english: "book".into(),
            chinese: "书".into(),
        };
        let profile = crate::device::DeviceMode::Mobile.resolve();
        let card = render_card(
            &mut shaper,
            &RenderJob {
                entry: &entry,
                phonetic: Some("/bʊk/"),
                background: &bg,
                profile,
                theme: Theme::Focus,
                style: BackgroundStyle::Wave,
                fonts: &fonts,
                sizes,
            },
        )
        .unwrap();
        assert_eq!((card.width, card.height), (1080, 1920));
    }

    #[test]
    fn output_alpha_is_opaque_for_opaque_backgrounds() {
        let mut shaper = TextShaper::new();
        let Some((fonts, sizes)) = setup(&mut shaper) else {
            eprintln!("skipping: no system font available");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let bg = write_test_background(dir.path(), "bg.png", 320, 240);
        let entry = WordEntry {
            english: "sun".into(),
            chinese: "太阳".into(),
        };
        let card = render_card(
            &mut shaper,
            &RenderJob {
                entry: &entry,
                phonetic: None,
                background: &bg,
                profile: crate::device::DeviceMode::Auto.resolve(),
                theme: Theme::Dark,
                style: BackgroundStyle::Rectangle,
                fonts: &fonts,
                sizes,
            },
        )
        .unwrap();
        assert!(card.rgba.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn missing_background_is_unreadable_image() {
        let mut shaper = TextShaper::new();
        let Some((fonts, sizes)) = setup(&mut shaper) else {
            eprintln!("skipping: no system font available");
            return;
        };
        let entry = WordEntry {
            english: "x".into(),
            chinese: "y".into(),
        };
        let err = render_card(
            &mut shaper,
            &RenderJob {
                entry: &entry,
                phonetic: None,
                background: Path::new("/nope/missing.jpg"),
                profile: crate::device::DeviceMode::Auto.resolve(),
                theme: Theme::Standard,
                style: BackgroundStyle::Rectangle,
                fonts: &fonts,
                sizes,
            },
        )
        .unwrap_err();
        assert!(matches!(err, LexicardError::UnreadableImage { .. }));
    }

    #[test]
    fn minimal_theme_leaves_far_corners_untouched_except_dim() {
        let mut shaper = TextShaper::new();
        let Some((fonts, sizes)) = setup(&mut shaper) else {
            eprintln!("skipping: no system font available");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let bg = write_test_background(dir.path(), "bg.png", 800, 600);
        let entry = WordEntry {
            english: "dot".into(),
            chinese: "点".into(),
        };
        let card = render_card(
            &mut shaper,
            &RenderJob {
                entry: &entry,
                phonetic: None,
                background: &bg,
                profile: crate::device::DeviceMode::Auto.resolve(),
                theme: Theme::Minimal,
                style: BackgroundStyle::Rectangle,
                fonts: &fonts,
                sizes,
            },
        )
        .unwrap();
        // Minimal has no panel, so the corner pixel is just the dimmed source.
        let dim = Theme::Minimal.spec().dim;
        let expected_r = (0.0f32 * dim).round() as u8;
        let expected_g = (0.0f32 * dim).round() as u8;
        let expected_b = (90.0f32 * dim).round() as u8;
        let px = &card.rgba[..4];
        assert!(px[0].abs_diff(expected_r) <= 2, "r {px:?}");
        assert!(px[1].abs_diff(expected_g) <= 2, "g {px:?}");
        assert!(px[2].abs_diff(expected_b) <= 2, "b {px:?}");
    }
}
