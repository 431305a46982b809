//! Batch driver: scans the background pool, loads the word list, and renders
//! one card per word with partial-failure semantics.
//!
//! Backgrounds are assigned by cycling the sorted pool, so a given input set
//! always produces the same pairing. A word that fails to render is logged
//! and skipped; the batch only aborts on setup errors.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::{LexicardError, LexicardResult};
use crate::font::load_font_set;
use crate::layout::TextShaper;
use crate::render::{RenderJob, render_card};
use crate::words::load_word_list;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Cards written to the output directory.
    pub written: usize,
    /// Words skipped after a per-word render failure. Write failures are
    /// fatal: they indicate an environment problem, not a bad word.
    pub skipped_words: usize,
    /// Pool files excluded because they did not decode.
    pub skipped_images: usize,
}

/// Scan `dir` for usable background images: extension-filtered, sorted by
/// file name, and validated by decoding. Files that fail to decode are
/// excluded, not fatal.
fn scan_backgrounds(dir: &Path) -> LexicardResult<(Vec<PathBuf>, usize)> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        LexicardError::invalid_configuration(format!(
            "cannot read images directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                })
        })
        .collect();
    candidates.sort();

    let mut pool = Vec::with_capacity(candidates.len());
    let mut skipped = 0usize;
    for path in candidates {
        match image::open(&path) {
            Ok(_) => pool.push(path),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "excluding undecodable background");
                skipped += 1;
            }
        }
    }
    Ok((pool, skipped))
}

/// File-safe output stem for one word.
fn sanitize_stem(english: &str) -> String {
    english
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

pub fn run_batch(config: &GeneratorConfig) -> LexicardResult<BatchReport> {
    config.validate()?;

    let (pool, skipped_images) = scan_backgrounds(&config.images_dir)?;
    if pool.is_empty() {
        return Err(LexicardError::NoBackgroundImages);
    }

    let words = load_word_list(&config.words_file)?;
    if words.is_empty() {
        info!("word list is empty; nothing to render");
        return Ok(BatchReport {
            skipped_images,
            ..BatchReport::default()
        });
    }

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "create output directory '{}'",
            config.output_dir.display()
        )
    })?;

    let mut shaper = TextShaper::new();
    let fonts = load_font_set(&mut shaper, &config.font_spec(), crate::font::HostOs::current())?;
    let profile = config.device.resolve();
    let sizes = config.font_spec().scaled(profile.font_scale);

    let mut report = BatchReport {
        skipped_images,
        ..BatchReport::default()
    };
    for (i, record) in words.iter().enumerate() {
        let background = &pool[i % pool.len()];
        let job = RenderJob {
            entry: &record.entry,
            phonetic: record.phonetic.as_deref(),
            background,
            profile,
            theme: config.theme,
            style: config.bg_style,
            fonts: &fonts,
            sizes,
        };
        let card = match render_card(&mut shaper, &job) {
            Ok(card) => card,
            Err(e) if e.is_recoverable_per_word() => {
                warn!(word = %record.entry.english, error = %e, "skipping word");
                report.skipped_words += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let file_name = format!(
            "{:03}_{}.{}",
            i + 1,
            sanitize_stem(&record.entry.english),
            config.output_format.extension()
        );
        let path = config.output_dir.join(&file_name);
        write_card(&card, &path, config)?;
        info!(file = %file_name, "wrote card");
        report.written += 1;
    }

    info!(
        written = report.written,
        skipped_words = report.skipped_words,
        skipped_images = report.skipped_images,
        "batch finished"
    );
    Ok(report)
}

fn write_card(
    card: &crate::render::CardImage,
    path: &Path,
    config: &GeneratorConfig,
) -> LexicardResult<()> {
    let img = image::RgbaImage::from_raw(card.width, card.height, card.rgba.clone())
        .ok_or_else(|| LexicardError::render_failure("card buffer size mismatch"))?;
    let format = config.output_format.image_format();
    match config.output_format {
        crate::config::OutputFormat::Png => img
            .save_with_format(path, format)
            .with_context(|| format!("write '{}'", path.display()))?,
        // JPEG has no alpha channel.
        crate::config::OutputFormat::Jpeg => image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .save_with_format(path, format)
            .with_context(|| format!("write '{}'", path.display()))?,
    }
    Ok(())
}
