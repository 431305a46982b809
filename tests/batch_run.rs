//! End-to-end batch runs against synthetic backgrounds in a temp directory.

use std::path::{Path, PathBuf};

use lexicard::{
    BackgroundStyle, DeviceMode, GeneratorConfig, HostOs, LexicardError, OutputFormat, Script,
    Theme, run_batch,
};

/// All rendering tests need a resolvable Latin font on the host.
fn host_has_font() -> bool {
    lexicard::font::resolve_font_bytes(None, HostOs::current(), Script::Latin)
        .ok()
        .flatten()
        .is_some()
}

fn write_background(dir: &Path, name: &str, w: u32, h: u32, seed: u8) -> PathBuf {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([
            (x % 256) as u8 ^ seed,
            (y % 256) as u8,
            seed.wrapping_mul(3),
            255,
        ])
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

struct Fixture {
    _root: tempfile::TempDir,
    config: GeneratorConfig,
}

fn fixture(words: &str, backgrounds: usize) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let images_dir = root.path().join("images");
    std::fs::create_dir(&images_dir).unwrap();
    for i in 0..backgrounds {
        write_background(&images_dir, &format!("bg{i}.png"), 320, 480, i as u8);
    }
    let words_file = root.path().join("words.txt");
    std::fs::write(&words_file, words).unwrap();

    let config = GeneratorConfig {
        images_dir,
        words_file,
        output_dir: root.path().join("out"),
        ..GeneratorConfig::default()
    };
    Fixture {
        _root: root,
        config,
    }
}

#[test]
fn writes_one_card_per_word_with_sequential_names() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    let fx = fixture("apple,苹果\nbook,书\n", 1);
    let report = run_batch(&fx.config).unwrap();
    assert_eq!(report.written, 2);
    assert_eq!(report.skipped_words, 0);

    assert!(fx.config.output_dir.join("001_apple.png").exists());
    assert!(fx.config.output_dir.join("002_book.png").exists());
}

#[test]
fn mobile_device_produces_portrait_canvases() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    let mut fx = fixture("apple,苹果\n", 1);
    fx.config.device = DeviceMode::Mobile;
    run_batch(&fx.config).unwrap();

    let out = image::open(fx.config.output_dir.join("001_apple.png")).unwrap();
    assert_eq!((out.width(), out.height()), (1080, 1920));
}

#[test]
fn empty_word_list_succeeds_without_creating_output() {
    let fx = fixture("", 1);
    let report = run_batch(&fx.config).unwrap();
    assert_eq!(report.written, 0);
    assert!(!fx.config.output_dir.exists());
}

#[test]
fn empty_background_pool_is_an_error_before_any_output() {
    let fx = fixture("apple,苹果\n", 0);
    let err = run_batch(&fx.config).unwrap_err();
    assert!(matches!(err, LexicardError::NoBackgroundImages));
    assert!(!fx.config.output_dir.exists());
}

#[test]
fn backgrounds_cycle_when_words_outnumber_the_pool() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    let fx = fixture("apple,苹果\nbook,书\nsun,太阳\n", 2);
    let report = run_batch(&fx.config).unwrap();
    assert_eq!(report.written, 3);

    // Words 1 and 3 share pool image 0, so their backgrounds match outside
    // the text area; word 2 uses pool image 1.
    let a = image::open(fx.config.output_dir.join("001_apple.png")).unwrap().to_rgba8();
    let c = image::open(fx.config.output_dir.join("003_sun.png")).unwrap().to_rgba8();
    assert_eq!(a.get_pixel(0, 0), c.get_pixel(0, 0));
}

#[test]
fn identical_inputs_produce_identical_bytes() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    let fx = fixture("apple,苹果\n", 1);
    run_batch(&fx.config).unwrap();
    let first = std::fs::read(fx.config.output_dir.join("001_apple.png")).unwrap();

    std::fs::remove_dir_all(&fx.config.output_dir).unwrap();
    run_batch(&fx.config).unwrap();
    let second = std::fs::read(fx.config.output_dir.join("001_apple.png")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failing_word_is_skipped_and_later_words_still_render() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    // Pool order is sorted, so word 1 gets the tiny background. A canvas
    // smaller than twice the panel margin degenerates the panel rect and
    // fails that word; word 2 gets a normal background and must still render.
    let fx = fixture("apple,苹果\nbook,书\n", 0);
    write_background(&fx.config.images_dir, "a_tiny.png", 20, 20, 1);
    write_background(&fx.config.images_dir, "b_ok.png", 320, 480, 2);

    let report = run_batch(&fx.config).unwrap();
    assert_eq!(report.skipped_words, 1);
    assert_eq!(report.written, 1);
    assert!(!fx.config.output_dir.join("001_apple.png").exists());
    assert!(fx.config.output_dir.join("002_book.png").exists());
}

#[test]
fn undecodable_pool_files_are_excluded_not_fatal() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    let fx = fixture("apple,苹果\n", 1);
    std::fs::write(fx.config.images_dir.join("broken.jpg"), b"junk").unwrap();

    let report = run_batch(&fx.config).unwrap();
    assert_eq!(report.written, 1);
    assert_eq!(report.skipped_images, 1);
}

#[test]
fn jpeg_output_uses_the_jpg_extension() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    let mut fx = fixture("apple,苹果\n", 1);
    fx.config.output_format = OutputFormat::Jpeg;
    run_batch(&fx.config).unwrap();
    assert!(fx.config.output_dir.join("001_apple.jpg").exists());
}

#[test]
fn every_theme_and_style_combination_renders() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    for theme in Theme::ALL {
        for style in [BackgroundStyle::Rectangle, BackgroundStyle::Wave] {
            let mut fx = fixture("apple,/ae/,苹果\n", 1);
            fx.config.theme = theme;
            fx.config.bg_style = style;
            let report = run_batch(&fx.config).unwrap();
            assert_eq!(report.written, 1, "{theme:?} {style:?}");
        }
    }
}

#[test]
fn path_hostile_words_get_sanitized_file_names() {
    if !host_has_font() {
        eprintln!("skipping: no system font available");
        return;
    }
    let fx = fixture("a/b,斜线\n", 1);
    let report = run_batch(&fx.config).unwrap();
    assert_eq!(report.written, 1);
    assert!(fx.config.output_dir.join("001_a_b.png").exists());
}
