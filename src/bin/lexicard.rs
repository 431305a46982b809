use std::path::PathBuf;
use std::str::FromStr as _;

use clap::Parser;

use lexicard::{BatchReport, GeneratorConfig, run_batch};

#[derive(Parser, Debug)]
#[command(name = "lexicard", version, about = "Composite word cards onto background photos")]
struct Cli {
    /// JSON config file; CLI flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of background images (jpg/jpeg/png/gif).
    #[arg(long)]
    images: Option<PathBuf>,

    /// Word list, one `english,chinese` line per entry.
    #[arg(long)]
    words: Option<PathBuf>,

    /// Output directory, created on demand.
    #[arg(long)]
    output: Option<PathBuf>,

    /// English font size in pixels.
    #[arg(long)]
    font_size_en: Option<u32>,

    /// Chinese font size in pixels.
    #[arg(long)]
    font_size_cn: Option<u32>,

    /// Explicit Latin font file; overrides system font probing.
    #[arg(long)]
    font_path_en: Option<PathBuf>,

    /// Explicit CJK font file; overrides system font probing.
    #[arg(long)]
    font_path_cn: Option<PathBuf>,

    /// Card theme: standard|focus|elegant|dark|minimal.
    #[arg(long)]
    theme: Option<String>,

    /// Device target: auto|mobile|tablet|desktop.
    #[arg(long)]
    device: Option<String>,

    /// Panel silhouette: rectangle|wave.
    #[arg(long)]
    bg_style: Option<String>,

    /// Output format: png|jpeg.
    #[arg(long)]
    format: Option<String>,
}

fn build_config(cli: Cli) -> anyhow::Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_json_file(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(v) = cli.images {
        config.images_dir = v;
    }
    if let Some(v) = cli.words {
        config.words_file = v;
    }
    if let Some(v) = cli.output {
        config.output_dir = v;
    }
    if let Some(v) = cli.font_size_en {
        config.font_size_en = v;
    }
    if let Some(v) = cli.font_size_cn {
        config.font_size_cn = v;
    }
    if let Some(v) = cli.font_path_en {
        config.font_path_en = Some(v);
    }
    if let Some(v) = cli.font_path_cn {
        config.font_path_cn = Some(v);
    }
    if let Some(v) = &cli.theme {
        config.theme = lexicard::Theme::from_str(v)?;
    }
    if let Some(v) = &cli.device {
        config.device = lexicard::DeviceMode::from_str(v)?;
    }
    if let Some(v) = &cli.bg_style {
        config.bg_style = lexicard::BackgroundStyle::from_str(v)?;
    }
    if let Some(v) = &cli.format {
        config.output_format = match v.as_str() {
            "png" => lexicard::OutputFormat::Png,
            "jpeg" | "jpg" => lexicard::OutputFormat::Jpeg,
            other => anyhow::bail!("unknown output format '{other}' (expected png|jpeg)"),
        };
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = build_config(cli)?;

    let BatchReport {
        written,
        skipped_words,
        skipped_images,
    } = run_batch(&config)?;

    println!("{written} cards written ({skipped_words} words skipped, {skipped_images} pool images excluded)");
    Ok(())
}
