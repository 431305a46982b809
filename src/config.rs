//! Batch configuration: CLI flags and an optional JSON config file
//! deserialize into the same structure.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::device::DeviceMode;
use crate::error::{LexicardError, LexicardResult};
use crate::font::FontSpec;
use crate::theme::{BackgroundStyle, Theme};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory scanned for background images.
    pub images_dir: PathBuf,
    /// Word list file, one `english,chinese` line per entry.
    pub words_file: PathBuf,
    /// Output directory, created on demand.
    pub output_dir: PathBuf,
    pub font_size_en: u32,
    pub font_size_cn: u32,
    pub font_size_phonetic: Option<u32>,
    pub font_path_en: Option<PathBuf>,
    pub font_path_cn: Option<PathBuf>,
    pub theme: Theme,
    pub device: DeviceMode,
    pub bg_style: BackgroundStyle,
    pub output_format: OutputFormat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            words_file: PathBuf::from("words.txt"),
            output_dir: PathBuf::from("output"),
            font_size_en: 60,
            font_size_cn: 45,
            font_size_phonetic: None,
            font_path_en: None,
            font_path_cn: None,
            theme: Theme::default(),
            device: DeviceMode::default(),
            bg_style: BackgroundStyle::default(),
            output_format: OutputFormat::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_file(path: &Path) -> LexicardResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            LexicardError::invalid_configuration(format!(
                "cannot read config '{}': {e}",
                path.display()
            ))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            LexicardError::invalid_configuration(format!(
                "invalid config '{}': {e}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LexicardResult<()> {
        if self.font_size_en == 0 || self.font_size_cn == 0 {
            return Err(LexicardError::invalid_configuration(
                "font sizes must be > 0",
            ));
        }
        if let Some(p) = self.font_size_phonetic
            && p == 0
        {
            return Err(LexicardError::invalid_configuration(
                "phonetic font size must be > 0",
            ));
        }
        Ok(())
    }

    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            path_en: self.font_path_en.clone(),
            path_cn: self.font_path_cn.clone(),
            size_en: self.font_size_en,
            size_cn: self.font_size_cn,
            size_phonetic: self.font_size_phonetic,
        }
    }
}
