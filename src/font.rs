//! Font specification and resolution.
//!
//! Resolution is an explicit function of a [`HostOs`] identifier rather than
//! ambient OS detection inside the renderer: an explicit path wins, then a
//! per-OS candidate table is probed. A missing CJK face falls back to the
//! resolved Latin face (glyph coverage then depends on that face); a missing
//! Latin face is fatal before the batch starts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::error::{LexicardError, LexicardResult};
use crate::layout::TextShaper;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => HostOs::Windows,
            "macos" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            _ => HostOs::Other,
        }
    }
}

/// Which script a font resource is resolved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Script {
    Latin,
    Cjk,
}

/// Requested font files and pixel sizes, before device scaling.
#[derive(Clone, Debug, Default)]
pub struct FontSpec {
    pub path_en: Option<PathBuf>,
    pub path_cn: Option<PathBuf>,
    pub size_en: u32,
    pub size_cn: u32,
    /// Defaults to 30% of `size_en`, rounded.
    pub size_phonetic: Option<u32>,
}

/// Font sizes in pixels after applying the device profile's scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledSizes {
    pub en: f32,
    pub cn: f32,
    pub phonetic: f32,
}

impl FontSpec {
    pub fn phonetic_size(&self) -> u32 {
        self.size_phonetic
            .unwrap_or_else(|| (self.size_en as f32 * 0.3).round() as u32)
    }

    pub fn scaled(&self, font_scale: f32) -> ScaledSizes {
        ScaledSizes {
            en: (self.size_en as f32 * font_scale).round(),
            cn: (self.size_cn as f32 * font_scale).round(),
            phonetic: (self.phonetic_size() as f32 * font_scale).round(),
        }
    }
}

/// A font registered with the shaper: raw bytes, the family name it resolved
/// to, and the glyph-rendering handle.
#[derive(Clone)]
pub struct FontFace {
    pub bytes: Arc<Vec<u8>>,
    pub family: String,
    pub data: vello_cpu::peniko::FontData,
}

/// The Latin and CJK faces used for one batch run.
#[derive(Clone)]
pub struct FontSet {
    pub en: FontFace,
    pub cn: FontFace,
}

fn candidate_paths(os: HostOs, script: Script) -> &'static [&'static str] {
    match (os, script) {
        (HostOs::Windows, Script::Latin) => &[
            "C:/Windows/Fonts/arial.ttf",
            "C:/Windows/Fonts/calibri.ttf",
        ],
        (HostOs::Windows, Script::Cjk) => &[
            "C:/Windows/Fonts/simhei.ttf",
            "C:/Windows/Fonts/simsun.ttc",
            "C:/Windows/Fonts/msyh.ttc",
        ],
        (HostOs::MacOs, Script::Latin) => &[
            "/System/Library/Fonts/Helvetica.ttc",
            "/Library/Fonts/Arial.ttf",
        ],
        (HostOs::MacOs, Script::Cjk) => &[
            "/System/Library/Fonts/PingFang.ttc",
            "/Library/Fonts/Arial Unicode.ttf",
        ],
        (HostOs::Linux | HostOs::Other, Script::Latin) => &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ],
        (HostOs::Linux | HostOs::Other, Script::Cjk) => &[
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
            "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
        ],
    }
}

/// Resolve font bytes for one script. An explicit path must load; candidate
/// probing returns `None` when nothing is installed.
pub fn resolve_font_bytes(
    explicit: Option<&Path>,
    os: HostOs,
    script: Script,
) -> LexicardResult<Option<Vec<u8>>> {
    if let Some(path) = explicit {
        let bytes = std::fs::read(path).map_err(|e| {
            LexicardError::invalid_configuration(format!(
                "cannot read font '{}': {e}",
                path.display()
            ))
        })?;
        return Ok(Some(bytes));
    }

    for candidate in candidate_paths(os, script) {
        let path = Path::new(candidate);
        if path.exists()
            && let Ok(bytes) = std::fs::read(path)
        {
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}

/// Load and register the Latin + CJK faces for a batch run.
pub fn load_font_set(shaper: &mut TextShaper, spec: &FontSpec, os: HostOs) -> LexicardResult<FontSet> {
    let en_bytes = resolve_font_bytes(spec.path_en.as_deref(), os, Script::Latin)?.ok_or_else(
        || {
            LexicardError::invalid_configuration(
                "no Latin font found; install a system font or pass an explicit font path",
            )
        },
    )?;
    let en = register_face(shaper, en_bytes)?;

    let cn = match resolve_font_bytes(spec.path_cn.as_deref(), os, Script::Cjk)? {
        Some(bytes) => register_face(shaper, bytes)?,
        None => {
            warn!("no CJK font found; falling back to the Latin face for Chinese text");
            en.clone()
        }
    };

    Ok(FontSet { en, cn })
}

fn register_face(shaper: &mut TextShaper, bytes: Vec<u8>) -> LexicardResult<FontFace> {
    let bytes = Arc::new(bytes);
    let family = shaper.register(&bytes)?;
    let data = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
        0,
    );
    Ok(FontFace {
        bytes,
        family,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phonetic_size_defaults_to_30_percent_rounded() {
        let spec = FontSpec {
            size_en: 60,
            size_cn: 45,
            ..FontSpec::default()
        };
        assert_eq!(spec.phonetic_size(), 18);

        let spec = FontSpec {
            size_en: 45,
            ..spec
        };
        // 13.5 rounds half-up.
        assert_eq!(spec.phonetic_size(), 14);
    }

    #[test]
    fn explicit_phonetic_size_wins() {
        let spec = FontSpec {
            size_en: 60,
            size_cn: 45,
            size_phonetic: Some(25),
            ..FontSpec::default()
        };
        assert_eq!(spec.phonetic_size(), 25);
    }

    #[test]
    fn scaled_sizes_apply_device_factor() {
        let spec = FontSpec {
            size_en: 60,
            size_cn: 45,
            ..FontSpec::default()
        };
        let sizes = spec.scaled(1.15);
        assert_eq!(sizes.en, 69.0);
        assert_eq!(sizes.cn, 52.0);
        assert_eq!(sizes.phonetic, 21.0);
    }

    #[test]
    fn explicit_missing_font_path_is_invalid_configuration() {
        let err = resolve_font_bytes(
            Some(Path::new("/definitely/not/here.ttf")),
            HostOs::Linux,
            Script::Latin,
        )
        .unwrap_err();
        assert!(matches!(err, LexicardError::InvalidConfiguration(_)));
    }

    #[test]
    fn candidate_tables_are_nonempty_for_all_combinations() {
        for os in [HostOs::Windows, HostOs::MacOs, HostOs::Linux, HostOs::Other] {
            for script in [Script::Latin, Script::Cjk] {
                assert!(!candidate_paths(os, script).is_empty());
            }
        }
    }
}
