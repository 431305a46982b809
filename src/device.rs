//! Device profile resolution: maps a target form factor to a canonical
//! canvas size and a font scale hint.

use std::str::FromStr;

use crate::error::{LexicardError, LexicardResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceMode {
    /// Keep the background's native size; no resize, no font scaling.
    #[default]
    Auto,
    Mobile,
    Tablet,
    Desktop,
}

/// Resolved canvas target for one device mode.
///
/// `target` of `None` means the source image's own dimensions are used,
/// resolved at render time per background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceProfile {
    pub target: Option<(u32, u32)>,
    pub font_scale: f32,
}

impl DeviceMode {
    pub fn resolve(self) -> DeviceProfile {
        match self {
            DeviceMode::Auto => DeviceProfile {
                target: None,
                font_scale: 1.0,
            },
            // Fonts enlarged for the higher pixel density of phone screens.
            DeviceMode::Mobile => DeviceProfile {
                target: Some((1080, 1920)),
                font_scale: 1.15,
            },
            DeviceMode::Tablet => DeviceProfile {
                target: Some((1536, 2048)),
                font_scale: 1.0,
            },
            DeviceMode::Desktop => DeviceProfile {
                target: Some((1920, 1080)),
                font_scale: 1.0,
            },
        }
    }
}

impl FromStr for DeviceMode {
    type Err = LexicardError;

    fn from_str(s: &str) -> LexicardResult<Self> {
        match s {
            "auto" => Ok(DeviceMode::Auto),
            "mobile" => Ok(DeviceMode::Mobile),
            "tablet" => Ok(DeviceMode::Tablet),
            "desktop" => Ok(DeviceMode::Desktop),
            other => Err(LexicardError::invalid_configuration(format!(
                "unknown device mode '{other}' (expected auto|mobile|tablet|desktop)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_table_is_deterministic() {
        assert_eq!(
            DeviceMode::Auto.resolve(),
            DeviceProfile {
                target: None,
                font_scale: 1.0
            }
        );
        assert_eq!(
            DeviceMode::Mobile.resolve(),
            DeviceProfile {
                target: Some((1080, 1920)),
                font_scale: 1.15
            }
        );
        assert_eq!(
            DeviceMode::Tablet.resolve(),
            DeviceProfile {
                target: Some((1536, 2048)),
                font_scale: 1.0
            }
        );
        assert_eq!(
            DeviceMode::Desktop.resolve(),
            DeviceProfile {
                target: Some((1920, 1080)),
                font_scale: 1.0
            }
        );
    }

    #[test]
    fn unknown_mode_string_is_invalid_configuration() {
        let err = DeviceMode::from_str("watch").unwrap_err();
        assert!(matches!(err, LexicardError::InvalidConfiguration(_)));
    }

    #[test]
    fn known_mode_strings_parse() {
        for (s, mode) in [
            ("auto", DeviceMode::Auto),
            ("mobile", DeviceMode::Mobile),
            ("tablet", DeviceMode::Tablet),
            ("desktop", DeviceMode::Desktop),
        ] {
            assert_eq!(DeviceMode::from_str(s).unwrap(), mode);
        }
    }
}
