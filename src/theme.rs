//! The closed set of card themes and their drawing constants.
//!
//! A theme bundles panel fill, corner style, text color, text treatment
//! (shadow/stroke), panel padding, a background dimming factor, and whether
//! the divider ornament is drawn. The table is fixed; themes are not
//! user-extensible.

use std::str::FromStr;

use crate::error::{LexicardError, LexicardResult};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Standard,
    Focus,
    Elegant,
    Dark,
    Minimal,
}

/// Panel silhouette, orthogonal to the theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundStyle {
    #[default]
    Rectangle,
    Wave,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelFill {
    /// Flat translucent color.
    Solid(Rgba8),
    /// The background region under the panel is Gaussian-blurred and redrawn
    /// in place, with a low-opacity dark overlay for contrast.
    Blurred,
    /// Vertical linear gradient between two colors.
    Gradient { top: Rgba8, bottom: Rgba8 },
    /// No panel. The text renderer must supply a drop shadow for legibility.
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerStyle {
    Square,
    Rounded,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextEffect {
    /// Each glyph run drawn twice: dark offset pass, then the real run.
    Shadow { offset: f64, color: Rgba8 },
    /// Outline passes around each glyph run before the fill pass.
    Stroke { width: f64, color: Rgba8 },
    None,
}

/// Drawing constants for one theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeSpec {
    pub fill: PanelFill,
    pub corners: CornerStyle,
    pub text_color: Rgba8,
    pub effect: TextEffect,
    /// Padding added around the text content box to form the panel rect.
    pub padding: f64,
    /// Background brightness factor applied before compositing.
    pub dim: f32,
    /// Whether the divider ornament between the English and Chinese groups
    /// is drawn.
    pub decoration: bool,
}

impl Theme {
    pub const fn spec(self) -> ThemeSpec {
        match self {
            Theme::Standard => ThemeSpec {
                fill: PanelFill::Solid(Rgba8::new(0, 0, 0, 128)),
                corners: CornerStyle::Rounded,
                text_color: Rgba8::WHITE,
                effect: TextEffect::Shadow {
                    offset: 2.0,
                    color: Rgba8::BLACK,
                },
                padding: 40.0,
                dim: 1.0,
                decoration: true,
            },
            Theme::Focus => ThemeSpec {
                fill: PanelFill::Blurred,
                corners: CornerStyle::Rounded,
                text_color: Rgba8::WHITE,
                effect: TextEffect::Shadow {
                    offset: 3.0,
                    color: Rgba8::new(0, 0, 0, 200),
                },
                padding: 40.0,
                dim: 0.6,
                decoration: true,
            },
            Theme::Elegant => ThemeSpec {
                fill: PanelFill::Gradient {
                    top: Rgba8::new(40, 40, 40, 150),
                    bottom: Rgba8::new(40, 40, 40, 60),
                },
                corners: CornerStyle::Rounded,
                text_color: Rgba8::WHITE,
                effect: TextEffect::Stroke {
                    width: 2.0,
                    color: Rgba8::new(0, 0, 0, 180),
                },
                padding: 56.0,
                dim: 0.85,
                decoration: true,
            },
            Theme::Dark => ThemeSpec {
                fill: PanelFill::Solid(Rgba8::new(10, 10, 10, 200)),
                corners: CornerStyle::Square,
                text_color: Rgba8::new(230, 230, 230, 255),
                effect: TextEffect::None,
                padding: 40.0,
                dim: 0.5,
                decoration: true,
            },
            Theme::Minimal => ThemeSpec {
                fill: PanelFill::None,
                corners: CornerStyle::Square,
                text_color: Rgba8::WHITE,
                effect: TextEffect::Shadow {
                    offset: 4.0,
                    color: Rgba8::new(0, 0, 0, 230),
                },
                padding: 0.0,
                dim: 0.4,
                decoration: false,
            },
        }
    }

    pub const ALL: [Theme; 5] = [
        Theme::Standard,
        Theme::Focus,
        Theme::Elegant,
        Theme::Dark,
        Theme::Minimal,
    ];
}

impl FromStr for Theme {
    type Err = LexicardError;

    fn from_str(s: &str) -> LexicardResult<Self> {
        match s {
            "standard" => Ok(Theme::Standard),
            "focus" => Ok(Theme::Focus),
            "elegant" => Ok(Theme::Elegant),
            "dark" => Ok(Theme::Dark),
            "minimal" => Ok(Theme::Minimal),
            other => Err(LexicardError::invalid_configuration(format!(
                "unknown theme '{other}' (expected standard|focus|elegant|dark|minimal)"
            ))),
        }
    }
}

impl FromStr for BackgroundStyle {
    type Err = LexicardError;

    fn from_str(s: &str) -> LexicardResult<Self> {
        match s {
            "rectangle" => Ok(BackgroundStyle::Rectangle),
            "wave" => Ok(BackgroundStyle::Wave),
            other => Err(LexicardError::invalid_configuration(format!(
                "unknown background style '{other}' (expected rectangle|wave)"
            ))),
        }
    }
}
