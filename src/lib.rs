//! Lexicard composites themed "word card" images: English/Chinese vocabulary
//! text drawn over background photographs, one output image per word.
//!
//! The pipeline per word is:
//!
//! - Resolve a [`DeviceProfile`] (canvas size + font scale) from the device mode
//! - Prepare the background (decode, cover-resize, theme dimming)
//! - Compute a [`CardLayout`](layout::CardLayout): wrapped text blocks and the panel rect
//! - Paint the panel (rectangle or wave silhouette; solid/blurred/gradient/none fill)
//! - Paint the text with the theme's shadow or stroke treatment
//!
//! The batch driver ([`run_batch`]) walks a word list against a background
//! image pool and writes one file per word, skipping words that fail to
//! render rather than aborting the run.
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod device;
pub mod error;
pub mod font;
pub mod layout;
pub mod panel;
pub mod render;
pub mod text;
pub mod theme;
pub mod words;

pub(crate) mod blur;
pub(crate) mod pixel;

pub use batch::{BatchReport, run_batch};
pub use config::{GeneratorConfig, OutputFormat};
pub use device::{DeviceMode, DeviceProfile};
pub use error::{LexicardError, LexicardResult};
pub use font::{FontSpec, HostOs, Script};
pub use render::{CardImage, RenderJob, render_card};
pub use theme::{BackgroundStyle, Theme, ThemeSpec};
pub use words::{WordEntry, WordRecord};
