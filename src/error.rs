pub type LexicardResult<T> = Result<T, LexicardError>;

#[derive(thiserror::Error, Debug)]
pub enum LexicardError {
    /// Bad enum value or otherwise unusable configuration. Fatal before any
    /// rendering starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The background image pool resolved to zero usable files. Fatal before
    /// any rendering starts.
    #[error("no background images found in pool")]
    NoBackgroundImages,

    /// A specific background file failed to decode. Recovered: the file is
    /// excluded from the pool.
    #[error("unreadable image '{path}': {reason}")]
    UnreadableImage { path: String, reason: String },

    /// A specific word failed to lay out or draw. Recovered: the word is
    /// skipped and the batch continues.
    #[error("render failure: {0}")]
    RenderFailure(String),

    /// Panel rectangle with non-positive dimensions. Treated like
    /// `RenderFailure` at batch level.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LexicardError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn render_failure(msg: impl Into<String>) -> Self {
        Self::RenderFailure(msg.into())
    }

    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    pub fn unreadable_image(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnreadableImage {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the batch driver may recover from this error by skipping the
    /// current word.
    pub fn is_recoverable_per_word(&self) -> bool {
        matches!(
            self,
            Self::RenderFailure(_) | Self::InvalidGeometry(_) | Self::UnreadableImage { .. }
        )
    }
}
