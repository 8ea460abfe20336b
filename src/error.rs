use thiserror::Error;

/// Errors raised while parsing or expanding a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A generation would grow the symbol string beyond the expander's cap.
    #[error("generation {generation} would produce {length} symbols, exceeding the cap of {cap}")]
    LengthCapExceeded {
        generation: u32,
        length: usize,
        cap: usize,
    },

    /// Rule keys are single symbols.
    #[error("rule key `{0}` is not a single symbol")]
    InvalidRuleKey(String),

    /// A rule string ended with a key and no replacement.
    #[error("rule for `{0}` has no replacement")]
    MissingReplacement(char),
}

/// Rejected drawing configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("draws_per_frame must be at least 1")]
    ZeroFrameInterval,

    #[error("length_scale_factor must be finite and positive, got {0}")]
    InvalidScaleFactor(f32),

    /// Lengths and radii are magnitudes.
    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("circle must be finite and positive, got {0}")]
    InvalidCircle(f32),

    #[error("scale must be finite and positive, got {0}")]
    InvalidScale(f32),

    #[error("{channel} color index {index} is outside the palette")]
    ColorIndexOutOfRange { channel: &'static str, index: usize },
}

/// Anything that can stop a [`Renderer`](crate::Renderer) before interpretation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
