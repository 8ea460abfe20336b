//! Drawing configuration.
//!
//! Everything a front end (CLI, script binding, GUI) needs to hand the core is in
//! [`DrawConfig`]. It deserializes with defaults for every missing field, so a
//! front end only has to spell out what it changes.

use crate::error::ConfigError;
use crate::frames::FrameTrigger;
use crate::grammar::DEFAULT_MAX_SYMBOLS;
use crate::palette::{PALETTE_SIZE, PaletteConfig};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How long a `#` retarget lasts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    /// `#` flips the target until the next `#`.
    #[default]
    Persistent,
    /// `#` retargets only the next colour selection or nudge, then reverts to pen.
    NextOnly,
}

/// Configuration for expansion and interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    // --- Turtle ---
    /// Initial step length.
    pub line_length: f32,
    /// Initial line width.
    pub line_width: f32,
    /// Initial turn angle, in `circle` units.
    pub turn_angle: f32,
    pub turn_angle_increment: f32,
    pub line_length_increment: f32,
    pub width_increment: f32,
    /// Factor used by `*` and `/`.
    pub length_scale_factor: f32,
    /// Initial heading, in `circle` units.
    pub heading: f32,
    /// Initial position.
    pub position: Vec2,
    /// Starting pen table index.
    pub pen_color: usize,
    /// Starting fill table index.
    pub fill_color: usize,
    pub palette: PaletteConfig,
    /// When false no segments are emitted at all.
    pub pen_down: bool,
    /// Dot radius used when the line width is zero.
    pub default_dot_radius: f32,
    /// Units per full turn. 360 for degrees, `TAU` for radians.
    pub circle: f32,
    /// Multiplies position, lengths, widths, their increments and the default dot
    /// radius.
    pub scale: f32,
    pub target_mode: TargetMode,
    /// Pushes beyond this depth are dropped.
    pub max_stack_depth: usize,

    // --- Grammar ---
    /// Number of rewriting steps.
    pub generations: u32,
    /// Expansion fails once a generation would exceed this many symbols.
    pub max_symbols: usize,
    /// Prepended to the expanded string without being expanded.
    pub prefix: String,
    /// Appended to the expanded string without being expanded.
    pub suffix: String,

    // --- Limits ---
    /// Stop after reading this many symbols.
    pub max_symbols_read: Option<usize>,
    /// Stop once this many primitives were emitted.
    pub max_draws: Option<usize>,

    // --- Frames ---
    pub max_frames: Option<usize>,
    pub draws_per_frame: usize,
    /// When non-empty, frames are captured on these symbols instead of every
    /// `draws_per_frame` primitives.
    pub frame_symbols: String,
    /// Capture an empty frame before the first symbol is read.
    pub initial_frame: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            line_length: 20.0,
            line_width: 1.0,
            turn_angle: 120.0,
            turn_angle_increment: 15.0,
            line_length_increment: 5.0,
            width_increment: 1.0,
            length_scale_factor: 2.0,
            heading: 0.0,
            position: Vec2::ZERO,
            pen_color: 0,
            fill_color: 0,
            palette: PaletteConfig::default(),
            pen_down: true,
            default_dot_radius: 4.0,
            circle: 360.0,
            scale: 1.0,
            target_mode: TargetMode::Persistent,
            max_stack_depth: 4096,
            generations: 4,
            max_symbols: DEFAULT_MAX_SYMBOLS,
            prefix: String::new(),
            suffix: String::new(),
            max_symbols_read: None,
            max_draws: None,
            max_frames: Some(100),
            draws_per_frame: 1,
            frame_symbols: String::new(),
            initial_frame: false,
        }
    }
}

impl DrawConfig {
    /// Rejects values the interpreter cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.draws_per_frame == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        if !self.length_scale_factor.is_finite() || self.length_scale_factor <= 0.0 {
            return Err(ConfigError::InvalidScaleFactor(self.length_scale_factor));
        }
        for (field, value) in [
            ("line_length", self.line_length),
            ("default_dot_radius", self.default_dot_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !self.circle.is_finite() || self.circle <= 0.0 {
            return Err(ConfigError::InvalidCircle(self.circle));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        for (channel, index) in [("pen", self.pen_color), ("fill", self.fill_color)] {
            if index >= PALETTE_SIZE {
                return Err(ConfigError::ColorIndexOutOfRange { channel, index });
            }
        }
        Ok(())
    }

    /// The frame trigger described by `frame_symbols` and `draws_per_frame`.
    pub fn frame_trigger(&self) -> FrameTrigger {
        if self.frame_symbols.is_empty() {
            FrameTrigger::EveryDraws(self.draws_per_frame)
        } else {
            FrameTrigger::OnSymbols(self.frame_symbols.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(DrawConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_unusable_values() {
        let bad = DrawConfig {
            draws_per_frame: 0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroFrameInterval));

        let bad = DrawConfig {
            length_scale_factor: 0.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidScaleFactor(0.0)));

        let bad = DrawConfig {
            length_scale_factor: -2.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidScaleFactor(-2.0)));

        let bad = DrawConfig {
            circle: -360.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidCircle(-360.0)));

        let bad = DrawConfig {
            fill_color: 5,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigError::ColorIndexOutOfRange {
                channel: "fill",
                index: 5
            })
        );
    }

    #[test]
    fn rejects_negative_magnitudes() {
        let bad = DrawConfig {
            line_length: -3.0,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigError::Negative {
                field: "line_length",
                value: -3.0
            })
        );

        let bad = DrawConfig {
            default_dot_radius: -4.0,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigError::Negative {
                field: "default_dot_radius",
                value: -4.0
            })
        );

        let zero = DrawConfig {
            line_length: 0.0,
            default_dot_radius: 0.0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Ok(()));
    }

    #[test]
    fn frame_symbols_override_draw_interval() {
        let config = DrawConfig {
            draws_per_frame: 7,
            ..Default::default()
        };
        assert_eq!(config.frame_trigger(), FrameTrigger::EveryDraws(7));

        let config = DrawConfig {
            frame_symbols: "]".into(),
            ..config
        };
        assert_eq!(config.frame_trigger(), FrameTrigger::OnSymbols("]".into()));
    }
}
