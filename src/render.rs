//! End-to-end pipeline: expand, interpret, collect.

use crate::config::DrawConfig;
use crate::error::RenderError;
use crate::frames::Frame;
use crate::grammar::{Grammar, GrammarExpander};
use crate::interpreter::{RunSummary, TurtleInterpreter};
use crate::primitive::DrawPrimitive;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A finished drawing, ready for a renderer or an animation exporter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// The full symbol string that was interpreted (prefix + expansion + suffix).
    pub symbols: String,
    /// Every primitive, in emission order. This is the complete still image even
    /// when the animation was truncated by `max_frames`.
    pub primitives: Vec<DrawPrimitive>,
    pub frames: Vec<Frame>,
    pub summary: RunSummary,
}

impl Drawing {
    /// Primitives visible in each captured frame, in order.
    pub fn frame_slices(&self) -> impl Iterator<Item = &[DrawPrimitive]> + '_ {
        self.frames.iter().map(|frame| frame.slice(&self.primitives))
    }
}

/// Couples a [`GrammarExpander`] and a [`TurtleInterpreter`] that share one
/// validated [`DrawConfig`].
pub struct Renderer {
    expander: GrammarExpander,
    interpreter: TurtleInterpreter,
}

impl Renderer {
    pub fn new(config: DrawConfig) -> Result<Self, RenderError> {
        let expander = GrammarExpander::new(config.max_symbols);
        let interpreter = TurtleInterpreter::new(config)?;
        Ok(Self {
            expander,
            interpreter,
        })
    }

    pub fn config(&self) -> &DrawConfig {
        self.interpreter.config()
    }

    pub fn interpreter(&self) -> &TurtleInterpreter {
        &self.interpreter
    }

    /// Expands `grammar` for the configured number of generations and draws it.
    ///
    /// Expansion finishes (or fails) before the first symbol is interpreted.
    pub fn render(&self, grammar: &Grammar) -> Result<Drawing, RenderError> {
        let expanded = self.expander.expand(grammar, self.config().generations)?;
        Ok(self.draw_level(&expanded))
    }

    /// Draws every level `0..=generations` separately, for growth animations.
    pub fn render_growth(&self, grammar: &Grammar) -> Result<Vec<Drawing>, RenderError> {
        let levels = self
            .expander
            .expand_levels(grammar, self.config().generations)?;
        Ok(levels.iter().map(|level| self.draw_level(level)).collect())
    }

    fn draw_level(&self, expanded: &str) -> Drawing {
        let config = self.config();
        let mut symbols =
            String::with_capacity(config.prefix.len() + expanded.len() + config.suffix.len());
        symbols.push_str(&config.prefix);
        symbols.push_str(expanded);
        symbols.push_str(&config.suffix);

        let mut primitives = Vec::new();
        let mut frames = Vec::new();
        let summary = self
            .interpreter
            .interpret(&symbols, &mut primitives, &mut frames);
        info!(
            symbols = summary.symbols_read,
            primitives = summary.emitted,
            frames = summary.frames_captured,
            frames_attempted = summary.frames_attempted,
            stop = ?summary.stop,
            "drawing complete"
        );

        Drawing {
            symbols,
            primitives,
            frames,
            summary,
        }
    }
}
