//! Turtle state and the operations that mutate it.

use crate::palette::Channel;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// The state of the drawing turtle.
///
/// This is the whole snapshot saved by `[` and restored by `]`. Palette offsets
/// and an open polygon belong to the run, not to the turtle, and survive pops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawState {
    /// Current position of the cursor.
    pub position: Vec2,

    /// Current heading in `circle` units. `0` points along `+X`, increasing headings
    /// rotate counter-clockwise.
    pub heading: f32,

    /// When false, `F` moves without drawing.
    pub pen_down: bool,

    /// Step taken by `F` and `f`.
    pub line_length: f32,

    /// Segment width and default dot radius.
    pub line_width: f32,

    /// Angle turned by `+` and `-`.
    pub turn_angle: f32,

    /// Step applied to `turn_angle` by `(` and `)`.
    pub turn_angle_increment: f32,

    pub pen_color_index: usize,
    pub fill_color_index: usize,

    /// Set by `&`: `+` and `-` exchange meanings.
    pub swapped_turn: bool,

    /// Channel the next colour selection or RGB nudge applies to.
    pub target_channel: Channel,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            heading: 0.0,
            pen_down: true,
            line_length: 20.0,
            line_width: 1.0,
            turn_angle: 120.0,
            turn_angle_increment: 15.0,
            pen_color_index: 0,
            fill_color_index: 0,
            swapped_turn: false,
            target_channel: Channel::Pen,
        }
    }
}

impl DrawState {
    /// Unit vector along the current heading, given `circle` units per full turn.
    pub fn direction(&self, circle: f32) -> Vec2 {
        Vec2::from_angle(self.heading * TAU / circle)
    }

    /// Position one `line_length` step ahead.
    pub fn ahead(&self, circle: f32) -> Vec2 {
        self.position + self.direction(circle) * self.line_length
    }

    /// Turns by `sign * turn_angle`, honouring `swapped_turn`.
    pub fn turn(&mut self, sign: f32) {
        let sign = if self.swapped_turn { -sign } else { sign };
        self.heading += sign * self.turn_angle;
    }
}

/// Operations that can be performed by the turtle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleOp {
    // --- Movement ---
    /// Move forward drawing a segment (`F`).
    Draw,
    /// Move forward without drawing (`f`).
    Move,
    /// Turn by the turn angle; `1.0` for `+`, `-1.0` for `-`.
    Turn(f32),
    /// Turn half a circle (`|`).
    TurnAround,
    /// Exchange the meanings of `+` and `-` (`&`).
    SwapTurns,

    // --- Parameters ---
    /// Widen (`>`, `1.0`) or narrow (`<`, `-1.0`) the line.
    Width(f32),
    /// Restore the initial width (`=`).
    ResetWidth,
    /// Multiply (`*`) or divide (`/`) the line length by the scale factor.
    ScaleLength { grow: bool },
    /// Add (`^`, `1.0`) or subtract (`%`, `-1.0`) the length increment.
    Length(f32),
    /// Restore the initial length (`_`).
    ResetLength,
    /// Widen (`)`, `1.0`) or narrow (`(`, `-1.0`) the turn angle.
    Angle(f32),
    /// Restore the initial turn angle (`~`).
    ResetAngle,

    // --- Geometry ---
    /// Emit a dot (`@`).
    Dot,
    /// Start a polygon (`{`).
    OpenPolygon,
    /// Finish and emit the polygon (`}`).
    ClosePolygon,

    // --- Colour ---
    /// Digit `0`-`9`.
    SelectColor(u8),
    /// Nudge an RGB component of the targeted channel. `component` is 0, 1 or 2.
    Nudge { component: usize, sign: f32 },
    /// Switch the targeted channel between pen and fill (`#`).
    ToggleTarget,

    // --- Flow Control ---
    /// Save the full turtle state onto the stack (`[`).
    Push,
    /// Restore the most recently pushed turtle state (`]`).
    Pop,
    /// Discard every saved state (`` ` ``).
    ClearStack,
    /// Stop interpreting (`$`).
    Halt,
    /// No-op — symbol has no registered meaning.
    Ignore,
}

/// Every symbol with a built-in meaning.
pub const STANDARD_SYMBOLS: &str = "Ff+-|&><=*/^%_)(~@{}0123456789,.;:?!#[]`$";

impl TurtleOp {
    /// Maps a symbol of the standard command alphabet to its operation.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            'F' => TurtleOp::Draw,
            'f' => TurtleOp::Move,
            '+' => TurtleOp::Turn(1.0),
            '-' => TurtleOp::Turn(-1.0),
            '|' => TurtleOp::TurnAround,
            '&' => TurtleOp::SwapTurns,
            '>' => TurtleOp::Width(1.0),
            '<' => TurtleOp::Width(-1.0),
            '=' => TurtleOp::ResetWidth,
            '*' => TurtleOp::ScaleLength { grow: true },
            '/' => TurtleOp::ScaleLength { grow: false },
            '^' => TurtleOp::Length(1.0),
            '%' => TurtleOp::Length(-1.0),
            '_' => TurtleOp::ResetLength,
            ')' => TurtleOp::Angle(1.0),
            '(' => TurtleOp::Angle(-1.0),
            '~' => TurtleOp::ResetAngle,
            '@' => TurtleOp::Dot,
            '{' => TurtleOp::OpenPolygon,
            '}' => TurtleOp::ClosePolygon,
            // Pattern guarantees an ASCII digit.
            '0'..='9' => TurtleOp::SelectColor(symbol as u8 - b'0'),
            ',' => TurtleOp::Nudge { component: 0, sign: 1.0 },
            '.' => TurtleOp::Nudge { component: 0, sign: -1.0 },
            ';' => TurtleOp::Nudge { component: 1, sign: 1.0 },
            ':' => TurtleOp::Nudge { component: 1, sign: -1.0 },
            '?' => TurtleOp::Nudge { component: 2, sign: 1.0 },
            '!' => TurtleOp::Nudge { component: 2, sign: -1.0 },
            '#' => TurtleOp::ToggleTarget,
            '[' => TurtleOp::Push,
            ']' => TurtleOp::Pop,
            '`' => TurtleOp::ClearStack,
            '$' => TurtleOp::Halt,
            _ => TurtleOp::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_standard_symbol_has_an_op() {
        for symbol in STANDARD_SYMBOLS.chars() {
            assert_ne!(
                TurtleOp::from_symbol(symbol),
                TurtleOp::Ignore,
                "`{symbol}` should be a command"
            );
        }
    }

    #[test]
    fn letters_and_whitespace_are_inert() {
        for symbol in ['A', 'G', 'x', ' ', '\n', '\'', '"', '\\'] {
            assert_eq!(TurtleOp::from_symbol(symbol), TurtleOp::Ignore);
        }
    }

    #[test]
    fn digits_keep_their_value() {
        assert_eq!(TurtleOp::from_symbol('0'), TurtleOp::SelectColor(0));
        assert_eq!(TurtleOp::from_symbol('7'), TurtleOp::SelectColor(7));
    }

    #[test]
    fn heading_zero_points_along_x() {
        let state = DrawState {
            line_length: 5.0,
            ..Default::default()
        };
        assert_eq!(state.ahead(360.0), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn quarter_turn_points_up() {
        let state = DrawState {
            heading: 90.0,
            line_length: 2.0,
            ..Default::default()
        };
        let p = state.ahead(360.0);
        assert!(p.abs_diff_eq(Vec2::new(0.0, 2.0), 1e-5), "{p}");

        // Same turn expressed in radians.
        let state = DrawState {
            heading: std::f32::consts::FRAC_PI_2,
            ..state
        };
        assert!(state.ahead(TAU).abs_diff_eq(Vec2::new(0.0, 2.0), 1e-5));
    }

    #[test]
    fn swapped_turn_reverses_sign() {
        let mut state = DrawState {
            turn_angle: 30.0,
            ..Default::default()
        };
        state.turn(1.0);
        assert_eq!(state.heading, 30.0);
        state.swapped_turn = true;
        state.turn(1.0);
        assert_eq!(state.heading, 0.0);
    }
}
