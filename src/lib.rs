//! # symbios-pen
//!
//! A 2D pen interpretation crate for L-Systems, usable standalone or on top of
//! [Symbios](https://crates.io/crates/symbios).
//!
//! An axiom is rewritten by a [`GrammarExpander`] for a fixed number of generations,
//! then a [`TurtleInterpreter`] walks the result symbol by symbol and emits an
//! ordered stream of [`DrawPrimitive`]s (segments, dots, filled polygons). A
//! [`FrameSampler`] marks capture boundaries in that stream for animation export.
//!
//! Rasterization, windows and image encoding are left to the caller: everything the
//! crate produces is plain, serde-serializable data.
//!
//! ```
//! use symbios_pen::{DrawConfig, Grammar, Renderer};
//!
//! let renderer = Renderer::new(DrawConfig {
//!     generations: 3,
//!     turn_angle: 30.0,
//!     line_length: 5.0,
//!     ..Default::default()
//! })
//! .unwrap();
//! let drawing = renderer
//!     .render(&Grammar::new("A").with_rule('A', "F[+A][-A]"))
//!     .unwrap();
//! assert_eq!(drawing.primitives.len(), 7);
//! ```

pub mod config;
pub mod error;
pub mod frames;
pub mod grammar;
pub mod interpreter;
pub mod palette;
pub mod primitive;
pub mod render;
pub mod turtle;

pub use config::*;
pub use error::*;
pub use frames::*;
pub use grammar::*;
pub use interpreter::*;
pub use palette::*;
pub use primitive::*;
pub use render::*;
pub use turtle::*;
