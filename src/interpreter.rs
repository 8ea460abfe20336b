//! Interpreter that walks an L-System symbol sequence and emits [`DrawPrimitive`]s.
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`DrawConfig`], then
//! call [`TurtleInterpreter::interpret`] with a plain string, or register symbol IDs
//! via [`TurtleInterpreter::set_op`] / [`TurtleInterpreter::populate_standard_symbols`]
//! and call [`TurtleInterpreter::interpret_state`] with a [`symbios::SymbiosState`].

use crate::config::{DrawConfig, TargetMode};
use crate::error::ConfigError;
use crate::frames::{FrameObserver, FrameSampler, FrameTrigger};
use crate::palette::{Channel, PALETTE_SIZE, Palette};
use crate::primitive::{DrawPrimitive, PrimitiveSink};
use crate::turtle::{DrawState, STANDARD_SYMBOLS, TurtleOp};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use symbios::{SymbiosState, SymbolTable};
use tracing::debug;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every symbol was read.
    Exhausted,
    /// A `$` was read.
    Halted,
    /// `max_symbols_read` was reached.
    SymbolLimit,
    /// `max_draws` was reached.
    DrawLimit,
}

/// What a finished run looked like.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Turtle state after the last processed symbol.
    pub state: DrawState,
    /// Snapshots still on the stack.
    pub stack_depth: usize,
    pub emitted: usize,
    pub symbols_read: usize,
    pub frames_captured: usize,
    pub frames_attempted: usize,
    pub stop: StopReason,
}

/// Interprets L-System output as 2D pen strokes.
pub struct TurtleInterpreter {
    op_map: Vec<TurtleOp>,
    /// Symbol IDs that capture a frame when read.
    frame_ids: Vec<bool>,
    config: DrawConfig,
}

impl TurtleInterpreter {
    /// Validates `config` and creates an interpreter with an empty symbol-ID map.
    ///
    /// String input through [`interpret`](Self::interpret) always uses the standard
    /// alphabet; the map only matters for [`interpret_state`](Self::interpret_state).
    pub fn new(config: DrawConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            op_map: Vec::new(),
            frame_ids: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    ///
    /// `map` is indexed by symbol ID as returned by [`symbios::SymbolTable`].
    /// Any ID that falls outside the slice is treated as [`TurtleOp::Ignore`].
    pub fn with_map(mut self, map: Vec<TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol ID.
    ///
    /// The map is grown automatically when `sym_id` exceeds its current length;
    /// gaps are filled with [`TurtleOp::Ignore`].
    pub fn set_op(&mut self, sym_id: u16, op: TurtleOp) {
        let idx = sym_id as usize;
        if idx >= self.op_map.len() {
            self.op_map.resize(idx + 1, TurtleOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// Marks a symbol ID as a frame trigger for [`interpret_state`](Self::interpret_state).
    pub fn set_frame_symbol(&mut self, sym_id: u16) {
        let idx = sym_id as usize;
        if idx >= self.frame_ids.len() {
            self.frame_ids.resize(idx + 1, false);
        }
        self.frame_ids[idx] = true;
    }

    /// Registers every symbol of the standard alphabet that `interner` knows about,
    /// along with the IDs of the configured `frame_symbols`.
    ///
    /// Symbols that are not present in the interner are silently skipped.
    pub fn populate_standard_symbols(&mut self, interner: &SymbolTable) {
        let mut buf = [0u8; 4];
        for symbol in STANDARD_SYMBOLS.chars() {
            if let Some(id) = interner.resolve_id(symbol.encode_utf8(&mut buf)) {
                self.set_op(id, TurtleOp::from_symbol(symbol));
            }
        }
        let frame_symbols: Vec<char> = self.config.frame_symbols.chars().collect();
        for symbol in frame_symbols {
            match interner.resolve_id(symbol.encode_utf8(&mut buf)) {
                Some(id) => self.set_frame_symbol(id),
                None => debug!(%symbol, "frame symbol not interned, never triggers"),
            }
        }
    }

    /// The turtle as it stands before the first symbol.
    pub fn initial_state(&self) -> DrawState {
        let config = &self.config;
        DrawState {
            position: config.position * config.scale,
            heading: config.heading,
            pen_down: config.pen_down,
            line_length: (config.line_length * config.scale).max(0.0),
            line_width: (config.line_width * config.scale).max(0.0),
            turn_angle: config.turn_angle,
            turn_angle_increment: config.turn_angle_increment,
            pen_color_index: config.pen_color.min(PALETTE_SIZE - 1),
            fill_color_index: config.fill_color.min(PALETTE_SIZE - 1),
            swapped_turn: false,
            target_channel: Channel::Pen,
        }
    }

    /// Interprets `symbols` left to right with the standard alphabet.
    ///
    /// Primitives go to `sink` in scan order and capture boundaries to `frames`.
    /// Unknown symbols are ignored.
    ///
    /// # Push / Pop
    ///
    /// `[` saves the whole [`DrawState`] (position, heading, length, width, angle,
    /// colour indices, swap and target flags). `]` restores it and is a no-op on an
    /// empty stack. Pushes beyond `max_stack_depth` are dropped.
    ///
    /// # Polygons
    ///
    /// `{` starts recording vertices at the current position; every `F` or `f`
    /// appends the new position. `}` emits the polygon in the current fill colour.
    /// Polygons do not nest, and one still open at the end of the run is discarded.
    pub fn interpret<S, O>(&self, symbols: &str, sink: &mut S, frames: &mut O) -> RunSummary
    where
        S: PrimitiveSink,
        O: FrameObserver,
    {
        let mut run = TurtleRun::new(self, sink, frames);
        let mut stop = StopReason::Exhausted;
        for symbol in symbols.chars() {
            let op = TurtleOp::from_symbol(symbol);
            if let ControlFlow::Break(reason) = run.step(Trigger::Symbol(symbol), op) {
                stop = reason;
                break;
            }
        }
        run.finish(stop)
    }

    /// Interprets a [`SymbiosState`] through the registered symbol-ID map.
    ///
    /// Module parameters are not consulted; every op uses the turtle's current
    /// values. Symbol-triggered frames fire on IDs registered with
    /// [`set_frame_symbol`](Self::set_frame_symbol) or
    /// [`populate_standard_symbols`](Self::populate_standard_symbols).
    pub fn interpret_state<S, O>(
        &self,
        state: &SymbiosState,
        sink: &mut S,
        frames: &mut O,
    ) -> RunSummary
    where
        S: PrimitiveSink,
        O: FrameObserver,
    {
        if matches!(self.config.frame_trigger(), FrameTrigger::OnSymbols(_))
            && !self.frame_ids.contains(&true)
        {
            debug!(
                frame_symbols = %self.config.frame_symbols,
                "no frame symbol IDs registered, only the closing frame will be captured"
            );
        }

        let mut run = TurtleRun::new(self, sink, frames);
        let mut stop = StopReason::Exhausted;
        for i in 0..state.len() {
            let view = match state.get_view(i) {
                Some(v) => v,
                None => break,
            };

            let op = self
                .op_map
                .get(view.sym as usize)
                .copied()
                .unwrap_or(TurtleOp::Ignore);

            let trigger = self
                .frame_ids
                .get(view.sym as usize)
                .copied()
                .unwrap_or(false);

            if let ControlFlow::Break(reason) = run.step(Trigger::Id(trigger), op) {
                stop = reason;
                break;
            }
        }
        run.finish(stop)
    }
}

/// How the sampler learns which symbol was just read.
#[derive(Clone, Copy)]
enum Trigger {
    Symbol(char),
    /// Already resolved against the frame-symbol IDs.
    Id(bool),
}

/// Everything owned by a single interpretation.
struct TurtleRun<'a, S, O> {
    config: &'a DrawConfig,
    initial: DrawState,
    turtle: DrawState,
    stack: Vec<DrawState>,
    palette: Palette,
    polygon: Option<Vec<Vec2>>,
    length_increment: f32,
    width_increment: f32,
    dot_radius: f32,
    sampler: FrameSampler,
    sink: &'a mut S,
    frames: &'a mut O,
    emitted: usize,
    read: usize,
}

impl<'a, S, O> TurtleRun<'a, S, O>
where
    S: PrimitiveSink,
    O: FrameObserver,
{
    fn new(interpreter: &'a TurtleInterpreter, sink: &'a mut S, frames: &'a mut O) -> Self {
        let config = &interpreter.config;
        let initial = interpreter.initial_state();
        let mut run = Self {
            config,
            turtle: initial.clone(),
            initial,
            stack: Vec::new(),
            palette: Palette::new(&config.palette),
            polygon: None,
            length_increment: config.line_length_increment * config.scale,
            width_increment: config.width_increment * config.scale,
            dot_radius: config.default_dot_radius * config.scale,
            sampler: FrameSampler::new(config.frame_trigger(), config.max_frames)
                .with_initial_frame(config.initial_frame),
            sink,
            frames,
            emitted: 0,
            read: 0,
        };
        run.sampler.begin(&mut *run.frames);
        run
    }

    fn step(&mut self, trigger: Trigger, op: TurtleOp) -> ControlFlow<StopReason> {
        if let Some(max) = self.config.max_symbols_read
            && self.read >= max
        {
            return ControlFlow::Break(StopReason::SymbolLimit);
        }
        if let Some(max) = self.config.max_draws
            && self.emitted >= max
        {
            return ControlFlow::Break(StopReason::DrawLimit);
        }
        self.read += 1;

        match op {
            // --- MOVEMENT ---
            TurtleOp::Draw | TurtleOp::Move => {
                let from = self.turtle.position;
                let to = self.turtle.ahead(self.config.circle);
                self.turtle.position = to;
                if let Some(vertices) = &mut self.polygon {
                    vertices.push(to);
                }
                if op == TurtleOp::Draw && self.turtle.pen_down {
                    let color = self
                        .palette
                        .color(Channel::Pen, self.turtle.pen_color_index);
                    self.emit(DrawPrimitive::Segment {
                        from,
                        to,
                        width: self.turtle.line_width,
                        color,
                    });
                }
            }
            TurtleOp::Turn(sign) => self.turtle.turn(sign),
            TurtleOp::TurnAround => self.turtle.heading += self.config.circle / 2.0,
            TurtleOp::SwapTurns => self.turtle.swapped_turn = !self.turtle.swapped_turn,

            // --- PARAMETERS ---
            TurtleOp::Width(sign) => {
                let width = self.turtle.line_width + sign * self.width_increment;
                self.turtle.line_width = width.max(f32::MIN_POSITIVE);
            }
            TurtleOp::ResetWidth => self.turtle.line_width = self.initial.line_width,
            TurtleOp::ScaleLength { grow } => {
                let length = if grow {
                    self.turtle.line_length * self.config.length_scale_factor
                } else {
                    self.turtle.line_length / self.config.length_scale_factor
                };
                self.turtle.line_length = length.max(0.0);
            }
            TurtleOp::Length(sign) => {
                let length = self.turtle.line_length + sign * self.length_increment;
                self.turtle.line_length = length.max(0.0);
            }
            TurtleOp::ResetLength => self.turtle.line_length = self.initial.line_length,
            TurtleOp::Angle(sign) => {
                self.turtle.turn_angle += sign * self.turtle.turn_angle_increment;
            }
            TurtleOp::ResetAngle => self.turtle.turn_angle = self.initial.turn_angle,

            // --- GEOMETRY ---
            TurtleOp::Dot => {
                let radius = if self.turtle.line_width > 0.0 {
                    self.turtle.line_width
                } else {
                    self.dot_radius.max(0.0)
                };
                let color = self
                    .palette
                    .color(Channel::Fill, self.turtle.fill_color_index);
                self.emit(DrawPrimitive::Dot {
                    at: self.turtle.position,
                    radius,
                    color,
                });
            }
            TurtleOp::OpenPolygon => {
                if self.polygon.is_some() {
                    debug!(symbol_index = self.read - 1, "polygon already open, `{{` ignored");
                } else {
                    self.polygon = Some(vec![self.turtle.position]);
                }
            }
            TurtleOp::ClosePolygon => match self.polygon.take() {
                Some(vertices) => {
                    let fill_color = self
                        .palette
                        .color(Channel::Fill, self.turtle.fill_color_index);
                    self.emit(DrawPrimitive::Polygon {
                        vertices,
                        fill_color,
                    });
                }
                None => debug!(symbol_index = self.read - 1, "no open polygon, `}}` ignored"),
            },

            // --- COLOUR ---
            TurtleOp::SelectColor(digit) => {
                let index = digit as usize % PALETTE_SIZE;
                let channel = if (digit as usize) < PALETTE_SIZE {
                    self.turtle.target_channel
                } else {
                    Channel::Fill
                };
                match channel {
                    Channel::Pen => self.turtle.pen_color_index = index,
                    Channel::Fill => self.turtle.fill_color_index = index,
                }
                self.consume_target();
            }
            TurtleOp::Nudge { component, sign } => {
                self.palette
                    .nudge(self.turtle.target_channel, component, sign);
                self.consume_target();
            }
            TurtleOp::ToggleTarget => {
                self.turtle.target_channel = self.turtle.target_channel.toggled();
            }

            // --- FLOW ---
            TurtleOp::Push => {
                if self.stack.len() < self.config.max_stack_depth {
                    self.stack.push(self.turtle.clone());
                } else {
                    debug!(depth = self.stack.len(), "state stack full, push dropped");
                }
            }
            TurtleOp::Pop => match self.stack.pop() {
                Some(state) => self.turtle = state,
                None => debug!(symbol_index = self.read - 1, "pop on empty state stack ignored"),
            },
            TurtleOp::ClearStack => self.stack.clear(),
            TurtleOp::Halt => return ControlFlow::Break(StopReason::Halted),
            TurtleOp::Ignore => {}
        }

        match trigger {
            Trigger::Symbol(symbol) => {
                self.sampler
                    .observe_symbol(symbol, self.emitted, &mut *self.frames)
            }
            Trigger::Id(true) => self.sampler.force(self.emitted, &mut *self.frames),
            Trigger::Id(false) => {}
        }

        // Reaching the draw limit on the last symbol still counts as hitting it.
        if let Some(max) = self.config.max_draws
            && self.emitted >= max
        {
            return ControlFlow::Break(StopReason::DrawLimit);
        }
        ControlFlow::Continue(())
    }

    fn emit(&mut self, primitive: DrawPrimitive) {
        self.sink.emit(primitive);
        self.emitted += 1;
        self.sampler.observe_emit(self.emitted, &mut *self.frames);
    }

    /// Reverts a `#` retarget once it has been used, in [`TargetMode::NextOnly`].
    fn consume_target(&mut self) {
        if self.config.target_mode == TargetMode::NextOnly {
            self.turtle.target_channel = Channel::Pen;
        }
    }

    fn finish(mut self, stop: StopReason) -> RunSummary {
        if let Some(vertices) = &self.polygon {
            debug!(vertices = vertices.len(), "unclosed polygon discarded");
        }
        self.sampler.finish(self.emitted, &mut *self.frames);
        RunSummary {
            state: self.turtle,
            stack_depth: self.stack.len(),
            emitted: self.emitted,
            symbols_read: self.read,
            frames_captured: self.sampler.captured(),
            frames_attempted: self.sampler.attempted(),
            stop,
        }
    }
}
