//! Frame capture policy for animation export.
//!
//! A [`Frame`] does not copy geometry. It records how many primitives existed when it
//! was captured, so frame `k` is simply `primitives[..frame.primitive_count]`.

use crate::primitive::DrawPrimitive;
use serde::{Deserialize, Serialize};

/// A capture boundary in the primitive sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Position of this frame in the animation, starting at 0.
    pub index: usize,
    /// Number of primitives emitted when the frame was captured.
    pub primitive_count: usize,
}

impl Frame {
    /// The primitives visible in this frame.
    pub fn slice<'a>(&self, primitives: &'a [DrawPrimitive]) -> &'a [DrawPrimitive] {
        &primitives[..self.primitive_count.min(primitives.len())]
    }
}

/// Notified whenever a frame is captured.
pub trait FrameObserver {
    fn on_frame(&mut self, frame: Frame);
}

impl FrameObserver for Vec<Frame> {
    fn on_frame(&mut self, frame: Frame) {
        self.push(frame);
    }
}

/// Discards frames.
impl FrameObserver for () {
    fn on_frame(&mut self, _frame: Frame) {}
}

/// What causes a capture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameTrigger {
    /// Every time this many new primitives have been emitted.
    EveryDraws(usize),
    /// Every time one of these symbols is read.
    OnSymbols(String),
}

/// Decides when the interpreter's progress becomes a frame.
#[derive(Clone, Debug)]
pub struct FrameSampler {
    trigger: FrameTrigger,
    max_frames: Option<usize>,
    captured: usize,
    attempted: usize,
    last_count: Option<usize>,
    initial_frame: bool,
}

impl FrameSampler {
    pub fn new(trigger: FrameTrigger, max_frames: Option<usize>) -> Self {
        Self {
            trigger,
            max_frames,
            captured: 0,
            attempted: 0,
            last_count: None,
            initial_frame: false,
        }
    }

    /// Makes [`begin`](Self::begin) capture an empty frame before anything is drawn.
    ///
    /// Off by default: the first frame normally already shows the first primitive.
    pub fn with_initial_frame(mut self, enabled: bool) -> Self {
        self.initial_frame = enabled;
        self
    }

    /// Call once before the first symbol.
    pub fn begin(&mut self, observer: &mut impl FrameObserver) {
        if self.initial_frame {
            self.capture(0, observer);
        }
    }

    /// Frames actually recorded.
    pub fn captured(&self) -> usize {
        self.captured
    }

    /// Frames requested by the trigger, including those dropped by the cap.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn is_full(&self) -> bool {
        self.max_frames.is_some_and(|max| self.captured >= max)
    }

    /// Call after each emitted primitive with the new total.
    pub fn observe_emit(&mut self, emitted: usize, observer: &mut impl FrameObserver) {
        if let FrameTrigger::EveryDraws(every) = self.trigger
            && emitted % every.max(1) == 0
        {
            self.capture(emitted, observer);
        }
    }

    /// Call after each symbol has been fully processed.
    pub fn observe_symbol(
        &mut self,
        symbol: char,
        emitted: usize,
        observer: &mut impl FrameObserver,
    ) {
        if let FrameTrigger::OnSymbols(symbols) = &self.trigger
            && symbols.contains(symbol)
        {
            self.capture(emitted, observer);
        }
    }

    /// Captures unconditionally, for symbols already matched against the trigger
    /// by the caller.
    pub fn force(&mut self, emitted: usize, observer: &mut impl FrameObserver) {
        self.capture(emitted, observer);
    }

    /// Captures the final state unless it is already the latest frame.
    pub fn finish(&mut self, emitted: usize, observer: &mut impl FrameObserver) {
        if self.last_count != Some(emitted) {
            self.capture(emitted, observer);
        }
    }

    fn capture(&mut self, emitted: usize, observer: &mut impl FrameObserver) {
        self.attempted += 1;
        if self.is_full() {
            return;
        }
        let frame = Frame {
            index: self.captured,
            primitive_count: emitted,
        };
        self.captured += 1;
        self.last_count = Some(emitted);
        observer.on_frame(frame);
    }
}
