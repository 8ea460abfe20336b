use crate::palette::Rgb;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An immutable drawing instruction emitted by the turtle.
///
/// Primitives are produced strictly in the order their symbols were read; renderers
/// should treat the sequence as append-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawPrimitive {
    /// A straight line traced by `F`.
    Segment {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgb,
    },
    /// A filled disc placed by `@`.
    Dot { at: Vec2, radius: f32, color: Rgb },
    /// A filled outline closed by `}`. The first vertex is where `{` was read.
    Polygon { vertices: Vec<Vec2>, fill_color: Rgb },
}

impl DrawPrimitive {
    pub fn is_segment(&self) -> bool {
        matches!(self, DrawPrimitive::Segment { .. })
    }

    pub fn is_dot(&self) -> bool {
        matches!(self, DrawPrimitive::Dot { .. })
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, DrawPrimitive::Polygon { .. })
    }
}

/// Receives primitives as the interpreter produces them.
pub trait PrimitiveSink {
    fn emit(&mut self, primitive: DrawPrimitive);
}

impl PrimitiveSink for Vec<DrawPrimitive> {
    fn emit(&mut self, primitive: DrawPrimitive) {
        self.push(primitive);
    }
}

/// Counts primitives without storing them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrimitiveCounter {
    pub segments: usize,
    pub dots: usize,
    pub polygons: usize,
}

impl PrimitiveCounter {
    pub fn total(&self) -> usize {
        self.segments + self.dots + self.polygons
    }
}

impl PrimitiveSink for PrimitiveCounter {
    fn emit(&mut self, primitive: DrawPrimitive) {
        match primitive {
            DrawPrimitive::Segment { .. } => self.segments += 1,
            DrawPrimitive::Dot { .. } => self.dots += 1,
            DrawPrimitive::Polygon { .. } => self.polygons += 1,
        }
    }
}
