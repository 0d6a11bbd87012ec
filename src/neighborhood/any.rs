use ndarray::ArrayViewD;
use serde_derive::Deserialize;

use super::{
    EllipseCursor, EllipseNeighborhood, Neighborhood, NeighborhoodCore, RectangleCursor,
    RectangleNeighborhood,
};
use crate::{cursor::NeighborhoodCursor, error::NeighborhoodError, extension::OutOfBounds};

/// Shape discriminant of [`AnyNeighborhood`].
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rectangle,
    Ellipse,
}

/// Closed set of neighborhood shapes, dispatched with a `match` instead of a
/// trait object.
#[derive(Debug, Clone)]
pub enum AnyNeighborhood<'a, T> {
    Rectangle(RectangleNeighborhood<'a, T>),
    Ellipse(EllipseNeighborhood<'a, T>),
}

impl<'a, T: Clone + 'a> AnyNeighborhood<'a, T> {
    /// Single pixel neighborhood of the given `shape` at the origin of
    /// `source`.
    pub fn new(
        shape: Shape,
        source: ArrayViewD<'a, T>,
        policy: OutOfBounds<T>,
    ) -> Result<Self, NeighborhoodError> {
        Ok(match shape {
            Shape::Rectangle => {
                AnyNeighborhood::Rectangle(RectangleNeighborhood::with_source(source, policy)?)
            }
            Shape::Ellipse => AnyNeighborhood::Ellipse(EllipseNeighborhood::new(
                source,
                &[0, 0],
                &[0, 0],
                policy,
            )?),
        })
    }

    pub fn shape(&self) -> Shape {
        match self {
            AnyNeighborhood::Rectangle(_) => Shape::Rectangle,
            AnyNeighborhood::Ellipse(_) => Shape::Ellipse,
        }
    }
}

impl<'a, T> From<RectangleNeighborhood<'a, T>> for AnyNeighborhood<'a, T> {
    fn from(neighborhood: RectangleNeighborhood<'a, T>) -> Self {
        AnyNeighborhood::Rectangle(neighborhood)
    }
}

impl<'a, T> From<EllipseNeighborhood<'a, T>> for AnyNeighborhood<'a, T> {
    fn from(neighborhood: EllipseNeighborhood<'a, T>) -> Self {
        AnyNeighborhood::Ellipse(neighborhood)
    }
}

impl<'a, T: Clone + 'a> Neighborhood<'a, T> for AnyNeighborhood<'a, T> {
    type Cursor<'n> = AnyCursor<'n, 'a, T> where Self: 'n;

    fn core(&self) -> &NeighborhoodCore<'a, T> {
        match self {
            AnyNeighborhood::Rectangle(n) => n.core(),
            AnyNeighborhood::Ellipse(n) => n.core(),
        }
    }

    fn set_span(&mut self, span: &[i64]) -> Result<(), NeighborhoodError> {
        match self {
            AnyNeighborhood::Rectangle(n) => n.set_span(span),
            AnyNeighborhood::Ellipse(n) => n.set_span(span),
        }
    }

    fn set_position(&mut self, center: &[i64]) -> Result<(), NeighborhoodError> {
        match self {
            AnyNeighborhood::Rectangle(n) => n.set_position(center),
            AnyNeighborhood::Ellipse(n) => n.set_position(center),
        }
    }

    fn update_source(&mut self, source: ArrayViewD<'a, T>) -> Result<(), NeighborhoodError> {
        match self {
            AnyNeighborhood::Rectangle(n) => n.update_source(source),
            AnyNeighborhood::Ellipse(n) => n.update_source(source),
        }
    }

    fn size(&self) -> u64 {
        match self {
            AnyNeighborhood::Rectangle(n) => n.size(),
            AnyNeighborhood::Ellipse(n) => n.size(),
        }
    }

    fn cursor(&self) -> AnyCursor<'_, 'a, T> {
        match self {
            AnyNeighborhood::Rectangle(n) => AnyCursor::Rectangle(n.cursor()),
            AnyNeighborhood::Ellipse(n) => AnyCursor::Ellipse(n.cursor()),
        }
    }

    fn copy(&self) -> Self {
        match self {
            AnyNeighborhood::Rectangle(n) => AnyNeighborhood::Rectangle(n.copy()),
            AnyNeighborhood::Ellipse(n) => AnyNeighborhood::Ellipse(n.copy()),
        }
    }
}

/// Cursor of an [`AnyNeighborhood`].
#[derive(Debug, Clone)]
pub enum AnyCursor<'n, 'a, T> {
    Rectangle(RectangleCursor<'n, 'a, T>),
    Ellipse(EllipseCursor<'n, 'a, T>),
}

impl<'n, 'a, T: Clone + 'a> NeighborhoodCursor for AnyCursor<'n, 'a, T> {
    type Value = T;

    fn reset(&mut self) {
        match self {
            AnyCursor::Rectangle(c) => c.reset(),
            AnyCursor::Ellipse(c) => c.reset(),
        }
    }

    fn has_next(&self) -> bool {
        match self {
            AnyCursor::Rectangle(c) => c.has_next(),
            AnyCursor::Ellipse(c) => c.has_next(),
        }
    }

    fn fwd(&mut self) {
        match self {
            AnyCursor::Rectangle(c) => c.fwd(),
            AnyCursor::Ellipse(c) => c.fwd(),
        }
    }

    fn position(&self) -> &[i64] {
        match self {
            AnyCursor::Rectangle(c) => NeighborhoodCursor::position(c),
            AnyCursor::Ellipse(c) => NeighborhoodCursor::position(c),
        }
    }

    fn try_get(&self) -> Result<T, NeighborhoodError> {
        match self {
            AnyCursor::Rectangle(c) => c.try_get(),
            AnyCursor::Ellipse(c) => c.try_get(),
        }
    }

    fn jump_fwd(&mut self, steps: u64) {
        match self {
            AnyCursor::Rectangle(c) => c.jump_fwd(steps),
            AnyCursor::Ellipse(c) => c.jump_fwd(steps),
        }
    }
}

impl<'n, 'a, T: Clone + 'a> Iterator for AnyCursor<'n, 'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            AnyCursor::Rectangle(c) => c.next(),
            AnyCursor::Ellipse(c) => c.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            AnyCursor::Rectangle(c) => c.size_hint(),
            AnyCursor::Ellipse(c) => c.size_hint(),
        }
    }
}
