use ndarray::{ArrayView, ArrayViewD, Dimension};

use super::{Neighborhood, NeighborhoodCore};
use crate::{
    cursor::{size_hint, NeighborhoodCursor},
    ellipse_bounds::EllipseBounds,
    error::NeighborhoodError,
    extension::{Boundary, OutOfBounds},
};

/// A movable 2D ellipse. `span[0]` and `span[1]` are the semi-axes along
/// dimensions 0 and 1. Each line along dimension 1 is a contiguous run along
/// dimension 0 whose half-width comes from [`EllipseBounds`].
#[derive(Debug, Clone)]
pub struct EllipseNeighborhood<'a, T> {
    core: NeighborhoodCore<'a, T>,
    bounds: EllipseBounds,
}

impl<'a, T: Clone + 'a> EllipseNeighborhood<'a, T> {
    /// Ellipse on a 2D `source`, centered on `center` with semi-axes
    /// `radiuses`.
    pub fn new<D: Dimension>(
        source: ArrayView<'a, T, D>,
        center: &[i64],
        radiuses: &[i64],
        policy: OutOfBounds<T>,
    ) -> Result<Self, NeighborhoodError> {
        NeighborhoodError::check_dimensions(2, source.ndim())?;

        let mut neighborhood = Self {
            core: NeighborhoodCore::new(2, policy)?,
            bounds: EllipseBounds::new(0, 0),
        };
        neighborhood.set_span(radiuses)?;
        neighborhood.set_position(center)?;
        neighborhood.update_source(source.into_dyn())?;
        Ok(neighborhood)
    }

    /// Same as [`new`](Self::new), mirroring with edge duplication.
    pub fn mirrored<D: Dimension>(
        source: ArrayView<'a, T, D>,
        center: &[i64],
        radiuses: &[i64],
    ) -> Result<Self, NeighborhoodError> {
        Self::new(source, center, radiuses, OutOfBounds::Mirror(Boundary::Double))
    }

    pub fn bounds(&self) -> &EllipseBounds {
        &self.bounds
    }
}

impl<'a, T: Clone + 'a> Neighborhood<'a, T> for EllipseNeighborhood<'a, T> {
    type Cursor<'n> = EllipseCursor<'n, 'a, T> where Self: 'n;

    fn core(&self) -> &NeighborhoodCore<'a, T> {
        &self.core
    }

    fn set_span(&mut self, span: &[i64]) -> Result<(), NeighborhoodError> {
        NeighborhoodError::check_dimensions(2, span.len())?;
        EllipseBounds::check_radii(span[0], span[1])?;
        self.core.set_span(span)?;
        self.bounds.update(span[0], span[1]);
        Ok(())
    }

    fn set_position(&mut self, center: &[i64]) -> Result<(), NeighborhoodError> {
        self.core.set_position(center)
    }

    fn update_source(&mut self, source: ArrayViewD<'a, T>) -> Result<(), NeighborhoodError> {
        self.core.update_source(source)
    }

    fn size(&self) -> u64 {
        self.bounds.pixel_count()
    }

    fn cursor(&self) -> EllipseCursor<'_, 'a, T> {
        let mut cursor = EllipseCursor {
            owner: self,
            center: [0, 0],
            ry: 0,
            row: 0,
            x_end: 0,
            position: [0, 0],
            started: false,
            remaining: 0,
        };
        cursor.reset();
        cursor
    }

    fn copy(&self) -> Self {
        self.clone()
    }
}

/// Scanline cursor over an [`EllipseNeighborhood`]. Lines are visited from
/// `center[1] - ry` to `center[1] + ry`, each one left to right.
#[derive(Debug, Clone)]
pub struct EllipseCursor<'n, 'a, T> {
    owner: &'n EllipseNeighborhood<'a, T>,
    center: [i64; 2],
    ry: i64,
    row: i64,
    x_end: i64,
    position: [i64; 2],
    started: bool,
    remaining: u64,
}

impl<'n, 'a, T> EllipseCursor<'n, 'a, T> {
    fn start_row(&mut self, row: i64) {
        let half_width = self.owner.bounds.half_width(row);
        self.row = row;
        self.position = [self.center[0] - half_width, self.center[1] + row];
        self.x_end = self.center[0] + half_width;
    }
}

impl<'n, 'a, T: Clone + 'a> NeighborhoodCursor for EllipseCursor<'n, 'a, T> {
    type Value = T;

    fn reset(&mut self) {
        let state = self.owner.core.state();
        self.center = [state.center()[0], state.center()[1]];
        self.ry = state.span()[1];
        self.start_row(-self.ry);
        self.started = false;
        self.remaining = self.owner.size();
    }

    fn has_next(&self) -> bool {
        self.remaining > 0
    }

    fn fwd(&mut self) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        if !self.started {
            self.started = true;
            return;
        }

        if self.position[0] < self.x_end {
            self.position[0] += 1;
        } else if self.row < self.ry {
            self.start_row(self.row + 1);
        }
    }

    fn position(&self) -> &[i64] {
        &self.position
    }

    fn try_get(&self) -> Result<T, NeighborhoodError> {
        self.owner.core.value_at(&self.position)
    }
}

impl<'n, 'a, T: Clone + 'a> Iterator for EllipseCursor<'n, 'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if !self.has_next() {
            return None;
        }
        self.fwd();
        Some(self.get())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        size_hint(self.remaining)
    }
}
