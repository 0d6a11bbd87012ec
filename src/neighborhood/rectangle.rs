use ndarray::{ArrayView, ArrayViewD, Dimension};

use super::{Neighborhood, NeighborhoodCore};
use crate::{
    cursor::{size_hint, NeighborhoodCursor},
    error::NeighborhoodError,
    extension::OutOfBounds,
};

/// A movable nD rectangle, defined by a `span` array. The size of the
/// rectangle in dimension `d` is `2 * span[d] + 1`. Its cursors iterate
/// through the rectangle in raster order, dimension 0 varying fastest.
#[derive(Debug, Clone)]
pub struct RectangleNeighborhood<'a, T> {
    core: NeighborhoodCore<'a, T>,
}

impl<'a, T: Clone + 'a> RectangleNeighborhood<'a, T> {
    /// Instantiate an unbound rectangle with `num_dims` dimensions, centered
    /// on the origin and spanning a single pixel.
    pub fn new(num_dims: usize, policy: OutOfBounds<T>) -> Result<Self, NeighborhoodError> {
        log::debug!("Creating unbound {}D rectangle neighborhood", num_dims);
        Ok(Self {
            core: NeighborhoodCore::new(num_dims, policy)?,
        })
    }

    /// Instantiate a rectangle on `source`, with `policy` to return out of
    /// bounds values. Centered on the first pixel, spanning a single pixel.
    pub fn with_source<D: Dimension>(
        source: ArrayView<'a, T, D>,
        policy: OutOfBounds<T>,
    ) -> Result<Self, NeighborhoodError> {
        Ok(Self {
            core: NeighborhoodCore::with_source(source.into_dyn(), policy)?,
        })
    }

    /// Same as [`with_source`](Self::with_source) with a periodic policy.
    pub fn periodic<D: Dimension>(source: ArrayView<'a, T, D>) -> Result<Self, NeighborhoodError> {
        Self::with_source(source, OutOfBounds::Periodic)
    }
}

impl<'a, T: Clone + 'a> Neighborhood<'a, T> for RectangleNeighborhood<'a, T> {
    type Cursor<'n> = RectangleCursor<'n, 'a, T> where Self: 'n;

    fn core(&self) -> &NeighborhoodCore<'a, T> {
        &self.core
    }

    fn set_span(&mut self, span: &[i64]) -> Result<(), NeighborhoodError> {
        self.core.set_span(span)
    }

    fn set_position(&mut self, center: &[i64]) -> Result<(), NeighborhoodError> {
        self.core.set_position(center)
    }

    fn update_source(&mut self, source: ArrayViewD<'a, T>) -> Result<(), NeighborhoodError> {
        self.core.update_source(source)
    }

    /// Product of `2 * span[d] + 1`. Saturates at `u64::MAX`.
    fn size(&self) -> u64 {
        self.core
            .state()
            .span()
            .iter()
            .fold(1u64, |size, s| size.saturating_mul(2 * *s as u64 + 1))
    }

    fn cursor(&self) -> RectangleCursor<'_, 'a, T> {
        let mut cursor = RectangleCursor {
            owner: self,
            min: Vec::new(),
            max: Vec::new(),
            position: Vec::new(),
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

/// Raster order cursor over a [`RectangleNeighborhood`].
#[derive(Debug, Clone)]
pub struct RectangleCursor<'n, 'a, T> {
    owner: &'n RectangleNeighborhood<'a, T>,
    min: Vec<i64>,
    max: Vec<i64>,
    position: Vec<i64>,
    started: bool,
    remaining: u64,
}

impl<'n, 'a, T: Clone + 'a> NeighborhoodCursor for RectangleCursor<'n, 'a, T> {
    type Value = T;

    fn reset(&mut self) {
        let state = self.owner.core.state();
        let n = state.num_dimensions();
        self.min = (0..n).map(|d| state.min(d)).collect();
        self.max = (0..n).map(|d| state.max(d)).collect();
        self.position.clone_from(&self.min);
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

        for d in 0..self.position.len() {
            if self.position[d] < self.max[d] {
                self.position[d] += 1;
                return;
            }
            self.position[d] = self.min[d];
        }
    }

    fn position(&self) -> &[i64] {
        &self.position
    }

    fn try_get(&self) -> Result<T, NeighborhoodError> {
        self.owner.core.value_at(&self.position)
    }

    fn jump_fwd(&mut self, steps: u64) {
        // Odometer arithmetic, no need to step one by one.
        let mut steps = steps.min(self.remaining);
        if steps == 0 {
            return;
        }
        self.remaining -= steps;
        if !self.started {
            self.started = true;
            steps -= 1;
        }

        // Extents reach 2^64 for the widest spans.
        let mut carry = u128::from(steps);
        for d in 0..self.position.len() {
            if carry == 0 {
                break;
            }
            let min = i128::from(self.min[d]);
            let extent = (i128::from(self.max[d]) - min + 1) as u128;
            let offset = (i128::from(self.position[d]) - min) as u128 + carry;
            self.position[d] = (min + (offset % extent) as i128) as i64;
            carry = offset / extent;
        }
    }
}

impl<'n, 'a, T: Clone + 'a> Iterator for RectangleCursor<'n, 'a, T> {
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
