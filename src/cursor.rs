use crate::error::NeighborhoodError;

/// Restartable traversal over the positions of a neighborhood shape.
///
/// A freshly reset cursor sits *before* the first position: call
/// [`fwd`](Self::fwd) once to reach it. The number of `fwd` calls that
/// succeed after a reset always equals the owner's `size()`.
pub trait NeighborhoodCursor {
    type Value;

    /// Restarts the traversal, taking the owner's current span and center.
    fn reset(&mut self);

    /// Whether another call to `fwd` lands on a position inside the shape.
    fn has_next(&self) -> bool;

    /// Moves to the next position. Does nothing once exhausted.
    fn fwd(&mut self);

    /// Current absolute grid coordinate.
    fn position(&self) -> &[i64];

    /// Value at the current position, extended out of bounds by the owner's
    /// policy. Fails with `Unbound` if the owner has no source.
    fn try_get(&self) -> Result<Self::Value, NeighborhoodError>;

    /// Same as [`try_get`](Self::try_get).
    ///
    /// # Panics
    ///
    /// If the owner neighborhood has no source.
    fn get(&self) -> Self::Value {
        match self.try_get() {
            Ok(value) => value,
            Err(err) => panic!("Cannot read cursor value: {}", err),
        }
    }

    fn localize(&self, out: &mut [i64]) {
        out.copy_from_slice(self.position());
    }

    fn get_long_position(&self, d: usize) -> i64 {
        self.position()[d]
    }

    fn jump_fwd(&mut self, steps: u64) {
        for _ in 0..steps {
            self.fwd();
        }
    }

    /// Turns the cursor into an iterator over coordinates. Does not need a
    /// bound source.
    fn positions(self) -> Positions<Self>
    where
        Self: Sized,
    {
        Positions { cursor: self }
    }
}

/// Iterator over the remaining coordinates of a cursor.
#[derive(Clone, Debug)]
pub struct Positions<C> {
    cursor: C,
}

impl<C: NeighborhoodCursor> Iterator for Positions<C> {
    type Item = Vec<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.has_next() {
            return None;
        }
        self.cursor.fwd();
        Some(self.cursor.position().to_vec())
    }
}

/// Converts a remaining element count into an iterator size hint.
pub(crate) fn size_hint(remaining: u64) -> (usize, Option<usize>) {
    match usize::try_from(remaining) {
        Ok(remaining) => (remaining, Some(remaining)),
        Err(_) => (usize::MAX, None),
    }
}
