use std::sync::Arc;

use itertools::Itertools;
use ndarray::ArrayViewD;
use num::clamp;
use smallvec::SmallVec;

use crate::error::NeighborhoodError;

/// Whether the mirror strategy repeats the edge pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Boundary {
    /// Edge is not duplicated: `2 1 | 0 1 2 3 | 2 1`.
    Single,
    /// Edge is duplicated: `1 0 | 0 1 2 3 | 3 2`.
    #[default]
    Double,
}

/// Signature of a caller supplied extension. Receives the bounded source and
/// the out-of-bounds coordinate, must return a value for any coordinate.
pub type ExtensionFn<T> = dyn Fn(&ArrayViewD<'_, T>, &[i64]) -> T + Send + Sync;

/// Out-of-bounds policy. Turns reads of a bounded array into a total
/// function over every integer coordinate.
pub enum OutOfBounds<T> {
    /// Reflects the coordinate at the borders.
    Mirror(Boundary),
    /// Wraps the coordinate around: `a b c d | a b c d | a b c d`.
    Periodic,
    /// Repeats the nearest edge value: `a a | a b c d | d d`.
    Border,
    /// Returns the same value for every outside coordinate.
    Constant(T),
    /// Delegates to a caller supplied function.
    Custom(Arc<ExtensionFn<T>>),
}

impl<T> OutOfBounds<T> {
    /// Wraps a closure as a `Custom` policy.
    pub fn custom<F>(extension: F) -> Self
    where
        F: Fn(&ArrayViewD<'_, T>, &[i64]) -> T + Send + Sync + 'static,
    {
        OutOfBounds::Custom(Arc::new(extension))
    }

    /// Maps an index along an axis of length `len` back into `0..len`.
    /// Returns `None` for policies that do not fold coordinates, and for an
    /// empty axis.
    pub fn fold_index(&self, index: i64, len: usize) -> Option<usize> {
        let len = i64::try_from(len).ok().filter(|len| *len > 0)?;
        let folded = match self {
            OutOfBounds::Mirror(Boundary::Single) => {
                if len == 1 {
                    0
                } else {
                    let period = 2 * len - 2;
                    let i = index.rem_euclid(period);
                    if i < len {
                        i
                    } else {
                        period - i
                    }
                }
            }
            OutOfBounds::Mirror(Boundary::Double) => {
                let period = 2 * len;
                let i = index.rem_euclid(period);
                if i < len {
                    i
                } else {
                    period - 1 - i
                }
            }
            OutOfBounds::Periodic => index.rem_euclid(len),
            OutOfBounds::Border => clamp(index, 0, len - 1),
            OutOfBounds::Constant(_) | OutOfBounds::Custom(_) => return None,
        };
        Some(folded as usize)
    }
}

impl<T: Clone> Clone for OutOfBounds<T> {
    fn clone(&self) -> Self {
        match self {
            OutOfBounds::Mirror(boundary) => OutOfBounds::Mirror(*boundary),
            OutOfBounds::Periodic => OutOfBounds::Periodic,
            OutOfBounds::Border => OutOfBounds::Border,
            OutOfBounds::Constant(value) => OutOfBounds::Constant(value.clone()),
            OutOfBounds::Custom(extension) => OutOfBounds::Custom(Arc::clone(extension)),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for OutOfBounds<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutOfBounds::Mirror(boundary) => f.debug_tuple("Mirror").field(boundary).finish(),
            OutOfBounds::Periodic => write!(f, "Periodic"),
            OutOfBounds::Border => write!(f, "Border"),
            OutOfBounds::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            OutOfBounds::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// A bounded array paired with an [`OutOfBounds`] policy, readable at any
/// integer coordinate.
#[derive(Clone, Debug)]
pub struct ExtendedSource<'a, T> {
    source: ArrayViewD<'a, T>,
    policy: OutOfBounds<T>,
}

impl<'a, T: Clone> ExtendedSource<'a, T> {
    /// Binds `policy` to `source`. Fails if some axis of `source` is empty,
    /// since nothing could then be folded back into it.
    pub fn new(source: ArrayViewD<'a, T>, policy: OutOfBounds<T>) -> Result<Self, NeighborhoodError> {
        if source.shape().iter().any(|len| *len == 0) {
            return Err(NeighborhoodError::EmptySource);
        }
        Ok(Self { source, policy })
    }

    pub fn num_dimensions(&self) -> usize {
        self.source.ndim()
    }

    pub fn source(&self) -> &ArrayViewD<'a, T> {
        &self.source
    }

    pub fn policy(&self) -> &OutOfBounds<T> {
        &self.policy
    }

    /// Whether `coord` addresses an element of the underlying array.
    pub fn is_inside(&self, coord: &[i64]) -> bool {
        coord
            .iter()
            .zip_eq(self.source.shape())
            .all(|(c, len)| *c >= 0 && (*c as u64) < *len as u64)
    }

    /// Reads the value at `coord`, asking the policy for a substitute when
    /// the coordinate falls outside the array.
    ///
    /// # Panics
    ///
    /// If `coord.len()` differs from the array dimensionality.
    pub fn get(&self, coord: &[i64]) -> T {
        let mut index: SmallVec<[usize; 4]> = SmallVec::with_capacity(coord.len());
        for (c, len) in coord.iter().zip_eq(self.source.shape()) {
            if *c >= 0 && (*c as u64) < *len as u64 {
                index.push(*c as usize);
                continue;
            }

            match self.policy.fold_index(*c, *len) {
                Some(folded) => index.push(folded),
                None => return self.outside_value(coord),
            }
        }
        self.source[index.as_slice()].clone()
    }

    fn outside_value(&self, coord: &[i64]) -> T {
        match &self.policy {
            OutOfBounds::Constant(value) => value.clone(),
            OutOfBounds::Custom(extension) => extension(&self.source, coord),
            // Folding policies never reach here.
            _ => unreachable!("folding policy without a folded index"),
        }
    }
}
