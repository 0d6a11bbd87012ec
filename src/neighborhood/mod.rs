mod any;
pub use any::{AnyCursor, AnyNeighborhood, Shape};

mod ellipse;
pub use ellipse::{EllipseCursor, EllipseNeighborhood};

mod rectangle;
pub use rectangle::{RectangleCursor, RectangleNeighborhood};

use ndarray::ArrayViewD;
use smallvec::SmallVec;

use crate::{
    cursor::NeighborhoodCursor,
    error::NeighborhoodError,
    extension::{ExtendedSource, OutOfBounds},
};

/// Center and per-axis half-extent of a neighborhood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborhoodState {
    center: Vec<i64>,
    span: Vec<i64>,
}

impl NeighborhoodState {
    /// Single point window at the origin.
    pub fn new(num_dims: usize) -> Self {
        Self {
            center: vec![0; num_dims],
            span: vec![0; num_dims],
        }
    }

    pub fn num_dimensions(&self) -> usize {
        self.span.len()
    }

    pub fn center(&self) -> &[i64] {
        &self.center
    }

    pub fn span(&self) -> &[i64] {
        &self.span
    }

    pub fn set_span(&mut self, span: &[i64]) -> Result<(), NeighborhoodError> {
        NeighborhoodError::check_dimensions(self.num_dimensions(), span.len())?;
        if let Some(d) = span.iter().position(|s| *s < 0) {
            return Err(NeighborhoodError::InvalidSpan(format!(
                "span[{}] = {} is negative",
                d, span[d]
            )));
        }
        check_window(&self.center, span)?;
        self.span.copy_from_slice(span);
        Ok(())
    }

    pub fn set_position(&mut self, center: &[i64]) -> Result<(), NeighborhoodError> {
        NeighborhoodError::check_dimensions(self.num_dimensions(), center.len())?;
        check_window(center, &self.span)?;
        self.center.copy_from_slice(center);
        Ok(())
    }

    /// Lowest coordinate of the bounding box along `d`.
    pub fn min(&self, d: usize) -> i64 {
        self.center[d] - self.span[d]
    }

    /// Highest coordinate of the bounding box along `d`.
    pub fn max(&self, d: usize) -> i64 {
        self.center[d] + self.span[d]
    }

    /// Extent of the bounding box along `d`.
    pub fn dimension(&self, d: usize) -> u64 {
        2 * self.span[d] as u64 + 1
    }
}

/// Every coordinate of the bounding box `center +/- span` must fit in an i64.
fn check_window(center: &[i64], span: &[i64]) -> Result<(), NeighborhoodError> {
    for (d, (c, s)) in center.iter().zip(span).enumerate() {
        if c.checked_sub(*s).is_none() || c.checked_add(*s).is_none() {
            return Err(NeighborhoodError::invalid_parameter(format!(
                "window {} +/- {} along dimension {} leaves the i64 coordinate range",
                c, s, d
            )));
        }
    }
    Ok(())
}

/// The policy lives in exactly one place: alone until a source is bound,
/// then inside the [`ExtendedSource`].
#[derive(Debug, Clone)]
enum Binding<'a, T> {
    Unbound(OutOfBounds<T>),
    Bound(ExtendedSource<'a, T>),
}

/// State shared by every shape: center, span, out-of-bounds policy and the
/// optional source view.
#[derive(Debug, Clone)]
pub struct NeighborhoodCore<'a, T> {
    state: NeighborhoodState,
    binding: Binding<'a, T>,
}

impl<'a, T: Clone> NeighborhoodCore<'a, T> {
    /// Unbound core, spanning a single pixel at the origin.
    pub fn new(num_dims: usize, policy: OutOfBounds<T>) -> Result<Self, NeighborhoodError> {
        if num_dims == 0 {
            return Err(NeighborhoodError::invalid_parameter(
                "neighborhood needs at least one dimension",
            ));
        }
        Ok(Self {
            state: NeighborhoodState::new(num_dims),
            binding: Binding::Unbound(policy),
        })
    }

    pub fn with_source(
        source: ArrayViewD<'a, T>,
        policy: OutOfBounds<T>,
    ) -> Result<Self, NeighborhoodError> {
        let mut core = Self::new(source.ndim(), policy)?;
        core.update_source(source)?;
        Ok(core)
    }

    pub fn state(&self) -> &NeighborhoodState {
        &self.state
    }

    pub fn num_dimensions(&self) -> usize {
        self.state.num_dimensions()
    }

    pub fn policy(&self) -> &OutOfBounds<T> {
        match &self.binding {
            Binding::Unbound(policy) => policy,
            Binding::Bound(extended) => extended.policy(),
        }
    }

    pub fn source(&self) -> Option<&ArrayViewD<'a, T>> {
        match &self.binding {
            Binding::Unbound(_) => None,
            Binding::Bound(extended) => Some(extended.source()),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    pub fn set_span(&mut self, span: &[i64]) -> Result<(), NeighborhoodError> {
        self.state.set_span(span)?;
        log::trace!("Neighborhood span set to {:?}", span);
        Ok(())
    }

    pub fn set_position(&mut self, center: &[i64]) -> Result<(), NeighborhoodError> {
        self.state.set_position(center)
    }

    /// Rebinds to `source`. Span and center are left untouched.
    pub fn update_source(&mut self, source: ArrayViewD<'a, T>) -> Result<(), NeighborhoodError> {
        NeighborhoodError::check_dimensions(self.num_dimensions(), source.ndim())?;
        log::debug!("Binding neighborhood to source of shape {:?}", source.shape());
        let extended = ExtendedSource::new(source, self.policy().clone())?;
        self.binding = Binding::Bound(extended);
        Ok(())
    }

    /// Value at any coordinate, extended out of bounds by the policy.
    pub fn value_at(&self, coord: &[i64]) -> Result<T, NeighborhoodError> {
        match &self.binding {
            Binding::Bound(extended) => Ok(extended.get(coord)),
            Binding::Unbound(_) => Err(NeighborhoodError::Unbound),
        }
    }
}

/// A movable, resizable window over an N-dimensional grid.
///
/// Implementors decide which positions belong to the shape; `size()` must
/// always match the number of positions their cursor visits.
pub trait Neighborhood<'a, T: Clone + 'a>: Sized {
    type Cursor<'n>: NeighborhoodCursor<Value = T> + Iterator<Item = T> + Clone
    where
        Self: 'n;

    fn core(&self) -> &NeighborhoodCore<'a, T>;

    fn set_span(&mut self, span: &[i64]) -> Result<(), NeighborhoodError>;

    fn set_position(&mut self, center: &[i64]) -> Result<(), NeighborhoodError>;

    fn update_source(&mut self, source: ArrayViewD<'a, T>) -> Result<(), NeighborhoodError>;

    /// Number of positions inside the shape for the current span. Does not
    /// depend on the center.
    fn size(&self) -> u64;

    /// Fresh, reset cursor over the shape.
    fn cursor(&self) -> Self::Cursor<'_>;

    /// Independent instance with equal span and center, sharing the source
    /// view and the policy.
    fn copy(&self) -> Self;

    fn localizing_cursor(&self) -> Self::Cursor<'_> {
        self.cursor()
    }

    fn iter(&self) -> Self::Cursor<'_> {
        self.cursor()
    }

    fn num_dimensions(&self) -> usize {
        self.core().num_dimensions()
    }

    fn span<'s>(&'s self) -> &'s [i64]
    where
        'a: 's,
    {
        self.core().state().span()
    }

    fn center<'s>(&'s self) -> &'s [i64]
    where
        'a: 's,
    {
        self.core().state().center()
    }

    fn min(&self, d: usize) -> i64 {
        self.core().state().min(d)
    }

    fn max(&self, d: usize) -> i64 {
        self.core().state().max(d)
    }

    fn dimension(&self, d: usize) -> u64 {
        self.core().state().dimension(d)
    }

    /// Value at the first position of the traversal.
    fn first_element(&self) -> Result<T, NeighborhoodError> {
        let mut cursor = self.cursor();
        cursor.fwd();
        cursor.try_get()
    }

    /// Translates the center by `distance`.
    fn move_by(&mut self, distance: &[i64]) -> Result<(), NeighborhoodError> {
        NeighborhoodError::check_dimensions(self.num_dimensions(), distance.len())?;
        let center: Option<SmallVec<[i64; 4]>> = self
            .center()
            .iter()
            .zip(distance)
            .map(|(c, step)| c.checked_add(*step))
            .collect();
        match center {
            Some(center) => self.set_position(&center),
            None => Err(center_overflow()),
        }
    }

    /// Sets the center coordinate along a single dimension.
    fn set_position_d(&mut self, position: i64, d: usize) -> Result<(), NeighborhoodError> {
        if d >= self.num_dimensions() {
            return Err(NeighborhoodError::invalid_parameter(format!(
                "dimension {} out of range for a {}D neighborhood",
                d,
                self.num_dimensions()
            )));
        }
        let mut center: SmallVec<[i64; 4]> = SmallVec::from_slice(self.center());
        center[d] = position;
        self.set_position(&center)
    }

    /// Moves the center one step forward along `d`.
    fn fwd(&mut self, d: usize) -> Result<(), NeighborhoodError> {
        let position = self.center().get(d).copied().unwrap_or_default();
        self.set_position_d(position.checked_add(1).ok_or_else(center_overflow)?, d)
    }

    /// Moves the center one step backward along `d`.
    fn bck(&mut self, d: usize) -> Result<(), NeighborhoodError> {
        let position = self.center().get(d).copied().unwrap_or_default();
        self.set_position_d(position.checked_sub(1).ok_or_else(center_overflow)?, d)
    }
}

fn center_overflow() -> NeighborhoodError {
    NeighborhoodError::invalid_parameter("center leaves the i64 coordinate range")
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use rstest::rstest;

    use super::{NeighborhoodCore, NeighborhoodState};
    use crate::{error::NeighborhoodError, extension::OutOfBounds, unit_test::ramp_4x4};

    #[test]
    fn verify_state_setters() {
        let mut state = NeighborhoodState::new(3);
        assert_eq!(state.span(), &[0, 0, 0]);
        assert_eq!(state.center(), &[0, 0, 0]);

        state.set_span(&[1, 2, 0]).unwrap();
        state.set_position(&[-4, 10, 7]).unwrap();
        assert_eq!(state.min(0), -5);
        assert_eq!(state.max(1), 12);
        assert_eq!(state.dimension(1), 5);
        assert_eq!(state.dimension(2), 1);
    }

    #[test]
    fn should_reject_negative_span() {
        let mut state = NeighborhoodState::new(2);
        assert!(matches!(
            state.set_span(&[1, -1]),
            Err(NeighborhoodError::InvalidSpan(_))
        ));
        assert_eq!(state.span(), &[0, 0]);
    }

    #[test]
    fn should_reject_dimension_mismatch() {
        let mut state = NeighborhoodState::new(2);
        assert_eq!(
            state.set_position(&[1, 2, 3]),
            Err(NeighborhoodError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(
            state.set_span(&[1]),
            Err(NeighborhoodError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn should_reject_unrepresentable_window() {
        let mut state = NeighborhoodState::new(2);
        state.set_position(&[i64::MIN, i64::MAX]).unwrap();
        assert_eq!(state.min(0), i64::MIN);
        assert_eq!(state.max(1), i64::MAX);

        assert!(matches!(
            state.set_span(&[0, 1]),
            Err(NeighborhoodError::InvalidParameter(_))
        ));
        assert!(matches!(
            state.set_span(&[1, 0]),
            Err(NeighborhoodError::InvalidParameter(_))
        ));
        assert_eq!(state.span(), &[0, 0]);

        state.set_position(&[0, 0]).unwrap();
        state.set_span(&[i64::MAX, i64::MAX]).unwrap();
        assert_eq!(state.min(0), -i64::MAX);
        assert!(matches!(
            state.set_position(&[1, 0]),
            Err(NeighborhoodError::InvalidParameter(_))
        ));
        assert_eq!(state.center(), &[0, 0]);
    }

    #[rstest]
    fn verify_core_binding(ramp_4x4: Array2<i32>) {
        let mut core = NeighborhoodCore::new(2, OutOfBounds::Constant(0)).unwrap();
        assert!(!core.is_bound());
        assert!(core.source().is_none());
        assert!(matches!(core.policy(), OutOfBounds::Constant(0)));
        assert_eq!(core.value_at(&[0, 0]), Err(NeighborhoodError::Unbound));

        core.set_span(&[1, 1]).unwrap();
        core.set_position(&[2, 2]).unwrap();
        core.update_source(ramp_4x4.view().into_dyn()).unwrap();

        assert!(core.is_bound());
        assert!(matches!(core.policy(), OutOfBounds::Constant(0)));
        assert_eq!(core.source().map(|source| source.shape().to_vec()), Some(vec![4, 4]));
        assert_eq!(core.state().span(), &[1, 1]);
        assert_eq!(core.state().center(), &[2, 2]);
        assert_eq!(core.value_at(&[1, 3]), Ok(7));
        assert_eq!(core.value_at(&[-1, 3]), Ok(0));
    }

    #[test]
    fn should_reject_zero_dimensions() {
        assert!(matches!(
            NeighborhoodCore::<u8>::new(0, OutOfBounds::Periodic),
            Err(NeighborhoodError::InvalidParameter(_))
        ));
    }

    #[test]
    fn should_reject_source_of_other_dimensionality() {
        let volume = ndarray::Array3::<u8>::zeros((2, 2, 2));
        let mut core = NeighborhoodCore::new(2, OutOfBounds::Periodic).unwrap();
        assert_eq!(
            core.update_source(volume.view().into_dyn()),
            Err(NeighborhoodError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert!(!core.is_bound());
    }
}
