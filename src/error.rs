/// Main error type for the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeighborhoodError {
    /// Span, center or source dimensionality disagrees with the
    /// neighborhood's fixed dimensionality.
    DimensionMismatch { expected: usize, actual: usize },
    /// A negative half-extent was given.
    InvalidSpan(String),
    /// The source array has an axis of length zero.
    EmptySource,
    /// A value was requested from a neighborhood without source.
    Unbound,
    /// Used when the user pass a logical invalid parameter to a function.
    InvalidParameter(String),
}

impl std::fmt::Display for NeighborhoodError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NeighborhoodError::DimensionMismatch { expected, actual } => write!(
                f,
                "Dimension mismatch: expected {} dimensions, got {}",
                expected, actual
            ),
            NeighborhoodError::InvalidSpan(err) => write!(f, "Invalid span: {}", err),
            NeighborhoodError::EmptySource => write!(f, "Source array has an empty axis"),
            NeighborhoodError::Unbound => write!(f, "Neighborhood is not bound to a source"),
            NeighborhoodError::InvalidParameter(err) => write!(f, "Parameter error: {}", err),
        }
    }
}

impl NeighborhoodError {
    /// Create a error with the kind `InvalidParameter`.
    /// # Arguments
    /// * `msg` - The error message.
    pub fn invalid_parameter<T: ToString>(msg: T) -> Self {
        NeighborhoodError::InvalidParameter(msg.to_string())
    }

    pub(crate) fn check_dimensions(expected: usize, actual: usize) -> Result<(), Self> {
        if expected != actual {
            return Err(NeighborhoodError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}

impl std::error::Error for NeighborhoodError {}
