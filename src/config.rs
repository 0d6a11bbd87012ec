use ndarray::ArrayViewD;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;

use crate::{
    error::NeighborhoodError,
    extension::{Boundary, OutOfBounds},
    neighborhood::{AnyNeighborhood, Neighborhood, Shape},
};

/// Serializable out-of-bounds policy. Custom policies can only be set in
/// code.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionConfig<T> {
    MirrorSingle,
    MirrorDouble,
    Periodic,
    Border,
    Constant(T),
}

impl<T: Clone> ExtensionConfig<T> {
    pub fn to_policy(&self) -> OutOfBounds<T> {
        match self {
            ExtensionConfig::MirrorSingle => OutOfBounds::Mirror(Boundary::Single),
            ExtensionConfig::MirrorDouble => OutOfBounds::Mirror(Boundary::Double),
            ExtensionConfig::Periodic => OutOfBounds::Periodic,
            ExtensionConfig::Border => OutOfBounds::Border,
            ExtensionConfig::Constant(value) => OutOfBounds::Constant(value.clone()),
        }
    }
}

/// Neighborhood description, e.g.:
///
/// ```json
/// { "shape": "ellipse", "span": [3, 2], "center": [10, 4], "extension": "mirror_double" }
/// ```
///
/// Empty `span` and `center` default to zeros. A missing `extension` picks
/// the shape default: periodic for rectangles, mirror with edge duplication
/// for ellipses.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NeighborhoodConfig<T> {
    pub shape: Shape,
    #[serde(default)]
    pub span: Vec<i64>,
    #[serde(default)]
    pub center: Vec<i64>,
    pub extension: Option<ExtensionConfig<T>>,
}

impl<T: Clone> NeighborhoodConfig<T> {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            span: Vec::new(),
            center: Vec::new(),
            extension: None,
        }
    }

    pub fn span(&'_ mut self, value: &[i64]) -> &'_ mut NeighborhoodConfig<T> {
        self.span = value.to_vec();
        self
    }

    pub fn center(&'_ mut self, value: &[i64]) -> &'_ mut NeighborhoodConfig<T> {
        self.center = value.to_vec();
        self
    }

    pub fn extension(&'_ mut self, value: ExtensionConfig<T>) -> &'_ mut NeighborhoodConfig<T> {
        self.extension = Some(value);
        self
    }

    /// Policy to use, falling back to the shape default.
    pub fn policy(&self) -> OutOfBounds<T> {
        match (&self.extension, self.shape) {
            (Some(extension), _) => extension.to_policy(),
            (None, Shape::Rectangle) => OutOfBounds::Periodic,
            (None, Shape::Ellipse) => OutOfBounds::Mirror(Boundary::Double),
        }
    }

    /// Builds the described neighborhood over `source`.
    pub fn build<'a>(
        &self,
        source: ArrayViewD<'a, T>,
    ) -> Result<AnyNeighborhood<'a, T>, NeighborhoodError>
    where
        T: 'a,
    {
        let mut neighborhood = AnyNeighborhood::new(self.shape, source, self.policy())?;
        if !self.span.is_empty() {
            neighborhood.set_span(&self.span)?;
        }
        if !self.center.is_empty() {
            neighborhood.set_position(&self.center)?;
        }
        Ok(neighborhood)
    }
}

impl<T: Clone + DeserializeOwned> NeighborhoodConfig<T> {
    pub fn from_json_str(json: &str) -> Result<Self, NeighborhoodError> {
        serde_json::from_str(json).map_err(|err| {
            NeighborhoodError::invalid_parameter(format!("Invalid neighborhood config: {}", err))
        })
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, NeighborhoodError> {
        serde_json::from_reader(std::io::BufReader::new(reader)).map_err(|err| {
            NeighborhoodError::invalid_parameter(format!("Invalid neighborhood config: {}", err))
        })
    }
}
