//! Movable rectangle and ellipse neighborhoods over N-dimensional
//! [`ndarray`] data.
//!
//! A neighborhood is a window with a center and a per-axis half-extent
//! (`span`). Its cursors enumerate exactly the grid positions inside the
//! shape and read values through an [`OutOfBounds`] policy, so windows may
//! hang over the array borders.

pub mod config;
pub mod cursor;
pub mod ellipse_bounds;
pub mod error;
pub mod extension;
pub mod neighborhood;

#[cfg(test)]
mod unit_test;

pub use crate::config::{ExtensionConfig, NeighborhoodConfig};
pub use crate::cursor::{NeighborhoodCursor, Positions};
pub use crate::error::NeighborhoodError;
pub use crate::extension::{Boundary, ExtendedSource, OutOfBounds};
pub use crate::neighborhood::{
    AnyCursor, AnyNeighborhood, EllipseCursor, EllipseNeighborhood, Neighborhood,
    NeighborhoodCore, NeighborhoodState, RectangleCursor, RectangleNeighborhood, Shape,
};
