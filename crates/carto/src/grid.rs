//! Rectilinear grid coordinates and gridded data.

use ndarray::ArrayD;

use crate::{Error, Extent, Result};

/// The x (column) and y (row) coordinates of a rectilinear grid.
///
/// Both vectors are non-empty, finite and strictly ascending.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoordinates {
    x: Vec<f64>,
    y: Vec<f64>,
}

fn validate_axis(name: &str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::InvalidArgument(format!("Empty {name} coordinates")));
    }

    if let Some(val) = values.iter().find(|v| !v.is_finite()) {
        return Err(Error::InvalidArgument(format!("Non finite {name} coordinate: {val}")));
    }

    if let Some(i) = values.windows(2).position(|w| w[1] <= w[0]) {
        return Err(Error::InvalidArgument(format!(
            "{name} coordinates are not strictly ascending at index {}",
            i + 1
        )));
    }

    Ok(())
}

/// `count` evenly spaced values from `start` to `end` inclusive
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }

    let step = (end - start) / (count - 1) as f64;
    (0..count)
        .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
        .collect()
}

impl GridCoordinates {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        validate_axis("x", &x)?;
        validate_axis("y", &y)?;
        Ok(GridCoordinates { x, y })
    }

    /// Evenly subdivides the extent into `cols` x `rows` sample locations, the extent bounds are the outer samples
    pub fn from_extent(extent: &Extent, cols: usize, rows: usize) -> Result<Self> {
        if extent.is_undefined() {
            return Err(Error::InvalidArgument("Undefined extent".to_string()));
        }

        if cols == 0 || rows == 0 {
            return Err(Error::InvalidArgument(format!("Invalid grid size: {cols}x{rows}")));
        }

        if (cols > 1 && extent.width() <= 0.0) || (rows > 1 && extent.height() <= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "Extent ({} x {}) is too small for a {cols}x{rows} grid",
                extent.width(),
                extent.height()
            )));
        }

        Self::new(
            linspace(extent.min_x, extent.max_x, cols),
            linspace(extent.min_y, extent.max_y, rows),
        )
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn cols(&self) -> usize {
        self.x.len()
    }

    pub fn rows(&self) -> usize {
        self.y.len()
    }

    /// Shape of the spatial plane as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Extent spanned by the outer sample locations
    pub fn extent(&self) -> Extent {
        Extent::new(self.x[0], self.y[0], self.x[self.x.len() - 1], self.y[self.y.len() - 1])
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.extent().contains_point(crate::Point::new(x, y))
    }
}

/// Result of a grid or image reprojection: a freshly allocated array and the coordinates of its spatial axes
#[derive(Debug, Clone)]
pub struct GriddedData {
    pub data: ArrayD<f64>,
    pub coordinates: GridCoordinates,
}

impl GriddedData {
    pub fn x(&self) -> &[f64] {
        self.coordinates.x()
    }

    pub fn y(&self) -> &[f64] {
        self.coordinates.y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert!(GridCoordinates::new(vec![0.0, 1.0, 2.0], vec![5.0]).is_ok());
        assert!(GridCoordinates::new(vec![], vec![5.0]).is_err());
        assert!(GridCoordinates::new(vec![0.0, 0.0], vec![5.0]).is_err());
        assert!(GridCoordinates::new(vec![1.0, 0.0], vec![5.0]).is_err());
        assert!(GridCoordinates::new(vec![0.0, 1.0], vec![f64::NAN]).is_err());
    }

    #[test]
    fn subdivide_extent() {
        let grid = GridCoordinates::from_extent(&Extent::new(0.0, -10.0, 4.0, 10.0), 5, 3).unwrap();
        assert_eq!(grid.x(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(grid.y(), &[-10.0, 0.0, 10.0]);
        assert_eq!(grid.shape(), (3, 5));
        assert_eq!(grid.extent(), Extent::new(0.0, -10.0, 4.0, 10.0));
        assert!(grid.contains(4.0, -10.0));
        assert!(!grid.contains(4.1, 0.0));
    }

    #[test]
    fn subdivide_degenerate_extent() {
        let grid = GridCoordinates::from_extent(&Extent::new(1.0, 2.0, 1.0, 2.0), 1, 1).unwrap();
        assert_eq!(grid.x(), &[1.0]);
        assert_eq!(grid.y(), &[2.0]);

        assert!(GridCoordinates::from_extent(&Extent::new(1.0, 2.0, 1.0, 2.0), 2, 1).is_err());
        assert!(GridCoordinates::from_extent(&Extent::undefined(), 2, 2).is_err());
    }
}
