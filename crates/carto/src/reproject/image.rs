use ndarray::{ArrayD, ArrayViewD, IxDyn};

use crate::{
    AffineTransform, Error, GridCoordinates, GriddedData, Point, ProjectionInfo, Result, coordinatetransformer,
    reproject::{NumThreads, grid},
};

/// Channel value of pixels outside of the source image
const CHANNEL_FILL_VALUE: f64 = 255.0;

/// Reprojects an image shaped (rows, cols) or (rows, cols, channels).
///
/// Every destination pixel takes the value of the source pixel its location falls in, no interpolation is performed.
/// Pixels outside of the source image are 255 on every channel for channel images and NaN for single band images.
pub fn reproject_image(
    image: ArrayViewD<f64>,
    src_grid: &GridCoordinates,
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
) -> Result<GriddedData> {
    let shape = image.shape().to_vec();
    let channels = match shape.len() {
        2 => None,
        3 => Some(shape[2]),
        ndim => {
            return Err(Error::InvalidArgument(format!(
                "Images need 2 or 3 dimensions, got {ndim}"
            )));
        }
    };

    if (shape[0], shape[1]) != src_grid.shape() {
        return Err(Error::SizeMismatch {
            size1: src_grid.shape(),
            size2: (shape[0], shape[1]),
        });
    }

    let dest_grid = grid::derive_destination_grid(src_grid, source, dest)?;
    let (dest_rows, dest_cols) = dest_grid.shape();

    let mut locations = Vec::with_capacity(dest_rows * dest_cols);
    for &y in dest_grid.y() {
        locations.extend(dest_grid.x().iter().map(|&x| Point::new(x, y)));
    }

    let transformer = coordinatetransformer::cached(dest, source)?;
    grid::back_project(&mut locations, &transformer, src_grid, NumThreads::Count(1))?;

    let to_pixel = AffineTransform::from_grid(src_grid).invert()?;
    let pixel_index = |loc: Point| -> Option<(usize, usize)> {
        let pixel = to_pixel.apply(loc.x(), loc.y());
        let (col, row) = (pixel.x().floor(), pixel.y().floor());
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }

        let (col, row) = (col as usize, row as usize);
        (col < shape[1] && row < shape[0]).then_some((row, col))
    };

    let data = match channels {
        Some(channels) => {
            let mut output = ArrayD::from_elem(IxDyn(&[dest_rows, dest_cols, channels]), CHANNEL_FILL_VALUE);
            for (i, loc) in locations.iter().enumerate() {
                if let Some((row, col)) = pixel_index(*loc) {
                    let (dest_row, dest_col) = (i / dest_cols, i % dest_cols);
                    for channel in 0..channels {
                        output[&[dest_row, dest_col, channel][..]] = image[&[row, col, channel][..]];
                    }
                }
            }
            output
        }
        None => {
            let mut output = ArrayD::from_elem(IxDyn(&[dest_rows, dest_cols]), f64::NAN);
            for (i, loc) in locations.iter().enumerate() {
                if let Some((row, col)) = pixel_index(*loc) {
                    output[&[i / dest_cols, i % dest_cols][..]] = image[&[row, col][..]];
                }
            }
            output
        }
    };

    Ok(GriddedData {
        data,
        coordinates: dest_grid,
    })
}
