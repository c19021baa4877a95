use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayViewD, Axis, IxDyn};

use crate::{
    CoordinateTransformer, Error, Extent, GridCoordinates, GriddedData, Point, ProjectionInfo, Result, coordinatetransformer,
    projectionutil,
    reproject::{NumThreads, ReprojectOptions, sampling, transform_normalized},
};

/// Validates that the trailing axes of the data match the grid, returns the number of spatial planes
pub(super) fn plane_count(data: &ArrayViewD<f64>, grid: &GridCoordinates) -> Result<usize> {
    let ndim = data.ndim();
    if ndim < 2 {
        return Err(Error::InvalidArgument(format!(
            "Gridded data needs at least 2 dimensions, got {ndim}"
        )));
    }

    let shape = data.shape();
    let spatial = (shape[ndim - 2], shape[ndim - 1]);
    if spatial != grid.shape() {
        return Err(Error::SizeMismatch {
            size1: grid.shape(),
            size2: spatial,
        });
    }

    Ok(shape[..ndim - 2].iter().product())
}

/// Relative size of the axis used for an extent that has no width or height
const DEGENERATE_AXIS_SPREAD: f64 = 1e-9;

/// Upper bound of an axis that starts at `min`, widened when the axis is degenerate and needs multiple samples
fn axis_upper_bound(min: f64, max: f64, count: usize) -> f64 {
    if count > 1 && max <= min {
        min + min.abs().max(1.0) * DEGENERATE_AXIS_SPREAD
    } else {
        max
    }
}

/// Destination grid covering the reprojected source grid with the same amount of samples.
///
/// When only a single row or column of the source reprojects the extent is degenerate, the samples
/// along that axis are then spread over a tiny range starting at the projected coordinate.
pub(super) fn derive_destination_grid(
    src_grid: &GridCoordinates,
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
) -> Result<GridCoordinates> {
    let extent = projectionutil::get_projection_extent(source, dest, src_grid.x(), src_grid.y()).ok_or(Error::NoValidExtent)?;
    log::debug!(
        "Destination grid: {}x{} samples in [{}, {}] x [{}, {}]",
        src_grid.cols(),
        src_grid.rows(),
        extent.min_x,
        extent.max_x,
        extent.min_y,
        extent.max_y
    );

    let extent = Extent::new(
        extent.min_x,
        extent.min_y,
        axis_upper_bound(extent.min_x, extent.max_x, src_grid.cols()),
        axis_upper_bound(extent.min_y, extent.max_y, src_grid.rows()),
    );

    GridCoordinates::from_extent(&extent, src_grid.cols(), src_grid.rows())
}

/// The equivalent longitude one turn away when the longitude is outside of the source range
fn wrap_longitude(lon: f64, src_x: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (src_x.first(), src_x.last()) else {
        return lon;
    };

    let in_range = |val: &f64| (first..=last).contains(val);
    if in_range(&lon) {
        return lon;
    }

    [lon + 360.0, lon - 360.0].into_iter().find(in_range).unwrap_or(lon)
}

/// Transforms the destination cell locations (in place) to the source coordinate system
pub(super) fn back_project(
    locations: &mut [Point],
    transformer: &CoordinateTransformer,
    src_grid: &GridCoordinates,
    num_threads: NumThreads,
) -> Result<()> {
    let wrap = transformer.target().is_geographic();
    let project = |p: &mut Point| {
        let loc = transform_normalized(transformer, *p);
        *p = if wrap {
            Point::new(wrap_longitude(loc.x(), src_grid.x()), loc.y())
        } else {
            loc
        };
    };

    let thread_count = match num_threads {
        NumThreads::AllCpus => None,
        NumThreads::Count(val) => Some(val),
    };

    if thread_count.is_some_and(|count| count <= 1) || !cfg!(feature = "rayon") {
        locations.iter_mut().for_each(project);
    } else {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            let pool = super::create_scoped_thread_pool(num_threads)?;
            pool.install(|| locations.par_iter_mut().for_each(project));
        }
    }

    Ok(())
}

/// Samples every spatial plane of the data at the source locations of the destination cells
fn resample(
    data: &ArrayViewD<f64>,
    src_grid: &GridCoordinates,
    locations: &[Point],
    dest_shape: (usize, usize),
    opts: &ReprojectOptions,
) -> Result<ArrayD<f64>> {
    let planes = plane_count(data, src_grid)?;
    let src = data
        .to_shape((planes, src_grid.rows(), src_grid.cols()))
        .map_err(|e| Error::Runtime(format!("Failed to reshape source data: {e}")))?;

    let mut output = Array3::from_elem((planes, dest_shape.0, dest_shape.1), opts.fill_value);
    for (plane_index, mut dest_plane) in output.outer_iter_mut().enumerate() {
        let src_plane = src.index_axis(Axis(0), plane_index);
        for (value, loc) in dest_plane.iter_mut().zip(locations) {
            *value = sampling::sample(&src_plane, src_grid.x(), src_grid.y(), *loc, opts.method, opts.fill_value);
        }
    }

    let mut output_shape = data.shape()[..data.ndim() - 2].to_vec();
    output_shape.extend([dest_shape.0, dest_shape.1]);
    output
        .into_shape_with_order(IxDyn(&output_shape))
        .map_err(|e| Error::Runtime(format!("Failed to reshape reprojected data: {e}")))
}

/// Reprojects gridded data to a destination grid that covers the reprojected source grid.
///
/// The last two axes of `data` are the spatial (y, x) axes matching `src_grid`, leading axes
/// (e.g. time or level) are preserved. The destination grid has the same number of samples as the source grid.
pub fn reproject_grid(
    data: ArrayViewD<f64>,
    src_grid: &GridCoordinates,
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
    opts: &ReprojectOptions,
) -> Result<GriddedData> {
    plane_count(&data, src_grid)?;
    let dest_grid = derive_destination_grid(src_grid, source, dest)?;
    reproject_grid_to(data, src_grid, source, dest, &dest_grid, opts)
}

/// Reprojects gridded data onto the provided rectilinear destination grid
pub fn reproject_grid_to(
    data: ArrayViewD<f64>,
    src_grid: &GridCoordinates,
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
    dest_grid: &GridCoordinates,
    opts: &ReprojectOptions,
) -> Result<GriddedData> {
    plane_count(&data, src_grid)?;

    let mut locations = Vec::with_capacity(dest_grid.rows() * dest_grid.cols());
    for &y in dest_grid.y() {
        locations.extend(dest_grid.x().iter().map(|&x| Point::new(x, y)));
    }

    let transformer = coordinatetransformer::cached(dest, source)?;
    back_project(&mut locations, &transformer, src_grid, opts.num_threads)?;

    Ok(GriddedData {
        data: resample(&data, src_grid, &locations, dest_grid.shape(), opts)?,
        coordinates: dest_grid.clone(),
    })
}

/// Reprojects gridded data onto a destination meshgrid: `dest_x[[r, c]]`, `dest_y[[r, c]]` is the location of cell (r, c)
pub fn reproject_grid_to_mesh(
    data: ArrayViewD<f64>,
    src_grid: &GridCoordinates,
    source: &ProjectionInfo,
    dest: &ProjectionInfo,
    dest_x: ArrayView2<f64>,
    dest_y: ArrayView2<f64>,
    opts: &ReprojectOptions,
) -> Result<ArrayD<f64>> {
    plane_count(&data, src_grid)?;
    if dest_x.dim() != dest_y.dim() {
        return Err(Error::SizeMismatch {
            size1: dest_x.dim(),
            size2: dest_y.dim(),
        });
    }

    let mut locations: Vec<Point> = dest_x.iter().zip(dest_y.iter()).map(|(&x, &y)| Point::new(x, y)).collect();
    let transformer = coordinatetransformer::cached(dest, source)?;
    back_project(&mut locations, &transformer, src_grid, opts.num_threads)?;

    resample(&data, src_grid, &locations, dest_x.dim(), opts)
}

/// Meshgrid of the grid coordinates as (x, y) arrays shaped (rows, cols)
pub fn meshgrid(grid: &GridCoordinates) -> (Array2<f64>, Array2<f64>) {
    let x = Array2::from_shape_fn(grid.shape(), |(_, c)| grid.x()[c]);
    let y = Array2::from_shape_fn(grid.shape(), |(r, _)| grid.y()[r]);
    (x, y)
}
