//! Projection aware helpers for extents, angles and graphics.

mod angle;
mod extent;
mod shapes;

pub use angle::project_angle;
pub use extent::{get_projection_extent, get_projection_global_extent, project_extent};
pub use shapes::{project_graphic, project_graphics, project_shape};

pub(crate) use shapes::transform_shape_with;
