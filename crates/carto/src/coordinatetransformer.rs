use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use proj4rs::Proj;
use proj4rs::transform::transform;

use crate::{Error, Point, ProjectionInfo, Result};

/// Maximum number of transformers kept by [`cached`], the cache is cleared when it is exceeded
const CACHE_CAPACITY: usize = 64;

type TransformerCache = HashMap<(ProjectionInfo, ProjectionInfo), Arc<CoordinateTransformer>>;

static TRANSFORMER_CACHE: LazyLock<Mutex<TransformerCache>> = LazyLock::new(Default::default);

/// Transforms coordinates from a source to a target coordinate reference system.
///
/// Geographic coordinates are expressed in degrees on both sides of the transformation.
/// When source and target are equal the transformation is the exact identity.
pub struct CoordinateTransformer {
    source: ProjectionInfo,
    target: ProjectionInfo,
    projections: Option<(Proj, Proj)>,
}

impl CoordinateTransformer {
    pub fn new(source: &ProjectionInfo, target: &ProjectionInfo) -> Result<Self> {
        let projections = if source == target {
            None
        } else {
            Some((source.create_proj()?, target.create_proj()?))
        };

        Ok(CoordinateTransformer {
            source: source.clone(),
            target: target.clone(),
            projections,
        })
    }

    /// Transformer for the opposite direction
    pub fn inverse(&self) -> Result<Self> {
        Self::new(&self.target, &self.source)
    }

    pub fn is_identity(&self) -> bool {
        self.projections.is_none()
    }

    pub fn source(&self) -> &ProjectionInfo {
        &self.source
    }

    pub fn target(&self) -> &ProjectionInfo {
        &self.target
    }

    /// Transforms a single point, an error is returned when the point can not be represented in the target system
    pub fn transform_point(&self, point: Point) -> Result<Point> {
        let Some((source, target)) = &self.projections else {
            return Ok(point);
        };

        // proj4rs expects radians for geographic coordinates
        let mut p = if self.source.is_geographic() {
            (point.x().to_radians(), point.y().to_radians(), 0.0)
        } else {
            (point.x(), point.y(), 0.0)
        };

        transform(source, target, &mut p)?;

        let result = if self.target.is_geographic() {
            Point::new(p.0.to_degrees(), p.1.to_degrees())
        } else {
            Point::new(p.0, p.1)
        };

        if !crate::point::is_defined(result) {
            return Err(Error::Projection(format!(
                "Point ({}, {}) has no finite representation in the target system",
                point.x(),
                point.y()
            )));
        }

        Ok(result)
    }

    /// Transforms a single point, `None` if the point can not be represented in the target system
    pub fn try_transform(&self, point: Point) -> Option<Point> {
        self.transform_point(point).ok()
    }

    /// Transforms the points in place, points that fail to transform are set to NaN
    pub fn transform_points_in_place(&self, points: &mut [Point]) {
        if self.is_identity() {
            return;
        }

        for point in points.iter_mut() {
            *point = self.try_transform(*point).unwrap_or_else(crate::point::undefined);
        }
    }
}

impl std::fmt::Debug for CoordinateTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CoordinateTransformer({} -> {})", self.source, self.target)
    }
}

/// Returns a shared transformer for the projection pair, constructing it on first use
pub fn cached(source: &ProjectionInfo, target: &ProjectionInfo) -> Result<Arc<CoordinateTransformer>> {
    let key = (source.clone(), target.clone());

    {
        let cache = TRANSFORMER_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(transformer) = cache.get(&key) {
            log::trace!("Transformer cache hit: {transformer:?}");
            return Ok(Arc::clone(transformer));
        }
    }

    let transformer = Arc::new(CoordinateTransformer::new(source, target)?);
    log::debug!("Created {transformer:?}");

    let mut cache = TRANSFORMER_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    if cache.len() >= CACHE_CAPACITY {
        cache.clear();
    }
    cache.insert(key, Arc::clone(&transformer));

    Ok(transformer)
}
