//! Spatial reference carried from a tile's stack to its output.

/// Affine geotransform and projection of a raster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoReference {
    /// GDAL-ordered affine coefficients, if the raster has any.
    pub geo_transform: Option<[f64; 6]>,
    /// Projection as WKT; empty when unknown.
    pub projection: String,
}

impl GeoReference {
    /// Creates a georeference from a geotransform and a WKT projection.
    pub fn new(geo_transform: [f64; 6], projection: impl Into<String>) -> Self {
        Self {
            geo_transform: Some(geo_transform),
            projection: projection.into(),
        }
    }

    /// North-up transform with square pixels.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_size: f64) -> Self {
        Self {
            geo_transform: Some([origin_x, pixel_size, 0.0, origin_y, 0.0, -pixel_size]),
            projection: String::new(),
        }
    }

    /// Returns the same georeference shifted to start at pixel
    /// `(col, row)` of this one.
    pub fn offset_by(&self, col: usize, row: usize) -> Self {
        let geo_transform = self.geo_transform.map(|gt| {
            let (c, r) = (col as f64, row as f64);
            [
                gt[0] + c * gt[1] + r * gt[2],
                gt[1],
                gt[2],
                gt[3] + c * gt[4] + r * gt[5],
                gt[4],
                gt[5],
            ]
        });
        Self {
            geo_transform,
            projection: self.projection.clone(),
        }
    }
}
