//! Synthesis of planar rupture surfaces from scalar rupture parameters.

use quake_core::{CheckPolicy, EngineConfig, QuakeError, Result, Tolerance};
use quake_math::geodetic::normalize_azimuth;
use quake_math::GeoPoint;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::nodal_plane::NodalPlane;
use crate::scaling::{MsrKind, ScalingRelation};
use crate::surface::PlanarSurface;

/// Depth range, in km, within which ruptures must fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismogenicLayer {
    pub upper: f64,
    pub lower: f64,
}

impl SeismogenicLayer {
    pub fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }

    pub fn thickness(&self) -> f64 {
        self.lower - self.upper
    }
}

/// Along-strike length and down-dip width of a rupture, in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuptureDimensions {
    pub length: f64,
    pub width: f64,
}

impl RuptureDimensions {
    /// Split `area` so that `length / width == aspect_ratio`.
    pub fn unbounded(area: f64, aspect_ratio: f64) -> Self {
        let width = (area / aspect_ratio).sqrt();
        Self {
            length: width * aspect_ratio,
            width,
        }
    }

    /// Like [`Self::unbounded`], but a width that would not fit between the
    /// layer bounds at the given dip is shrunk to fit, and the length grown
    /// to keep the area.
    pub fn from_area(area: f64, aspect_ratio: f64, dip: f64, layer: SeismogenicLayer) -> Self {
        let dims = Self::unbounded(area, aspect_ratio);
        let max_width = layer.thickness() / dip.to_radians().sin();
        if dims.width > max_width {
            debug!(
                width = dims.width,
                max_width, "rupture width clipped to the seismogenic layer"
            );
            Self {
                length: area / max_width,
                width: max_width,
            }
        } else {
            dims
        }
    }

    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Corners (tl, tr, bl, br) of a rupture centred on `hypocentre`.
///
/// With `ztor` the centre is moved vertically so that the top edge sits at
/// that depth. Returns the corners and the centre actually used.
pub fn corners_from_hypocentre(
    hypocentre: GeoPoint,
    area: f64,
    aspect_ratio: f64,
    plane: &NodalPlane,
    ztor: Option<f64>,
) -> ([GeoPoint; 4], GeoPoint) {
    let dims = RuptureDimensions::unbounded(area, aspect_ratio);
    let rdip = plane.dip().to_radians();
    let height = dims.width * rdip.sin();
    let hproj = dims.width * rdip.cos();
    let depth = ztor.map_or(hypocentre.depth, |z| z + height / 2.0);
    let centre = GeoPoint::new(hypocentre.lon, hypocentre.lat, depth);

    let strike = plane.strike();
    let up_dip = normalize_azimuth(strike - 90.0);
    let down_dip = normalize_azimuth(strike + 90.0);
    let backward = normalize_azimuth(strike + 180.0);
    let half_length = dims.length / 2.0;

    let top = centre.point_at(hproj / 2.0, -height / 2.0, up_dip);
    let bottom = centre.point_at(hproj / 2.0, height / 2.0, down_dip);
    let corners = [
        top.point_at(half_length, 0.0, backward),
        top.point_at(half_length, 0.0, strike),
        bottom.point_at(half_length, 0.0, backward),
        bottom.point_at(half_length, 0.0, strike),
    ];
    (corners, centre)
}

/// Corners (tl, tr, bl, br) of a rupture around `centre` that fits inside
/// the seismogenic layer.
///
/// The centre is first moved along the dip direction if the rupture would
/// stick out of the layer, then the corners are reached by walking along the
/// diagonals of the surface projection.
pub fn corners_within_layer(
    centre: GeoPoint,
    area: f64,
    aspect_ratio: f64,
    plane: &NodalPlane,
    layer: SeismogenicLayer,
) -> [GeoPoint; 4] {
    let strike = plane.strike();
    let rdip = plane.dip().to_radians();
    let dims = RuptureDimensions::from_area(area, aspect_ratio, plane.dip(), layer);
    let height = dims.width * rdip.sin();
    let hproj = dims.width * rdip.cos();
    let hheight = height / 2.0;

    // positive when the top edge is above the layer, negative when the
    // bottom edge is below it
    let mut vshift = layer.upper - centre.depth + hheight;
    if vshift < 0.0 {
        vshift = layer.lower - centre.depth - hheight;
        if vshift > 0.0 {
            vshift = 0.0;
        }
    }

    let centre = if vshift != 0.0 {
        let hshift = (vshift / rdip.tan()).abs();
        let az = if vshift < 0.0 {
            normalize_azimuth(strike + 270.0)
        } else {
            normalize_azimuth(strike + 90.0)
        };
        debug!(vshift, hshift, "rupture centre moved into the seismogenic layer");
        centre.point_at(hshift, vshift, az)
    } else {
        centre
    };

    let half_length = dims.length / 2.0;
    let half_proj = hproj / 2.0;
    let theta = (half_proj / half_length).atan().to_degrees();
    let hor_dist = half_length.hypot(half_proj);
    [
        centre.point_at(hor_dist, -hheight, normalize_azimuth(strike + 180.0 + theta)),
        centre.point_at(hor_dist, -hheight, normalize_azimuth(strike - theta)),
        centre.point_at(hor_dist, hheight, normalize_azimuth(strike + 180.0 - theta)),
        centre.point_at(hor_dist, hheight, normalize_azimuth(strike + theta)),
    ]
}

/// How the builder places a rupture relative to its reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStrategy {
    /// Centred on the hypocentre, optionally with a fixed top-edge depth.
    Hypocentre { ztor: Option<f64> },
    /// Around a centre point, kept within a depth layer.
    SeismogenicLayer(SeismogenicLayer),
}

/// Scalar description of one rupture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuptureParams {
    pub mag: f64,
    pub plane: NodalPlane,
    /// Hypocentre or rupture centre, depending on the strategy.
    pub location: GeoPoint,
    /// Overrides the area given by the scaling relation.
    #[serde(default)]
    pub area: Option<f64>,
}

/// Builds planar surfaces with a strategy and scaling relation chosen once.
#[derive(Clone, Copy)]
pub struct SurfaceBuilder {
    strategy: BuildStrategy,
    msr: &'static dyn ScalingRelation,
    aspect_ratio: f64,
    check: CheckPolicy,
    tolerance: Tolerance,
}

impl SurfaceBuilder {
    pub fn new(
        strategy: BuildStrategy,
        msr: MsrKind,
        aspect_ratio: f64,
        config: &EngineConfig,
    ) -> Self {
        Self {
            strategy,
            msr: msr.relation(),
            aspect_ratio,
            check: config.builder_check,
            tolerance: config.tolerance,
        }
    }

    pub fn strategy(&self) -> BuildStrategy {
        self.strategy
    }

    pub fn build(&self, params: &RuptureParams) -> Result<PlanarSurface> {
        if !(self.aspect_ratio > 0.0) {
            return Err(QuakeError::InvalidOperation(format!(
                "aspect ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        let plane = &params.plane;
        let area = params
            .area
            .unwrap_or_else(|| self.msr.median_area(params.mag, Some(plane.rake())));
        if !(area > 0.0) {
            return Err(QuakeError::InvalidOperation(format!(
                "rupture area must be positive, got {area}"
            )));
        }

        let (corners, hypocentre) = match self.strategy {
            BuildStrategy::Hypocentre { ztor } => {
                corners_from_hypocentre(params.location, area, self.aspect_ratio, plane, ztor)
            }
            BuildStrategy::SeismogenicLayer(layer) => {
                if !(layer.thickness() > 0.0) {
                    return Err(QuakeError::InvalidOperation(format!(
                        "seismogenic layer [{}, {}] has no thickness",
                        layer.upper, layer.lower
                    )));
                }
                if params.location.depth < layer.upper || params.location.depth > layer.lower {
                    return Err(QuakeError::InvalidOperation(format!(
                        "rupture centre depth {} is outside the seismogenic layer [{}, {}]",
                        params.location.depth, layer.upper, layer.lower
                    )));
                }
                let corners =
                    corners_within_layer(params.location, area, self.aspect_ratio, plane, layer);
                (corners, params.location)
            }
        };
        let surface = PlanarSurface::with_policy(
            plane.strike(),
            plane.dip(),
            corners,
            self.check,
            self.tolerance,
        )?;
        Ok(surface.with_hypocentre(hypocentre))
    }
}

/// Build one surface per source. Failures are reported per source id and
/// never stop the rest of the batch.
pub fn build_surfaces<'a, I>(
    builder: &SurfaceBuilder,
    sources: I,
) -> (Vec<(String, PlanarSurface)>, Vec<QuakeError>)
where
    I: IntoIterator<Item = (&'a str, RuptureParams)>,
{
    let mut built = Vec::new();
    let mut failed = Vec::new();
    for (id, params) in sources {
        match builder.build(&params) {
            Ok(surface) => built.push((id.to_string(), surface)),
            Err(e) => {
                warn!(source = id, error = %e, "failed to build rupture surface");
                failed.push(e.for_source(id));
            }
        }
    }
    (built, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RuptureSurface;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn plane(strike: f64, dip: f64) -> NodalPlane {
        NodalPlane::new(strike, dip, 0.0).unwrap()
    }

    #[test]
    fn test_dimensions_keep_area() {
        let dims = RuptureDimensions::unbounded(200.0, 2.0);
        assert_abs_diff_eq!(dims.length, 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dims.width, 10.0, epsilon = 1e-12);

        // 10 km layer at 30 degrees dip fits at most 20 km of width
        let layer = SeismogenicLayer::new(0.0, 10.0);
        let dims = RuptureDimensions::from_area(900.0, 1.0, 30.0, layer);
        assert_abs_diff_eq!(dims.width, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dims.length, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dims.area(), 900.0, epsilon = 1e-9);

        let dims = RuptureDimensions::from_area(100.0, 1.0, 30.0, layer);
        assert_abs_diff_eq!(dims.width, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_rupture_from_hypocentre() {
        let hypo = GeoPoint::new(0.0, 0.0, 10.0);
        let (corners, centre) = corners_from_hypocentre(hypo, 100.0, 1.0, &plane(0.0, 90.0), None);
        assert_eq!(centre, hypo);
        let [tl, tr, bl, br] = corners;
        assert_abs_diff_eq!(tl.depth, 5.0, epsilon = 1e-9);
        assert_eq!(tl.depth, tr.depth);
        assert_abs_diff_eq!(bl.depth, 15.0, epsilon = 1e-9);
        assert_eq!(bl.depth, br.depth);
        assert_abs_diff_eq!(tl.horizontal_distance(tr), 10.0, epsilon = 1e-9);
        assert!(tl.lat < 0.0 && tr.lat > 0.0);
    }

    #[test]
    fn test_ztor_override() {
        let hypo = GeoPoint::new(10.0, 45.0, 20.0);
        let (corners, centre) =
            corners_from_hypocentre(hypo, 100.0, 1.0, &plane(30.0, 90.0), Some(2.0));
        assert_abs_diff_eq!(corners[0].depth, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(corners[2].depth, 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(centre.depth, 7.0, epsilon = 1e-9);
        assert_eq!((centre.lon, centre.lat), (10.0, 45.0));
    }

    #[test]
    fn test_dipping_rupture_spans_dip() {
        let hypo = GeoPoint::new(0.0, 0.0, 10.0);
        let (corners, _) = corners_from_hypocentre(hypo, 100.0, 1.0, &plane(0.0, 30.0), None);
        let [tl, _, bl, _] = corners;
        // dips to the east for a north strike
        assert!(bl.lon > tl.lon);
        assert_abs_diff_eq!(bl.depth - tl.depth, 5.0, epsilon = 1e-9);
        let hproj = 10.0 * 30f64.to_radians().cos();
        assert_abs_diff_eq!(tl.horizontal_distance(bl), hproj, epsilon = 1e-4);
    }

    #[test]
    fn test_layer_shifts_shallow_rupture_down() {
        let layer = SeismogenicLayer::new(5.0, 20.0);
        let centre = GeoPoint::new(0.0, 0.0, 6.0);
        let corners = corners_within_layer(centre, 100.0, 1.0, &plane(0.0, 45.0), layer);
        let [tl, tr, bl, br] = corners;
        assert_abs_diff_eq!(tl.depth, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tr.depth, 5.0, epsilon = 1e-9);
        let height = 10.0 * 45f64.to_radians().sin();
        assert_abs_diff_eq!(bl.depth, 5.0 + height, epsilon = 1e-9);
        assert_abs_diff_eq!(br.depth, 5.0 + height, epsilon = 1e-9);
        // the shift is down-dip, i.e. towards the east for a north strike
        let mid_lon = (tl.lon + tr.lon + bl.lon + br.lon) / 4.0;
        assert!(mid_lon > 0.0);
    }

    #[test]
    fn test_layer_shifts_deep_rupture_up() {
        let layer = SeismogenicLayer::new(0.0, 12.0);
        let centre = GeoPoint::new(0.0, 0.0, 11.0);
        let corners = corners_within_layer(centre, 100.0, 1.0, &plane(0.0, 45.0), layer);
        assert_abs_diff_eq!(corners[2].depth, 12.0, epsilon = 1e-9);
        let mid_lon = corners.iter().map(|c| c.lon).sum::<f64>() / 4.0;
        assert!(mid_lon < 0.0);
    }

    #[test]
    fn test_layer_keeps_fitting_rupture() {
        let layer = SeismogenicLayer::new(0.0, 30.0);
        let centre = GeoPoint::new(0.0, 0.0, 15.0);
        let corners = corners_within_layer(centre, 100.0, 1.0, &plane(0.0, 90.0), layer);
        assert_abs_diff_eq!(corners[0].depth, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(corners[3].depth, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_builder_uses_scaling_relation() {
        let config = EngineConfig {
            builder_check: CheckPolicy::Always,
            ..EngineConfig::default()
        };
        let builder = SurfaceBuilder::new(
            BuildStrategy::Hypocentre { ztor: None },
            MsrKind::Peer,
            1.0,
            &config,
        );
        let params = RuptureParams {
            mag: 6.0,
            plane: plane(0.0, 90.0),
            location: GeoPoint::new(0.0, 0.0, 10.0),
            area: None,
        };
        let surface = builder.build(&params).unwrap();
        assert_relative_eq!(surface.area(), 100.0, max_relative = 1e-2);
        assert_eq!(surface.hypocentre(), Some(params.location));
    }

    #[test]
    fn test_build_surfaces_reports_failures() {
        let layer = SeismogenicLayer::new(0.0, 20.0);
        let builder = SurfaceBuilder::new(
            BuildStrategy::SeismogenicLayer(layer),
            MsrKind::WC1994,
            1.5,
            &EngineConfig::default(),
        );
        let ok = RuptureParams {
            mag: 6.5,
            plane: plane(10.0, 60.0),
            location: GeoPoint::new(12.0, 42.0, 10.0),
            area: None,
        };
        let too_deep = RuptureParams {
            location: GeoPoint::new(12.0, 42.0, 25.0),
            ..ok
        };
        let (built, failed) = build_surfaces(&builder, [("a", ok), ("b", too_deep), ("c", ok)]);
        assert_eq!(built.len(), 2);
        assert_eq!(built[0].0, "a");
        assert_eq!(built[1].0, "c");
        assert_eq!(failed.len(), 1);
        assert!(failed[0].to_string().starts_with("source b: "));
    }

    #[test]
    fn test_degenerate_layer_is_rejected() {
        let config = EngineConfig {
            builder_check: CheckPolicy::Never,
            ..EngineConfig::default()
        };
        let params = RuptureParams {
            mag: 6.0,
            plane: plane(0.0, 45.0),
            location: GeoPoint::new(0.0, 0.0, 10.0),
            area: None,
        };
        for layer in [SeismogenicLayer::new(10.0, 10.0), SeismogenicLayer::new(15.0, 5.0)] {
            let builder = SurfaceBuilder::new(
                BuildStrategy::SeismogenicLayer(layer),
                MsrKind::WC1994,
                1.0,
                &config,
            );
            let err = builder.build(&params).unwrap_err();
            assert!(matches!(err, QuakeError::InvalidOperation(_)));
            assert!(err.to_string().contains("has no thickness"));
        }
    }
}
