use approx::assert_abs_diff_eq;
use quake_core::traits::BoundingBox;
use quake_core::{CheckPolicy, EngineConfig};
use quake_math::geodetic::min_geodetic_distance;
use quake_math::GeoPoint;
use quake_surface::{
    BuildStrategy, MsrKind, NodalPlane, PlanarSurface, PointBatch, RuptureParams,
    RuptureSurface, SurfaceBuilder,
};

fn checked_config() -> EngineConfig {
    EngineConfig {
        builder_check: CheckPolicy::Always,
        ..EngineConfig::default()
    }
}

fn rupture(strike: f64, dip: f64, area: f64, aspect_ratio: f64, hypo: GeoPoint) -> PlanarSurface {
    let builder = SurfaceBuilder::new(
        BuildStrategy::Hypocentre { ztor: None },
        MsrKind::WC1994,
        aspect_ratio,
        &checked_config(),
    );
    let params = RuptureParams {
        mag: 6.0,
        plane: NodalPlane::new(strike, dip, 90.0).unwrap(),
        location: hypo,
        area: Some(area),
    };
    builder.build(&params).unwrap()
}

#[test]
fn test_vertical_rupture_above_centre() {
    let hypo = GeoPoint::new(0.0, 0.0, 10.0);
    let surface = rupture(0.0, 90.0, 100.0, 1.0, hypo);
    assert_abs_diff_eq!(surface.top_edge_depth(), 5.0, epsilon = 1e-9);

    let site = PointBatch::from_points(&[GeoPoint::surface(0.0, 0.0)]);
    // the closest point of the rupture is the middle of its top edge
    assert_abs_diff_eq!(surface.min_distance(&site)[0], 5.0, epsilon = 1e-2);
    assert_abs_diff_eq!(surface.joyner_boore_distance(&site)[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(surface.rx_distance(&site)[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(surface.repi_distance(&site).unwrap()[0], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(surface.rhypo_distance(&site).unwrap()[0], 10.0, epsilon = 1e-9);
}

#[test]
fn test_dipping_rupture_far_site() {
    let surface = rupture(0.0, 45.0, 100.0, 1.0, GeoPoint::new(0.0, 0.0, 10.0));
    let (lon, lat) = quake_math::geodetic::point_at(0.0, 0.0, 90.0, 200.0);
    let sites = PointBatch::from_points(&[GeoPoint::surface(lon, lat), GeoPoint::surface(-lon, lat)]);

    let half_diagonal = surface.length().hypot(surface.width()) / 2.0;
    let rjb = surface.joyner_boore_distance(&sites);
    let rrup = surface.min_distance(&sites);
    let repi = surface.repi_distance(&sites).unwrap();
    for i in 0..2 {
        assert!(rjb[i] <= repi[i]);
        assert!(repi[i] - rjb[i] <= half_diagonal);
        assert!((rrup[i] - rjb[i]).abs() <= half_diagonal);
    }

    // dipping east under a north strike: east is the hanging wall
    let rx = surface.rx_distance(&sites);
    assert!(rx[0] > 195.0);
    assert!(rx[1] < -195.0);
}

#[test]
fn test_joyner_boore_regions() {
    let surface = rupture(0.0, 30.0, 200.0, 2.0, GeoPoint::new(0.0, 0.0, 10.0));
    assert_abs_diff_eq!(surface.length(), 20.0, epsilon = 0.05);
    assert_abs_diff_eq!(surface.width(), 10.0, epsilon = 0.05);

    let [tl, tr, bl, _] = *surface.corners();
    let lons = surface.corners().map(|c| c.lon);
    let lats = surface.corners().map(|c| c.lat);
    let corner_distance = |p: GeoPoint| min_geodetic_distance(&lons, &lats, p.lon, p.lat);

    // beyond the corners
    let corners = [(0.2, 0.2), (0.2, -0.2), (-0.2, 0.2), (-0.2, -0.2)]
        .map(|(lon, lat)| GeoPoint::surface(lon, lat));
    let rjb = surface.joyner_boore_distance(&PointBatch::from_points(&corners));
    for (p, d) in corners.iter().zip(rjb) {
        assert_abs_diff_eq!(d, corner_distance(*p), epsilon = 1e-9);
    }

    // beyond the edges, each paired with its foot on the nearest edge
    let edges = [
        (GeoPoint::surface(0.0, 0.2), GeoPoint::surface(0.0, tr.lat)),
        (GeoPoint::surface(0.0, -0.2), GeoPoint::surface(0.0, tl.lat)),
        (GeoPoint::surface(0.2, 0.0), GeoPoint::surface(bl.lon, 0.0)),
        (GeoPoint::surface(-0.2, 0.0), GeoPoint::surface(tl.lon, 0.0)),
    ];
    let sites: Vec<_> = edges.iter().map(|(p, _)| *p).collect();
    let rjb = surface.joyner_boore_distance(&PointBatch::from_points(&sites));
    for ((p, foot), d) in edges.iter().zip(rjb) {
        assert_abs_diff_eq!(d, p.horizontal_distance(*foot), epsilon = 1e-3);
        assert!(d < corner_distance(*p));
    }

    // inside the footprint
    let inside = surface.joyner_boore_distance(&PointBatch::from_points(&[GeoPoint::surface(0.0, 0.0)]));
    assert_eq!(inside[0], 0.0);
}

#[test]
fn test_bounding_box_across_antimeridian() {
    let surface = rupture(0.0, 45.0, 100.0, 1.0, GeoPoint::new(179.99, 0.0, 10.0));
    let lons = surface.corners().map(|c| c.lon);
    assert!(lons.iter().any(|&lon| lon > 0.0) && lons.iter().any(|&lon| lon < 0.0));

    let bbox = surface.bounding_box().unwrap();
    assert!(bbox.crosses_antimeridian());
    assert!(bbox.west > 179.9 && bbox.east < -179.9);
    assert!(bbox.lon_span() < 0.1);
    assert!(bbox.contains(180.0, 0.0));
    assert!(!bbox.contains(0.0, 0.0));
}

#[test]
fn test_footprint_interior_distances() {
    for (strike, dip) in [(0.0, 90.0), (30.0, 60.0), (215.0, 20.0)] {
        let surface = rupture(strike, dip, 150.0, 1.5, GeoPoint::new(20.0, 40.0, 12.0));
        let basis = *surface.basis();
        let (x, y) = (basis.length * 0.3, basis.width * 0.6);

        let offsets = [-3.0, 0.0, 2.5];
        let sites: Vec<_> = offsets
            .iter()
            .map(|&d| GeoPoint::from_cartesian(basis.project_back(d, x, y)))
            .collect();
        let rrup = surface.min_distance(&PointBatch::from_points(&sites));
        for (d, r) in offsets.iter().zip(rrup) {
            assert_abs_diff_eq!(r, d.abs(), epsilon = 1e-6);
        }

        let on_plane = GeoPoint::from_cartesian(basis.project_back(0.0, x, y));
        let above = PointBatch::from_points(&[GeoPoint::surface(on_plane.lon, on_plane.lat)]);
        assert_abs_diff_eq!(surface.joyner_boore_distance(&above)[0], 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_joyner_boore_vanishes_at_corners() {
    for (strike, dip) in [(0.0, 90.0), (30.0, 60.0), (300.0, 15.0)] {
        let surface = rupture(strike, dip, 80.0, 2.0, GeoPoint::new(-120.0, 35.0, 15.0));
        let corners: Vec<_> = surface
            .corners()
            .iter()
            .map(|c| GeoPoint::surface(c.lon, c.lat))
            .collect();
        for d in surface.joyner_boore_distance(&PointBatch::from_points(&corners)) {
            assert_abs_diff_eq!(d, 0.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_rebuilt_from_corners_keeps_dimensions() {
    let built = rupture(40.0, 50.0, 120.0, 1.2, GeoPoint::new(5.0, -10.0, 14.0));
    let [tl, tr, bl, br] = *built.corners();
    let rebuilt = PlanarSurface::from_corner_points(tl, tr, br, bl).unwrap();
    assert_abs_diff_eq!(rebuilt.width(), built.width(), epsilon = built.width() * 1e-6);
    assert_abs_diff_eq!(rebuilt.length(), built.length(), epsilon = built.length() * 1e-6);
    assert_abs_diff_eq!(rebuilt.strike(), 40.0, epsilon = 1e-3);
    assert_abs_diff_eq!(rebuilt.dip(), 50.0, epsilon = 0.1);
}
