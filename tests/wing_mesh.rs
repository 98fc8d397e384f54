use std::f64::consts::PI;

use aeromesh::{
    Axis, Facet, Point3, PointSet, RbfKernel, SurfaceFitOptions, Tolerance, WingMesh,
    WingMeshOptions, WingPointSets, WingSide, cubic_bounds, extract_point_set, mesh_wing,
};

const ROOT_Y: f64 = 0.5;
const TIP_Y: f64 = 3.0;

fn leading_x(y: f64) -> f64 {
    0.2 * (y - ROOT_Y)
}

fn trailing_x(y: f64) -> f64 {
    1.2 - 0.1 * (y - ROOT_Y)
}

/// Skin point at chord fraction `s` (0 = leading edge) and span `y`.
fn skin(s: f64, y: f64, thickness: f64) -> Point3 {
    let chord = trailing_x(y) - leading_x(y);
    Point3::new(leading_x(y) + s * chord, y, thickness * chord * (PI * s).sin())
}

fn grid_facets(nu: usize, nv: usize, at: impl Fn(f64, f64) -> Point3) -> Vec<Facet> {
    let p = |i: usize, j: usize| at(i as f64 / (nu - 1) as f64, j as f64 / (nv - 1) as f64);
    let mut facets = Vec::new();
    for i in 0..nu - 1 {
        for j in 0..nv - 1 {
            facets.push(Facet::new(p(i, j), p(i + 1, j), p(i + 1, j + 1)));
            facets.push(Facet::new(p(i, j), p(i + 1, j + 1), p(i, j + 1)));
        }
    }
    facets
}

/// Line exports arrive as sliver triangles along the polyline.
fn line_facets(samples: usize, at: impl Fn(f64) -> Point3) -> Vec<Facet> {
    (0..samples - 1)
        .map(|i| {
            let a = at(i as f64 / (samples - 1) as f64);
            let b = at((i + 1) as f64 / (samples - 1) as f64);
            Facet::new(a, b, b)
        })
        .collect()
}

fn span(t: f64) -> f64 {
    ROOT_Y + t * (TIP_Y - ROOT_Y)
}

fn tapered_wing(chord_from: f64, chord_to: f64) -> WingPointSets {
    let chord = |s: f64| chord_from + s * (chord_to - chord_from);
    let extract = |facets: Vec<Facet>| extract_point_set(&facets).expect("extract point set");
    WingPointSets {
        upper: extract(grid_facets(7, 6, |s, t| skin(chord(s), span(t), 0.06))),
        lower: extract(grid_facets(7, 6, |s, t| skin(chord(s), span(t), -0.04))),
        leading_edge: extract(line_facets(6, |t| Point3::new(leading_x(span(t)), span(t), 0.0))),
        trailing_edge: extract(line_facets(6, |t| Point3::new(trailing_x(span(t)), span(t), 0.0))),
        upper_junction: extract(line_facets(7, |s| skin(s, ROOT_Y, 0.06))),
        lower_junction: extract(line_facets(7, |s| skin(s, ROOT_Y, -0.04))),
    }
}

fn options() -> WingMeshOptions {
    WingMeshOptions::default()
        .with_columns(6)
        .with_rows(9)
        .with_wake(20.0, 5)
        .with_fit(SurfaceFitOptions::radial_basis(RbfKernel::Multiquadric))
}

fn mesh() -> WingMesh {
    mesh_wing(&tapered_wing(0.0, 1.0), &options()).expect("mesh wing")
}

#[test]
fn networks_have_the_requested_shape() {
    let mesh = mesh();
    assert_eq!(mesh.upper.shape(), (6, 9));
    assert_eq!(mesh.lower.shape(), (6, 9));
    assert_eq!(mesh.tip.shape(), (2, 9));
    assert_eq!(mesh.root.shape(), (2, 9));
    assert_eq!(mesh.wake.shape(), (6, 5));
    for (role, network) in mesh.networks() {
        assert_eq!(network.non_finite_count(), 0, "{role}");
    }
}

#[test]
fn stations_span_root_to_tip() {
    let mesh = mesh();
    let tol = Tolerance::DEFAULT;
    let ys: Vec<f64> = mesh.upper.stations.iter().map(|s| s.points[0].y).collect();
    assert!(tol.approx_eq_f64(ys[0], ROOT_Y));
    assert_eq!(ys[5], TIP_Y);
    assert!(ys.windows(2).all(|w| w[0] < w[1]), "{ys:?}");
}

#[test]
fn station_ends_sit_on_the_edge_lines() {
    let mesh = mesh();
    let tol = Tolerance::DEFAULT;
    for (upper, lower) in mesh.upper.stations.iter().zip(&mesh.lower.stations).skip(1) {
        let te = upper.first().expect("trailing edge point");
        let le = upper.last().expect("leading edge point");
        let y = te.y;
        assert!(tol.approx_eq_point3(te, Point3::new(trailing_x(y), y, 0.0)));
        assert!(tol.approx_eq_point3(le, Point3::new(leading_x(y), y, 0.0)));
        assert_eq!(lower.first(), Some(le));
        assert_eq!(lower.last(), Some(te));
    }
}

#[test]
fn mid_chord_thickness_follows_the_section() {
    let mesh = mesh();
    for (upper, lower) in mesh.upper.stations.iter().zip(&mesh.lower.stations).skip(1) {
        let y = upper.points[0].y;
        let chord = trailing_x(y) - leading_x(y);
        let top = upper.points[4].z;
        let bottom = lower.points[4].z;
        assert!((top - 0.06 * chord).abs() < 0.006 * chord, "y = {y}: {top}");
        assert!((bottom + 0.04 * chord).abs() < 0.004 * chord, "y = {y}: {bottom}");
    }
}

#[test]
fn wake_extends_straight_downstream() {
    let mesh = mesh();
    for (wake, upper) in mesh.wake.stations.iter().zip(&mesh.upper.stations) {
        let anchor = upper.first().expect("trailing edge point");
        assert_eq!(wake.first(), Some(anchor));
        assert_eq!(wake.last().map(|p| p.x), Some(20.0));
        assert!(wake.points.windows(2).all(|w| w[0].x < w[1].x));
        assert!(wake.points.iter().all(|p| p.y == anchor.y && p.z == anchor.z));
    }
}

#[test]
fn left_wing_mirrors_the_right_wing() {
    let right = mesh();
    let left = mesh_wing(
        &tapered_wing(0.0, 1.0).mirrored(Axis::Y),
        &options().with_side(WingSide::Left),
    )
    .expect("mesh left wing");

    let expected = right.mirrored(Axis::Y);
    let tol = Tolerance::LOOSE;
    for ((role, a), (_, b)) in left.networks().into_iter().zip(expected.networks()) {
        assert_eq!(a.shape(), b.shape(), "{role}");
        for (p, q) in a.iter_points().zip(b.iter_points()) {
            assert!(tol.approx_eq_point3(*p, *q), "{role}: {p:?} vs {q:?}");
        }
    }
    assert_eq!(right.mirrored(Axis::Y).mirrored(Axis::Y), right);
}

#[test]
fn piecewise_linear_fit_inside_the_skin_is_finite() {
    let options = options().with_fit(SurfaceFitOptions::piecewise_linear());
    let mesh = mesh_wing(&tapered_wing(0.0, 1.0), &options).expect("mesh wing");
    assert_eq!(mesh.upper.non_finite_count(), 0);
    assert_eq!(mesh.lower.non_finite_count(), 0);
}

#[test]
fn piecewise_linear_fit_outside_the_skin_yields_nan() {
    // Skins cover only the middle of the chord; stations reach out to the edges.
    let options = options().with_fit(SurfaceFitOptions::piecewise_linear());
    let mesh = mesh_wing(&tapered_wing(0.2, 0.8), &options).expect("mesh wing");

    assert!(mesh.upper.non_finite_count() > 0);
    for station in &mesh.upper.stations {
        assert!(station.first().is_some_and(Point3::is_finite));
        assert!(station.last().is_some_and(Point3::is_finite));
    }
}

#[test]
fn plot_bounds_cover_every_network() {
    let mesh = mesh();
    let networks: Vec<_> = mesh.networks().into_iter().map(|(_, n)| n).collect();
    let cube = cubic_bounds(&networks).expect("bounds");

    let [dx, dy, dz] = cube.size();
    assert_eq!(dx, dy);
    assert_eq!(dy, dz);
    assert_eq!(cube.max.x, 20.0);
    for network in networks {
        assert!(network.iter_points().all(|p| {
            [p.x, p.y, p.z]
                .iter()
                .all(|c| *c >= cube.min.x && *c <= cube.max.x)
        }));
    }
}

#[test]
fn cleaned_mesh_keeps_its_shape() {
    let mesh = mesh();
    let cleaned = mesh.upper.dedup_consecutive(Tolerance::DEFAULT);
    assert_eq!(cleaned, mesh.upper);

    let points: PointSet =
        PointSet::from_points(mesh.upper.iter_points().copied()).expect("points");
    assert_eq!(points.len(), mesh.upper.point_count());
}
