use crate::geom::{
    Axis, ConfigurationError, MeshError, Point3, PointSet, RbfKernel, Spacing, SurfaceFitOptions,
    Tolerance, WingMesh, WingMeshOptions, WingPointSets, WingSide, mesh_wing,
};

fn set(points: &[(f64, f64, f64)]) -> PointSet {
    PointSet::from_points(points.iter().map(|&(x, y, z)| Point3::new(x, y, z))).unwrap()
}

/// Flat 1 x 2 plate: leading edge at x = 0, trailing edge at x = 1, span 0..2.
fn square_plate() -> WingPointSets {
    let skin = [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 2.0, 0.0), (0.0, 2.0, 0.0)];
    WingPointSets {
        upper: set(&skin),
        lower: set(&skin),
        leading_edge: set(&[(0.0, 0.0, 0.0), (0.0, 2.0, 0.0)]),
        trailing_edge: set(&[(1.0, 0.0, 0.0), (1.0, 2.0, 0.0)]),
        upper_junction: set(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]),
        lower_junction: set(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]),
    }
}

fn plate_options() -> WingMeshOptions {
    WingMeshOptions::default()
        .with_columns(3)
        .with_rows(4)
        .with_wake(10.0, 3)
        .with_side(WingSide::Right)
}

#[test]
fn square_plate_network_shapes() {
    let mesh = mesh_wing(&square_plate(), &plate_options()).unwrap();

    assert_eq!(mesh.upper.shape(), (3, 4));
    assert_eq!(mesh.lower.shape(), (3, 4));
    assert_eq!(mesh.tip.shape(), (2, 4));
    assert_eq!(mesh.root.shape(), (2, 4));
    assert_eq!(mesh.wake.shape(), (3, 3));
    for (role, network) in mesh.networks() {
        assert!(network.is_rectangular(), "{role}");
        assert_eq!(network.non_finite_count(), 0, "{role}");
    }
}

#[test]
fn square_plate_stations_and_wake() {
    let tol = Tolerance::DEFAULT;
    let mesh = mesh_wing(&square_plate(), &plate_options()).unwrap();

    let span: Vec<f64> = mesh.upper.stations.iter().map(|s| s.points[0].y).collect();
    assert_eq!(span, vec![0.0, 1.0, 2.0]);

    for station in &mesh.upper.stations {
        let xs: Vec<f64> = station.points.iter().map(|p| p.x).collect();
        for (x, expected) in xs.iter().zip([1.0, 2.0 / 3.0, 1.0 / 3.0, 0.0]) {
            assert!(tol.approx_eq_f64(*x, expected), "{xs:?}");
        }
        assert!(station.points.iter().all(|p| p.z.abs() < 1e-12));
    }

    for station in &mesh.wake.stations {
        let xs: Vec<f64> = station.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 5.5, 10.0]);
    }
}

#[test]
fn boundary_points_come_from_the_edges() {
    let mesh = mesh_wing(&square_plate(), &plate_options()).unwrap();
    for (upper, lower) in mesh.upper.stations.iter().zip(&mesh.lower.stations).skip(1) {
        let y = upper.points[0].y;
        assert_eq!(upper.first(), Some(Point3::new(1.0, y, 0.0)));
        assert_eq!(upper.last(), Some(Point3::new(0.0, y, 0.0)));
        assert_eq!(lower.first(), Some(Point3::new(0.0, y, 0.0)));
        assert_eq!(lower.last(), Some(Point3::new(1.0, y, 0.0)));
    }
}

#[test]
fn caps_pair_outermost_and_innermost_stations() {
    let mesh = mesh_wing(&square_plate(), &plate_options()).unwrap();
    let last = mesh.upper.stations.len() - 1;

    assert_eq!(mesh.tip.stations[0], mesh.upper.stations[last]);
    assert_eq!(mesh.tip.stations[1], mesh.lower.stations[last].reversed());
    assert_eq!(mesh.root.stations[0], mesh.upper.stations[0]);
    assert_eq!(mesh.root.stations[1], mesh.lower.stations[0].reversed());
}

#[test]
fn piecewise_linear_plate_stays_inside_the_hull() {
    let options = plate_options()
        .with_fit(SurfaceFitOptions::piecewise_linear())
        .with_spacing(Spacing::Cosine, Spacing::Cosine);
    let mesh = mesh_wing(&square_plate(), &options).unwrap();
    assert_eq!(mesh.upper.non_finite_count(), 0);
    assert_eq!(mesh.lower.non_finite_count(), 0);
}

#[test]
fn scale_applies_to_every_input() {
    let options = plate_options().with_scale(2.0);
    let mesh = mesh_wing(&square_plate(), &options).unwrap();
    let tip = &mesh.upper.stations[2];
    assert_eq!(tip.first(), Some(Point3::new(2.0, 4.0, 0.0)));
    assert_eq!(tip.last(), Some(Point3::new(0.0, 4.0, 0.0)));
    // The wake end is an absolute coordinate and is not scaled.
    assert_eq!(mesh.wake.stations[0].last().map(|p| p.x), Some(10.0));
}

#[test]
fn left_wing_on_mirrored_input_mirrors_the_right_wing() {
    let fit = SurfaceFitOptions::radial_basis(RbfKernel::Multiquadric);
    let right = mesh_wing(&square_plate(), &plate_options().with_fit(fit)).unwrap();
    let left = mesh_wing(
        &square_plate().mirrored(Axis::Y),
        &plate_options().with_fit(fit).with_side(WingSide::Left),
    )
    .unwrap();

    let tol = Tolerance::LOOSE;
    let expected = right.mirrored(Axis::Y);
    for ((role, a), (_, b)) in left.networks().into_iter().zip(expected.networks()) {
        assert_eq!(a.shape(), b.shape(), "{role}");
        for (p, q) in a.iter_points().zip(b.iter_points()) {
            assert!(tol.approx_eq_point3(*p, *q), "{role}: {p:?} != {q:?}");
        }
    }
}

#[test]
fn degenerate_counts_are_not_rejected() {
    let empty = mesh_wing(&square_plate(), &plate_options().with_columns(0)).unwrap();
    for (_, network) in empty.networks() {
        assert_eq!(network.point_count(), 0);
    }

    let single_row = mesh_wing(&square_plate(), &plate_options().with_rows(1)).unwrap();
    assert_eq!(single_row.upper.shape(), (3, 1));
    assert_eq!(single_row.upper.stations[1].points, vec![Point3::new(1.0, 1.0, 0.0)]);

    let root_only = mesh_wing(&square_plate(), &plate_options().with_columns(1)).unwrap();
    assert_eq!(root_only.upper.shape(), (1, 4));
    assert_eq!(root_only.tip, root_only.root);
}

#[test]
fn zero_rows_yield_an_empty_mesh() {
    let mesh = mesh_wing(&square_plate(), &plate_options().with_rows(0)).unwrap();
    assert_eq!(mesh, WingMesh::default());
    for (role, network) in mesh.networks() {
        assert!(network.is_rectangular(), "{role}");
        assert_eq!(network.point_count(), 0, "{role}");
    }
}

#[test]
fn invalid_options_are_configuration_errors() {
    assert_eq!(
        "center".parse::<WingSide>(),
        Err(ConfigurationError::UnknownSide("center".to_string()))
    );
    assert_eq!("Left".parse::<WingSide>().unwrap(), WingSide::Left);

    let err = mesh_wing(&square_plate(), &plate_options().with_scale(0.0)).unwrap_err();
    assert_eq!(
        err,
        MeshError::Configuration(ConfigurationError::InvalidParameter {
            name: "scale",
            value: 0.0,
        })
    );

    let err = mesh_wing(&square_plate(), &plate_options().with_wake(f64::NAN, 3)).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn folded_leading_edge_is_an_input_error() {
    let mut sets = square_plate();
    sets.leading_edge = set(&[(0.0, 0.0, 0.0), (0.0, 2.0, 0.0), (0.4, 2.0, 0.0)]);
    let err = mesh_wing(&sets, &plate_options()).unwrap_err();
    assert!(err.is_input(), "{err}");
}
