use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{
    Axis, AxisPermutation, ConfigurationError, FitMethod, MeshError, Point3, PointSet, RadialBasis,
    RbfKernel, SurfaceFitOptions, SurfaceInterpolant, Tolerance,
};

fn height(x: f64, y: f64) -> f64 {
    0.3 * (2.0 * x).sin() + 0.2 * y * y - 0.1 * x * y
}

/// 6 x 6 grid over the unit square, each node jittered by up to 4% of a cell.
fn jittered_samples(seed: u64) -> PointSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = 6;
    let cell = 1.0 / f64::from(n - 1);
    let mut points = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let jx: f64 = rng.random::<f64>() - 0.5;
            let jy: f64 = rng.random::<f64>() - 0.5;
            let x = f64::from(i) * cell + 0.08 * cell * jx;
            let y = f64::from(j) * cell + 0.08 * cell * jy;
            points.push(Point3::new(x, y, height(x, y)));
        }
    }
    PointSet::from_points(points).unwrap()
}

fn residuals(fit: &SurfaceInterpolant, samples: &PointSet) -> Vec<f64> {
    samples
        .iter()
        .map(|p| fit.evaluate(p.x, p.y) - p.z)
        .collect()
}

#[test]
fn exact_fit_reproduces_samples() {
    let samples = jittered_samples(7);
    let tol = Tolerance::LOOSE;
    for kernel in RbfKernel::ALL {
        let fit = SurfaceInterpolant::fit(
            &samples,
            AxisPermutation::XYZ,
            &SurfaceFitOptions::radial_basis(kernel),
        )
        .unwrap();
        for p in &samples {
            let value = fit.evaluate(p.x, p.y);
            assert!(
                tol.approx_eq_rel(value, p.z),
                "{kernel}: {value} != {} at ({}, {})",
                p.z,
                p.x,
                p.y
            );
        }
    }
}

#[test]
fn smoothing_relaxes_the_fit() {
    let samples = jittered_samples(11);
    let sum_sq = |smoothing: f64| {
        let options =
            SurfaceFitOptions::radial_basis(RbfKernel::Gaussian).with_smoothing(smoothing);
        let fit = SurfaceInterpolant::fit(&samples, AxisPermutation::XYZ, &options).unwrap();
        residuals(&fit, &samples).iter().map(|r| r * r).sum::<f64>()
    };

    let exact = sum_sq(0.0);
    let light = sum_sq(0.01);
    let heavy = sum_sq(1.0);
    assert!(exact < 1e-12);
    assert!(light > exact);
    assert!(heavy > light);
}

#[test]
fn explicit_epsilon_is_kept() {
    let centers = vec![[0.0], [1.0], [2.0], [4.0]];
    let values = [0.0, 1.0, 0.5, 2.0];
    let rbf = RadialBasis::fit(
        centers.clone(),
        &values,
        RbfKernel::Multiquadric,
        0.0,
        Some(0.75),
    )
    .unwrap();
    assert_eq!(rbf.epsilon(), 0.75);

    // Average spacing over a 1D extent of 4 with 4 samples.
    let auto = RadialBasis::fit(centers, &values, RbfKernel::Multiquadric, 0.0, None).unwrap();
    assert!(Tolerance::DEFAULT.approx_eq_f64(auto.epsilon(), 1.0));
    assert!(Tolerance::LOOSE.approx_eq_f64(auto.evaluate([2.0]), 0.5));
}

#[test]
fn linear_fit_is_exact_on_planes_and_nan_outside() {
    let plane = |x: f64, y: f64| 1.0 + 2.0 * x - y;
    let mut points = Vec::new();
    for i in 0..4 {
        for j in 0..4 {
            let x = f64::from(i) / 3.0;
            let y = f64::from(j) / 3.0;
            points.push(Point3::new(x, y, plane(x, y)));
        }
    }
    let samples = PointSet::from_points(points).unwrap();
    let options = SurfaceFitOptions::piecewise_linear();
    let fit = SurfaceInterpolant::fit(&samples, AxisPermutation::XYZ, &options).unwrap();

    assert!(fit.is_piecewise_linear());
    let tol = Tolerance::DEFAULT;
    for (x, y) in [(0.37, 0.81), (0.0, 0.0), (1.0, 0.5), (0.5, 0.5)] {
        assert!(tol.approx_eq_f64(fit.evaluate(x, y), plane(x, y)));
    }
    assert!(fit.evaluate(2.0, 2.0).is_nan());
    assert!(fit.evaluate(-0.1, 0.5).is_nan());
}

#[test]
fn permuted_axes_fit_the_named_value_axis() {
    // x = f(y, z): a side wall fitted across its height.
    let mut points = Vec::new();
    for i in 0..5 {
        for j in 0..4 {
            let y = f64::from(i) * 0.25;
            let z = f64::from(j) * 0.5;
            points.push(Point3::new(3.0 + 0.5 * y - 0.25 * z, y, z));
        }
    }
    let samples = PointSet::from_points(points).unwrap();
    let axes = AxisPermutation::new(Axis::Y, Axis::Z, Axis::X).unwrap();
    let options = SurfaceFitOptions::radial_basis(RbfKernel::Linear);
    let fit = SurfaceInterpolant::fit(&samples, axes, &options).unwrap();

    let p = fit.point_at(0.5, 1.0);
    assert_eq!(p.y, 0.5);
    assert_eq!(p.z, 1.0);
    assert!(Tolerance::LOOSE.approx_eq_f64(p.x, 3.0));
}

#[test]
fn too_few_or_collinear_samples_are_under_determined() {
    let two =
        PointSet::from_points([Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]).unwrap();
    let err = SurfaceInterpolant::fit(&two, AxisPermutation::XYZ, &SurfaceFitOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        MeshError::Configuration(ConfigurationError::UnderDetermined { provided: 2 })
    );

    let line = PointSet::from_points((0..5).map(|i| {
        let t = f64::from(i);
        Point3::new(t, 2.0 * t, t * t)
    }))
    .unwrap();
    for options in [SurfaceFitOptions::default(), SurfaceFitOptions::piecewise_linear()] {
        let err = SurfaceInterpolant::fit(&line, AxisPermutation::XYZ, &options).unwrap_err();
        assert!(err.is_configuration(), "{err}");
    }
}

#[test]
fn invalid_fit_parameters_are_rejected() {
    let samples = jittered_samples(3);
    let negative = SurfaceFitOptions::default().with_smoothing(-1.0);
    assert_eq!(
        SurfaceInterpolant::fit(&samples, AxisPermutation::XYZ, &negative).unwrap_err(),
        MeshError::Configuration(ConfigurationError::InvalidParameter {
            name: "smoothing",
            value: -1.0,
        })
    );

    let zero_eps = SurfaceFitOptions::radial_basis(RbfKernel::Gaussian).with_epsilon(0.0);
    assert!(zero_eps.validate().is_err());
}

#[test]
fn kernel_and_method_names_parse() {
    assert_eq!("inverse".parse::<RbfKernel>().unwrap(), RbfKernel::InverseMultiquadric);
    assert_eq!("thin_plate".parse::<RbfKernel>().unwrap(), RbfKernel::ThinPlate);
    assert_eq!(
        "bogus".parse::<RbfKernel>(),
        Err(ConfigurationError::UnknownKernel("bogus".to_string()))
    );
    for kernel in RbfKernel::ALL {
        assert_eq!(kernel.name().parse::<RbfKernel>().unwrap(), kernel);
    }

    assert_eq!("linear".parse::<FitMethod>().unwrap(), FitMethod::PiecewiseLinear);
    assert_eq!("rbf".parse::<FitMethod>().unwrap(), FitMethod::default());
    assert_eq!(
        "rbf:linear".parse::<FitMethod>().unwrap(),
        SurfaceFitOptions::radial_basis(RbfKernel::Linear).method
    );
    assert!("spline".parse::<FitMethod>().is_err());

    let legacy = SurfaceFitOptions::from_names("rbf", "cubic", 0.5).unwrap();
    assert_eq!(
        legacy,
        SurfaceFitOptions::radial_basis(RbfKernel::Cubic).with_smoothing(0.5)
    );
    assert_eq!(
        SurfaceFitOptions::from_names("kriging", "cubic", 0.0),
        Err(ConfigurationError::UnknownMethod("kriging".to_string()))
    );
    assert_eq!(
        SurfaceFitOptions::from_names("rbf", "sinc", 0.0),
        Err(ConfigurationError::UnknownKernel("sinc".to_string()))
    );
}
