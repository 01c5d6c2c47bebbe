mod common;

use clustering::{
    Complex64, ComplexField, FourierConvention, Grid, LognormalNormalization, PowerLaw,
    PowerSpectrum, RealField, estimate_power_spectrum, estimate_power_spectrum_from_fourier,
    generate_gaussian_field, generate_lognormal_field, generate_lognormal_field_with,
};
use common::{isclose, noise_field};

#[test]
fn round_trip_identity() {
    // both even and odd cell counts, and a spacing other than 1
    for (side, spacing) in [(8.0, 1.0), (7.0, 1.0), (3.0, 0.25)] {
        let grid = Grid::new(side, spacing).unwrap();
        let field = noise_field(&grid, 3);
        for convention in [
            FourierConvention::Physical,
            FourierConvention::Backward,
            FourierConvention::Ortho,
        ] {
            let back = field
                .to_fourier(&grid, convention)
                .unwrap()
                .to_real(&grid)
                .unwrap();
            for (a, b) in field.view().iter().zip(back.view().iter()) {
                assert!(
                    isclose(*b, *a, 0.0, 1e-12),
                    "{convention:?} on a {}^3 grid",
                    grid.n_cell()
                );
            }
        }
    }
}

#[test]
fn generated_fourier_field_is_transform_of_real_field() {
    let grid = Grid::new(10.0, 1.0).unwrap();
    let spectrum = PowerLaw {
        amplitude: 3.0,
        index: -1.5,
    };
    let (fourier, real) = generate_gaussian_field(&spectrum, &grid, 99).unwrap();
    let forward = real.to_fourier(&grid, FourierConvention::Physical).unwrap();
    let scale = fourier.view().iter().map(|c| c.norm()).fold(0.0, f64::max);
    for (a, b) in fourier.view().iter().zip(forward.view().iter()) {
        assert!((a - b).norm() <= 1e-10 * scale);
    }
}

#[test]
fn zero_mean_invariant() {
    for seed in 0..5 {
        let grid = Grid::new(16.0, 0.5).unwrap();
        let spectrum = |k: f64| 10.0 * (-k).exp();
        let (fourier, real) = generate_gaussian_field(&spectrum, &grid, seed).unwrap();
        assert_eq!(fourier.view()[[0, 0, 0]], Complex64::new(0.0, 0.0));
        let std = real.variance().sqrt();
        assert!(std > 0.0);
        assert!(real.mean().abs() <= 1e-12 * std, "mean = {}", real.mean());
    }
}

#[test]
fn spectrum_recovery() {
    let grid = Grid::new(32.0, 1.0).unwrap();
    let spectrum = PowerLaw {
        amplitude: 1.0,
        index: -2.0,
    };

    // the estimator applied to a field with |δ_k|² = P(|k|)·V exactly gives
    // the target averaged over the modes of each bin
    let mesh = grid.wavevector_mesh();
    let volume = grid.volume();
    let exact_modes = mesh.norms.mapv(|k| {
        if k > 0.0 {
            Complex64::new((spectrum.evaluate(k) * volume).sqrt(), 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    });
    let exact = ComplexField::new(exact_modes, &grid, FourierConvention::Physical).unwrap();
    let target = estimate_power_spectrum_from_fourier(&exact, &grid, 1).unwrap();

    let n_realizations = 200;
    let mut total = vec![0.0; target.n_bins()];
    for seed in 0..n_realizations {
        let (_, real) = generate_gaussian_field(&spectrum, &grid, seed).unwrap();
        let estimate = estimate_power_spectrum(&real, &grid, 1).unwrap();
        assert_eq!(estimate.n_modes, target.n_modes);
        for (t, p) in total.iter_mut().zip(&estimate.power) {
            *t += p;
        }
    }

    let mut n_checked = 0;
    for i in 0..target.n_bins() {
        if target.n_modes[i] < 50 {
            continue;
        }
        let mean = total[i] / n_realizations as f64;
        assert!(
            isclose(mean, target.power[i], 0.05, 0.0),
            "bin {i} (k = {}): measured {mean}, expected {}",
            target.k_centers[i],
            target.power[i]
        );
        n_checked += 1;
    }
    assert!(n_checked > 10);
}

#[test]
fn empty_bins_are_nan() {
    // a 16^3 grid has edges up to 15 k_F, but its largest |k| is
    // sqrt(192) k_F ≈ 13.9 k_F, so the shell [14, 15) k_F holds no modes
    let grid = Grid::new(4.0, 0.25).unwrap();
    let field = noise_field(&grid, 1);
    let estimate = estimate_power_spectrum(&field, &grid, 1).unwrap();
    assert_eq!(estimate.k_edges.len(), estimate.n_bins() + 1);
    let mut n_empty = 0;
    for i in 0..estimate.n_bins() {
        if estimate.n_modes[i] == 0 {
            assert!(estimate.power[i].is_nan());
            assert!(estimate.k_mean[i].is_nan());
            n_empty += 1;
        } else {
            assert!(estimate.power[i] >= 0.0);
        }
    }
    assert!(n_empty > 0);
    let last = estimate.n_bins() - 1;
    assert_eq!(estimate.n_modes[last], 0);
    assert!(estimate.power[last].is_nan());
    assert!(estimate.gaussian_error()[last].is_nan());
}

#[test]
fn lognormal_field_properties() {
    let grid = Grid::new(32.0, 1.0).unwrap();
    let spectrum = PowerLaw {
        amplitude: 5.0,
        index: -2.0,
    };
    let field = generate_lognormal_field(&spectrum, &grid, 4).unwrap();
    assert!(field.view().iter().all(|&d| d > -1.0));
    assert!(field.mean().abs() < 1e-10);
    assert!(field.variance() > 0.0);

    let half = generate_lognormal_field_with(
        &spectrum,
        &grid,
        4,
        LognormalNormalization::HalfVariance,
    )
    .unwrap();
    assert!(half.view().iter().all(|&d| d > -1.0));
    assert!(half.mean().abs() < 0.2);

    // the same seed gives the same field
    let again = generate_lognormal_field(&spectrum, &grid, 4).unwrap();
    assert_eq!(field, again);
}

#[test]
fn lognormal_variance_normalization() {
    // δ = exp(G - Var(G)) - 1, where the gaussian field G has zero mean
    let grid = Grid::new(32.0, 1.0).unwrap();
    let spectrum = PowerLaw {
        amplitude: 5.0,
        index: -2.0,
    };
    let normalize = |normalization| {
        generate_lognormal_field_with(&spectrum, &grid, 4, normalization).unwrap()
    };
    let field = normalize(LognormalNormalization::Variance);
    assert!(field.view().iter().all(|&d| d > -1.0));

    // ln(1 + δ) = G - Var(G) holds the gaussian field up to a shift, so its
    // variance is Var(G) and its mean is mean(G) - Var(G) = -Var(G)
    let log_density = RealField::new(field.view().mapv(f64::ln_1p), &grid).unwrap();
    let variance = log_density.variance();
    assert!(variance > 0.0);
    assert!(
        isclose(log_density.mean(), -variance, 0.0, 1e-9),
        "mean = {}, variance = {variance}",
        log_density.mean()
    );
    // the density is biased low, so the mean contrast isn't zero
    assert!(field.mean() < -0.01);

    // the same realization with half the offset
    let half = normalize(LognormalNormalization::HalfVariance);
    for (d_var, d_half) in field.view().iter().zip(half.view().iter()) {
        assert!(isclose(d_half.ln_1p() - d_var.ln_1p(), 0.5 * variance, 0.0, 1e-9));
    }
}

#[test]
fn field_shape_mismatch() {
    let grid = Grid::new(8.0, 1.0).unwrap();
    let field = RealField::zeros(&Grid::new(6.0, 1.0).unwrap());
    assert!(estimate_power_spectrum(&field, &grid, 1).is_err());
}
