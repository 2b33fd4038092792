//! Standard normal CDF and quantile approximations.
//!
//! Both are classic rational approximations: Abramowitz & Stegun 26.2.17
//! for Φ (max error < 7.5e-8) and Acklam's algorithm for Φ⁻¹ (relative
//! error < 1.15e-9). Plenty of accuracy against 1¢ market ticks, with no
//! stats dependency to carry.

/// Standard normal CDF Φ(z).
pub fn normal_cdf(z: f64) -> f64 {
    if z < -8.0 {
        return 0.0;
    }
    if z > 8.0 {
        return 1.0;
    }
    if z < 0.0 {
        return 1.0 - normal_cdf(-z);
    }

    // Constants from A&S 26.2.17.
    const B0: f64 = 0.2316419;
    const B1: f64 = 0.319381530;
    const B2: f64 = -0.356563782;
    const B3: f64 = 1.781477937;
    const B4: f64 = -1.821255978;
    const B5: f64 = 1.330274429;

    let t = 1.0 / (1.0 + B0 * z);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let poly = B1 * t + B2 * t2 + B3 * t3 + B4 * t4 + B5 * t5;
    let pdf = (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt();

    1.0 - pdf * poly
}

/// Standard normal quantile Φ⁻¹(p).
///
/// Returns ±infinity at p = 0 and p = 1; callers pass interior
/// probabilities.
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    // Acklam's rational approximation, three regions.
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];

    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdf_at_zero() {
        let cdf = normal_cdf(0.0);
        assert!((cdf - 0.5).abs() < 1e-7, "CDF(0) = {} should be 0.5", cdf);
    }

    #[test]
    fn test_cdf_symmetry() {
        for z in [0.5, 1.0, 1.5, 2.0, 3.0] {
            let sum = normal_cdf(z) + normal_cdf(-z);
            assert!(
                (sum - 1.0).abs() < 1e-7,
                "CDF({}) + CDF(-{}) = {} should be 1.0",
                z,
                z,
                sum
            );
        }
    }

    #[test]
    fn test_cdf_known_values() {
        // Reference values from standard normal table.
        let cases = [
            (1.0, 0.8413447),
            (2.0, 0.9772499),
            (3.0, 0.9986501),
            (-1.0, 0.1586553),
            (-2.0, 0.0227501),
        ];
        for (z, expected) in cases {
            let got = normal_cdf(z);
            assert!(
                (got - expected).abs() < 1e-5,
                "CDF({}) = {}, expected ~{}",
                z,
                got,
                expected
            );
        }
    }

    #[test]
    fn test_quantile_known_values() {
        assert!(normal_quantile(0.5).abs() < 1e-8);
        assert!((normal_quantile(0.8413447) - 1.0).abs() < 1e-4);
        assert!((normal_quantile(0.0227501) + 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_quantile_cdf_round_trip() {
        for p in [0.01, 0.05, 0.25, 0.5, 0.75, 0.95, 0.99, 0.999] {
            let z = normal_quantile(p);
            let back = normal_cdf(z);
            assert!(
                (back - p).abs() < 1e-6,
                "CDF(quantile({})) = {}, drifted too far",
                p,
                back
            );
        }
    }

    #[test]
    fn test_quantile_extremes() {
        assert_eq!(normal_quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(normal_quantile(1.0), f64::INFINITY);
    }
}
