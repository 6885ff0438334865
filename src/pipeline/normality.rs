//! Shapiro-Wilk normality test (Royston's AS R94 approximation)

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Smallest and largest sample sizes the approximation covers.
pub const MIN_SAMPLES: usize = 3;
pub const MAX_SAMPLES: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Result of a Shapiro-Wilk test.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShapiroWilk {
    pub n: usize,
    pub w: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalityError {
    TooFewSamples(usize),
    TooManySamples(usize),
    ZeroRange,
    /// The reference normal distribution could not be built
    Distribution(String),
}

impl std::fmt::Display for NormalityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalityError::TooFewSamples(n) => {
                write!(f, "needs at least {} values, got {}", MIN_SAMPLES, n)
            }
            NormalityError::TooManySamples(n) => {
                write!(f, "supports at most {} values, got {}", MAX_SAMPLES, n)
            }
            NormalityError::ZeroRange => write!(f, "all values are identical"),
            NormalityError::Distribution(reason) => write!(f, "normal distribution: {}", reason),
        }
    }
}

/// Evaluate `c[0] + c[1] x + c[2] x^2 + ...`.
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

fn standard_normal() -> Result<Normal, NormalityError> {
    Normal::new(0.0, 1.0).map_err(|e| NormalityError::Distribution(e.to_string()))
}

/// Antisymmetric coefficients `a[0..n/2]` for the smallest order statistics.
fn coefficients(n: usize) -> Result<Vec<f64>, NormalityError> {
    let half = n / 2;
    if n == 3 {
        return Ok(vec![std::f64::consts::FRAC_1_SQRT_2]);
    }

    let normal = standard_normal()?;
    let an25 = n as f64 + 0.25;
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / an25))
        .collect();
    let summ2: f64 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let mut a = vec![0.0; half];
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    a[0] = a1;

    let (first_free, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (1, fac)
    };

    for i in first_free..half {
        a[i] = -m[i] / fac;
    }
    Ok(a)
}

/// Run the Shapiro-Wilk test on raw (unsorted) values.
pub fn shapiro_wilk(values: &[f64]) -> Result<ShapiroWilk, NormalityError> {
    let n = values.len();
    if n < MIN_SAMPLES {
        return Err(NormalityError::TooFewSamples(n));
    }
    if n > MAX_SAMPLES {
        return Err(NormalityError::TooManySamples(n));
    }

    let x = super::stats::sorted(values);
    let range = x[n - 1] - x[0];
    if range <= f64::EPSILON * x[n - 1].abs().max(1.0) {
        return Err(NormalityError::ZeroRange);
    }

    let a = coefficients(n)?;
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();
    let mean = x.iter().sum::<f64>() / n as f64;
    let ssq: f64 = x.iter().map(|v| (v - mean) * (v - mean)).sum();
    let w = ((numerator * numerator) / ssq).min(1.0);

    Ok(ShapiroWilk {
        n,
        w,
        p_value: p_value(n, w)?,
    })
}

fn p_value(n: usize, w: f64) -> Result<f64, NormalityError> {
    if n == 3 {
        let pi6 = 6.0 / std::f64::consts::PI;
        let stqr = std::f64::consts::FRAC_PI_3;
        return Ok((pi6 * (w.sqrt().asin() - stqr)).clamp(0.0, 1.0));
    }

    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return Ok(1.0);
    }
    let an = n as f64;
    let mut y = w1.ln();

    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return Ok(1e-99);
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };

    let z = (y - m) / s;
    Ok((1.0 - standard_normal()?.cdf(z)).clamp(0.0, 1.0))
}
