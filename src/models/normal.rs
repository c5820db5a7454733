use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Standard normal CDF Phi(x).
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Standard normal density phi(x).
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    Normal::standard().pdf(x)
}
