//! Non-negative matrix factorisation (Frobenius loss, multiplicative updates)
//!
//! Factorises X (docs x terms) into W (docs x k) and H (k x terms). The
//! ordering of the k components is not meaningful and can change with the
//! seed or the corpus; callers must not rely on component indices.

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::error::{PulsoError, Result};

/// Guards divisions in the update rules
const EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy)]
pub struct NmfConfig {
    pub components: usize,
    pub max_iter: usize,
    /// Stop when the relative error improvement falls below this
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for NmfConfig {
    fn default() -> Self {
        Self {
            components: 2,
            max_iter: 200,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NmfResult {
    /// Document loadings (docs x k)
    pub w: Array2<f64>,
    /// Component term weights (k x terms)
    pub h: Array2<f64>,
    pub iterations: usize,
    /// Final Frobenius reconstruction error
    pub error: f64,
}

impl NmfResult {
    /// Index of the largest loading per document; ties go to the lower index
    pub fn dominant_components(&self) -> Vec<usize> {
        self.w
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (k, &v) in row.iter().enumerate() {
                    if v > row[best] {
                        best = k;
                    }
                }
                best
            })
            .collect()
    }
}

pub struct Nmf {
    config: NmfConfig,
}

impl Nmf {
    pub fn new(config: NmfConfig) -> Self {
        Self { config }
    }

    pub fn fit(&self, x: &Array2<f64>) -> Result<NmfResult> {
        let (n_docs, n_terms) = x.dim();
        let k = self.config.components;
        if n_docs == 0 || n_terms == 0 {
            return Err(PulsoError::EmptyCorpus);
        }
        if k == 0 {
            return Err(PulsoError::InvalidConfig(
                "NMF needs at least one component".into(),
            ));
        }
        if x.iter().any(|&v| v < 0.0 || !v.is_finite()) {
            return Err(PulsoError::InvalidConfig(
                "NMF input must be finite and non-negative".into(),
            ));
        }

        // Random init scaled to the data magnitude
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let scale = (x.mean().unwrap_or(0.0) / k as f64).sqrt();
        let mut w = Array2::from_shape_fn((n_docs, k), |_| scale * rng.gen::<f64>());
        let mut h = Array2::from_shape_fn((k, n_terms), |_| scale * rng.gen::<f64>());

        let mut error = reconstruction_error(x, &w, &h);
        let initial_error = error;
        let mut iterations = 0;

        for iter in 1..=self.config.max_iter {
            iterations = iter;

            // H <- H * (W^T X) / (W^T W H)
            let numerator = w.t().dot(x);
            let denominator = w.t().dot(&w).dot(&h);
            h.zip_mut_with(&(numerator / (denominator + EPSILON)), |a, &b| *a *= b);

            // W <- W * (X H^T) / (W H H^T)
            let numerator = x.dot(&h.t());
            let denominator = w.dot(&h).dot(&h.t());
            w.zip_mut_with(&(numerator / (denominator + EPSILON)), |a, &b| *a *= b);

            if iter % 10 == 0 {
                let current = reconstruction_error(x, &w, &h);
                if initial_error > 0.0 && (error - current) / initial_error < self.config.tolerance {
                    error = current;
                    break;
                }
                error = current;
            }
        }
        error = reconstruction_error(x, &w, &h).min(error);

        tracing::debug!(iterations, error, components = k, "NMF converged");

        Ok(NmfResult {
            w,
            h,
            iterations,
            error,
        })
    }
}

fn reconstruction_error(x: &Array2<f64>, w: &Array2<f64>, h: &Array2<f64>) -> f64 {
    let diff = x - &w.dot(h);
    diff.mapv(|v| v * v).sum().sqrt()
}
