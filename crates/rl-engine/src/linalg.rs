//! Dense least squares through the singular values of the design matrix.
//!
//! One-sided Jacobi rotations orthogonalize the columns of `X` directly, so
//! the rank cutoff applies to the singular values `σ` and not to the
//! eigenvalues `σ²` of `XᵀX`. Badly scaled but full-rank columns keep every
//! direction; exactly or numerically dependent columns drop out and the
//! solution is the minimum-norm one.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

const MAX_SWEEPS: usize = 64;

/// Thin singular value decomposition `X = U diag(σ) Vᵀ` of an `N x F` matrix.
///
/// `u` is `N x F`. Columns for a zero singular value are left zero.
pub struct ThinSvd {
    pub u: Array2<f64>,
    pub singular_values: Array1<f64>,
    pub v: Array2<f64>,
}

impl ThinSvd {
    /// Singular values at or below `max(N, F) * eps * σ_max` count as zero.
    pub fn cutoff(&self) -> f64 {
        let (n, f) = (self.u.nrows(), self.u.ncols());
        let max_sigma = self
            .singular_values
            .iter()
            .fold(0.0_f64, |acc, s| acc.max(*s));
        n.max(f) as f64 * f64::EPSILON * max_sigma
    }
}

/// Hestenes one-sided Jacobi SVD.
pub fn thin_svd(x: ArrayView2<'_, f64>) -> ThinSvd {
    let (n, f) = x.dim();
    let mut a = x.to_owned();
    let mut v = Array2::<f64>::eye(f);

    for _ in 0..MAX_SWEEPS {
        let mut rotated = false;

        for p in 0..f {
            for q in (p + 1)..f {
                let col_p = a.column(p);
                let col_q = a.column(q);
                let alpha = col_p.dot(&col_p);
                let beta = col_q.dot(&col_q);
                let gamma = col_p.dot(&col_q);
                if gamma == 0.0 || gamma.abs() <= f64::EPSILON * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (2.0 * gamma);
                let sign = if zeta >= 0.0 { 1.0 } else { -1.0 };
                let t = sign / (zeta.abs() + (zeta * zeta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..f {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }

        if !rotated {
            break;
        }
    }

    let singular_values: Array1<f64> = a.columns().into_iter().map(|c| c.dot(&c).sqrt()).collect();
    let mut u = a;
    for (j, sigma) in singular_values.iter().enumerate() {
        let mut column = u.column_mut(j);
        if *sigma > 0.0 {
            column.mapv_inplace(|value| value / sigma);
        } else {
            column.fill(0.0);
        }
    }

    ThinSvd {
        u,
        singular_values,
        v,
    }
}

/// Moore-Penrose pseudo-inverse, `F x N`.
pub fn pinv(x: ArrayView2<'_, f64>) -> Array2<f64> {
    let svd = thin_svd(x);
    let cutoff = svd.cutoff();
    let inverted = svd
        .singular_values
        .mapv(|sigma| if sigma > cutoff { 1.0 / sigma } else { 0.0 });

    // V diag(1/σ) Uᵀ
    let scaled = &svd.v * &inverted;
    scaled.dot(&svd.u.t())
}

/// Minimum-norm least-squares solution of `x · beta ≈ y`, the same value as
/// `pinv(XᵀX) · Xᵀy` without squaring the condition number.
pub fn least_squares(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Array1<f64> {
    let svd = thin_svd(x);
    let cutoff = svd.cutoff();

    let mut beta = Array1::<f64>::zeros(x.ncols());
    for (j, sigma) in svd.singular_values.iter().enumerate() {
        if *sigma <= cutoff {
            continue;
        }
        let weight = svd.u.column(j).dot(&y) / sigma;
        beta.scaled_add(weight, &svd.v.column(j));
    }
    beta
}
