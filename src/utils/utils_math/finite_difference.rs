use nalgebra::DVector;
use crate::utils::utils_errors::InvGeomError;

pub const DEFAULT_FD_PERTURBATION: f64 = 0.000001;

pub struct FiniteDifferenceUtils;
impl FiniteDifferenceUtils {
    /// Gradient of a scalar function via central differences.  The perturbation should be
    /// small relative to the curvature of f but large enough to stay above floating-point
    /// noise; `DEFAULT_FD_PERTURBATION` works well for the costs in this toolbox.
    pub fn scalar_function_gradient<F>(f: F, x: &DVector<f64>, perturbation: f64) -> Result<DVector<f64>, InvGeomError>
        where F: Fn(&DVector<f64>) -> Result<f64, InvGeomError> {
        let mut out_gradient = DVector::zeros(x.len());
        for i in 0..x.len() {
            let mut x_plus = x.clone();
            let mut x_minus = x.clone();
            x_plus[i] += perturbation;
            x_minus[i] -= perturbation;
            let f_plus = f(&x_plus)?;
            let f_minus = f(&x_minus)?;
            out_gradient[i] = (f_plus - f_minus) / (2.0 * perturbation);
        }
        return Ok(out_gradient);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gradient_of_quadratic() {
        let f = |x: &DVector<f64>| -> Result<f64, InvGeomError> {
            Ok(x[0] * x[0] + 3.0 * x[1] * x[1])
        };
        let x = DVector::from_vec(vec![1.5, -2.0]);
        let g = FiniteDifferenceUtils::scalar_function_gradient(f, &x, DEFAULT_FD_PERTURBATION).expect("error");
        assert_relative_eq!(g[0], 3.0, epsilon = 1e-5);
        assert_relative_eq!(g[1], -12.0, epsilon = 1e-5);
    }
}
