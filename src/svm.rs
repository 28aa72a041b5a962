/*!
 * Support vector regression.
 *
 * Epsilon support vector regression looks for the flattest function that keeps every
 * training target within `epsilon` of its prediction, paying a cost of `c` per unit of
 * error for samples outside that tube. The model is never written in terms of a weight per
 * feature: its prediction is a weighted sum of [kernel](Kernel) evaluations between the new
 * sample and the training samples that ended up on or outside the tube (the support
 * vectors).
 *
 * With a linear kernel this is another straight line fit. A polynomial kernel
 * `(gamma * x·x' + coef0)^degree` computes a dot product in the space of polynomial terms
 * without ever expanding the features, so the model can follow a curve.
 *
 * The dual problem is solved with sequential minimal optimisation, updating two dual
 * variables at a time picked by
 * [second order working set selection](https://www.jmlr.org/papers/volume6/fan05a/fan05a.pdf),
 * the same scheme LIBSVM uses.
 *
 * ```
 * use nonlinear_fit::estimators::Regressor;
 * use nonlinear_fit::features::FeatureMatrix;
 * use nonlinear_fit::svm::{Kernel, SupportVectorRegressor};
 *
 * let x: Vec<f64> = (0..20).map(|i| i as f64 / 10.0).collect();
 * let y: Vec<f64> = x.iter().map(|x| 0.5 * x + 0.25).collect();
 * let features = FeatureMatrix::from_column(x).unwrap();
 *
 * let mut svr = SupportVectorRegressor::new(Kernel::Linear).with_epsilon(0.01);
 * svr.fit(&features, &y).unwrap();
 * for (prediction, target) in svr.predict(&features).unwrap().iter().zip(y.iter()) {
 *     // everything is predicted within the tube, give or take the solver's tolerance
 *     assert!((prediction - target).abs() < 0.02);
 * }
 * ```
 */

use log::{debug, warn};

use crate::estimators::{check_feature_count, check_fit_input, FitError, Regressor};
use crate::features::FeatureMatrix;
use crate::linear_algebra;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Stand in for a non positive curvature along the update direction.
const TAU: f64 = 1e-12;

/**
 * How the `gamma` scale of a polynomial kernel is chosen.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Gamma {
    /// `1 / (features * variance of every value in the training features)`, or 1 if that
    /// variance is 0.
    Scale,
    /// `1 / features`
    Auto,
    /// A fixed positive value.
    Value(f64),
}

/**
 * The similarity function between two samples.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kernel {
    /// `x·x'`
    Linear,
    /// `(gamma * x·x' + coef0)^degree`
    Polynomial { degree: u32, gamma: Gamma, coef0: f64 },
}

impl Kernel {
    /**
     * A polynomial kernel with the default `gamma` of [Gamma::Scale] and `coef0` of 0.
     */
    pub fn polynomial(degree: u32) -> Kernel {
        Kernel::Polynomial {
            degree,
            gamma: Gamma::Scale,
            coef0: 0.0,
        }
    }
}

// A kernel with gamma resolved against the training data.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum FittedKernel {
    Linear,
    Polynomial { degree: i32, gamma: f64, coef0: f64 },
}

impl FittedKernel {
    fn resolve(kernel: Kernel, features: &FeatureMatrix) -> Result<FittedKernel, FitError> {
        match kernel {
            Kernel::Linear => Ok(FittedKernel::Linear),
            Kernel::Polynomial { degree, gamma, coef0 } => {
                let degree = i32::try_from(degree).map_err(|_| {
                    FitError::InvalidParameter(format!("polynomial degree {} is too large", degree))
                })?;
                let gamma = match gamma {
                    Gamma::Value(gamma) if gamma > 0.0 && gamma.is_finite() => gamma,
                    Gamma::Value(gamma) => {
                        return Err(FitError::InvalidParameter(format!(
                            "gamma must be positive, got {}",
                            gamma
                        )))
                    }
                    Gamma::Auto => 1.0 / features.features() as f64,
                    Gamma::Scale => {
                        let variance = linear_algebra::variance(
                            features.matrix().row_major_reference_iter().cloned(),
                        )
                        .unwrap_or(0.0);
                        if variance > 0.0 {
                            1.0 / (features.features() as f64 * variance)
                        } else {
                            1.0
                        }
                    }
                };
                Ok(FittedKernel::Polynomial { degree, gamma, coef0 })
            }
        }
    }

    fn apply(&self, a: &[f64], b: &[f64]) -> f64 {
        let dot = linear_algebra::dot(a, b);
        match *self {
            FittedKernel::Linear => dot,
            FittedKernel::Polynomial { degree, gamma, coef0 } => {
                (gamma * dot + coef0).powi(degree)
            }
        }
    }
}

/**
 * An epsilon support vector regressor.
 *
 * Defaults follow common practice: `c` of 1, `epsilon` of 0.1, a stopping tolerance of
 * 0.001 on the largest violation of the optimality conditions.
 */
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SupportVectorRegressor {
    kernel: Kernel,
    c: f64,
    epsilon: f64,
    tolerance: f64,
    max_iterations: usize,
    fitted: Option<FittedSvr>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct FittedSvr {
    kernel: FittedKernel,
    support_vectors: Vec<Vec<f64>>,
    // alpha - alpha* for each support vector
    dual_coefficients: Vec<f64>,
    intercept: f64,
    features: usize,
}

impl SupportVectorRegressor {
    pub fn new(kernel: Kernel) -> SupportVectorRegressor {
        SupportVectorRegressor {
            kernel,
            c: 1.0,
            epsilon: 0.1,
            tolerance: 1e-3,
            max_iterations: 100_000,
            fitted: None,
        }
    }

    /**
     * The penalty per unit of error outside the tube, must be positive.
     */
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /**
     * The half width of the tube within which errors cost nothing, must not be negative.
     */
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /**
     * The number of training samples the fitted model keeps, or None if not fitted.
     */
    pub fn support_vector_count(&self) -> Option<usize> {
        self.fitted.as_ref().map(|fitted| fitted.support_vectors.len())
    }

    /**
     * The constant term of the fitted model, or None if not fitted.
     */
    pub fn intercept(&self) -> Option<f64> {
        self.fitted.as_ref().map(|fitted| fitted.intercept)
    }

    fn check_parameters(&self) -> Result<(), FitError> {
        if !(self.c > 0.0) {
            return Err(FitError::InvalidParameter(format!("c must be positive, got {}", self.c)));
        }
        if !(self.epsilon >= 0.0) {
            return Err(FitError::InvalidParameter(format!(
                "epsilon must not be negative, got {}",
                self.epsilon
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(FitError::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/*
 * The epsilon SVR dual over 2n variables. Variable t < n is alpha_t with sign +1, variable
 * t >= n is alpha*_(t-n) with sign -1, and with Q_st = sign_s sign_t K(s mod n, t mod n):
 *
 * minimise 0.5 aᵀ Q a + pᵀ a
 * subject to signᵀ a = 0 and 0 <= a_t <= c
 *
 * where p_t = epsilon - y_t for t < n and epsilon + y_(t-n) otherwise.
 */
struct DualProblem<'a> {
    kernel_matrix: &'a [Vec<f64>],
    samples: usize,
    c: f64,
    alpha: Vec<f64>,
    gradient: Vec<f64>,
}

impl <'a> DualProblem<'a> {
    fn new(kernel_matrix: &'a [Vec<f64>], targets: &[f64], epsilon: f64, c: f64) -> DualProblem<'a> {
        let samples = targets.len();
        let gradient = targets
            .iter()
            .map(|y| epsilon - y)
            .chain(targets.iter().map(|y| epsilon + y))
            .collect();
        DualProblem {
            kernel_matrix,
            samples,
            c,
            alpha: vec![0.0; 2 * samples],
            gradient,
        }
    }

    fn sign(&self, t: usize) -> f64 {
        if t < self.samples { 1.0 } else { -1.0 }
    }

    fn q(&self, s: usize, t: usize) -> f64 {
        self.sign(s) * self.sign(t) * self.kernel_matrix[s % self.samples][t % self.samples]
    }

    fn diagonal(&self, t: usize) -> f64 {
        let i = t % self.samples;
        self.kernel_matrix[i][i]
    }

    fn at_upper_bound(&self, t: usize) -> bool {
        self.alpha[t] >= self.c
    }

    fn at_lower_bound(&self, t: usize) -> bool {
        self.alpha[t] <= 0.0
    }

    /**
     * Picks the pair of variables to update, or None once the largest violation of the
     * optimality conditions is within tolerance.
     */
    fn select_working_set(&self, tolerance: f64) -> Option<(usize, usize)> {
        let variables = 2 * self.samples;
        // the variable that can move furthest in the direction that increases sign * a
        let mut g_max = f64::NEG_INFINITY;
        let mut first = None;
        for t in 0..variables {
            let candidate = if self.sign(t) > 0.0 {
                if self.at_upper_bound(t) { None } else { Some(-self.gradient[t]) }
            } else if self.at_lower_bound(t) {
                None
            } else {
                Some(self.gradient[t])
            };
            if let Some(value) = candidate {
                if value >= g_max {
                    g_max = value;
                    first = Some(t);
                }
            }
        }

        let i = first?;
        let mut g_max2 = f64::NEG_INFINITY;
        let mut second = None;
        let mut smallest_objective_change = f64::INFINITY;
        for j in 0..variables {
            let (movable, violation, gradient_difference, curvature) = if self.sign(j) > 0.0 {
                (
                    !self.at_lower_bound(j),
                    self.gradient[j],
                    g_max + self.gradient[j],
                    self.diagonal(i) + self.diagonal(j) - 2.0 * self.sign(i) * self.q(i, j),
                )
            } else {
                (
                    !self.at_upper_bound(j),
                    -self.gradient[j],
                    g_max - self.gradient[j],
                    self.diagonal(i) + self.diagonal(j) + 2.0 * self.sign(i) * self.q(i, j),
                )
            };
            if !movable {
                continue;
            }
            g_max2 = g_max2.max(violation);
            if gradient_difference > 0.0 {
                let curvature = if curvature > 0.0 { curvature } else { TAU };
                let objective_change = -(gradient_difference * gradient_difference) / curvature;
                if objective_change <= smallest_objective_change {
                    smallest_objective_change = objective_change;
                    second = Some(j);
                }
            }
        }

        if g_max + g_max2 < tolerance {
            return None;
        }
        second.map(|j| (i, j))
    }

    /**
     * Moves alpha_i and alpha_j to the optimum of the two variable sub problem, keeping
     * both inside the box and the equality constraint satisfied, then updates the gradient.
     */
    fn update_pair(&mut self, i: usize, j: usize) {
        let c = self.c;
        let (old_i, old_j) = (self.alpha[i], self.alpha[j]);
        let q_ij = self.q(i, j);
        let (mut a_i, mut a_j) = (old_i, old_j);

        if self.sign(i) != self.sign(j) {
            let mut curvature = self.diagonal(i) + self.diagonal(j) + 2.0 * q_ij;
            if curvature <= 0.0 {
                curvature = TAU;
            }
            let delta = (-self.gradient[i] - self.gradient[j]) / curvature;
            let difference = a_i - a_j;
            a_i += delta;
            a_j += delta;
            if difference > 0.0 {
                if a_j < 0.0 {
                    a_j = 0.0;
                    a_i = difference;
                }
            } else if a_i < 0.0 {
                a_i = 0.0;
                a_j = -difference;
            }
            if difference > 0.0 {
                if a_i > c {
                    a_i = c;
                    a_j = c - difference;
                }
            } else if a_j > c {
                a_j = c;
                a_i = c + difference;
            }
        } else {
            let mut curvature = self.diagonal(i) + self.diagonal(j) - 2.0 * q_ij;
            if curvature <= 0.0 {
                curvature = TAU;
            }
            let delta = (self.gradient[i] - self.gradient[j]) / curvature;
            let sum = a_i + a_j;
            a_i -= delta;
            a_j += delta;
            if sum > c {
                if a_i > c {
                    a_i = c;
                    a_j = sum - c;
                }
            } else if a_j < 0.0 {
                a_j = 0.0;
                a_i = sum;
            }
            if sum > c {
                if a_j > c {
                    a_j = c;
                    a_i = sum - c;
                }
            } else if a_i < 0.0 {
                a_i = 0.0;
                a_j = sum;
            }
        }

        self.alpha[i] = a_i;
        self.alpha[j] = a_j;
        let (change_i, change_j) = (a_i - old_i, a_j - old_j);
        for t in 0..2 * self.samples {
            self.gradient[t] += self.q(i, t) * change_i + self.q(j, t) * change_j;
        }
    }

    /**
     * The offset rho of the decision function `sum (a_t - a*_t) K(x_t, x) - rho`, averaged
     * over the free variables, or the middle of the feasible range if none are free.
     */
    fn rho(&self) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free = 0;
        let mut free_sum = 0.0;
        for t in 0..2 * self.samples {
            let value = self.sign(t) * self.gradient[t];
            let positive = self.sign(t) > 0.0;
            if self.at_upper_bound(t) {
                if positive { lower = lower.max(value) } else { upper = upper.min(value) }
            } else if self.at_lower_bound(t) {
                if positive { upper = upper.min(value) } else { lower = lower.max(value) }
            } else {
                free += 1;
                free_sum += value;
            }
        }
        if free > 0 {
            free_sum / free as f64
        } else {
            (upper + lower) / 2.0
        }
    }
}

impl Regressor for SupportVectorRegressor {
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), FitError> {
        check_fit_input(features, targets)?;
        self.check_parameters()?;
        let kernel = FittedKernel::resolve(self.kernel, features)?;

        let samples = features.samples();
        let kernel_matrix: Vec<Vec<f64>> = (0..samples)
            .map(|i| {
                (0..samples)
                    .map(|j| kernel.apply(features.sample(i), features.sample(j)))
                    .collect()
            })
            .collect();

        let mut problem = DualProblem::new(&kernel_matrix, targets, self.epsilon, self.c);
        let mut iterations = 0;
        while let Some((i, j)) = problem.select_working_set(self.tolerance) {
            if iterations >= self.max_iterations {
                warn!(
                    "SMO stopped after {} iterations without reaching tolerance {}",
                    iterations, self.tolerance
                );
                break;
            }
            problem.update_pair(i, j);
            iterations += 1;
        }
        let intercept = -problem.rho();

        let mut support_vectors = Vec::new();
        let mut dual_coefficients = Vec::new();
        for t in 0..samples {
            let coefficient = problem.alpha[t] - problem.alpha[t + samples];
            if coefficient != 0.0 {
                support_vectors.push(features.sample(t).to_vec());
                dual_coefficients.push(coefficient);
            }
        }
        debug!(
            "SMO converged in {} iterations with {} support vectors",
            iterations,
            support_vectors.len()
        );

        self.fitted = Some(FittedSvr {
            kernel,
            support_vectors,
            dual_coefficients,
            intercept,
            features: features.features(),
        });
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, FitError> {
        let fitted = self.fitted.as_ref().ok_or(FitError::NotFitted)?;
        check_feature_count(features, fitted.features)?;
        Ok(features
            .sample_iter()
            .map(|sample| {
                fitted
                    .support_vectors
                    .iter()
                    .zip(fitted.dual_coefficients.iter())
                    .map(|(support_vector, coefficient)| {
                        coefficient * fitted.kernel.apply(support_vector, sample)
                    })
                    .sum::<f64>()
                    + fitted.intercept
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_gamma_uses_feature_variance() {
        let x = FeatureMatrix::from_column(vec![-1.0, 1.0]).unwrap();
        let kernel = FittedKernel::resolve(Kernel::polynomial(3), &x).unwrap();
        assert_eq!(kernel, FittedKernel::Polynomial { degree: 3, gamma: 1.0, coef0: 0.0 });
        let x = FeatureMatrix::from_rows(vec![vec![2.0, 2.0]]).unwrap();
        let kernel = FittedKernel::resolve(Kernel::polynomial(2), &x).unwrap();
        assert_eq!(kernel, FittedKernel::Polynomial { degree: 2, gamma: 1.0, coef0: 0.0 });
    }

    #[test]
    fn rejects_invalid_parameters() {
        let x = FeatureMatrix::from_column(vec![0.0, 1.0]).unwrap();
        let mut svr = SupportVectorRegressor::new(Kernel::Linear).with_c(0.0);
        assert!(matches!(svr.fit(&x, &[0.0, 1.0]), Err(FitError::InvalidParameter(_))));
        let mut svr = SupportVectorRegressor::new(Kernel::Linear).with_epsilon(-1.0);
        assert!(matches!(svr.fit(&x, &[0.0, 1.0]), Err(FitError::InvalidParameter(_))));
        let kernel = Kernel::Polynomial { degree: 2, gamma: Gamma::Value(0.0), coef0: 1.0 };
        let mut svr = SupportVectorRegressor::new(kernel);
        assert!(matches!(svr.fit(&x, &[0.0, 1.0]), Err(FitError::InvalidParameter(_))));
    }

    #[test]
    fn rejects_degree_beyond_i32() {
        let x = FeatureMatrix::from_column(vec![0.0, 1.0]).unwrap();
        let mut svr = SupportVectorRegressor::new(Kernel::polynomial(u32::MAX));
        assert!(matches!(svr.fit(&x, &[0.0, 1.0]), Err(FitError::InvalidParameter(_))));
        let largest = i32::MAX as u32;
        assert!(FittedKernel::resolve(Kernel::polynomial(largest), &x).is_ok());
    }

    #[test]
    fn targets_inside_tube_need_no_support_vectors() {
        let x = FeatureMatrix::from_column(vec![0.0, 1.0, 2.0]).unwrap();
        let mut svr = SupportVectorRegressor::new(Kernel::Linear).with_epsilon(1.0);
        svr.fit(&x, &[0.1, 0.0, -0.1]).unwrap();
        assert_eq!(svr.support_vector_count(), Some(0));
        let predictions = svr.predict(&x).unwrap();
        assert!(predictions.iter().all(|p| (p - 0.0).abs() <= 1.0));
    }

    #[test]
    fn polynomial_kernel_fits_a_cubic() {
        let x: Vec<f64> = (-10..=10).map(|i| i as f64 / 10.0).collect();
        let y: Vec<f64> = x.iter().map(|x| x * x * x).collect();
        let features = FeatureMatrix::from_column(x).unwrap();
        let kernel = Kernel::Polynomial { degree: 3, gamma: Gamma::Value(1.0), coef0: 0.0 };
        let mut svr = SupportVectorRegressor::new(kernel).with_c(10.0).with_epsilon(0.01);
        svr.fit(&features, &y).unwrap();
        for (prediction, target) in svr.predict(&features).unwrap().iter().zip(y.iter()) {
            assert!((prediction - target).abs() < 0.05);
        }
    }
}
