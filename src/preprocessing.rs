/*!
 * Feature transformations applied before fitting a model.
 *
 * [PolynomialFeatures] expands every sample into all the products of its features up to a
 * degree, which is the automatic version of hand crafting `x^2` and `x^3` columns:
 *
 * ```
 * use nonlinear_fit::estimators::Transformer;
 * use nonlinear_fit::features::FeatureMatrix;
 * use nonlinear_fit::preprocessing::PolynomialFeatures;
 *
 * let x = FeatureMatrix::from_column(vec![ 2.0, 3.0 ]).unwrap();
 * let mut polynomial = PolynomialFeatures::new(3);
 * let expanded = polynomial.fit_transform(&x).unwrap();
 * assert_eq!(expanded.sample(0), &[ 1.0, 2.0, 4.0, 8.0 ]);
 * assert_eq!(expanded.sample(1), &[ 1.0, 3.0, 9.0, 27.0 ]);
 * ```
 */

use crate::estimators::{check_feature_count, FitError, Transformer};
use crate::features::FeatureMatrix;
use crate::matrices::Matrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/**
 * Generates every monomial of the input features with degree at most `degree`.
 *
 * Output columns are ordered by degree, and within a degree by the input feature indexes
 * in combinations with replacement order, so two features `a, b` at degree 2 give
 * `[1, a, b, a^2, ab, b^2]`. The leading column of ones is only included if
 * `include_bias` is set, which it is by default.
 */
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolynomialFeatures {
    degree: usize,
    include_bias: bool,
    interaction_only: bool,
    // each entry lists the input feature indexes multiplied together for that output column
    combinations: Option<Vec<Vec<usize>>>,
    features_in: usize,
}

impl Default for PolynomialFeatures {
    /**
     * Degree 2 terms with a bias column.
     */
    fn default() -> Self {
        PolynomialFeatures::new(2)
    }
}

impl PolynomialFeatures {
    /**
     * Creates a transformer generating terms up to this degree, including a bias column.
     */
    pub fn new(degree: usize) -> PolynomialFeatures {
        PolynomialFeatures {
            degree,
            include_bias: true,
            interaction_only: false,
            combinations: None,
            features_in: 0,
        }
    }

    pub fn with_bias(mut self, include_bias: bool) -> Self {
        self.include_bias = include_bias;
        self
    }

    /**
     * Only generate products of distinct features, ie `ab` but not `a^2`.
     */
    pub fn interaction_only(mut self, interaction_only: bool) -> Self {
        self.interaction_only = interaction_only;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /**
     * The number of columns produced by transform, or None if not yet fitted.
     */
    pub fn output_features(&self) -> Option<usize> {
        self.combinations.as_ref().map(|combinations| combinations.len())
    }

    fn combinations_for(&self, features: usize) -> Vec<Vec<usize>> {
        let mut combinations = Vec::new();
        if self.include_bias {
            combinations.push(Vec::new());
        }
        for degree in 1..=self.degree {
            self.extend_combinations(features, degree, 0, &mut Vec::new(), &mut combinations);
        }
        combinations
    }

    fn extend_combinations(
        &self,
        features: usize,
        remaining: usize,
        start: usize,
        current: &mut Vec<usize>,
        combinations: &mut Vec<Vec<usize>>,
    ) {
        if remaining == 0 {
            combinations.push(current.clone());
            return;
        }
        for feature in start..features {
            current.push(feature);
            // repeating the same feature is what gives powers, unless only interactions
            let next = if self.interaction_only { feature + 1 } else { feature };
            self.extend_combinations(features, remaining - 1, next, current, combinations);
            current.pop();
        }
    }
}

impl Transformer for PolynomialFeatures {
    fn fit(&mut self, features: &FeatureMatrix) -> Result<(), FitError> {
        let combinations = self.combinations_for(features.features());
        if combinations.is_empty() {
            return Err(FitError::InvalidParameter(
                "polynomial features with degree 0 and no bias produce no columns".to_string(),
            ));
        }
        self.features_in = features.features();
        self.combinations = Some(combinations);
        Ok(())
    }

    fn transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, FitError> {
        let combinations = self.combinations.as_ref().ok_or(FitError::NotFitted)?;
        check_feature_count(features, self.features_in)?;
        let mut data = Vec::with_capacity(features.samples() * combinations.len());
        for sample in features.sample_iter() {
            data.extend(
                combinations
                    .iter()
                    .map(|combination| combination.iter().map(|&j| sample[j]).product::<f64>()),
            );
        }
        Ok(FeatureMatrix::from_matrix(Matrix::from_flat_row_major(
            (features.samples(), combinations.len()),
            data,
        )))
    }
}
