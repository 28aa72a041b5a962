/*!
 * Decision tree regression.
 *
 * A regression tree recursively splits the samples in two on a single feature threshold,
 * choosing each split to leave the least squared error around the mean target of each
 * side ([CART](https://en.wikipedia.org/wiki/Decision_tree_learning)). Each leaf predicts
 * the mean target of the training samples that reached it, so the fitted function is a
 * step function, which lets a tree follow a non linear relationship without any feature
 * engineering.
 *
 * ```
 * use nonlinear_fit::estimators::Regressor;
 * use nonlinear_fit::features::FeatureMatrix;
 * use nonlinear_fit::tree::DecisionTreeRegressor;
 *
 * let x = FeatureMatrix::from_column(vec![ 0.0, 1.0, 2.0, 10.0, 11.0, 12.0 ]).unwrap();
 * let y = vec![ 1.0, 1.0, 1.0, 5.0, 5.0, 5.0 ];
 * let mut tree = DecisionTreeRegressor::new().with_max_depth(1);
 * tree.fit(&x, &y).unwrap();
 * assert_eq!(tree.predict(&x).unwrap(), y);
 * assert_eq!(tree.depth(), Some(1));
 * ```
 */

use log::debug;

use crate::estimators::{check_feature_count, check_fit_input, FitError, Regressor};
use crate::features::FeatureMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/**
 * A CART regression tree using squared error to choose splits.
 */
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecisionTreeRegressor {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    fitted: Option<FittedTree>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct FittedTree {
    root: Node,
    features: usize,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum Node {
    Leaf {
        value: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        // samples with a value <= threshold go left
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => left.leaves() + right.leaves(),
        }
    }

    fn predict(&self, sample: &[f64]) -> f64 {
        match self {
            Node::Leaf { value, .. } => *value,
            Node::Split { feature, threshold, left, right } => {
                if sample[*feature] <= *threshold {
                    left.predict(sample)
                } else {
                    right.predict(sample)
                }
            }
        }
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        DecisionTreeRegressor::new()
    }
}

impl DecisionTreeRegressor {
    /**
     * Creates a tree with no depth limit that keeps splitting until every leaf is pure
     * or has a single sample.
     */
    pub fn new() -> DecisionTreeRegressor {
        DecisionTreeRegressor {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            fitted: None,
        }
    }

    /**
     * Limits the number of splits from the root to any leaf.
     */
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /**
     * The minimum number of samples a node needs before it may be split, at least 2.
     */
    pub fn with_min_samples_split(mut self, samples: usize) -> Self {
        self.min_samples_split = samples.max(2);
        self
    }

    /**
     * The minimum number of samples each side of a split must keep, at least 1.
     */
    pub fn with_min_samples_leaf(mut self, samples: usize) -> Self {
        self.min_samples_leaf = samples.max(1);
        self
    }

    /**
     * The depth of the fitted tree, where a single leaf has depth 0, or None if the tree
     * has not been fitted.
     */
    pub fn depth(&self) -> Option<usize> {
        self.fitted.as_ref().map(|tree| tree.root.depth())
    }

    /**
     * The number of leaves of the fitted tree, or None if the tree has not been fitted.
     */
    pub fn leaf_count(&self) -> Option<usize> {
        self.fitted.as_ref().map(|tree| tree.root.leaves())
    }

    fn build(&self, features: &FeatureMatrix, targets: &[f64], indexes: Vec<usize>, depth: usize) -> Node {
        let samples = indexes.len();
        let sum: f64 = indexes.iter().map(|&i| targets[i]).sum();
        let mean = sum / samples as f64;
        let squared_error: f64 = indexes.iter().map(|&i| (targets[i] - mean).powi(2)).sum();
        let leaf = Node::Leaf { value: mean, samples };

        if samples < self.min_samples_split
            || self.max_depth.is_some_and(|max| depth >= max)
            || squared_error <= f64::EPSILON
        {
            return leaf;
        }

        match self.best_split(features, targets, &indexes) {
            None => leaf,
            Some(split) => Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(self.build(features, targets, split.left, depth + 1)),
                right: Box::new(self.build(features, targets, split.right, depth + 1)),
            },
        }
    }

    fn best_split(&self, features: &FeatureMatrix, targets: &[f64], indexes: &[usize]) -> Option<Split> {
        let samples = indexes.len();
        let total: f64 = indexes.iter().map(|&i| targets[i]).sum();
        // (score, feature, position in sorted order, threshold)
        let mut best: Option<(f64, usize, usize, f64)> = None;
        let mut best_order = Vec::new();

        for feature in 0..features.features() {
            let value = |i: usize| features.sample(i)[feature];
            let mut order = indexes.to_vec();
            order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

            // Minimising the summed squared error of both sides is the same as maximising
            // sum_left^2 / n_left + sum_right^2 / n_right, which can be tracked incrementally.
            let mut left_sum = 0.0;
            for position in 1..samples {
                left_sum += targets[order[position - 1]];
                let (lower, upper) = (value(order[position - 1]), value(order[position]));
                if lower == upper {
                    continue;
                }
                let left_count = position;
                let right_count = samples - position;
                if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                    continue;
                }
                let right_sum = total - left_sum;
                let score = left_sum * left_sum / left_count as f64
                    + right_sum * right_sum / right_count as f64;
                if best.is_none_or(|(best_score, ..)| score > best_score) {
                    best = Some((score, feature, position, midpoint(lower, upper)));
                    best_order = order.clone();
                }
            }
        }

        let (_, feature, position, threshold) = best?;
        let right = best_order.split_off(position);
        Some(Split {
            feature,
            threshold,
            left: best_order,
            right,
        })
    }
}

// The midpoint can round up to the upper value for adjacent floats, in which case the
// lower value still separates the two.
fn midpoint(lower: f64, upper: f64) -> f64 {
    let threshold = lower / 2.0 + upper / 2.0;
    if threshold >= upper || !threshold.is_finite() {
        lower
    } else {
        threshold
    }
}

impl Regressor for DecisionTreeRegressor {
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), FitError> {
        check_fit_input(features, targets)?;
        let root = self.build(features, targets, (0..targets.len()).collect(), 0);
        debug!("grew tree of depth {} with {} leaves", root.depth(), root.leaves());
        self.fitted = Some(FittedTree {
            root,
            features: features.features(),
        });
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, FitError> {
        let tree = self.fitted.as_ref().ok_or(FitError::NotFitted)?;
        check_feature_count(features, tree.features)?;
        Ok(features.sample_iter().map(|sample| tree.root.predict(sample)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_predicts_mean() {
        let x = FeatureMatrix::from_column(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut tree = DecisionTreeRegressor::new().with_max_depth(0);
        tree.fit(&x, &[1.0, 2.0, 3.0, 6.0]).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), vec![3.0; 4]);
        assert_eq!(tree.leaf_count(), Some(1));
    }

    #[test]
    fn unlimited_tree_memorises_distinct_samples() {
        let x = FeatureMatrix::from_column(vec![5.0, 1.0, 4.0, 2.0, 3.0]).unwrap();
        let y = vec![0.5, -1.0, 2.0, 7.0, 3.0];
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_eq!(tree.leaf_count(), Some(5));
    }

    #[test]
    fn identical_features_cannot_be_split() {
        let x = FeatureMatrix::from_column(vec![1.0, 1.0, 1.0]).unwrap();
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &[0.0, 3.0, 6.0]).unwrap();
        assert_eq!(tree.depth(), Some(0));
    }

    #[test]
    fn min_samples_leaf_is_respected() {
        let x = FeatureMatrix::from_column(vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let mut tree = DecisionTreeRegressor::new().with_min_samples_leaf(2);
        tree.fit(&x, &[0.0, 0.0, 0.0, 100.0]).unwrap();
        assert_eq!(tree.leaf_count(), Some(2));
    }

    #[test]
    fn picks_the_informative_feature() {
        let x = FeatureMatrix::from_rows(vec![
            vec![0.0, 9.0],
            vec![1.0, 1.0],
            vec![0.0, 8.0],
            vec![1.0, 2.0],
        ]).unwrap();
        let mut tree = DecisionTreeRegressor::new().with_max_depth(1);
        tree.fit(&x, &[10.0, 0.0, 10.0, 0.0]).unwrap();
        let unseen = FeatureMatrix::from_rows(vec![vec![0.0, 5.0], vec![1.0, 5.0]]).unwrap();
        assert_eq!(tree.predict(&unseen).unwrap(), vec![10.0, 0.0]);
    }
}
