extern crate nonlinear_fit;

/// Acceptance tests for the synthetic cubic dataset and reshaping it for estimators.

#[cfg(test)]
mod tests {
    use nonlinear_fit::datasets::{generate_dataset, Dataset, DatasetConfig, InvalidArgumentError};
    use nonlinear_fit::features::FeatureMatrix;

    #[test]
    fn default_dataset_matches_recorded_values() {
        let dataset = Dataset::generate(&DatasetConfig::default()).unwrap();
        assert_eq!(dataset.feature_values()[0], 0.585411163194373);
        assert_eq!(dataset.feature_values()[1], -0.09541917758909157);
        assert_eq!(dataset.target_values()[0], 0.32524866839729677);
        assert_eq!(dataset.target_values()[1], -0.16768486806067945);
        assert_eq!(&dataset.sort_permutation()[..5], &[38, 80, 92, 71, 98]);
        let first = dataset.sort_permutation()[0];
        let last = dataset.sort_permutation()[99];
        assert_eq!(dataset.feature_values()[first], -1.382338900599322);
        assert_eq!(dataset.feature_values()[last], 1.3663036105906632);
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = generate_dataset(42, 50, -2.0, 2.0, 0.5).unwrap();
        let b = generate_dataset(42, 50, -2.0, 2.0, 0.5).unwrap();
        assert_eq!(a, b);
        let c = generate_dataset(43, 50, -2.0, 2.0, 0.5).unwrap();
        assert_ne!(a.feature_values(), c.feature_values());
    }

    #[test]
    fn lengths_and_range() {
        let dataset = generate_dataset(3, 257, -1.0, 3.0, 0.2).unwrap();
        assert_eq!(dataset.len(), 257);
        assert_eq!(dataset.target_values().len(), 257);
        assert_eq!(dataset.sort_permutation().len(), 257);
        // the range is always centred on zero, with the width of x_max - x_min
        assert!(dataset.feature_values().iter().all(|&x| (-2.0..2.0).contains(&x)));
    }

    #[test]
    fn sort_permutation_is_a_sorting_bijection() {
        let dataset = generate_dataset(9, 200, -1.4, 1.4, 0.3).unwrap();
        let mut seen = vec![false; dataset.len()];
        for &i in dataset.sort_permutation() {
            assert!(!seen[i]);
            seen[i] = true;
        }
        assert!(seen.iter().all(|&x| x));
        let sorted = dataset.in_sorted_order(dataset.feature_values());
        assert!(sorted.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn single_sample() {
        let dataset = generate_dataset(0, 1, -1.4, 1.4, 0.3).unwrap();
        assert_eq!(dataset.sort_permutation(), &[0]);
    }

    #[test]
    fn invalid_arguments() {
        assert_eq!(generate_dataset(0, 0, -1.4, 1.4, 0.3), Err(InvalidArgumentError::NoSamples));
        assert_eq!(
            generate_dataset(0, 10, 1.0, 1.0, 0.3),
            Err(InvalidArgumentError::EmptyRange { x_min: 1.0, x_max: 1.0 })
        );
        assert_eq!(
            generate_dataset(0, 10, 1.0, -1.0, 0.3),
            Err(InvalidArgumentError::EmptyRange { x_min: 1.0, x_max: -1.0 })
        );
        assert_eq!(
            generate_dataset(0, 5, -1e308, 1e308, 0.3),
            Err(InvalidArgumentError::RangeOverflow { x_min: -1e308, x_max: 1e308 })
        );
        // a range whose width still fits in an f64 gives finite feature values
        let wide = generate_dataset(0, 5, -8e307, 8e307, 0.0).unwrap();
        assert!(wide.feature_values().iter().all(|x| x.is_finite()));
        assert_eq!(
            generate_dataset(0, 10, -1.0, 1.0, -0.1),
            Err(InvalidArgumentError::NegativeNoiseScale(-0.1))
        );
        assert!(generate_dataset(0, 10, f64::NAN, 1.0, 0.1).is_err());
    }

    #[test]
    fn reshaping_round_trips() {
        let dataset = generate_dataset(0, 30, -1.4, 1.4, 0.3).unwrap();
        let x = dataset.feature_matrix();
        assert_eq!(x.shape(), (30, 1));
        assert_eq!(x.into_flat_vec(), dataset.feature_values());

        let stacked = dataset.cubic_feature_matrix();
        assert_eq!(stacked.shape(), (30, 3));
        assert_eq!(stacked.column(0), dataset.feature_values());
    }

    #[test]
    fn stacking_needs_equal_columns() {
        assert!(FeatureMatrix::stack_columns(vec![vec![1.0, 2.0], vec![1.0]]).is_err());
        assert!(FeatureMatrix::from_column(Vec::new()).is_err());
    }
}
