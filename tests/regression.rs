extern crate nonlinear_fit;

/// Acceptance tests fitting each model to the default cubic dataset.

#[cfg(test)]
mod tests {
    use nonlinear_fit::config::ExperimentConfig;
    use nonlinear_fit::datasets::{Dataset, DatasetConfig};
    use nonlinear_fit::estimators::Regressor;
    use nonlinear_fit::features::FeatureMatrix;
    use nonlinear_fit::linear_regression::LinearRegression;
    use nonlinear_fit::metrics::mean_squared_error;
    use nonlinear_fit::pipeline::make_pipeline;
    use nonlinear_fit::preprocessing::PolynomialFeatures;
    use nonlinear_fit::svm::{Kernel, SupportVectorRegressor};
    use nonlinear_fit::tree::DecisionTreeRegressor;
    use nonlinear_fit::walkthrough;

    #[test]
    fn walkthrough_errors() {
        let reports = walkthrough::run(&ExperimentConfig::default()).unwrap();
        let names: Vec<&str> = reports.iter().map(|report| report.name).collect();
        assert_eq!(names, vec![
            "linear regression",
            "decision tree",
            "manual polynomial features",
            "polynomial pipeline",
            "linear kernel SVR",
            "polynomial kernel SVR",
        ]);
        for report in &reports {
            println!("{}: {}", report.name, report.mse);
            assert_eq!(report.predictions.len(), 100);
        }
        let mse = |i: usize| reports[i].mse;

        // a line misses most of the curve
        assert!(mse(0) > 0.25 && mse(0) < 0.35);
        // the noise has variance 0.09 so a cubic fit can't get far below that
        assert!(mse(2) < 0.1);
        assert!(mse(1) < mse(0));
        assert!((mse(3) - mse(2)).abs() < 1e-9);
        assert!(mse(5) < mse(4));

        assert!(reports[0].weight.is_some());
        assert!(reports[0].intercept.is_some());
        assert!(reports[1..].iter().all(|report| report.weight.is_none()));
    }

    #[test]
    fn walkthrough_with_fewer_samples_than_cubic_features() {
        for n_samples in 1..=3 {
            let config = ExperimentConfig {
                dataset: DatasetConfig {
                    n_samples,
                    ..DatasetConfig::default()
                },
                ..ExperimentConfig::default()
            };
            let reports = walkthrough::run(&config).unwrap();
            assert_eq!(reports.len(), 6);
            // with at most 3 points the cubic design can interpolate them
            assert!(reports[2].mse < 1e-20);
            assert!(reports[3].mse < 1e-20);
            for report in &reports {
                assert_eq!(report.predictions.len(), n_samples);
                assert!(report.mse.is_finite());
            }
        }
    }

    #[test]
    fn pipeline_matches_manual_cubic_features() {
        let dataset = Dataset::generate(&DatasetConfig::default()).unwrap();
        let targets = dataset.target_values();

        let mut manual = LinearRegression::new();
        manual.fit(&dataset.cubic_feature_matrix(), targets).unwrap();
        let manual_predictions = manual.predict(&dataset.cubic_feature_matrix()).unwrap();

        let mut pipeline = make_pipeline(PolynomialFeatures::new(3), LinearRegression::new());
        pipeline.fit(&dataset.feature_matrix(), targets).unwrap();
        let pipeline_predictions = pipeline.predict(&dataset.feature_matrix()).unwrap();

        for (a, b) in manual_predictions.iter().zip(pipeline_predictions.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn tree_depth_is_limited() {
        let dataset = Dataset::generate(&DatasetConfig::default()).unwrap();
        for max_depth in 0..5 {
            let mut tree = DecisionTreeRegressor::new().with_max_depth(max_depth);
            tree.fit(&dataset.feature_matrix(), dataset.target_values()).unwrap();
            assert!(tree.depth().unwrap() <= max_depth);
            assert!(tree.leaf_count().unwrap() <= 1 << max_depth);
        }
    }

    #[test]
    fn deeper_trees_fit_the_training_data_better() {
        let dataset = Dataset::generate(&DatasetConfig::default()).unwrap();
        let x = dataset.feature_matrix();
        let errors: Vec<f64> = [1, 3, 6]
            .iter()
            .map(|&depth| {
                let mut tree = DecisionTreeRegressor::new().with_max_depth(depth);
                tree.fit(&x, dataset.target_values()).unwrap();
                mean_squared_error(dataset.target_values(), &tree.predict(&x).unwrap()).unwrap()
            })
            .collect();
        assert!(errors[0] > errors[1]);
        assert!(errors[1] > errors[2]);
    }

    #[test]
    fn svr_on_a_line_stays_in_the_tube() {
        let x: Vec<f64> = (0..30).map(|i| i as f64 / 10.0 - 1.5).collect();
        let y: Vec<f64> = x.iter().map(|x| 3.0 * x - 1.0).collect();
        let features = FeatureMatrix::from_column(x).unwrap();
        let mut svr = SupportVectorRegressor::new(Kernel::Linear)
            .with_c(10.0)
            .with_epsilon(0.05);
        svr.fit(&features, &y).unwrap();
        for (prediction, target) in svr.predict(&features).unwrap().iter().zip(y.iter()) {
            assert!((prediction - target).abs() < 0.05 + 1e-2);
        }
        assert!(svr.support_vector_count().unwrap() > 0);
    }

    #[test]
    fn models_reject_wrongly_shaped_features() {
        let dataset = Dataset::generate(&DatasetConfig::default()).unwrap();
        let mut model = LinearRegression::new();
        model.fit(&dataset.feature_matrix(), dataset.target_values()).unwrap();
        assert!(model.predict(&dataset.cubic_feature_matrix()).is_err());
        let short = FeatureMatrix::from_column(vec![0.0, 1.0]).unwrap();
        assert!(model.fit(&short, dataset.target_values()).is_err());
    }
}
