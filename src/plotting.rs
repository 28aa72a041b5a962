/*!
 * Terminal plots of a dataset and the curve a model fits to it.
 *
 * Drawing a fitted curve as a line only makes sense with the points in increasing order of
 * x, otherwise the line jumps back and forth across the chart. [curve_points] takes the
 * sort permutation of a [Dataset] for this.
 */

use std::error::Error;
use std::fmt;

use textplots::{Chart, Plot, Shape};

use crate::datasets::Dataset;

/**
 * An error for when values can't be plotted against a dataset.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlotError {
    LengthMismatch { samples: usize, values: usize },
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlotError::LengthMismatch { samples, values } => write!(
                f,
                "Cannot plot {} values against {} samples",
                values, samples
            ),
        }
    }
}

impl Error for PlotError {}

/**
 * Pairs up x and y values visited in the given order as the `(f32, f32)` points textplots
 * draws.
 *
 * # Panics
 *
 * If any index in `order` is out of bounds for `x` or `y`.
 */
pub fn curve_points(x: &[f64], y: &[f64], order: &[usize]) -> Vec<(f32, f32)> {
    order.iter().map(|&i| (x[i] as f32, y[i] as f32)).collect()
}

/**
 * Prints a chart with the dataset as a scatter plot and the predictions for each sample as
 * a line through it.
 */
pub fn plot_fit(title: &str, dataset: &Dataset, predictions: &[f64]) -> Result<(), PlotError> {
    if predictions.len() != dataset.len() {
        return Err(PlotError::LengthMismatch {
            samples: dataset.len(),
            values: predictions.len(),
        });
    }
    let x = dataset.feature_values();
    let order = dataset.sort_permutation();
    let data = curve_points(x, dataset.target_values(), order);
    let fitted = curve_points(x, predictions, order);
    // the sort permutation is never empty
    let (mut x_min, mut x_max) = (data[0].0, data[data.len() - 1].0);
    if x_min >= x_max {
        x_min -= 1.0;
        x_max += 1.0;
    }

    println!("{}", title);
    Chart::new(180, 60, x_min, x_max)
        .lineplot(&Shape::Points(&data))
        .lineplot(&Shape::Lines(&fitted))
        .display();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_follow_the_order() {
        let x = [2.0, 0.0, 1.0];
        let y = [20.0, 0.0, 10.0];
        assert_eq!(
            curve_points(&x, &y, &[1, 2, 0]),
            vec![(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)]
        );
    }

    #[test]
    fn plotting_needs_a_prediction_per_sample() {
        let dataset = crate::datasets::generate_dataset(1, 5, -1.0, 1.0, 0.1).unwrap();
        assert_eq!(
            plot_fit("too few", &dataset, &[0.0; 4]),
            Err(PlotError::LengthMismatch { samples: 5, values: 4 })
        );
    }
}
