/*!
 * Fits a straight line and then several non linear models to a noisy cubic, plotting each
 * fit in the terminal.
 *
 * Run with `cargo run --example non_linear_link --features serde -- [config.toml]` where
 * the optional TOML file overrides any of the `ExperimentConfig` fields, for example
 *
 * ```toml
 * tree_max_depth = 5
 *
 * [dataset]
 * seed = 7
 * noise_scale = 0.1
 * ```
 *
 * Set `RUST_LOG=debug` to see what each model is doing as it fits.
 */

use std::error::Error;

use log::info;

use nonlinear_fit::config::ExperimentConfig;
use nonlinear_fit::plotting;
use nonlinear_fit::walkthrough;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config: ExperimentConfig = match std::env::args().nth(1) {
        Some(path) => {
            info!("reading config from {}", path);
            toml::from_str(&std::fs::read_to_string(path)?)?
        }
        None => ExperimentConfig::default(),
    };

    let (dataset, reports) = walkthrough::run_with_dataset(&config)?;
    for report in &reports {
        plotting::plot_fit(
            &format!("{} (MSE {:.4})", report.name, report.mse),
            &dataset,
            &report.predictions,
        )?;
        if let (Some(weight), Some(intercept)) = (report.weight, report.intercept) {
            println!("weight: {}, intercept: {}", weight, intercept);
        }
    }
    Ok(())
}
