use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use geotiff_reclass::cli::Args;
use geotiff_reclass::pipeline;
use geotiff_reclass::Result;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== GeoTIFF Reclassification ===");

    // Set thread pool size if specified
    if let Some(n_threads) = args.threads {
        match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build_global() {
            Ok(()) => info!("Using {} threads", n_threads),
            Err(e) => warn!("Could not configure thread pool ({}), using default", e),
        }
    } else {
        info!("Using all available threads");
    }

    info!("Input: {}", args.input);
    info!("Output: {}", args.output);

    let statistics = pipeline::run(&args)?;

    let classified = statistics.iter().filter(|s| s.is_some()).count();
    if classified < statistics.len() {
        warn!(
            "{} of {} output bands contain no classified cells",
            statistics.len() - classified,
            statistics.len()
        );
    }

    info!("=== Done! ===");
    Ok(())
}
